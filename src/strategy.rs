use std::{fmt::Display, str::FromStr};

use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    board::{Board, Marker, Pos},
    error::Error,
    search::{best_move, non_best_move},
};

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Intermediate,
    Pro,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Pro => write!(f, "pro"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "intermediate" => Ok(Difficulty::Intermediate),
            "pro" => Ok(Difficulty::Pro),
            _ => Err(Error::UnknownDifficulty(s.to_string())),
        }
    }
}

/// How the computer picks its next move.
///
/// `board` is always a private copy, so implementations may mutate it freely
/// while searching. Returns `None` only when the board has no empty cell.
pub trait Strategy: std::fmt::Debug + Send {
    fn get_move(&mut self, board: Board, marker: Marker, rng: &mut StdRng) -> Option<Pos>;
}

pub fn for_difficulty(difficulty: Difficulty) -> Box<dyn Strategy> {
    match difficulty {
        Difficulty::Easy => Box::new(Beginner),
        Difficulty::Intermediate => Box::new(Intermediate::new()),
        Difficulty::Pro => Box::new(Expert),
    }
}

/// Plays any empty cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct Beginner;

impl Strategy for Beginner {
    fn get_move(&mut self, board: Board, _marker: Marker, rng: &mut StdRng) -> Option<Pos> {
        board.available_moves().choose(rng).copied()
    }
}

/// Plays perfectly.
#[derive(Debug, Default, Clone, Copy)]
pub struct Expert;

impl Strategy for Expert {
    fn get_move(&mut self, mut board: Board, marker: Marker, _rng: &mut StdRng) -> Option<Pos> {
        let moves = board.available_moves();
        best_move(&moves, &mut board, marker)
    }
}

/// Plays perfectly except for at most one deliberate mistake per game.
///
/// Every optimal move raises the odds of the mistake by
/// [`Intermediate::MISTAKE_STEP`]; once it has been made the odds drop to
/// zero for the rest of the game.
#[derive(Debug, Clone)]
pub struct Intermediate {
    mistake_probability: f64,
}

impl Intermediate {
    pub const INITIAL_MISTAKE_PROBABILITY: f64 = 0.5;
    pub const MISTAKE_STEP: f64 = 0.15;

    pub fn new() -> Self {
        Self {
            mistake_probability: Self::INITIAL_MISTAKE_PROBABILITY,
        }
    }

    pub fn mistake_probability(&self) -> f64 {
        self.mistake_probability
    }
}

impl Default for Intermediate {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Intermediate {
    fn get_move(&mut self, mut board: Board, marker: Marker, rng: &mut StdRng) -> Option<Pos> {
        let moves = board.available_moves();
        let best = best_move(&moves, &mut board, marker)?;

        let roll: f64 = rng.gen();
        if self.mistake_probability > 0.0 && roll <= self.mistake_probability {
            self.mistake_probability = 0.0;
            let mistake = non_best_move(&moves, best, rng);
            debug!(?best, ?mistake, "intermediate computer plays a mistake");
            return Some(mistake);
        }

        if self.mistake_probability != 0.0 {
            self.mistake_probability = (self.mistake_probability + Self::MISTAKE_STEP).min(1.0);
        }
        Some(best)
    }
}
