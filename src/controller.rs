use std::{fmt::Display, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, instrument};

use crate::{
    board::{Board, Marker},
    config::Config,
    error::Result,
    game::{Game, TurnResult},
    strategy::Difficulty,
};

/// Everything a front end needs to paint the game.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub current_move: Marker,
    pub game_ended: bool,
    pub winner: Marker,
    pub difficulty: Difficulty,
    pub user_marker: Marker,
    pub first_mover: Marker,
    pub generation: u64,
}

impl Snapshot {
    fn of(game: &Game) -> Self {
        Self {
            board: game.board().clone(),
            current_move: game.current_move(),
            game_ended: game.game_ended(),
            winner: game.winner(),
            difficulty: game.difficulty(),
            user_marker: game.user_marker(),
            first_mover: game.first_mover(),
            generation: game.generation(),
        }
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}\n", self.board)?;
        match (self.game_ended, self.winner) {
            (false, _) if self.current_move == self.user_marker => {
                write!(f, "Your turn ({})", self.current_move)?
            }
            (false, _) => write!(f, "Computer ({}) is thinking...", self.current_move)?,
            (true, Marker::Empty) => write!(f, "Draw.")?,
            (true, winner) if winner == self.user_marker => write!(f, "You won!")?,
            (true, winner) => write!(f, "{winner} won!")?,
        }
        write!(f, "  [difficulty: {}]", self.difficulty)
    }
}

#[derive(Debug)]
struct State {
    game: Game,
    pending: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    updates: watch::Sender<Snapshot>,
    thinking_delay: Duration,
}

impl Shared {
    fn publish(&self, game: &Game) {
        let next = Snapshot::of(game);
        self.updates.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

#[derive(Debug, Clone)]
pub struct GameController {
    shared: Arc<Shared>,
}

impl GameController {
    /// Must be called from within a Tokio runtime.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let game = Game::new(config.user_marker, config.difficulty);
        Ok(Self::with_game(game, config.thinking_delay()).await)
    }

    pub async fn with_game(game: Game, thinking_delay: Duration) -> Self {
        let (updates, _) = watch::channel(Snapshot::of(&game));
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                game,
                pending: None,
            }),
            updates,
            thinking_delay,
        });

        {
            let mut state = shared.state.lock().await;
            schedule_computer_move(&shared, &mut state);
        }
        Self { shared }
    }

    /// Plays the human's marker. Ignored while the computer is to move, on
    /// a taken cell, or once the game is over.
    #[instrument(skip(self))]
    pub async fn make_move(&self, row: usize, col: usize) -> TurnResult {
        Board::check_bounds(row, col);
        let mut state = self.shared.state.lock().await;
        if state.game.is_computer_turn() {
            debug!("not the human's turn");
            return TurnResult::Retry;
        }

        let result = state.game.make_move(row, col);
        if result != TurnResult::Retry {
            schedule_computer_move(&self.shared, &mut state);
            self.shared.publish(&state.game);
        }
        result
    }

    #[instrument(skip(self))]
    pub async fn reset_game(&self) {
        let mut state = self.shared.state.lock().await;
        state.game.reset();
        schedule_computer_move(&self.shared, &mut state);
        self.shared.publish(&state.game);
    }

    #[instrument(skip(self))]
    pub async fn set_difficulty(&self, difficulty: Difficulty) {
        let mut state = self.shared.state.lock().await;
        if state.game.set_difficulty(difficulty) {
            schedule_computer_move(&self.shared, &mut state);
            self.shared.publish(&state.game);
        }
    }

    #[instrument(skip(self))]
    pub async fn set_user_marker(&self, marker: Marker) {
        let mut state = self.shared.state.lock().await;
        if state.game.set_user_marker(marker) {
            schedule_computer_move(&self.shared, &mut state);
            self.shared.publish(&state.game);
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.shared.state.lock().await.game)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.updates.subscribe()
    }

    pub fn thinking_delay(&self) -> Duration {
        self.shared.thinking_delay
    }
}

// Replies carry the generation they were scheduled for; a reset aborts them
// and bumps the generation, so a late one never lands on the new board.
fn schedule_computer_move(shared: &Arc<Shared>, state: &mut State) {
    if let Some(pending) = state.pending.take() {
        pending.abort();
    }
    if !state.game.is_computer_turn() {
        return;
    }

    let generation = state.game.generation();
    let delay = shared.thinking_delay;
    let shared = Arc::clone(shared);
    debug!(generation, ?delay, "computer move scheduled");

    state.pending = Some(tokio::spawn(async move {
        sleep(delay).await;

        let mut state = shared.state.lock().await;
        if state.game.generation() != generation {
            debug!(
                generation,
                current = state.game.generation(),
                "discarding stale computer move"
            );
            return;
        }
        state.pending = None;

        if let Some(result) = state.game.play_computer_turn() {
            debug!(?result, "computer moved");
        }
        shared.publish(&state.game);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_renders_status() {
        let mut game = Game::with_seed(Marker::X, Difficulty::Easy, 1);
        let snapshot = Snapshot::of(&game);
        assert!(snapshot.to_string().contains("Your turn (X)"));

        game.make_move(1, 1);
        assert!(Snapshot::of(&game).to_string().contains("thinking"));
    }
}
