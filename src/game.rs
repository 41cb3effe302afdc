use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    board::{Board, GameStatus, Marker, Pos},
    strategy::{self, Difficulty, Strategy},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Conclusion {
    Win(Marker),
    Draw,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TurnResult {
    /// The cell was taken or the game is over; nothing changed.
    Retry,
    /// The move was played and it is now this marker's turn.
    NextTurn(Marker),
    Concluded(Conclusion),
}

/// One human against the computer, game after game.
///
/// `Game` only ever plays the move it is asked to play. Callers drive the
/// computer's side with [`Game::play_computer_turn`], either straight away or
/// after a delay; [`Game::generation`] tells them whether the game they
/// computed a move for is still the one on the board.
#[derive(Debug)]
pub struct Game {
    board: Board,
    first_mover: Marker,
    current_move: Marker,
    user_marker: Marker,
    difficulty: Difficulty,
    strategy: Box<dyn Strategy>,
    game_ended: bool,
    winner: Marker,
    generation: u64,
    rng: StdRng,
}

impl Game {
    pub fn new(user_marker: Marker, difficulty: Difficulty) -> Self {
        Self::with_rng(user_marker, difficulty, StdRng::from_entropy())
    }

    pub fn with_seed(user_marker: Marker, difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(user_marker, difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(user_marker: Marker, difficulty: Difficulty, rng: StdRng) -> Self {
        assert!(!user_marker.is_empty(), "the human must play X or O");
        Self {
            board: Board::new(),
            first_mover: Marker::X,
            current_move: Marker::X,
            user_marker,
            difficulty,
            strategy: strategy::for_difficulty(difficulty),
            game_ended: false,
            winner: Marker::Empty,
            generation: 0,
            rng,
        }
    }

    /// Plays the current mover's marker at `(row, col)`.
    ///
    /// Taken cells and finished games are rejected with
    /// [`TurnResult::Retry`]. Panics if the coordinate is off the board.
    pub fn make_move(&mut self, row: usize, col: usize) -> TurnResult {
        if !self.is_valid_mark(row, col) {
            debug!(row, col, "rejected move");
            return TurnResult::Retry;
        }

        let mover = self.current_move;
        self.board.set_cell(row, col, mover);
        debug!(%mover, row, col, "move played");

        match self.board.evaluate() {
            GameStatus::Win { winner, line } => {
                for (row, col) in line {
                    self.board.set_winning_cell(row, col, winner);
                }
                self.game_ended = true;
                self.winner = winner;
                info!(%winner, generation = self.generation, "game won");
                TurnResult::Concluded(Conclusion::Win(winner))
            }
            GameStatus::Draw => {
                self.game_ended = true;
                info!(generation = self.generation, "game drawn");
                TurnResult::Concluded(Conclusion::Draw)
            }
            GameStatus::InProgress => {
                self.next_turn();
                TurnResult::NextTurn(self.current_move)
            }
        }
    }

    pub fn computer_move(&mut self) -> Option<Pos> {
        if !self.is_computer_turn() {
            return None;
        }
        let marker = self.computer_marker();
        self.strategy
            .get_move(self.board.copy_markers(), marker, &mut self.rng)
    }

    pub fn play_computer_turn(&mut self) -> Option<TurnResult> {
        let (row, col) = self.computer_move()?;
        Some(self.make_move(row, col))
    }

    /// Starts a new game. The opening move alternates between resets.
    pub fn reset(&mut self) {
        self.first_mover = !self.first_mover;
        self.board = Board::new();
        self.strategy = strategy::for_difficulty(self.difficulty);
        self.current_move = self.first_mover;
        self.game_ended = false;
        self.winner = Marker::Empty;
        self.generation += 1;
        info!(
            generation = self.generation,
            first_mover = %self.first_mover,
            difficulty = %self.difficulty,
            "new game"
        );
    }

    /// Returns `true` if the change forced a new game.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty {
            return false;
        }
        self.difficulty = difficulty;
        self.reset();
        true
    }

    /// Returns `true` if the change forced a new game. `Empty` is ignored.
    pub fn set_user_marker(&mut self, marker: Marker) -> bool {
        if marker.is_empty() || self.user_marker == marker {
            return false;
        }
        self.user_marker = marker;
        self.reset();
        true
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.game_ended && self.current_move == self.computer_marker()
    }

    pub fn computer_marker(&self) -> Marker {
        !self.user_marker
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn first_mover(&self) -> Marker {
        self.first_mover
    }

    pub fn current_move(&self) -> Marker {
        self.current_move
    }

    pub fn user_marker(&self) -> Marker {
        self.user_marker
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn game_ended(&self) -> bool {
        self.game_ended
    }

    pub fn winner(&self) -> Marker {
        self.winner
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn conclusion(&self) -> Option<Conclusion> {
        match (self.game_ended, self.winner) {
            (false, _) => None,
            (true, Marker::Empty) => Some(Conclusion::Draw),
            (true, winner) => Some(Conclusion::Win(winner)),
        }
    }

    fn is_valid_mark(&self, row: usize, col: usize) -> bool {
        self.board.cell(row, col).marker.is_empty() && !self.game_ended
    }

    fn next_turn(&mut self) {
        self.current_move = !self.current_move;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::with_seed(Marker::X, Difficulty::Pro, 11)
    }

    #[test]
    fn human_move_is_played_and_turn_passes() {
        let mut game = game();
        assert_eq!(game.make_move(0, 0), TurnResult::NextTurn(Marker::O));
        assert_eq!(game.board()[(0, 0)].marker, Marker::X);
        assert!(game.is_computer_turn());
    }

    #[test]
    fn occupied_cell_is_silently_rejected() {
        let mut game = game();
        game.make_move(0, 0);
        let board = game.board().clone();

        assert_eq!(game.make_move(0, 0), TurnResult::Retry);
        assert_eq!(game.board(), &board);
        assert_eq!(game.current_move(), Marker::O);
    }

    #[test]
    fn win_highlights_the_line_and_freezes_the_game() {
        let mut game = game();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            game.make_move(row, col);
        }
        assert_eq!(
            game.make_move(0, 2),
            TurnResult::Concluded(Conclusion::Win(Marker::X))
        );
        assert!(game.game_ended());
        assert_eq!(game.winner(), Marker::X);
        for col in 0..3 {
            assert!(game.board()[(0, col)].is_winning_cell);
        }
        assert!(!game.board()[(1, 0)].is_winning_cell);

        let board = game.board().clone();
        assert_eq!(game.make_move(2, 2), TurnResult::Retry);
        assert_eq!(game.board(), &board);
        assert_eq!(game.current_move(), Marker::X);
        assert!(!game.is_computer_turn());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_range_move_panics_after_the_game_ended() {
        let mut game = game();
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            game.make_move(row, col);
        }
        assert!(game.game_ended());
        game.make_move(7, 9);
    }

    #[test]
    fn draw_ends_without_winner() {
        let mut game = game();
        // X O X / X O O / O X X
        for (row, col) in [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ] {
            game.make_move(row, col);
        }
        assert!(game.game_ended());
        assert_eq!(game.winner(), Marker::Empty);
        assert_eq!(game.conclusion(), Some(Conclusion::Draw));
    }

    #[test]
    fn first_mover_alternates_across_resets() {
        let mut game = game();
        let mut openers = vec![game.first_mover()];
        for _ in 0..4 {
            game.reset();
            assert_eq!(game.current_move(), game.first_mover());
            openers.push(game.first_mover());
        }
        use Marker::{O, X};
        assert_eq!(openers, vec![X, O, X, O, X]);
    }

    #[test]
    fn reset_clears_the_previous_game() {
        let mut game = game();
        game.make_move(0, 1);
        game.reset();
        assert_eq!(game.board(), &Board::new());
        assert!(!game.game_ended());
        assert_eq!(game.winner(), Marker::Empty);
        assert_eq!(game.generation(), 1);
    }

    #[test]
    fn configuration_changes_reset_only_when_different() {
        let mut game = game();
        assert!(!game.set_difficulty(Difficulty::Pro));
        assert!(game.set_difficulty(Difficulty::Easy));
        assert_eq!(game.generation(), 1);

        assert!(!game.set_user_marker(Marker::X));
        assert!(!game.set_user_marker(Marker::Empty));
        assert!(game.set_user_marker(Marker::O));
        assert_eq!(game.computer_marker(), Marker::X);
        assert_eq!(game.generation(), 2);
    }

    #[test]
    fn computer_replies_only_on_its_turn() {
        let mut game = game();
        assert_eq!(game.play_computer_turn(), None);

        game.make_move(1, 1);
        let reply = game.play_computer_turn();
        assert_eq!(reply, Some(TurnResult::NextTurn(Marker::X)));
        assert_eq!(game.board().mark_count(), 2);
        assert_eq!(game.board()[(0, 0)].marker, Marker::O);
    }

    #[test]
    fn computer_search_never_touches_the_live_board() {
        let mut game = game();
        game.make_move(1, 1);
        let board = game.board().clone();
        game.computer_move();
        assert_eq!(game.board(), &board);
    }
}
