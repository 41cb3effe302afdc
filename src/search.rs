use rand::{rngs::StdRng, seq::SliceRandom};
use tracing::trace;

use crate::board::{Board, GameStatus, Marker, Pos, BOARD_DIMENSION};

const WIN: i8 = 1;
const LOSS: i8 = -1;
const DRAW: i8 = 0;

/// `1` forced win for `maximizer`, `0` draw, `-1` forced loss. Marks and
/// clears cells in place, so hand it a board you own.
pub fn minimax(board: &mut Board, is_max_turn: bool, maximizer: Marker) -> i8 {
    match board.evaluate() {
        GameStatus::Draw => return DRAW,
        GameStatus::Win { winner, .. } => return if winner == maximizer { WIN } else { LOSS },
        GameStatus::InProgress => {}
    }

    let mover = if is_max_turn { maximizer } else { !maximizer };
    let mut best = if is_max_turn { i8::MIN } else { i8::MAX };

    for (row, col) in board.available_moves() {
        board.set_cell(row, col, mover);
        let score = minimax(board, !is_max_turn, maximizer);
        board.set_cell(row, col, Marker::Empty);

        best = if is_max_turn {
            best.max(score)
        } else {
            best.min(score)
        };

        // Nothing beats a forced result.
        if (is_max_turn && best == WIN) || (!is_max_turn && best == LOSS) {
            break;
        }
    }

    best
}

/// The first move in `available_moves` with the highest minimax score for
/// `mover`, or `None` if there is nothing to play.
///
/// On an empty board every opening is a draw, so the corner is returned
/// without searching.
pub fn best_move(available_moves: &[Pos], board: &mut Board, mover: Marker) -> Option<Pos> {
    if available_moves.len() == BOARD_DIMENSION * BOARD_DIMENSION {
        return Some((0, 0));
    }

    let mut best: Option<(Pos, i8)> = None;
    for &(row, col) in available_moves {
        board.set_cell(row, col, mover);
        let score = minimax(board, false, mover);
        board.set_cell(row, col, Marker::Empty);
        trace!(row, col, score, "scored candidate");

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some(((row, col), score));
        }
    }

    best.map(|(pos, _)| pos)
}

pub fn non_best_move(available_moves: &[Pos], best: Pos, rng: &mut StdRng) -> Pos {
    let others: Vec<Pos> = available_moves
        .iter()
        .copied()
        .filter(|&pos| pos != best)
        .collect();
    others.choose(rng).copied().unwrap_or(best)
}
