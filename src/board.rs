use std::{
    fmt::Display,
    ops::{Index, Not},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const BOARD_DIMENSION: usize = 3;

/// A `(row, col)` coordinate, row 0 being the top of the board.
pub type Pos = (usize, usize);

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Marker {
    #[default]
    Empty,
    X,
    O,
}

impl Marker {
    pub fn is_empty(self) -> bool {
        self == Marker::Empty
    }
}

impl Not for Marker {
    type Output = Self;

    /// The other player's marker. `Empty` has no opponent and stays `Empty`.
    fn not(self) -> Self::Output {
        match self {
            Marker::O => Marker::X,
            Marker::X => Marker::O,
            Marker::Empty => Marker::Empty,
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marker::O => write!(f, "O"),
            Marker::X => write!(f, "X"),
            Marker::Empty => write!(f, "-"),
        }
    }
}

impl FromStr for Marker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Marker::X),
            "o" | "O" => Ok(Marker::O),
            other => Err(Error::InvalidMarker(other.to_string())),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Cell {
    pub marker: Marker,
    /// Presentation only: set on the three cells of a detected winning line.
    pub is_winning_cell: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Draw,
    Win { winner: Marker, line: [Pos; 3] },
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

// Checked in this order; the first complete line wins.
const LINES: [[Pos; 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Debug, Default, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Board {
    grid: [[Cell; BOARD_DIMENSION]; BOARD_DIMENSION],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh board holding only the markers of `self`; winning highlights
    /// are never carried over.
    pub fn copy_markers(&self) -> Self {
        let mut copy = Board::new();
        for (row, col) in Self::positions() {
            copy.grid[row][col].marker = self.grid[row][col].marker;
        }
        copy
    }

    /// Empty cells in row-major order.
    pub fn available_moves(&self) -> Vec<Pos> {
        Self::positions()
            .filter(|&(row, col)| self.grid[row][col].marker.is_empty())
            .collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        Self::check_bounds(row, col);
        &self.grid[row][col]
    }

    pub fn rows(&self) -> &[[Cell; BOARD_DIMENSION]; BOARD_DIMENSION] {
        &self.grid
    }

    /// Unconditionally writes `marker`, clearing any highlight.
    pub fn set_cell(&mut self, row: usize, col: usize, marker: Marker) {
        self.write(row, col, marker, false);
    }

    pub fn set_winning_cell(&mut self, row: usize, col: usize, marker: Marker) {
        self.write(row, col, marker, true);
    }

    pub fn mark_count(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| !cell.marker.is_empty())
            .count()
    }

    pub fn evaluate(&self) -> GameStatus {
        for line in LINES {
            let [a, b, c] = line.map(|(row, col)| self.grid[row][col].marker);
            if !a.is_empty() && a == b && b == c {
                return GameStatus::Win { winner: a, line };
            }
        }

        if self.mark_count() == BOARD_DIMENSION * BOARD_DIMENSION {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    fn write(&mut self, row: usize, col: usize, marker: Marker, is_winning_cell: bool) {
        Self::check_bounds(row, col);
        self.grid[row][col] = Cell {
            marker,
            is_winning_cell,
        };
    }

    pub(crate) fn check_bounds(row: usize, col: usize) {
        assert!(
            row < BOARD_DIMENSION && col < BOARD_DIMENSION,
            "cell ({row}, {col}) is outside the {BOARD_DIMENSION}x{BOARD_DIMENSION} board"
        );
    }

    fn positions() -> impl Iterator<Item = Pos> {
        (0..BOARD_DIMENSION).flat_map(|row| (0..BOARD_DIMENSION).map(move |col| (row, col)))
    }
}

impl Index<Pos> for Board {
    type Output = Cell;

    fn index(&self, (row, col): Pos) -> &Self::Output {
        self.cell(row, col)
    }
}

// rank 1 is the top row:
// 1│ X--
// 2│ -O-
// 3│ ---
//   ABC : file
impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, rank) in self.grid.iter().enumerate() {
            write!(f, "{}│ ", i + 1)?;
            for cell in rank {
                write!(f, "{}", cell.marker)?;
            }
            writeln!(f)?;
        }
        write!(f, " ╰─────\n   ABC")?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn board_from_rows(rows: [&str; 3]) -> Board {
    let mut board = Board::new();
    for (row, line) in rows.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            let marker = match c {
                'X' => Marker::X,
                'O' => Marker::O,
                _ => Marker::Empty,
            };
            board.set_cell(row, col, marker);
        }
    }
    board
}
