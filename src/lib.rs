//! A tic-tac-toe engine: board and result evaluation, a minimax opponent
//! with three difficulty levels, and a turn-taking controller that alternates
//! the opening move between games.

pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod search;
pub mod strategy;
pub mod term;

pub use board::{Board, Cell, GameStatus, Marker, Pos};
pub use config::Config;
pub use controller::{GameController, Snapshot};
pub use error::{Error, Result};
pub use game::{Conclusion, Game, TurnResult};
pub use strategy::{Beginner, Difficulty, Expert, Intermediate, Strategy};
