//! Board state and rules for 3x3 tic-tac-toe.

mod board;
mod engine;

pub use board::{Board, Cell, Coord, Mark, ParseBoardError, SIZE};
pub use engine::{Game, MoveError};
