//! The rules engine: single source of truth for the live board.
//!
//! The engine validates moves against cell occupancy only. It does not
//! enforce game-over: once a round is terminal, stopping further moves is
//! the caller's responsibility (the session layer does this).

use std::fmt;

use tracing::{debug, instrument};

use super::board::{Board, Cell, Coord, Mark};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// A coordinate was outside `[0, 3)`.
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
    /// The target cell already holds a mark.
    Occupied(Coord),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfRange { row, col } => {
                write!(f, "move ({}, {}) is out of range", row, col)
            }
            MoveError::Occupied(coord) => write!(f, "cell {} is already occupied", coord),
        }
    }
}

impl std::error::Error for MoveError {}

/// Live game state: the board plus the ordered move history of the
/// current round.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: Board,
    history: Vec<Coord>,
}

impl Game {
    /// Creates a game with an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `mark` at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] without mutating anything if a coordinate is
    /// out of range or the cell is occupied. A rejected move is routine
    /// input, never a fault; callers recover by asking for another move.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), MoveError> {
        let coord = Coord::new(row, col).ok_or(MoveError::OutOfRange { row, col })?;
        if !self.board.is_empty(coord) {
            return Err(MoveError::Occupied(coord));
        }
        self.board.set(coord, Cell::Occupied(mark));
        self.history.push(coord);
        debug!(%coord, %mark, moves = self.history.len(), "Move applied");
        Ok(())
    }

    /// Whether `mark` holds a complete line.
    pub fn is_winner(&self, mark: Mark) -> bool {
        self.board.is_winner(mark)
    }

    /// The mark holding a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        self.board.winner()
    }

    /// Whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.board.is_full()
    }

    /// Clears the board and the move history.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.history.clear();
        debug!("Game reset");
    }

    /// An immutable copy of the current board, reflecting every applied
    /// move in order. Used for rendering, persistence, and seeding the AI's
    /// scratch board.
    pub fn snapshot(&self) -> Board {
        self.board
    }

    /// The moves applied this round, oldest first.
    pub fn history(&self) -> &[Coord] {
        &self.history
    }

    /// Number of moves applied this round.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }
}
