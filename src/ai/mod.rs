//! AI move selection.
//!
//! Each difficulty is a distinct strategy over the same board queries:
//! uniform random, a shallow search with a random bypass, or the full
//! nine-ply search. The selector only reads the board it is given; search
//! runs on a scratch copy.

mod minimax;

pub use minimax::{SearchContext, best_move};

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

use crate::game::{Board, Coord, Mark};

/// Probability that a Medium selector plays a random move instead of
/// searching.
const MEDIUM_RANDOM_CHANCE: f64 = 0.3;

/// Depth limit for the Medium search.
const MEDIUM_DEPTH_LIMIT: u8 = 2;

/// Depth limit for the Hard search; effectively unbounded on nine cells.
const HARD_DEPTH_LIMIT: u8 = 9;

/// AI strength, fixed for the duration of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Difficulty {
    /// Uniform random choice among empty cells.
    Easy,
    /// Shallow search, with a 30% chance of playing randomly instead.
    Medium,
    /// Full-depth search; optimal play.
    Hard,
}

/// Chooses the next cell for `ai_mark` at the given difficulty.
///
/// The caller supplies the RNG so it is seeded once per process rather
/// than per call. Returns `None` only when the board is already full,
/// which is a caller precondition violation rather than a reported
/// failure.
#[instrument(skip(board, rng))]
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    ai_mark: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Coord> {
    let chosen = match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Medium => {
            if rng.random_bool(MEDIUM_RANDOM_CHANCE) {
                debug!("Medium selector taking the random branch");
                random_move(board, rng)
            } else {
                best_move(board, &SearchContext::new(ai_mark, MEDIUM_DEPTH_LIMIT))
            }
        }
        Difficulty::Hard => best_move(board, &SearchContext::new(ai_mark, HARD_DEPTH_LIMIT)),
    };
    if let Some(coord) = chosen {
        debug!(%coord, %ai_mark, "AI move selected");
    }
    chosen
}

/// Uniform random choice among the empty cells.
fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Coord> {
    board.empty_cells().choose(rng).copied()
}
