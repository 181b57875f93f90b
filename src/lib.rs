//! Tic-tac-toe with player accounts, game history, and a minimax AI.
//!
//! # Architecture
//!
//! - **Game**: board state and move legality for the 3x3 grid
//! - **AI**: difficulty-tiered move selection (random, shallow search,
//!   full alpha-beta search)
//! - **Session**: round orchestration between the local player, the AI,
//!   and persistence
//! - **Db / Account**: SQLite-backed accounts and per-user game history

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod account;
mod ai;
mod db;
mod game;
mod session;

pub use account::{AccountError, AccountService, hash_password};
pub use ai::{Difficulty, SearchContext, best_move, select_move};
pub use db::{
    AggregatedStats, DbError, GameRecord, GameRepository, MIGRATIONS, NewGameRecord, NewUser,
    Outcome, RoundResult, User,
};
pub use game::{Board, Cell, Coord, Game, Mark, MoveError, ParseBoardError, SIZE};
pub use session::{Opponent, Round, RoundError, RoundState, RoundSummary};
