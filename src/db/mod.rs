//! Database persistence layer for user accounts and game history.

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

/// Embedded schema migrations, applied by [`GameRepository::initialize`].
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub use error::DbError;
pub use models::{
    AggregatedStats, GameRecord, NewGameRecord, NewUser, Outcome, RoundResult, User,
};
pub use repository::GameRepository;
