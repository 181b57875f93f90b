//! Account management: registration, login, and per-user game records.
//!
//! Passwords are stored as SHA-256 hex digests and compared inside the
//! lookup query; nothing beyond that contract is promised (no strength
//! rules, no salting policy).

use std::fmt;

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::db::{AggregatedStats, DbError, GameRecord, GameRepository, NewGameRecord, NewUser, User};
use crate::session::RoundSummary;

/// Errors from account operations.
#[derive(Debug)]
pub enum AccountError {
    /// Registration or login was attempted with an empty username.
    EmptyUsername,
    /// Registration or login was attempted with an empty password.
    EmptyPassword,
    /// The requested username already exists.
    UsernameTaken(String),
    /// A database error occurred.
    Db(DbError),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::EmptyUsername => write!(f, "username must not be empty"),
            AccountError::EmptyPassword => write!(f, "password must not be empty"),
            AccountError::UsernameTaken(name) => {
                write!(f, "username '{}' is already taken", name)
            }
            AccountError::Db(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AccountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccountError::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for AccountError {
    fn from(err: DbError) -> Self {
        AccountError::Db(err)
    }
}

/// Hashes a password to its lowercase SHA-256 hex digest, the form stored
/// in the `users` table.
pub fn hash_password(password: &str) -> String {
    use std::fmt::Write;

    let digest = Sha256::digest(password.as_bytes());
    digest.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{:02x}", byte);
        out
    })
}

/// Service layer over [`GameRepository`] for account and history
/// operations.
#[derive(Debug, Clone)]
pub struct AccountService {
    repository: GameRepository,
}

impl AccountService {
    /// Creates a new account service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating AccountService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Rejects empty usernames and passwords, and usernames that already
    /// exist.
    #[instrument(skip(self, password))]
    pub fn register(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        if self.repository.find_user(username)?.is_some() {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }

        debug!(username = %username, "Registering account");
        let user = self
            .repository
            .create_user(NewUser::new(username.to_string(), hash_password(password)))?;
        info!(user_id = user.id(), "Account registered");
        Ok(user)
    }

    /// Checks credentials against the store.
    ///
    /// Returns `Some(user)` on a match, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] only for database failures; a wrong
    /// password is `Ok(None)`, not an error.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<Option<User>, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        Ok(self
            .repository
            .authenticate(username, &hash_password(password))?)
    }

    /// Records a finished round for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] if the insert fails.
    #[instrument(skip(self, summary), fields(result = summary.result().to_db_string()))]
    pub fn record_round(
        &self,
        user_id: i32,
        summary: &RoundSummary,
    ) -> Result<GameRecord, AccountError> {
        debug!(user_id, "Recording finished round");
        let record = NewGameRecord::new(
            user_id,
            summary.board_text().to_string(),
            summary.player_mark().to_string(),
            summary.result().to_db_string().to_string(),
        );
        Ok(self.repository.save_game(record)?)
    }

    /// All recorded rounds for a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] if the query fails.
    #[instrument(skip(self))]
    pub fn history(&self, user_id: i32) -> Result<Vec<GameRecord>, AccountError> {
        Ok(self.repository.history(user_id)?)
    }

    /// Aggregated win/loss/draw counts for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] if the query fails.
    #[instrument(skip(self))]
    pub fn stats(&self, user_id: i32) -> Result<AggregatedStats, AccountError> {
        Ok(self.repository.aggregated_stats(user_id)?)
    }
}
