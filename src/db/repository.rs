//! Database repository for user accounts and game records.

use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use tracing::{debug, info, instrument, warn};

use crate::db::{
    AggregatedStats, DbError, GameRecord, MIGRATIONS, NewGameRecord, NewUser, Outcome, User, schema,
};

/// Repository over the SQLite database holding accounts and game history.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating GameRepository");
        Self { db_path }
    }

    /// Establishes a database connection.
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or a migration
    /// fails.
    #[instrument(skip(self))]
    pub fn initialize(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration error: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Creates a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the username is already taken or a database
    /// error occurs.
    #[instrument(skip(self, user), fields(username = %user.username()))]
    pub fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        debug!("Creating user");
        let mut conn = self.connection()?;

        let user = diesel::insert_into(schema::users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), username = %user.username(), "User created");
        Ok(user)
    }

    /// Looks up a user by username. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_user(&self, username: &str) -> Result<Option<User>, DbError> {
        debug!(username = %username, "Looking up user");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()?;

        if let Some(ref u) = user {
            debug!(user_id = u.id(), "User found");
        } else {
            debug!("User not found");
        }

        Ok(user)
    }

    /// Matches a username against a password hash.
    ///
    /// Returns the user on a credential match, `None` otherwise. The
    /// comparison happens in the query, as a single parameterized lookup.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, password_hash))]
    pub fn authenticate(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>, DbError> {
        debug!(username = %username, "Authenticating user");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .filter(schema::users::password_hash.eq(password_hash))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()?;

        if user.is_some() {
            info!(username = %username, "Authentication succeeded");
        } else {
            info!(username = %username, "Authentication failed");
        }

        Ok(user)
    }

    /// Saves a finished round.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record), fields(user_id = record.user_id(), result = %record.result()))]
    pub fn save_game(&self, record: NewGameRecord) -> Result<GameRecord, DbError> {
        debug!("Saving game record");
        let mut conn = self.connection()?;

        let saved = diesel::insert_into(schema::games::table)
            .values(&record)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(
            record_id = saved.id(),
            user_id = saved.user_id(),
            result = %saved.result(),
            "Game record saved"
        );
        Ok(saved)
    }

    /// All game records for a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn history(&self, user_id: i32) -> Result<Vec<GameRecord>, DbError> {
        debug!(user_id = %user_id, "Loading game history");
        let mut conn = self.connection()?;

        let records = schema::games::table
            .filter(schema::games::user_id.eq(user_id))
            .order((schema::games::played_at.desc(), schema::games::id.desc()))
            .select(GameRecord::as_select())
            .load::<GameRecord>(&mut conn)?;

        info!(user_id = %user_id, count = records.len(), "Game history loaded");
        Ok(records)
    }

    /// Aggregated win/loss/draw counts for a user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs. Records with an
    /// unparsable result label are skipped with a warning.
    #[instrument(skip(self))]
    pub fn aggregated_stats(&self, user_id: i32) -> Result<AggregatedStats, DbError> {
        debug!(user_id = %user_id, "Computing aggregated stats");
        let mut conn = self.connection()?;

        let records = schema::games::table
            .filter(schema::games::user_id.eq(user_id))
            .select(GameRecord::as_select())
            .load::<GameRecord>(&mut conn)?;

        let mut wins = 0;
        let mut losses = 0;
        let mut draws = 0;
        let mut counted = 0;

        for record in &records {
            match record.outcome() {
                Ok(Outcome::Win) => wins += 1,
                Ok(Outcome::Loss) => losses += 1,
                Ok(Outcome::Draw) => draws += 1,
                Err(e) => {
                    warn!(record_id = record.id(), error = %e, "Skipping unparsable record");
                    continue;
                }
            }
            counted += 1;
        }

        let stats = AggregatedStats::new(counted, wins, losses, draws);
        info!(
            user_id = %user_id,
            total = counted,
            wins,
            losses,
            draws,
            "Aggregated stats computed"
        );
        Ok(stats)
    }
}
