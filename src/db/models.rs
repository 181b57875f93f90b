//! Database models and persisted domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::{DbError, schema};
use crate::game::Mark;

/// User account database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    username: String,
    password_hash: String,
    created_at: NaiveDateTime,
}

/// Insertable user model for account registration.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
    password_hash: String,
}

/// A finished round as stored in the `games` table: the final board
/// snapshot (nine-character string), the mark the user played, and the
/// result label.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(belongs_to(User))]
pub struct GameRecord {
    id: i32,
    user_id: i32,
    board: String,
    player_mark: String,
    result: String,
    played_at: NaiveDateTime,
}

impl GameRecord {
    /// Parses the stored result label.
    pub fn parse_result(&self) -> Result<RoundResult, DbError> {
        RoundResult::from_db_string(self.result())
    }

    /// The outcome from the recorded user's perspective.
    pub fn outcome(&self) -> Result<Outcome, DbError> {
        let mark = Mark::from_char(
            self.player_mark()
                .chars()
                .next()
                .ok_or_else(|| DbError::new("Empty player mark"))?,
        )
        .ok_or_else(|| DbError::new(format!("Invalid player mark: '{}'", self.player_mark())))?;
        Ok(self.parse_result()?.outcome_for(mark))
    }
}

/// Insertable game record.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    user_id: i32,
    board: String,
    player_mark: String,
    result: String,
}

/// The result label of a finished round: the winning mark, or a tie.
///
/// Stored as `"X"`, `"O"`, or `"Tie"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundResult {
    /// The given mark completed a line.
    Winner(Mark),
    /// The board filled with no complete line.
    Tie,
}

impl RoundResult {
    /// Converts the result to the label stored in the database.
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Winner(Mark::X) => "X",
            Self::Winner(Mark::O) => "O",
            Self::Tie => "Tie",
        }
    }

    /// Parses the label stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid result label.
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "X" => Ok(Self::Winner(Mark::X)),
            "O" => Ok(Self::Winner(Mark::O)),
            "Tie" => Ok(Self::Tie),
            _ => Err(DbError::new(format!("Invalid result label: '{}'", s))),
        }
    }

    /// The outcome as seen by a player holding `mark`.
    pub fn outcome_for(&self, mark: Mark) -> Outcome {
        match self {
            Self::Winner(winner) if *winner == mark => Outcome::Win,
            Self::Winner(_) => Outcome::Loss,
            Self::Tie => Outcome::Draw,
        }
    }
}

/// Round outcome from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The player won.
    Win,
    /// The player lost.
    Loss,
    /// Tied round.
    Draw,
}

/// Aggregated win/loss/draw counts for a user.
#[derive(Debug, Clone, Getters)]
pub struct AggregatedStats {
    total_games: i32,
    wins: i32,
    losses: i32,
    draws: i32,
}

impl AggregatedStats {
    /// Creates new aggregated statistics.
    pub fn new(total_games: i32, wins: i32, losses: i32, draws: i32) -> Self {
        Self {
            total_games,
            wins,
            losses,
            draws,
        }
    }

    /// Win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.wins as f64 / self.total_games as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_label_round_trip() {
        for result in [
            RoundResult::Winner(Mark::X),
            RoundResult::Winner(Mark::O),
            RoundResult::Tie,
        ] {
            let label = result.to_db_string();
            assert_eq!(RoundResult::from_db_string(label).unwrap(), result);
        }
        assert!(RoundResult::from_db_string("Q").is_err());
    }

    #[test]
    fn outcome_follows_the_player_mark() {
        let x_wins = RoundResult::Winner(Mark::X);
        assert_eq!(x_wins.outcome_for(Mark::X), Outcome::Win);
        assert_eq!(x_wins.outcome_for(Mark::O), Outcome::Loss);
        assert_eq!(RoundResult::Tie.outcome_for(Mark::X), Outcome::Draw);
    }

    #[test]
    fn win_rate_handles_zero_games() {
        let stats = AggregatedStats::new(0, 0, 0, 0);
        assert_eq!(stats.win_rate(), 0.0);
        let stats = AggregatedStats::new(4, 3, 1, 0);
        assert_eq!(stats.win_rate(), 75.0);
    }
}
