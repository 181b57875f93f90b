//! Command-line interface for noughts.

use clap::{Parser, Subcommand};

use noughts::{Difficulty, Mark};

/// Tic-tac-toe with player accounts, game history, and a minimax AI
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Play tic-tac-toe against a minimax AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the database file (created if it doesn't exist)
    #[arg(long, global = true, default_value = "noughts.db")]
    pub db_path: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a round (guest mode unless --user is given)
    Play {
        /// Username whose results should be recorded
        #[arg(long)]
        user: Option<String>,

        /// Password for --user (prompted if omitted)
        #[arg(long)]
        password: Option<String>,

        /// AI strength
        #[arg(long, default_value = "hard")]
        difficulty: Difficulty,

        /// The mark you play (X moves first)
        #[arg(long, default_value = "X")]
        symbol: Mark,

        /// Local two-player mode instead of the AI
        #[arg(long)]
        two_player: bool,
    },

    /// Register a new account
    Register {
        /// Username to create
        #[arg(long)]
        user: String,

        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Show a user's game history
    History {
        /// Username
        #[arg(long)]
        user: String,

        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a user's aggregated win/loss/draw counts
    Stats {
        /// Username
        #[arg(long)]
        user: String,

        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
