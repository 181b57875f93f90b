//! noughts - tic-tac-toe in the terminal.
//!
//! Thin presentation layer over the library: argument parsing, stdin
//! prompts, and board rendering. All game, AI, and persistence logic
//! lives in the library crate.

mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use noughts::{
    AccountService, Board, Difficulty, GameRecord, GameRepository, Mark, Opponent, Round,
    RoundState, User,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let repository = GameRepository::new(cli.db_path.clone());
    repository.initialize().context("database setup failed")?;
    let service = AccountService::new(repository);

    match cli.command {
        Command::Play {
            user,
            password,
            difficulty,
            symbol,
            two_player,
        } => run_play(&service, user, password, difficulty, symbol, two_player),
        Command::Register { user, password } => run_register(&service, &user, password),
        Command::History {
            user,
            password,
            json,
        } => run_history(&service, &user, password, json),
        Command::Stats {
            user,
            password,
            json,
        } => run_stats(&service, &user, password, json),
    }
}

/// Reads one line from stdin after printing a prompt.
fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Resolves a password argument, prompting when absent.
fn resolve_password(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt("Password: "),
    }
}

/// Logs a user in, treating a credential mismatch as a fatal CLI error.
fn login(service: &AccountService, user: &str, password: Option<String>) -> Result<User> {
    let password = resolve_password(password)?;
    match service.login(user, &password)? {
        Some(user) => Ok(user),
        None => bail!("invalid username or password"),
    }
}

fn run_register(service: &AccountService, user: &str, password: Option<String>) -> Result<()> {
    let password = resolve_password(password)?;
    let user = service.register(user, &password)?;
    println!("Account '{}' created.", user.username());
    Ok(())
}

fn run_play(
    service: &AccountService,
    user: Option<String>,
    password: Option<String>,
    difficulty: Difficulty,
    symbol: Mark,
    two_player: bool,
) -> Result<()> {
    let account = match user {
        Some(name) => Some(login(service, &name, password)?),
        None => None,
    };
    if account.is_none() {
        println!("Playing as guest; results are not recorded.");
    }

    let opponent = if two_player {
        Opponent::Human
    } else {
        Opponent::Ai(difficulty)
    };
    info!(?opponent, %symbol, "Starting play session");

    // One RNG for the whole session; the AI selector never reseeds.
    let mut rng = rand::rng();
    let mut round = Round::new(opponent, symbol);

    loop {
        let state = play_round(&mut round, &mut rng)?;
        announce(state);

        if let (Some(account), Some(summary)) = (&account, round.summary()) {
            let record = service.record_round(*account.id(), &summary)?;
            println!("Recorded as game #{}.", record.id());
        }

        if prompt("Play again? [y/N] ")?.eq_ignore_ascii_case("y") {
            round.reset();
        } else {
            return Ok(());
        }
    }
}

/// Drives a single round to its terminal state.
fn play_round(round: &mut Round, rng: &mut impl rand::Rng) -> Result<RoundState> {
    loop {
        println!("\n{}", render(&round.board()));
        match round.state() {
            RoundState::InProgress => {}
            terminal => return Ok(terminal),
        }

        let local_turn =
            round.opponent() == Opponent::Human || round.to_move() == round.player_mark();
        if local_turn {
            let line = prompt(&format!("{} to move (row col, q to quit): ", round.to_move()))?;
            if line.eq_ignore_ascii_case("q") {
                bail!("round abandoned");
            }
            let Some((row, col)) = parse_move(&line) else {
                println!("Enter a move as two numbers, e.g. '0 2'.");
                continue;
            };
            if let Err(err) = round.play(row, col) {
                println!("Illegal move: {}", err);
            }
        } else {
            let (coord, _) = round.play_ai(rng)?;
            println!("AI plays {}", coord);
        }
    }
}

/// Parses "row col" into a coordinate pair; range checking is the
/// engine's job.
fn parse_move(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((row, col))
}

fn announce(state: RoundState) {
    match state {
        RoundState::Won(mark) => println!("{} wins!", mark),
        RoundState::Draw => println!("It's a tie."),
        RoundState::InProgress => {}
    }
}

/// Renders a board with row and column guides.
fn render(board: &Board) -> String {
    let mut out = String::from("    0   1   2\n");
    let text = board.encode();
    let cells: Vec<char> = text.chars().collect();
    for row in 0..3 {
        if row > 0 {
            out.push_str("   ---+---+---\n");
        }
        out.push_str(&format!(
            "{}   {} | {} | {} \n",
            row,
            cells[row * 3],
            cells[row * 3 + 1],
            cells[row * 3 + 2]
        ));
    }
    out
}

#[derive(Debug, serde::Serialize)]
struct HistoryEntry {
    played_at: String,
    board: String,
    result: String,
}

impl From<&GameRecord> for HistoryEntry {
    fn from(record: &GameRecord) -> Self {
        Self {
            played_at: record.played_at().to_string(),
            board: record.board().clone(),
            result: record.result().clone(),
        }
    }
}

fn run_history(
    service: &AccountService,
    user: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let account = login(service, user, password)?;
    let records = service.history(*account.id())?;

    if json {
        let entries: Vec<HistoryEntry> = records.iter().map(HistoryEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No games played.");
        return Ok(());
    }
    for record in &records {
        println!(
            "Game at {}: result {}, playing as {}",
            record.played_at(),
            record.result(),
            record.player_mark()
        );
        match Board::decode(record.board()) {
            Ok(board) => println!("{}", render(&board)),
            Err(err) => println!("  (unreadable board snapshot: {})", err),
        }
    }
    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct StatsEntry {
    total_games: i32,
    wins: i32,
    losses: i32,
    draws: i32,
    win_rate: f64,
}

fn run_stats(
    service: &AccountService,
    user: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let account = login(service, user, password)?;
    let stats = service.stats(*account.id())?;

    if json {
        let entry = StatsEntry {
            total_games: *stats.total_games(),
            wins: *stats.wins(),
            losses: *stats.losses(),
            draws: *stats.draws(),
            win_rate: stats.win_rate(),
        };
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!(
            "{}: {} games, {} wins, {} losses, {} draws ({:.1}% win rate)",
            account.username(),
            stats.total_games(),
            stats.wins(),
            stats.losses(),
            stats.draws(),
            stats.win_rate()
        );
    }
    Ok(())
}
