//! Round orchestration between the rules engine, the AI selector, and
//! persistence.
//!
//! A [`Round`] tracks whose turn it is (X moves first), routes each side's
//! moves through the engine, and stops accepting moves once the position
//! is terminal. When the round ends it produces a [`RoundSummary`] for the
//! persistence layer.

use std::fmt;

use derive_getters::Getters;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::ai::{Difficulty, select_move};
use crate::db::RoundResult;
use crate::game::{Board, Coord, Game, Mark, MoveError};

/// Who the local player faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// The AI selector at a fixed difficulty.
    Ai(Difficulty),
    /// A second local player sharing the input.
    Human,
}

/// Where a round stands after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Moves are still being accepted.
    InProgress,
    /// The given mark completed a line.
    Won(Mark),
    /// The board filled with no complete line.
    Draw,
}

/// Errors from driving a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    /// The underlying move was illegal.
    Move(MoveError),
    /// A human move was submitted while it is the AI's turn.
    NotYourTurn,
    /// An AI move was requested, but the opponent is not an AI or it is
    /// the local player's turn.
    NotAiTurn,
    /// The round is already over.
    Finished,
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::Move(err) => write!(f, "{}", err),
            RoundError::NotYourTurn => write!(f, "it is not your turn"),
            RoundError::NotAiTurn => write!(f, "it is not the AI's turn"),
            RoundError::Finished => write!(f, "the round is already over"),
        }
    }
}

impl std::error::Error for RoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoundError::Move(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MoveError> for RoundError {
    fn from(err: MoveError) -> Self {
        RoundError::Move(err)
    }
}

/// A finished round, in the shape the persistence layer stores: the final
/// board snapshot text, the mark the local player held, and the result
/// label.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RoundSummary {
    board_text: String,
    player_mark: Mark,
    result: RoundResult,
    moves: usize,
}

/// One round of play.
#[derive(Debug, Clone)]
pub struct Round {
    game: Game,
    opponent: Opponent,
    player_mark: Mark,
    to_move: Mark,
}

impl Round {
    /// Starts a round. X moves first regardless of which mark the local
    /// player chose.
    #[instrument]
    pub fn new(opponent: Opponent, player_mark: Mark) -> Self {
        info!(?opponent, %player_mark, "Starting round");
        Self {
            game: Game::new(),
            opponent,
            player_mark,
            to_move: Mark::X,
        }
    }

    /// The mark whose turn it is.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// The local player's mark.
    pub fn player_mark(&self) -> Mark {
        self.player_mark
    }

    /// The configured opponent.
    pub fn opponent(&self) -> Opponent {
        self.opponent
    }

    /// A copy of the current board.
    pub fn board(&self) -> Board {
        self.game.snapshot()
    }

    /// Number of moves played so far.
    pub fn move_count(&self) -> usize {
        self.game.move_count()
    }

    /// Current round state, derived from the board.
    pub fn state(&self) -> RoundState {
        if let Some(winner) = self.game.winner() {
            RoundState::Won(winner)
        } else if self.game.is_full() {
            RoundState::Draw
        } else {
            RoundState::InProgress
        }
    }

    /// Whether the round has ended.
    pub fn is_over(&self) -> bool {
        self.state() != RoundState::InProgress
    }

    /// Plays the side to move at `(row, col)` from local input.
    ///
    /// Against an AI opponent this is only legal while it is the local
    /// player's turn; in two-player mode it drives both sides.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError`] if the round is over, it is the AI's turn,
    /// or the move itself is illegal. Nothing is mutated on error.
    #[instrument(skip(self))]
    pub fn play(&mut self, row: usize, col: usize) -> Result<RoundState, RoundError> {
        if self.is_over() {
            return Err(RoundError::Finished);
        }
        if matches!(self.opponent, Opponent::Ai(_)) && self.to_move != self.player_mark {
            return Err(RoundError::NotYourTurn);
        }

        self.game.apply_move(row, col, self.to_move)?;
        self.advance();
        Ok(self.state())
    }

    /// Asks the AI selector for a move and applies it.
    ///
    /// Returns the chosen cell and the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError`] if the round is over, the opponent is not an
    /// AI, or it is the local player's turn.
    #[instrument(skip(self, rng))]
    pub fn play_ai<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(Coord, RoundState), RoundError> {
        if self.is_over() {
            return Err(RoundError::Finished);
        }
        let Opponent::Ai(difficulty) = self.opponent else {
            return Err(RoundError::NotAiTurn);
        };
        if self.to_move == self.player_mark {
            return Err(RoundError::NotAiTurn);
        }

        let board = self.game.snapshot();
        let coord =
            select_move(&board, self.to_move, difficulty, rng).ok_or(RoundError::Finished)?;
        self.game.apply_move(coord.row(), coord.col(), self.to_move)?;
        debug!(%coord, "AI move applied");
        self.advance();
        Ok((coord, self.state()))
    }

    /// Clears the board for a fresh round with the same configuration.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.game.reset();
        self.to_move = Mark::X;
    }

    /// The summary handed to persistence once the round is over; `None`
    /// while in progress.
    pub fn summary(&self) -> Option<RoundSummary> {
        let result = match self.state() {
            RoundState::Won(mark) => RoundResult::Winner(mark),
            RoundState::Draw => RoundResult::Tie,
            RoundState::InProgress => return None,
        };
        Some(RoundSummary {
            board_text: self.game.snapshot().encode(),
            player_mark: self.player_mark,
            result,
            moves: self.game.move_count(),
        })
    }

    fn advance(&mut self) {
        if self.state() == RoundState::InProgress {
            self.to_move = self.to_move.opponent();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn turns_alternate_starting_with_x() {
        let mut round = Round::new(Opponent::Human, Mark::X);
        assert_eq!(round.to_move(), Mark::X);
        round.play(0, 0).unwrap();
        assert_eq!(round.to_move(), Mark::O);
        round.play(1, 1).unwrap();
        assert_eq!(round.to_move(), Mark::X);
    }

    #[test]
    fn human_cannot_move_on_ai_turn() {
        // Player chose O, so X (the AI) moves first.
        let mut round = Round::new(Opponent::Ai(Difficulty::Hard), Mark::O);
        assert_eq!(round.play(0, 0), Err(RoundError::NotYourTurn));
    }

    #[test]
    fn ai_turn_requires_ai_opponent() {
        let mut round = Round::new(Opponent::Human, Mark::X);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(round.play_ai(&mut rng), Err(RoundError::NotAiTurn));
    }

    #[test]
    fn finished_round_rejects_moves() {
        let mut round = Round::new(Opponent::Human, Mark::X);
        // X: (0,0) (0,1) (0,2) wins; O: (1,0) (1,1).
        round.play(0, 0).unwrap();
        round.play(1, 0).unwrap();
        round.play(0, 1).unwrap();
        round.play(1, 1).unwrap();
        let state = round.play(0, 2).unwrap();
        assert_eq!(state, RoundState::Won(Mark::X));
        assert_eq!(round.play(2, 2), Err(RoundError::Finished));
    }

    #[test]
    fn illegal_move_leaves_turn_unchanged() {
        let mut round = Round::new(Opponent::Human, Mark::X);
        round.play(0, 0).unwrap();
        assert_eq!(round.play(0, 0), Err(RoundError::Move(MoveError::Occupied(
            Coord::new(0, 0).unwrap()
        ))));
        assert_eq!(round.to_move(), Mark::O);
    }

    #[test]
    fn summary_reports_winner_and_board() {
        let mut round = Round::new(Opponent::Human, Mark::X);
        round.play(0, 0).unwrap();
        round.play(1, 0).unwrap();
        round.play(0, 1).unwrap();
        round.play(1, 1).unwrap();
        round.play(0, 2).unwrap();

        let summary = round.summary().unwrap();
        assert_eq!(*summary.result(), RoundResult::Winner(Mark::X));
        assert_eq!(*summary.player_mark(), Mark::X);
        assert_eq!(summary.board_text(), "XXXOO    ");
        assert_eq!(*summary.moves(), 5);
    }

    #[test]
    fn summary_is_none_while_in_progress() {
        let round = Round::new(Opponent::Human, Mark::X);
        assert!(round.summary().is_none());
    }

    #[test]
    fn ai_round_runs_to_completion() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut round = Round::new(Opponent::Ai(Difficulty::Hard), Mark::O);
        // X (AI) opens.
        round.play_ai(&mut rng).unwrap();
        while !round.is_over() {
            // Local player mirrors the first empty cell.
            let coord = round.board().empty_cells()[0];
            round.play(coord.row(), coord.col()).unwrap();
            if round.is_over() {
                break;
            }
            round.play_ai(&mut rng).unwrap();
        }
        // Optimal X never loses to a first-empty-cell player.
        assert_ne!(round.state(), RoundState::Won(Mark::O));
        assert!(round.summary().is_some());
    }

    #[test]
    fn reset_starts_a_fresh_round() {
        let mut round = Round::new(Opponent::Human, Mark::X);
        round.play(0, 0).unwrap();
        round.reset();
        assert_eq!(round.to_move(), Mark::X);
        assert_eq!(round.move_count(), 0);
        assert_eq!(round.state(), RoundState::InProgress);
    }
}
