//! Depth-limited minimax with alpha-beta pruning.
//!
//! The search operates on a scratch copy of the caller's board. Within one
//! call stack it uses mutate-then-restore on that copy; the live board is
//! never touched.

use tracing::{debug, instrument};

use crate::game::{Board, Cell, Coord, Mark};

/// Fixed search parameters threaded through the recursion.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext {
    /// The mark the search maximizes for.
    pub ai: Mark,
    /// The opposing mark.
    pub opponent: Mark,
    /// Plies explored beyond the root move before the node scores zero.
    pub depth_limit: u8,
}

impl SearchContext {
    /// Creates a context for `ai` with the given depth limit.
    pub fn new(ai: Mark, depth_limit: u8) -> Self {
        Self {
            ai,
            opponent: ai.opponent(),
            depth_limit,
        }
    }
}

/// Picks the highest-scoring empty cell for `ctx.ai`.
///
/// Candidate cells are scanned in row-major order and a candidate replaces
/// the current best only on a strictly greater score, so ties keep the
/// earliest cell. The best move is seeded with the first empty cell, which
/// guarantees a valid cell comes back whenever one exists.
///
/// Returns `None` only on a full board.
#[instrument(skip(board))]
pub fn best_move(board: &Board, ctx: &SearchContext) -> Option<Coord> {
    let candidates = board.empty_cells();
    let mut best = *candidates.first()?;
    let mut best_score = i32::MIN;

    let mut scratch = *board;
    for &coord in &candidates {
        scratch.set(coord, Cell::Occupied(ctx.ai));
        let score = search(&mut scratch, ctx, 0, false, i32::MIN, i32::MAX);
        scratch.set(coord, Cell::Empty);
        if score > best_score {
            best_score = score;
            best = coord;
        }
    }

    debug!(%best, best_score, "Search complete");
    Some(best)
}

/// Scores the position reached after the root move, `depth` plies in.
///
/// Terminal scores favor fast wins and slow losses: an AI win is worth
/// `10 - depth`, an opponent win `depth - 10`, and a full board or a
/// reached depth cap scores zero.
fn search(
    board: &mut Board,
    ctx: &SearchContext,
    depth: u8,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    if board.is_winner(ctx.ai) {
        return 10 - i32::from(depth);
    }
    if board.is_winner(ctx.opponent) {
        return i32::from(depth) - 10;
    }
    if board.is_full() || depth >= ctx.depth_limit {
        return 0;
    }

    if maximizing {
        let mut best = i32::MIN;
        for coord in board.empty_cells() {
            board.set(coord, Cell::Occupied(ctx.ai));
            let score = search(board, ctx, depth + 1, false, alpha, beta);
            board.set(coord, Cell::Empty);
            best = best.max(score);
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = i32::MAX;
        for coord in board.empty_cells() {
            board.set(coord, Cell::Occupied(ctx.opponent));
            let score = search(board, ctx, depth + 1, true, alpha, beta);
            board.set(coord, Cell::Empty);
            best = best.min(score);
            beta = beta.min(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    fn board_from(cells: &[(usize, usize, Mark)]) -> Board {
        let mut board = Board::new();
        for &(row, col, mark) in cells {
            board.set(coord(row, col), Cell::Occupied(mark));
        }
        board
    }

    fn full_search(ai: Mark) -> SearchContext {
        SearchContext::new(ai, 9)
    }

    #[test]
    fn blocks_immediate_win() {
        let board = board_from(&[(0, 0, Mark::X), (0, 1, Mark::X)]);
        let chosen = best_move(&board, &full_search(Mark::O)).unwrap();
        assert_eq!(chosen, coord(0, 2));
    }

    #[test]
    fn takes_immediate_win_over_block() {
        let board = board_from(&[(0, 0, Mark::O), (0, 1, Mark::O), (1, 0, Mark::X)]);
        let chosen = best_move(&board, &full_search(Mark::O)).unwrap();
        assert_eq!(chosen, coord(0, 2));

        let mut after = board;
        after.set(chosen, Cell::Occupied(Mark::O));
        assert!(after.is_winner(Mark::O));
    }

    #[test]
    fn answers_corner_opening_with_center() {
        // Any reply other than the center loses against optimal X play.
        let board = board_from(&[(0, 0, Mark::X)]);
        let chosen = best_move(&board, &full_search(Mark::O)).unwrap();
        assert_eq!(chosen, coord(1, 1));
    }

    #[test]
    fn root_ties_keep_the_earliest_cell() {
        // Empty board: every opening scores a draw under optimal play, so
        // the row-major scan keeps (0, 0).
        let chosen = best_move(&Board::new(), &full_search(Mark::X)).unwrap();
        assert_eq!(chosen, coord(0, 0));
    }

    #[test]
    fn full_board_yields_no_move() {
        let board = Board::decode("XOXOXXOXO").unwrap();
        assert!(best_move(&board, &full_search(Mark::O)).is_none());
    }

    #[test]
    fn single_empty_cell_is_returned() {
        let board = Board::decode("XOXOXXOX ").unwrap();
        let chosen = best_move(&board, &full_search(Mark::O)).unwrap();
        assert_eq!(chosen, coord(2, 2));
    }

    #[test]
    fn shallow_search_still_blocks_immediate_threats() {
        // Depth limit 2 sees the opponent's winning reply.
        let board = board_from(&[(2, 0, Mark::X), (2, 1, Mark::X), (0, 0, Mark::O)]);
        let chosen = best_move(&board, &SearchContext::new(Mark::O, 2)).unwrap();
        assert_eq!(chosen, coord(2, 2));
    }
}
