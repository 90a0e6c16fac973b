//! Alpha-beta minimax for connect-five
//!
//! Depth-bounded minimax with alpha-beta pruning. The side to move when the search
//! starts is the maximizing player ("the computer"). Scoring is terminal-only:
//! `+WIN_SCORE` once the computer has five, `-WIN_SCORE` once the opponent has,
//! `0` otherwise. At the depth horizon the same score is returned whether or not
//! the game is decided, so the search is blind past it.
//!
//! Every empty cell is a candidate at every ply, scanned row-major. The search
//! works on a private copy of the board and pushes/pops stones with
//! [`Board::place`]/[`Board::clear`]; the board is identical before and after each
//! recursive call.
//!
//! # Example
//!
//! ```
//! use omok::alphabeta::AlphaBeta;
//! use omok::games::gomoku::GomokuState;
//!
//! let state = GomokuState::with_size(5);
//! let outcome = AlphaBeta::new(1).search(&state).unwrap();
//! assert_eq!(outcome.best_move.0, 0);
//! ```

use crate::error::{Error, Result};
use crate::games::gomoku::{Board, GomokuMove, GomokuState, Player};
use log::debug;

/// Score of a position the computer has won
pub const WIN_SCORE: i32 = 1000;

/// Plies searched below each root candidate
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Result of a root search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// First cell (row-major) reaching the best score
    pub best_move: GomokuMove,
    /// Minimax value of the root position
    pub score: i32,
    /// Positions evaluated, root candidates included
    pub nodes: u64,
}

/// Alpha-beta searcher with a fixed depth bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaBeta {
    max_depth: u32,
}

impl Default for AlphaBeta {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl AlphaBeta {
    pub fn new(max_depth: u32) -> Self {
        AlphaBeta { max_depth }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Finds the best move for the side to move in `state`.
    pub fn search(&self, state: &GomokuState) -> Result<SearchOutcome> {
        self.search_with(state, |_| {})
    }

    /// Like [`AlphaBeta::search`], calling `on_candidate` before each root
    /// candidate is evaluated.
    ///
    /// Fails with [`Error::NoSearchPossible`] if either side already has five and
    /// with [`Error::NoLegalMoves`] if the board is full.
    pub fn search_with<F>(&self, state: &GomokuState, mut on_candidate: F) -> Result<SearchOutcome>
    where
        F: FnMut(GomokuMove),
    {
        if state.winner().is_some() {
            return Err(Error::NoSearchPossible);
        }
        if state.is_full() {
            return Err(Error::NoLegalMoves);
        }

        let computer = state.current_player();
        let mut searcher = Searcher {
            board: state.board().clone(),
            computer,
            max_depth: self.max_depth,
            nodes: 0,
        };
        let size = searcher.board.size();

        let mut best: Option<(GomokuMove, i32)> = None;
        for row in 0..size {
            for col in 0..size {
                if searcher.board.place(row, col, computer).is_err() {
                    continue;
                }
                on_candidate(GomokuMove(row, col));
                let value = searcher.minimax(0, false, i32::MIN, i32::MAX, (row, col));
                searcher.board.clear(row, col);
                if best.map_or(true, |(_, best_value)| value > best_value) {
                    best = Some((GomokuMove(row, col), value));
                }
            }
        }
        debug_assert_eq!(&searcher.board, state.board());

        let (best_move, score) = best.ok_or(Error::NoLegalMoves)?;
        debug!(
            "alpha-beta depth {}: {} scores {} after {} nodes",
            self.max_depth, best_move, score, searcher.nodes
        );
        Ok(SearchOutcome {
            best_move,
            score,
            nodes: searcher.nodes,
        })
    }
}

/// Best move for the side to move, searching `max_depth` plies below each candidate
pub fn best_move(state: &GomokuState, max_depth: u32) -> Result<GomokuMove> {
    AlphaBeta::new(max_depth).search(state).map(|outcome| outcome.best_move)
}

/// Working state of one search
struct Searcher {
    board: Board,
    computer: Player,
    max_depth: u32,
    nodes: u64,
}

impl Searcher {
    /// Terminal-only score. Only the stone just placed can have completed a five,
    /// since the search never continues past a decided position.
    fn evaluate(&self, (row, col): (usize, usize)) -> i32 {
        if !self.board.wins_through(row, col) {
            return 0;
        }
        match self.board.get(row, col).and_then(|cell| cell.player()) {
            Some(player) if player == self.computer => WIN_SCORE,
            Some(_) => -WIN_SCORE,
            None => 0,
        }
    }

    fn minimax(&mut self, depth: u32, maximizing: bool, mut alpha: i32, mut beta: i32, last: (usize, usize)) -> i32 {
        self.nodes += 1;
        let score = self.evaluate(last);
        if score != 0 {
            return score;
        }
        if self.board.is_full() {
            return 0;
        }
        if depth >= self.max_depth {
            return score;
        }

        let mover = if maximizing {
            self.computer
        } else {
            self.computer.opponent()
        };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        let size = self.board.size();
        'scan: for row in 0..size {
            for col in 0..size {
                if self.board.place(row, col, mover).is_err() {
                    continue;
                }
                let value = self.minimax(depth + 1, !maximizing, alpha, beta, (row, col));
                self.board.clear(row, col);
                if maximizing {
                    best = best.max(value);
                    alpha = alpha.max(best);
                } else {
                    best = best.min(value);
                    beta = beta.min(best);
                }
                if beta <= alpha {
                    break 'scan;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(size: usize, stones: &[(usize, usize, Player)], to_move: Player) -> GomokuState {
        let mut board = Board::with_size(size);
        for &(r, c, p) in stones {
            board.place(r, c, p).unwrap();
        }
        GomokuState::from_board(board, to_move)
    }

    #[test]
    fn test_takes_immediate_win() {
        // White has four on row 7, the left end blocked
        let state = state_with(
            15,
            &[
                (7, 4, Player::Black),
                (7, 5, Player::White),
                (7, 6, Player::White),
                (7, 7, Player::White),
                (7, 8, Player::White),
                (0, 0, Player::Black),
                (0, 14, Player::Black),
                (14, 0, Player::Black),
            ],
            Player::White,
        );
        let outcome = AlphaBeta::new(1).search(&state).unwrap();
        assert_eq!(outcome.best_move, GomokuMove(7, 9));
        assert_eq!(outcome.score, WIN_SCORE);
    }

    #[test]
    fn test_blocks_opponent_four() {
        let state = state_with(
            7,
            &[
                (3, 0, Player::Black),
                (3, 1, Player::Black),
                (3, 2, Player::Black),
                (3, 3, Player::Black),
                (2, 0, Player::White),
                (4, 0, Player::White),
                (5, 5, Player::White),
            ],
            Player::White,
        );
        let outcome = AlphaBeta::new(1).search(&state).unwrap();
        assert_eq!(outcome.best_move, GomokuMove(3, 4));
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_all_equal_picks_first_empty_cell() {
        let state = state_with(
            6,
            &[(0, 0, Player::Black), (0, 1, Player::White), (0, 2, Player::Black)],
            Player::White,
        );
        let outcome = AlphaBeta::new(2).search(&state).unwrap();
        assert_eq!(outcome.best_move, GomokuMove(0, 3));
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_candidates_reported_in_scan_order() {
        let state = state_with(3, &[(0, 0, Player::Black)], Player::White);
        let mut seen = Vec::new();
        AlphaBeta::new(0).search_with(&state, |mv| seen.push(mv)).unwrap();
        assert_eq!(seen.len(), 8);
        assert_eq!(seen[0], GomokuMove(0, 1));
        assert_eq!(seen[7], GomokuMove(2, 2));
    }

    #[test]
    fn test_decided_or_full_positions_fail() {
        let won = state_with(
            5,
            &[
                (1, 0, Player::Black),
                (1, 1, Player::Black),
                (1, 2, Player::Black),
                (1, 3, Player::Black),
                (1, 4, Player::Black),
            ],
            Player::White,
        );
        assert!(matches!(best_move(&won, 3), Err(Error::NoSearchPossible)));

        let mut board = Board::with_size(2);
        board.place(0, 0, Player::Black).unwrap();
        board.place(0, 1, Player::White).unwrap();
        board.place(1, 0, Player::Black).unwrap();
        board.place(1, 1, Player::White).unwrap();
        let full = GomokuState::from_board(board, Player::Black);
        assert!(matches!(best_move(&full, 3), Err(Error::NoLegalMoves)));
    }

    #[test]
    fn test_search_leaves_state_untouched() {
        let state = state_with(5, &[(2, 2, Player::Black)], Player::White);
        let before = state.clone();
        best_move(&state, 2).unwrap();
        assert_eq!(state, before);
    }
}
