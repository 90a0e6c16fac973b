//! # Omok Search Engine
//!
//! Move selection for 15×15 connect-five. Two independent strategies share the
//! board and win-detection code in [`games::gomoku`]:
//!
//! - [`alphabeta`]: depth-bounded minimax with alpha-beta pruning, single-threaded,
//!   working on one board with a place/undo discipline.
//! - [`MCTS`]: multi-threaded Monte Carlo Tree Search with UCT selection over a
//!   shared, lock-protected [`tree::SearchTree`]. Generic over any [`GameState`].
//!
//! [`game_controller::GameController`] owns the real game and calls whichever
//! strategy is configured; [`console`] renders boards and parses typed moves.

pub mod alphabeta;
pub mod console;
pub mod error;
pub mod game_controller;
pub mod games;
pub mod tree;

pub use error::{Error, Result};

use log::{debug, warn};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::ThreadPoolBuilder;
use std::sync::Arc;
use tree::{Expansion, SearchTree, ROOT};

/// The state of the game. Must be cloneable to be used in the MCTS.
/// `Send` and `Sync` are required for parallel processing.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game.
    type Move: Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;
    /// The type identifying a side.
    type Player: Copy + Eq + std::fmt::Debug + Send + Sync;

    /// Returns all legal moves from the current state, in a fixed enumeration order.
    fn get_possible_moves(&self) -> Vec<Self::Move>;
    /// Applies a move to the state, modifying it.
    fn make_move(&mut self, mv: &Self::Move);
    /// Returns true if the game is over.
    fn is_terminal(&self) -> bool;
    /// Returns the winner of the game, if any.
    /// `None` for a draw or if the game is not over.
    fn get_winner(&self) -> Option<Self::Player>;
    /// Returns the player whose turn it is to move.
    fn get_current_player(&self) -> Self::Player;
}

/// Search budget and parallelism for [`MCTS`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MctsConfig {
    /// Total simulations, split evenly across workers
    pub iterations: usize,
    /// Worker threads spawned for each search
    pub workers: usize,
    /// Base seed for the per-worker playout generators; `None` draws one at random
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            iterations: 1000,
            workers: num_cpus::get(),
            seed: None,
        }
    }
}

/// Counters describing one finished search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Nodes in the tree when the search finished, root included
    pub total_nodes: usize,
    /// Simulations recorded at the root
    pub root_visits: u32,
    /// Simulations actually executed
    pub iterations_run: usize,
    /// Budget lost to the integer split across workers
    pub iterations_dropped: usize,
}

/// Called with `(completed, scheduled)` each time the completed percentage advances
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// The main MCTS engine.
///
/// Every call to [`MCTS::run`] builds a fresh single-node tree for the given state,
/// spawns `workers` threads that share it, joins them, picks a move and discards
/// the tree. Nothing carries over between calls.
pub struct MCTS {
    config: MctsConfig,
    progress: Option<ProgressCallback>,
}

impl MCTS {
    /// Creates a new MCTS engine.
    pub fn new(config: MctsConfig) -> Self {
        MCTS {
            config,
            progress: None,
        }
    }

    /// Reports search progress through `callback`
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Searches from `state` and returns the successor state judged best.
    pub fn run<S: GameState>(&self, state: &S) -> Result<S> {
        self.run_with_stats(state).map(|(next, _)| next)
    }

    /// Like [`MCTS::run`], also returning the search counters.
    ///
    /// Fails with [`Error::NoSearchPossible`] when `state` is already terminal and
    /// with [`Error::InvalidConfiguration`] when the budget gives workers nothing
    /// to do. A remainder of `iterations % workers` is not executed.
    pub fn run_with_stats<S: GameState>(&self, state: &S) -> Result<(S, SearchStatistics)> {
        if state.is_terminal() {
            return Err(Error::NoSearchPossible);
        }
        let MctsConfig {
            iterations,
            workers,
            seed,
        } = self.config;
        if workers == 0 {
            return Err(Error::InvalidConfiguration {
                message: "MCTS needs at least one worker".to_string(),
            });
        }
        let per_worker = iterations / workers;
        if per_worker == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!("{iterations} iterations cannot be split across {workers} workers"),
            });
        }
        let scheduled = per_worker * workers;
        let dropped = iterations - scheduled;
        if dropped > 0 {
            warn!("MCTS: dropping {dropped} iterations that do not divide across {workers} workers");
        }

        let tree = SearchTree::with_capacity(state.get_current_player(), scheduled + 1);
        let completed = Mutex::new(0usize);
        let base_seed = seed.unwrap_or_else(rand::random);

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mcts-worker-{i}"))
            .build()?;
        pool.scope(|scope| {
            for worker in 0..workers {
                let tree = &tree;
                let completed = &completed;
                scope.spawn(move |_| {
                    let mut rng = Xoshiro256PlusPlus::seed_from_u64(base_seed.wrapping_add(worker as u64));
                    for _ in 0..per_worker {
                        run_simulation(tree, state, &mut rng);
                        self.report_progress(completed, scheduled);
                    }
                });
            }
        });

        let best = tree.best_child(ROOT).ok_or(Error::NoSearchPossible)?;
        let mv = tree.move_of(best).ok_or(Error::NoSearchPossible)?;
        let mut next = state.clone();
        next.make_move(&mv);

        let stats = SearchStatistics {
            total_nodes: tree.len(),
            root_visits: tree.stats(ROOT).visits,
            iterations_run: scheduled,
            iterations_dropped: dropped,
        };
        let chosen = tree.stats(best);
        debug!(
            "MCTS: {} simulations on {} workers, {} nodes, chose {:?} ({}/{} wins)",
            scheduled, workers, stats.total_nodes, mv, chosen.wins, chosen.visits
        );
        Ok((next, stats))
    }

    fn report_progress(&self, completed: &Mutex<usize>, scheduled: usize) {
        let mut done = completed.lock();
        *done += 1;
        if let Some(callback) = &self.progress {
            if *done * 100 / scheduled != (*done - 1) * 100 / scheduled {
                callback(*done, scheduled);
            }
        }
    }
}

/// Runs a single MCTS simulation: selection, expansion, random playout and
/// backpropagation.
fn run_simulation<S: GameState, R: Rng>(tree: &SearchTree<S::Move, S::Player>, root_state: &S, rng: &mut R) {
    let mut state = root_state.clone();
    let mut node = ROOT;

    // --- Selection / Expansion ---
    // Descend through fully expanded nodes by UCT; stop at the first node with an
    // unexplored move and materialise exactly one child for it.
    while !state.is_terminal() {
        let moves = state.get_possible_moves();
        if tree.child_count(node) < moves.len() {
            let expansion = tree.expand(node, &moves, |mv| {
                let mut next = state.clone();
                next.make_move(mv);
                next.get_current_player()
            });
            if let Expansion::Created(child, mv) = expansion {
                state.make_move(&mv);
                node = child;
                break;
            }
            // Another worker filled the last slot first; fall through to selection.
        }
        let Some(child) = tree.best_child(node) else {
            break;
        };
        if let Some(mv) = tree.move_of(child) {
            state.make_move(&mv);
        }
        node = child;
    }

    // --- Simulation Phase ---
    while !state.is_terminal() {
        let moves = state.get_possible_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.random_range(0..moves.len())];
        state.make_move(&mv);
    }

    // --- Backpropagation Phase ---
    tree.backpropagate(node, state.get_winner());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::gomoku::{Board, GomokuMove, GomokuState, Player};

    fn config(iterations: usize, workers: usize) -> MctsConfig {
        MctsConfig {
            iterations,
            workers,
            seed: Some(7),
        }
    }

    #[test]
    fn test_run_returns_a_child_state() {
        let state = GomokuState::with_size(5);
        let next = MCTS::new(config(200, 2)).run(&state).unwrap();
        let GomokuMove(r, c) = next.last_move().unwrap();
        assert!(r < 5 && c < 5);
        assert_eq!(next.board().empty_count(), 24);
        assert_eq!(next.current_player(), Player::White);
        // The caller's state is untouched
        assert_eq!(state, GomokuState::with_size(5));
    }

    #[test]
    fn test_terminal_state_is_rejected() {
        let mut board = Board::with_size(5);
        for col in 0..5 {
            board.place(0, col, Player::Black).unwrap();
        }
        let state = GomokuState::from_board(board, Player::White);
        assert!(matches!(
            MCTS::new(config(100, 1)).run(&state),
            Err(Error::NoSearchPossible)
        ));
    }

    #[test]
    fn test_budget_split_drops_remainder() {
        let state = GomokuState::with_size(5);
        let (_, stats) = MCTS::new(config(103, 4)).run_with_stats(&state).unwrap();
        assert_eq!(stats.iterations_run, 100);
        assert_eq!(stats.iterations_dropped, 3);
        assert_eq!(stats.root_visits, 100);
        // One node per simulation plus the root, fewer if playouts hit terminal nodes
        assert!(stats.total_nodes <= 101);
    }

    #[test]
    fn test_budget_too_small_for_workers() {
        let state = GomokuState::with_size(5);
        assert!(matches!(
            MCTS::new(config(3, 4)).run(&state),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            MCTS::new(config(3, 0)).run(&state),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_progress_reaches_completion() {
        let state = GomokuState::with_size(5);
        let last = Arc::new(Mutex::new((0usize, 0usize)));
        let seen = last.clone();
        MCTS::new(config(300, 3))
            .with_progress(Arc::new(move |done: usize, total: usize| *seen.lock() = (done, total)))
            .run(&state)
            .unwrap();
        assert_eq!(*last.lock(), (300, 300));
    }

    #[test]
    fn test_takes_immediate_win() {
        // White four on the bottom row completes at (5, 5); Black's four in the last
        // column completes at (4, 5). Both cells come last in enumeration order.
        let mut board = Board::with_size(6);
        for row in 0..4 {
            board.place(row, 5, Player::Black).unwrap();
        }
        board.place(5, 0, Player::Black).unwrap();
        for col in 1..5 {
            board.place(5, col, Player::White).unwrap();
        }
        let state = GomokuState::from_board(board, Player::White);
        let hits = (0..5)
            .filter(|&seed| {
                let engine = MCTS::new(MctsConfig {
                    iterations: 4000,
                    workers: 2,
                    seed: Some(seed),
                });
                let next = engine.run(&state).unwrap();
                next.winner() == Some(Player::White)
            })
            .count();
        assert!(hits >= 3, "found the winning move in {hits} of 5 searches");
    }
}
