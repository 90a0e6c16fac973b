//! # Game Controller Module - Central Game State Management
//!
//! This module provides the `GameController` which serves as the single source of truth
//! for the authoritative game state. The console front end talks to it through two
//! calls:
//!
//! - [`GameController::apply_human_move`]: validate and play the human's `(row, col)`
//! - [`GameController::play_computer_move`]: run the configured search and play its move
//!
//! ## Architecture Overview
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       GameController                         │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │             Authoritative GomokuState                  │  │
//! │  │  • Human moves validated here before application       │  │
//! │  │  • Win / draw checked after every move                 │  │
//! │  │  • Move history maintained                             │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                 │                        │                   │
//! │                 ▼                        ▼                   │
//! │      ┌────────────────────┐   ┌────────────────────┐         │
//! │      │ AlphaBeta          │   │ MCTS               │         │
//! │      │ (private board)    │   │ (per-call tree)    │         │
//! │      └────────────────────┘   └────────────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Searches only ever see the state by reference; no search structure survives a turn.

use crate::alphabeta::{AlphaBeta, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::games::gomoku::{GomokuMove, GomokuState, Player};
use crate::{GameState, MctsConfig, ProgressCallback, MCTS};
use log::info;
use std::time::SystemTime;

/// Which engine picks the computer's moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Depth-bounded alpha-beta minimax
    AlphaBeta { max_depth: u32 },
    /// Parallel Monte Carlo Tree Search
    Mcts(MctsConfig),
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::AlphaBeta {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of attempting to apply a move
#[derive(Debug)]
pub enum MoveResult {
    /// Move was successfully applied
    Success {
        /// The applied move
        move_made: GomokuMove,
        /// Player who made the move
        player: Player,
        /// Whether the game is now over
        game_over: bool,
        /// Winner if game is over (None for draw)
        winner: Option<Player>,
    },
    /// Move was rejected as invalid
    Invalid {
        /// Reason the move was rejected
        reason: Error,
    },
    /// Game is already over, no more moves allowed
    GameOver,
}

/// A single entry in the move history
#[derive(Debug, Clone)]
pub struct MoveHistoryEntry {
    /// When the move was made
    pub timestamp: SystemTime,
    /// Player who made the move
    pub player: Player,
    /// The move that was made
    pub move_made: GomokuMove,
    /// Move number (1-indexed)
    pub move_number: usize,
}

impl MoveHistoryEntry {
    /// Create a new move history entry
    pub fn new(player: Player, move_made: GomokuMove, move_number: usize) -> Self {
        Self {
            timestamp: SystemTime::now(),
            player,
            move_made,
            move_number,
        }
    }
}

/// Current game status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Game is still in progress
    InProgress,
    /// Game ended with a winner
    Win(Player),
    /// Game ended in a draw
    Draw,
}

impl GameStatus {
    /// Check if the game is over
    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    fn of(state: &GomokuState) -> Self {
        match state.winner() {
            Some(w) => GameStatus::Win(w),
            None if state.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }
}

/// The central game controller that owns the authoritative game state
///
/// # Usage
/// ```rust
/// use omok::game_controller::{GameController, MoveResult, Strategy};
///
/// let mut controller = GameController::new(Strategy::AlphaBeta { max_depth: 1 });
/// match controller.apply_human_move(7, 7) {
///     MoveResult::Success { game_over, .. } => assert!(!game_over),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GameController {
    /// The authoritative game state
    game_state: GomokuState,
    /// The side typed in at the console; the computer plays the other one
    human: Player,
    strategy: Strategy,
    /// Complete history of moves made
    move_history: Vec<MoveHistoryEntry>,
    /// Current game status
    status: GameStatus,
    /// Searches run so far
    searches: usize,
}

impl GameController {
    /// A fresh 15×15 game; the human plays Black and moves first
    pub fn new(strategy: Strategy) -> Self {
        Self::from_state(GomokuState::new(), Player::Black, strategy)
    }

    /// Continue from an arbitrary position
    pub fn from_state(initial_state: GomokuState, human: Player, strategy: Strategy) -> Self {
        let status = GameStatus::of(&initial_state);
        Self {
            game_state: initial_state,
            human,
            strategy,
            move_history: Vec::new(),
            status,
            searches: 0,
        }
    }

    /// Validate a move without applying it
    pub fn validate_move(&self, row: usize, col: usize) -> Result<()> {
        if self.status.is_game_over() {
            return Err(Error::GameOver);
        }
        self.game_state.place(row, col).map(|_| ())
    }

    /// Plays the human's stone at `(row, col)`.
    ///
    /// Out-of-range or occupied cells come back as [`MoveResult::Invalid`] and
    /// consume nothing.
    pub fn apply_human_move(&mut self, row: usize, col: usize) -> MoveResult {
        if self.status.is_game_over() {
            return MoveResult::GameOver;
        }
        if self.game_state.current_player() != self.human {
            return MoveResult::Invalid {
                reason: Error::OutOfTurn,
            };
        }
        match self.game_state.place(row, col) {
            Ok(next) => self.commit(next, GomokuMove(row, col)),
            Err(reason) => MoveResult::Invalid { reason },
        }
    }

    /// Asks the configured strategy for a move and plays it.
    ///
    /// Returns [`MoveResult::GameOver`] without searching once the game is decided.
    pub fn play_computer_move(&mut self) -> Result<MoveResult> {
        self.search_and_play(None)
    }

    /// Like [`GameController::play_computer_move`], reporting `(done, total)` as the
    /// search advances: root candidates for alpha-beta, simulations for MCTS.
    pub fn play_computer_move_with_progress(&mut self, progress: ProgressCallback) -> Result<MoveResult> {
        self.search_and_play(Some(progress))
    }

    fn search_and_play(&mut self, progress: Option<ProgressCallback>) -> Result<MoveResult> {
        if self.status.is_game_over() {
            return Ok(MoveResult::GameOver);
        }
        self.searches += 1;
        let next = match &self.strategy {
            Strategy::AlphaBeta { max_depth } => {
                let total = self.game_state.board().empty_count();
                let mut done = 0;
                let outcome = AlphaBeta::new(*max_depth).search_with(&self.game_state, |_| {
                    done += 1;
                    if let Some(callback) = &progress {
                        callback(done, total);
                    }
                })?;
                self.game_state.place(outcome.best_move.0, outcome.best_move.1)?
            }
            Strategy::Mcts(config) => {
                let mut engine = MCTS::new(config.clone());
                if let Some(callback) = progress {
                    engine = engine.with_progress(callback);
                }
                engine.run(&self.game_state)?
            }
        };
        let mv = next.last_move().ok_or(Error::NoSearchPossible)?;
        info!("computer plays {mv}");
        Ok(self.commit(next, mv))
    }

    /// Force a move for whoever is to move, without consulting a strategy
    ///
    /// Used to replay known games and to script the computer's side in tests.
    pub fn apply_trusted_move(&mut self, mv: GomokuMove) -> Result<MoveResult> {
        if self.status.is_game_over() {
            return Ok(MoveResult::GameOver);
        }
        let next = self.game_state.place(mv.0, mv.1)?;
        Ok(self.commit(next, mv))
    }

    fn commit(&mut self, next: GomokuState, mv: GomokuMove) -> MoveResult {
        let player = self.game_state.get_current_player();
        let move_number = self.move_history.len() + 1;
        self.game_state = next;
        self.move_history.push(MoveHistoryEntry::new(player, mv, move_number));

        self.status = GameStatus::of(&self.game_state);
        let winner = self.get_winner();
        MoveResult::Success {
            move_made: mv,
            player,
            game_over: self.status.is_game_over(),
            winner,
        }
    }

    /// Get a reference to the game state for rendering
    pub fn get_render_state(&self) -> &GomokuState {
        &self.game_state
    }

    pub fn human(&self) -> Player {
        self.human
    }

    pub fn computer(&self) -> Player {
        self.human.opponent()
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Get the current player
    pub fn get_current_player(&self) -> Player {
        self.game_state.current_player()
    }

    /// Get the current game status
    pub fn get_status(&self) -> GameStatus {
        self.status
    }

    /// Check if the game is over
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Get the winner if the game is over
    pub fn get_winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Win(w) => Some(w),
            _ => None,
        }
    }

    /// Number of times a search strategy has been invoked
    pub fn searches_run(&self) -> usize {
        self.searches
    }

    /// Get the complete move history
    pub fn get_move_history(&self) -> &[MoveHistoryEntry] {
        &self.move_history
    }

    /// Get the number of moves made
    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    /// Format move history as plain text
    pub fn format_history(&self) -> String {
        if self.move_history.is_empty() {
            return String::from("No moves made yet.");
        }

        let mut output = String::from("=== Omok Game History ===\n\n");
        for entry in &self.move_history {
            output.push_str(&format!(
                "{}. {} - {}\n",
                entry.move_number,
                self.get_player_name(entry.player),
                entry.move_made
            ));
        }

        match self.status {
            GameStatus::Win(winner) => {
                output.push_str(&format!("\nResult: {} wins!\n", self.get_player_name(winner)));
            }
            GameStatus::Draw => {
                output.push_str("\nResult: Draw\n");
            }
            GameStatus::InProgress => {
                output.push_str(&format!(
                    "\n(Game in progress - {} to move)\n",
                    self.get_player_name(self.get_current_player())
                ));
            }
        }
        output
    }

    fn get_player_name(&self, player: Player) -> &'static str {
        if player == self.human {
            "Human"
        } else {
            "Computer"
        }
    }
}
