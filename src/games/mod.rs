//! # Game Implementations Module
//!
//! Each game implements the `GameState` trait so the Monte Carlo Tree Search
//! engine can drive it without knowing its rules.
//!
//! ## Supported Games
//! - **Gomoku / Omok (Five in a Row)**: 15×15 board, five contiguous stones in any
//!   of the four line directions wins

pub mod gomoku;
