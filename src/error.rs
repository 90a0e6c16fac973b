//! Error types for the omok engine

use thiserror::Error;

/// Why a stone could not be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMoveReason {
    /// Row or column lies outside `[0, board size)`
    OutOfBounds,
    /// The target cell already holds a stone
    Occupied,
}

impl std::fmt::Display for InvalidMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMoveReason::OutOfBounds => write!(f, "outside the board"),
            InvalidMoveReason::Occupied => write!(f, "already occupied"),
        }
    }
}

/// Main error type for the omok crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: ({row}, {col}) is {reason}")]
    InvalidMove {
        row: usize,
        col: usize,
        reason: InvalidMoveReason,
    },

    #[error("no legal moves: the board is full")]
    NoLegalMoves,

    #[error("no search possible: the position is already decided")]
    NoSearchPossible,

    #[error("game already over")]
    GameOver,

    #[error("it is not the human's turn")]
    OutOfTurn,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to build search worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors the console loop recovers from by re-prompting
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidMove { .. })
    }
}

/// Result alias for the omok crate
pub type Result<T> = std::result::Result<T, Error>;
