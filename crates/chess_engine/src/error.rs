//! Error types for chess engine
//!
//! Provides custom error types for position setup, notation parsing and
//! move validation.

use thiserror::Error;

/// Errors that can occur in the chess engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessEngineError {
    /// Move is not in the legal move list of the position it was applied to
    #[error("Illegal move {uci} in position {fen}")]
    IllegalMove { uci: String, fen: String },

    /// Invalid square index or name
    #[error("Invalid square: {square}")]
    InvalidSquare { square: String },

    /// FEN string could not be parsed into a playable position
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Move text could not be read as SAN or UCI
    #[error("Invalid move notation '{notation}': {reason}")]
    InvalidNotation { notation: String, reason: String },

    /// Move text matched no legal move
    #[error("Move '{notation}' matches no legal move")]
    NoMatchingMove { notation: String },

    /// Move text matched more than one legal move
    #[error("Move '{notation}' is ambiguous ({candidates} legal candidates)")]
    AmbiguousMove { notation: String, candidates: usize },
}

/// Result type alias for chess engine operations
pub type ChessEngineResult<T> = Result<T, ChessEngineError>;
