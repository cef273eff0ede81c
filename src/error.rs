//! Error types for the language-model tooling
//!
//! One enum covers the whole pipeline. Corpus building, vocabulary handling,
//! decoding and play sessions all report through [`ChessLmError`].
//!
//! # Severity
//!
//! - `MalformedGame` - one record discarded, the corpus build continues
//! - `UnknownToken` / `ConfigurationError` - vocabulary and model disagree,
//!   fatal for the session
//! - `IllegalMove` - a contract violation when it comes out of the decoder
//! - `Decode` / `Model` - the current play session is aborted

use chess_engine::ChessEngineError;
use thiserror::Error;

use crate::codec::Token;
use crate::model::ModelError;
use crate::reducer::MalformedGame;

/// Errors that can occur while building corpora, decoding or playing
#[derive(Error, Debug)]
pub enum ChessLmError {
    /// Raw game record rejected by the reducer
    #[error("Malformed game: {0}")]
    MalformedGame(#[from] MalformedGame),

    /// Token id was never assigned by the vocabulary
    #[error("Unknown token {token} (vocabulary size {vocab_size})")]
    UnknownToken { token: Token, vocab_size: usize },

    /// Move is not legal in the position it was decoded or applied in
    #[error("Illegal move {uci} in position {fen}")]
    IllegalMove { uci: String, fen: String },

    /// Any other rules-engine failure (bad FEN, unreadable notation)
    #[error("Chess engine error: {0}")]
    Engine(ChessEngineError),

    /// Vocabulary or configuration does not fit the session
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Decoder asked for a move it cannot legally produce
    #[error("Decoding failed: {message}")]
    Decode { message: String },

    /// External sequence model failed
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChessLmError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ChessLmError::ConfigurationError {
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        ChessLmError::Decode {
            message: message.into(),
        }
    }
}

impl From<ChessEngineError> for ChessLmError {
    fn from(err: ChessEngineError) -> Self {
        match err {
            ChessEngineError::IllegalMove { uci, fen } => ChessLmError::IllegalMove { uci, fen },
            other => ChessLmError::Engine(other),
        }
    }
}

/// Result type alias for chess_lm operations
pub type ChessLmResult<T> = Result<T, ChessLmError>;
