//! Chess rules library
//!
//! Mailbox board representation, legal move generation, position hashing,
//! notation handling and game termination rules. Everything that needs to know
//! whether a move is legal goes through [`BoardState`].
//!
//! ## Module Organization
//!
//! - `types` - Colors, pieces, squares, castling rights and [`Move`]
//! - `constants` - Piece codes, direction tables, home squares
//! - `board` - [`BoardState`] and move application
//! - `move_gen` - Pseudo-legal generation per piece plus attack detection
//! - `fen` - FEN import/export
//! - `hash` - Zobrist keys used for repetition detection
//! - `rules` - Terminal classification and game results
//! - `notation` - SAN/UCI parsing and SAN rendering
//! - `perft` - Node counting for move generator verification

pub mod board;
pub mod constants;
pub mod error;
pub mod fen;
pub mod hash;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod rules;
pub mod types;

pub use board::BoardState;
pub use error::{ChessEngineError, ChessEngineResult};
pub use notation::{parse_uci, resolve_notation, to_san};
pub use perft::perft;
pub use rules::{GameResult, TerminalKind};
pub use types::{CastleSide, CastlingRights, Color, Move, Piece, PieceKind, Square};

#[cfg(test)]
mod tests;
