//! # Chess Engine Constants - Piece Codes, Directions & Home Squares
//!
//! ## Overview
//!
//! The board is a mailbox of 64 signed bytes indexed `rank * 8 + file`, so
//! `a1 = 0`, `h1 = 7`, `a8 = 56` and `h8 = 63`. Each byte holds a piece code:
//!
//! - Positive values (1-6) represent white pieces
//! - Negative values (-1 to -6) represent black pieces
//! - Zero represents an empty square
//!
//! The sign is the color and the absolute value is the piece kind, so ownership
//! checks are a single comparison.
//!
//! ## Direction Vectors
//!
//! Directions are stored as `(file delta, rank delta)` pairs. Every step is
//! bounds-checked on file and rank separately (see [`crate::types::Square::offset`]),
//! so a ray never wraps from the h-file onto the a-file.

use core::ops::Range;

pub const VOID_ID: i8 = 0;
pub const PAWN_ID: i8 = 1;
pub const KNIGHT_ID: i8 = 2;
pub const BISHOP_ID: i8 = 3;
pub const ROOK_ID: i8 = 4;
pub const QUEEN_ID: i8 = 5;
pub const KING_ID: i8 = 6;

pub const W_PAWN: i8 = PAWN_ID;
pub const W_KNIGHT: i8 = KNIGHT_ID;
pub const W_BISHOP: i8 = BISHOP_ID;
pub const W_ROOK: i8 = ROOK_ID;
pub const W_QUEEN: i8 = QUEEN_ID;
pub const W_KING: i8 = KING_ID;

pub const B_PAWN: i8 = -PAWN_ID;
pub const B_KNIGHT: i8 = -KNIGHT_ID;
pub const B_BISHOP: i8 = -BISHOP_ID;
pub const B_ROOK: i8 = -ROOK_ID;
pub const B_QUEEN: i8 = -QUEEN_ID;
pub const B_KING: i8 = -KING_ID;

pub const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const KNIGHT_DIRS: [(i8, i8); 8] = [
    (1, 2), (-1, 2), (1, -2), (-1, -2),
    (2, 1), (2, -1), (-2, 1), (-2, -1),
];
pub const KING_DIRS: [(i8, i8); 8] = [
    (0, 1), (1, 0), (0, -1), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

/// Standard starting position, `a1` first
pub const SETUP: [i8; 64] = [
    W_ROOK, W_KNIGHT, W_BISHOP, W_QUEEN, W_KING, W_BISHOP, W_KNIGHT, W_ROOK,
    W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN,
    B_ROOK, B_KNIGHT, B_BISHOP, B_QUEEN, B_KING, B_BISHOP, B_KNIGHT, B_ROOK,
];

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const POS_RANGE_US: Range<usize> = 0..64;

// Home squares that carry castling rights
pub const WR0: u8 = 0;
pub const WK4: u8 = 4;
pub const WR7: u8 = 7;
pub const BR56: u8 = 56;
pub const BK60: u8 = 60;
pub const BR63: u8 = 63;

/// Promotion pieces in generation order
pub const PROMOTION_IDS: [i8; 4] = [QUEEN_ID, ROOK_ID, BISHOP_ID, KNIGHT_ID];

/// Half-moves without capture or pawn move that end the game
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Occurrences of a position that end the game
pub const REPETITION_LIMIT: usize = 3;
