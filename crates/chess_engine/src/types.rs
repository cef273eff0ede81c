//! # Chess Engine Core Types
//!
//! ## Overview
//!
//! This module defines the value types shared by every other module:
//!
//! 1. **[`Color`]** and **[`PieceKind`]** - typed views over the signed piece
//!    codes stored on the board (see `constants.rs`)
//! 2. **[`Square`]** - a checked `0..64` index with file/rank accessors
//! 3. **[`CastlingRights`]** - a 4-bit set (`K`, `Q`, `k`, `q`)
//! 4. **[`Move`]** - one legal transition, always produced by a
//!    [`crate::BoardState`] and never holding a reference back to it
//!
//! ## Move Construction
//!
//! `Move` values are created by move generation only. Callers that start from
//! text (SAN, UCI, vocabulary strings) resolve the text against the legal move
//! list of a concrete position, which is how the flags (`capture`, `castle`,
//! `en_passant`) get filled in.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::error::{ChessEngineError, ChessEngineResult};

pub type Board = [i8; 64];

/// Side of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Sign of this color's piece codes on the board
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Rank index a pawn of this color moves toward (`+1` or `-1`)
    #[inline]
    pub(crate) fn forward(self) -> i8 {
        self.sign()
    }

    #[inline]
    pub(crate) fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Unsigned board code (1-6)
    #[inline]
    pub fn id(self) -> i8 {
        match self {
            PieceKind::Pawn => PAWN_ID,
            PieceKind::Knight => KNIGHT_ID,
            PieceKind::Bishop => BISHOP_ID,
            PieceKind::Rook => ROOK_ID,
            PieceKind::Queen => QUEEN_ID,
            PieceKind::King => KING_ID,
        }
    }

    #[inline]
    pub fn from_id(id: i8) -> Option<PieceKind> {
        match id {
            PAWN_ID => Some(PieceKind::Pawn),
            KNIGHT_ID => Some(PieceKind::Knight),
            BISHOP_ID => Some(PieceKind::Bishop),
            ROOK_ID => Some(PieceKind::Rook),
            QUEEN_ID => Some(PieceKind::Queen),
            KING_ID => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Upper-case SAN letter; pawns have none
    pub fn san_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    /// Parse a SAN/FEN letter, either case
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lower-case letter used in UCI promotion suffixes
    pub fn uci_letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub(crate) fn index(self) -> usize {
        self.id() as usize - 1
    }
}

/// A colored piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    /// Decode a signed board code, `None` for empty squares
    #[inline]
    pub fn from_code(code: i8) -> Option<Piece> {
        let kind = PieceKind::from_id(code.abs())?;
        let color = if code > 0 { Color::White } else { Color::Black };
        Some(Piece { color, kind })
    }

    #[inline]
    pub fn code(self) -> i8 {
        self.kind.id() * self.color.sign()
    }

    /// FEN letter: upper case for white, lower case for black
    pub fn fen_char(self) -> char {
        let c = self.kind.uci_letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// Board square, `a1 = 0` through `h8 = 63`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    #[inline]
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    #[inline]
    pub fn from_index(index: u8) -> Option<Square> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn from_index_unchecked(index: usize) -> Square {
        debug_assert!(index < 64);
        Square(index as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Step by a file/rank delta, `None` when leaving the board
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    /// Light squares are those where file and rank parity differ
    pub fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    pub fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    /// Parse an algebraic square name such as `e4`
    pub fn parse(text: &str) -> ChessEngineResult<Square> {
        let bytes = text.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessEngineError::InvalidSquare {
                square: text.to_string(),
            });
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| ChessEngineError::InvalidSquare {
            square: text.to_string(),
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

/// Castling rights bitset
///
/// Bit 0 = white king side, bit 1 = white queen side,
/// bit 2 = black king side, bit 3 = black queen side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    fn bit(color: Color, side: CastleSide) -> u8 {
        let base = match color {
            Color::White => 0,
            Color::Black => 2,
        };
        let offset = match side {
            CastleSide::King => 0,
            CastleSide::Queen => 1,
        };
        1 << (base + offset)
    }

    #[inline]
    pub fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    #[inline]
    pub fn insert(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit(color, side);
    }

    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::bit(color, side);
    }

    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, CastleSide::King);
        self.remove(color, CastleSide::Queen);
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

/// A legal move in the context of the position it was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub promotion: Option<PieceKind>,
    pub capture: bool,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
}

impl Move {
    pub(crate) fn quiet(from: Square, to: Square, piece: PieceKind) -> Self {
        Move {
            from,
            to,
            piece,
            promotion: None,
            capture: false,
            castle: None,
            en_passant: false,
        }
    }

    /// Long algebraic form: `e2e4`, `e7e8q`, castling as the king's two-square step
    pub fn uci(&self) -> String {
        let mut text = format!("{}{}", self.from, self.to);
        if let Some(promotion) = self.promotion {
            text.push(promotion.uci_letter());
        }
        text
    }

    /// Pawn advance of two ranks
    pub fn is_double_push(&self) -> bool {
        self.piece == PieceKind::Pawn && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uci())
    }
}
