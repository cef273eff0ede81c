//! Token ids and the fixed special tokens
//!
//! Special tokens occupy ids `0..SpecialToken::COUNT` in every vocabulary;
//! move tokens follow in first-seen order.

use std::fmt;

use chess_engine::{Color, GameResult};
use serde::{Deserialize, Serialize};

/// Integer id in `[0, vocab_size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub u32);

impl Token {
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this id belongs to the fixed special block
    #[inline]
    pub fn is_special(self) -> bool {
        self.index() < SpecialToken::COUNT
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SpecialToken> for Token {
    fn from(special: SpecialToken) -> Self {
        special.token()
    }
}

/// Fixed tokens present in every vocabulary, discriminant = token id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SpecialToken {
    Start = 0,
    End = 1,
    Pad = 2,
    Unknown = 3,
    SideWhite = 4,
    SideBlack = 5,
    ResultWhiteWin = 6,
    ResultBlackWin = 7,
    ResultDraw = 8,
}

impl SpecialToken {
    pub const COUNT: usize = 9;

    pub const ALL: [SpecialToken; Self::COUNT] = [
        SpecialToken::Start,
        SpecialToken::End,
        SpecialToken::Pad,
        SpecialToken::Unknown,
        SpecialToken::SideWhite,
        SpecialToken::SideBlack,
        SpecialToken::ResultWhiteWin,
        SpecialToken::ResultBlackWin,
        SpecialToken::ResultDraw,
    ];

    #[inline]
    pub fn token(self) -> Token {
        Token(self as u32)
    }

    pub fn from_token(token: Token) -> Option<SpecialToken> {
        Self::ALL.get(token.index()).copied()
    }

    /// Name written to vocabulary files
    pub fn name(self) -> &'static str {
        match self {
            SpecialToken::Start => "<START>",
            SpecialToken::End => "<END>",
            SpecialToken::Pad => "<PAD>",
            SpecialToken::Unknown => "<UNKNOWN>",
            SpecialToken::SideWhite => "<SIDE_WHITE>",
            SpecialToken::SideBlack => "<SIDE_BLACK>",
            SpecialToken::ResultWhiteWin => "<RESULT_WHITE_WIN>",
            SpecialToken::ResultBlackWin => "<RESULT_BLACK_WIN>",
            SpecialToken::ResultDraw => "<RESULT_DRAW>",
        }
    }

    pub fn side(color: Color) -> SpecialToken {
        match color {
            Color::White => SpecialToken::SideWhite,
            Color::Black => SpecialToken::SideBlack,
        }
    }

    /// Result marker for a finished game; unknown results have none
    pub fn result(result: GameResult) -> Option<SpecialToken> {
        match result {
            GameResult::WhiteWin => Some(SpecialToken::ResultWhiteWin),
            GameResult::BlackWin => Some(SpecialToken::ResultBlackWin),
            GameResult::Draw => Some(SpecialToken::ResultDraw),
            GameResult::Unknown => None,
        }
    }
}
