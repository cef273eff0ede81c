//! Game termination rules
//!
//! Classifies a position as finished or ongoing.
//!
//! # Terminal Conditions
//!
//! ## Decisive
//! - **Checkmate**: side to move has no legal moves and is in check
//!
//! ## Draws
//! - **Stalemate**: no legal moves, not in check
//! - **Threefold repetition**: the current position (placement, side to move,
//!   castling rights, en passant availability) occurred three times
//! - **Fifty-move rule**: half-move clock reached 100
//! - **Insufficient material**: neither side can ever deliver mate
//!   (K vs K, K+minor vs K, bishops-only on a single square color)
//!
//! # Reference
//!
//! FIDE Laws of Chess, Article 5 and Article 9.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::constants::*;
use crate::error::ChessEngineError;
use crate::types::*;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    Checkmate { winner: Color },
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
    InsufficientMaterial,
}

impl TerminalKind {
    pub fn result(self) -> GameResult {
        match self {
            TerminalKind::Checkmate {
                winner: Color::White,
            } => GameResult::WhiteWin,
            TerminalKind::Checkmate {
                winner: Color::Black,
            } => GameResult::BlackWin,
            _ => GameResult::Draw,
        }
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalKind::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            TerminalKind::Stalemate => write!(f, "stalemate"),
            TerminalKind::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
            TerminalKind::FiftyMoveRule => write!(f, "draw by fifty-move rule"),
            TerminalKind::InsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

/// Outcome tag of a game record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    #[default]
    Unknown,
}

impl GameResult {
    /// PGN result token
    pub fn pgn(self) -> &'static str {
        match self {
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }
}

impl FromStr for GameResult {
    type Err = ChessEngineError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim() {
            "1-0" => Ok(GameResult::WhiteWin),
            "0-1" => Ok(GameResult::BlackWin),
            "1/2-1/2" | "½-½" => Ok(GameResult::Draw),
            "*" => Ok(GameResult::Unknown),
            other => Err(ChessEngineError::InvalidNotation {
                notation: other.to_string(),
                reason: "not a game result".to_string(),
            }),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pgn())
    }
}

impl BoardState {
    /// Classify the current position, `None` while the game continues
    pub fn is_terminal(&self) -> Option<TerminalKind> {
        if self.legal_moves().is_empty() {
            return Some(if self.is_in_check() {
                TerminalKind::Checkmate {
                    winner: self.side_to_move().opposite(),
                }
            } else {
                TerminalKind::Stalemate
            });
        }

        if self.repetition_count() >= REPETITION_LIMIT {
            return Some(TerminalKind::ThreefoldRepetition);
        }

        if self.halfmove_clock() >= FIFTY_MOVE_PLIES {
            return Some(TerminalKind::FiftyMoveRule);
        }

        if has_insufficient_material(self) {
            return Some(TerminalKind::InsufficientMaterial);
        }

        None
    }
}

/// Neither side has mating material
///
/// Covers bare kings, a single minor piece, and any number of bishops that all
/// stand on squares of one color.
pub fn has_insufficient_material(state: &BoardState) -> bool {
    let mut minors = 0;
    let mut knights = 0;
    let mut light_bishops = 0;
    let mut dark_bishops = 0;

    for (square, piece) in state.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => {
                minors += 1;
                knights += 1;
            }
            PieceKind::Bishop => {
                minors += 1;
                if square.is_light() {
                    light_bishops += 1;
                } else {
                    dark_bishops += 1;
                }
            }
        }
    }

    if minors <= 1 {
        return true;
    }
    knights == 0 && (light_bishops == 0 || dark_bishops == 0)
}
