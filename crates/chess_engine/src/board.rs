//! Board state
//!
//! [`BoardState`] is the single source of truth for a game in progress:
//! piece placement, side to move, castling rights, en passant target, the
//! half-move clock, the full-move number and the repetition history.
//!
//! ## Mutation
//!
//! The only way to change a `BoardState` is [`BoardState::apply`], which
//! accepts exactly one move from [`BoardState::legal_moves`] at a time.
//!
//! ## Repetition History
//!
//! The history is an append-only list of Zobrist keys (see `hash.rs`), one per
//! position reached, starting with the initial position. The last entry is
//! always the key of the current position.

use tracing::trace;

use crate::constants::*;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::hash::position_key;
use crate::move_gen::{generate_legal_moves, is_in_check, play_on_board};
use crate::types::*;

/// Complete, mutable state of one game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) history: Vec<u64>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Standard starting position
    pub fn new() -> Self {
        Self::from_parts(SETUP, Color::White, CastlingRights::ALL, None, 0, 1)
    }

    pub(crate) fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut state = BoardState {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            history: Vec::with_capacity(128),
        };
        let key = position_key(&state);
        state.history.push(key);
        state
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        Piece::from_code(self.board[square.index()])
    }

    /// Iterate over occupied squares
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board.iter().enumerate().filter_map(|(index, &code)| {
            Piece::from_code(code).map(|piece| (Square::from_index_unchecked(index), piece))
        })
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist keys of every position reached, current position last
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    /// Key of the current position
    pub fn position_key(&self) -> u64 {
        // history is never empty: construction pushes the initial key
        self.history.last().copied().unwrap_or_else(|| position_key(self))
    }

    /// How often the current position has occurred, itself included
    pub fn repetition_count(&self) -> usize {
        let current = self.position_key();
        // Positions before the last capture or pawn move cannot recur
        let window = self.halfmove_clock as usize + 1;
        self.history
            .iter()
            .rev()
            .take(window)
            .filter(|&&key| key == current)
            .count()
    }

    pub fn is_in_check(&self) -> bool {
        is_in_check(&self.board, self.side_to_move)
    }

    /// All legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        generate_legal_moves(self)
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves().contains(mv)
    }

    /// Apply one legal move
    ///
    /// # Errors
    ///
    /// [`ChessEngineError::IllegalMove`] if `mv` is not in [`Self::legal_moves`];
    /// the state is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let mut state = BoardState::new();
    /// let e4 = resolve_notation(&state, "e4")?;
    /// state.apply(e4)?;
    /// ```
    pub fn apply(&mut self, mv: Move) -> ChessEngineResult<&mut Self> {
        if !self.is_legal(&mv) {
            return Err(ChessEngineError::IllegalMove {
                uci: mv.uci(),
                fen: self.to_fen(),
            });
        }
        self.play_unchecked(mv);
        Ok(self)
    }

    /// Apply a move known to come from [`Self::legal_moves`]
    pub(crate) fn play_unchecked(&mut self, mv: Move) {
        let color = self.side_to_move;
        play_on_board(&mut self.board, &mv, color);

        if mv.piece == PieceKind::King {
            self.castling.remove_color(color);
        }
        for square in [mv.from, mv.to] {
            match square.index() as u8 {
                WR0 => self.castling.remove(Color::White, CastleSide::Queen),
                WR7 => self.castling.remove(Color::White, CastleSide::King),
                BR56 => self.castling.remove(Color::Black, CastleSide::Queen),
                BR63 => self.castling.remove(Color::Black, CastleSide::King),
                WK4 => self.castling.remove_color(Color::White),
                BK60 => self.castling.remove_color(Color::Black),
                _ => {}
            }
        }

        self.en_passant = if mv.is_double_push() {
            mv.from.offset(0, color.forward())
        } else {
            None
        };

        if mv.piece == PieceKind::Pawn || mv.capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if color == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = color.opposite();

        let key = position_key(self);
        self.history.push(key);
        trace!("[BOARD] played {} -> key {:016x}", mv, key);
    }
}
