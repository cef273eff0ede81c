//! Game reduction
//!
//! ## Overview
//!
//! [`GameReducer`] replays a [`RawGameRecord`] against a fresh
//! [`BoardState`] and either produces a [`CanonicalGame`] (legal moves plus
//! result tag) or rejects the whole record with a [`MalformedGame`] reason.
//!
//! ## Rejection Policy
//!
//! Fail fast, all or nothing. A single move that does not resolve to exactly
//! one legal move discards the game; truncated games are never emitted.
//! [`GameReducer::reduce_corpus`] counts rejections per reason in a
//! [`CorpusReport`] instead of stopping.
//!
//! ## Results
//!
//! The result comes from the record's declared outcome: the `result` field,
//! or a result token written as the final move. A record that declares none
//! gets [`GameResult::Unknown`]; the final position is never used to infer one.

mod record;

pub use record::{RawGameRecord, RawMove};

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chess_engine::{
    resolve_notation, BoardState, ChessEngineError, Color, GameResult, Move, TerminalKind,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::codec::canonical_move_string;
use crate::error::ChessLmResult;

/// Why a raw record was discarded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedGame {
    #[error("movetext is unparsable: {reason}")]
    Unparsable { reason: String },

    #[error("game has no moves")]
    Empty,

    #[error("invalid starting position: {reason}")]
    InvalidStart { reason: String },

    #[error("ply {ply}: '{notation}' is not a readable move: {reason}")]
    InvalidNotation {
        ply: usize,
        notation: String,
        reason: String,
    },

    #[error("ply {ply}: '{notation}' matches no legal move in {fen}")]
    IllegalMove {
        ply: usize,
        notation: String,
        fen: String,
    },

    #[error("ply {ply}: '{notation}' matches {candidates} legal moves")]
    AmbiguousMove {
        ply: usize,
        notation: String,
        candidates: usize,
    },

    #[error("'{result}' is not a game result")]
    InvalidResult { result: String },

    #[error("record declares result '{declared}' but ends with '{trailing}'")]
    ConflictingResult { declared: String, trailing: String },
}

impl MalformedGame {
    /// Stable reason name used for aggregate reporting
    pub fn kind(&self) -> &'static str {
        match self {
            MalformedGame::Unparsable { .. } => "unparsable",
            MalformedGame::Empty => "empty",
            MalformedGame::InvalidStart { .. } => "invalid_start",
            MalformedGame::InvalidNotation { .. } => "invalid_notation",
            MalformedGame::IllegalMove { .. } => "illegal_move",
            MalformedGame::AmbiguousMove { .. } => "ambiguous_move",
            MalformedGame::InvalidResult { .. } => "invalid_result",
            MalformedGame::ConflictingResult { .. } => "conflicting_result",
        }
    }
}

/// A fully validated game: legal moves from a known start, plus its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalGame {
    start_fen: Option<String>,
    initial_side: Color,
    moves: Vec<Move>,
    result: GameResult,
    /// The final move delivers checkmate
    checkmate: bool,
}

impl CanonicalGame {
    /// FEN of a non-standard starting position
    pub fn start_fen(&self) -> Option<&str> {
        self.start_fen.as_deref()
    }

    /// Side to move in the starting position
    pub fn initial_side(&self) -> Color {
        self.initial_side
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    /// True when the last move mates; no earlier move can
    pub fn ends_in_checkmate(&self) -> bool {
        self.checkmate
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Fresh state at the game's starting position
    pub fn start_position(&self) -> ChessLmResult<BoardState> {
        match &self.start_fen {
            Some(fen) => Ok(BoardState::from_fen(fen)?),
            None => Ok(BoardState::new()),
        }
    }

    pub fn move_strings(&self) -> Vec<String> {
        self.moves.iter().map(canonical_move_string).collect()
    }

    /// Record of canonical move strings that reduces back to this game
    pub fn to_record(&self) -> RawGameRecord {
        RawGameRecord {
            start_fen: self.start_fen.clone(),
            moves: self.moves.iter().map(|mv| RawMove::new(canonical_move_string(mv))).collect(),
            result: Some(self.result.pgn().to_string()),
        }
    }
}

/// Aggregate outcome of reducing a corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusReport {
    pub accepted: usize,
    pub rejected: usize,
    pub rejected_by_reason: BTreeMap<String, usize>,
}

impl CorpusReport {
    pub fn accept(&mut self) {
        self.accepted += 1;
    }

    pub fn reject(&mut self, reason: &MalformedGame) {
        self.rejected += 1;
        *self
            .rejected_by_reason
            .entry(reason.kind().to_string())
            .or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

impl fmt::Display for CorpusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: {} accepted, {} rejected",
            self.total(),
            self.accepted,
            self.rejected
        )?;
        for (reason, count) in &self.rejected_by_reason {
            write!(f, "\n  {:<20} {}", reason, count)?;
        }
        Ok(())
    }
}

/// Replays raw records into canonical games
#[derive(Debug, Clone, Copy, Default)]
pub struct GameReducer;

impl GameReducer {
    pub fn new() -> Self {
        GameReducer
    }

    /// Reduce one record, or reject it entirely
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let record = RawGameRecord::from_movetext("1. f3 e5 2. g4 Qh4# 0-1")?;
    /// let game = GameReducer::new().reduce(&record)?;
    /// assert_eq!(game.len(), 4);
    /// assert_eq!(game.result(), GameResult::BlackWin);
    /// ```
    pub fn reduce(&self, record: &RawGameRecord) -> Result<CanonicalGame, MalformedGame> {
        let mut state = match &record.start_fen {
            Some(fen) => BoardState::from_fen(fen).map_err(|err| MalformedGame::InvalidStart {
                reason: err.to_string(),
            })?,
            None => BoardState::new(),
        };
        let initial_side = state.side_to_move();

        let mut result = record.result.as_deref().map(parse_result).transpose()?;
        let mut notations = record.moves.as_slice();
        if let Some((last, rest)) = notations.split_last() {
            if let Ok(trailing) = last.notation.trim().parse::<GameResult>() {
                if let Some(declared) = result.filter(|declared| *declared != trailing) {
                    return Err(MalformedGame::ConflictingResult {
                        declared: declared.pgn().to_string(),
                        trailing: last.notation.clone(),
                    });
                }
                result = Some(trailing);
                notations = rest;
            }
        }

        if notations.is_empty() {
            return Err(MalformedGame::Empty);
        }

        let mut moves = Vec::with_capacity(notations.len());
        for (index, raw) in notations.iter().enumerate() {
            let ply = index + 1;
            let mv = resolve_notation(&state, &raw.notation)
                .map_err(|err| rejection(ply, &raw.notation, &state, err))?;
            if let Some(err) = state.apply(mv).err() {
                return Err(rejection(ply, &raw.notation, &state, err));
            }
            moves.push(mv);
        }
        let checkmate = matches!(state.is_terminal(), Some(TerminalKind::Checkmate { .. }));

        Ok(CanonicalGame {
            start_fen: record.start_fen.clone(),
            initial_side,
            moves,
            result: result.unwrap_or_default(),
            checkmate,
        })
    }

    /// Reduce every record, keeping accepted games and counting rejections
    pub fn reduce_corpus<I, R>(&self, records: I) -> (Vec<CanonicalGame>, CorpusReport)
    where
        I: IntoIterator<Item = R>,
        R: Borrow<RawGameRecord>,
    {
        let mut games = Vec::new();
        let mut report = CorpusReport::default();

        for (index, record) in records.into_iter().enumerate() {
            match self.reduce(record.borrow()) {
                Ok(game) => {
                    report.accept();
                    games.push(game);
                }
                Err(err) => {
                    debug!("[REDUCER] Rejected game {}: {}", index, err);
                    report.reject(&err);
                }
            }
        }

        info!(
            "[REDUCER] {} games accepted, {} rejected",
            report.accepted, report.rejected
        );
        (games, report)
    }
}

fn parse_result(text: &str) -> Result<GameResult, MalformedGame> {
    text.parse().map_err(|_| MalformedGame::InvalidResult {
        result: text.to_string(),
    })
}

fn rejection(ply: usize, notation: &str, state: &BoardState, err: ChessEngineError) -> MalformedGame {
    let notation = notation.to_string();
    match err {
        ChessEngineError::NoMatchingMove { .. } | ChessEngineError::IllegalMove { .. } => {
            MalformedGame::IllegalMove {
                ply,
                notation,
                fen: state.to_fen(),
            }
        }
        ChessEngineError::AmbiguousMove { candidates, .. } => MalformedGame::AmbiguousMove {
            ply,
            notation,
            candidates,
        },
        other => MalformedGame::InvalidNotation {
            ply,
            notation,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests;
