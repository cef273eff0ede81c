//! Move tokenizer
//!
//! ## Overview
//!
//! [`MoveCodec`] converts between legal [`Move`]s and vocabulary [`Token`]s.
//!
//! 1. **Canonical move string** - UCI long algebraic (`e2e4`, `e7e8q`,
//!    castling as the king's two-square step `e1g1`). It depends only on
//!    origin, destination and promotion, so `Nf3`, `Ng1-f3`, `Nf3+` and
//!    `g1f3` all produce the same string. The special-move flags are not
//!    written out because a position always recovers them.
//! 2. **Encoding** - look the canonical string up in the [`Vocabulary`];
//!    unseen strings map to `UNKNOWN`.
//! 3. **Decoding** - a token's string is resolved against the legal moves of
//!    the position it is played in, which restores the capture, castling and
//!    en passant flags.
//!
//! ## Game Layout
//!
//! A tokenized game reads `START, SIDE_<to move>, move tokens..., RESULT_<tag>, END`.
//! Games with an unknown result carry no result token.

mod token;
mod vocabulary;

pub use token::{SpecialToken, Token};
pub use vocabulary::{Vocabulary, VOCABULARY_FORMAT_VERSION};

use std::sync::Arc;

use chess_engine::{parse_uci, BoardState, ChessEngineError, Move};

use crate::error::{ChessLmError, ChessLmResult};
use crate::reducer::CanonicalGame;

/// Canonical string of a move, independent of annotation and notation style
pub fn canonical_move_string(mv: &Move) -> String {
    mv.uci()
}

/// Bidirectional move/token mapping over one shared vocabulary
#[derive(Debug, Clone)]
pub struct MoveCodec {
    vocabulary: Arc<Vocabulary>,
}

impl MoveCodec {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        MoveCodec { vocabulary }
    }

    /// Fit a vocabulary over the canonical strings of `games`, in game order
    pub fn fit<'a, I>(games: I) -> Vocabulary
    where
        I: IntoIterator<Item = &'a CanonicalGame>,
    {
        Vocabulary::fit(
            games
                .into_iter()
                .flat_map(|game| game.moves().iter().map(canonical_move_string)),
        )
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Token of a move played from `state`, `UNKNOWN` if its canonical
    /// string was never fitted
    ///
    /// The canonical string depends only on the move, so `state` is not read.
    pub fn encode(&self, mv: &Move, _state: &BoardState) -> Token {
        self.token_of(mv)
    }

    fn token_of(&self, mv: &Move) -> Token {
        self.vocabulary.token_or_unknown(&canonical_move_string(mv))
    }

    /// Resolve a token to the legal move it denotes in `state`
    ///
    /// # Errors
    ///
    /// - [`ChessLmError::UnknownToken`] for special tokens and unassigned ids
    /// - [`ChessLmError::IllegalMove`] when the move string is not legal here
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let state = BoardState::new();
    /// let e4 = resolve_notation(&state, "e4")?;
    /// let token = codec.encode(&e4, &state);
    /// assert_eq!(codec.decode(token, &state)?, e4);
    /// ```
    pub fn decode(&self, token: Token, state: &BoardState) -> ChessLmResult<Move> {
        let text = self
            .vocabulary
            .move_string(token)
            .ok_or(ChessLmError::UnknownToken {
                token,
                vocab_size: self.vocabulary.len(),
            })?;

        parse_uci(state, text).map_err(|err| match err {
            ChessEngineError::NoMatchingMove { .. } | ChessEngineError::InvalidNotation { .. } => {
                ChessLmError::IllegalMove {
                    uci: text.to_string(),
                    fen: state.to_fen(),
                }
            }
            other => other.into(),
        })
    }

    /// Legal moves of `state` paired with their tokens
    ///
    /// Moves whose canonical string is not in the vocabulary are left out;
    /// `UNKNOWN` is never a selectable choice.
    pub fn legal_tokens(&self, state: &BoardState) -> Vec<(Token, Move)> {
        state
            .legal_moves()
            .into_iter()
            .filter_map(|mv| {
                let token = self.vocabulary.token(&canonical_move_string(&mv))?;
                Some((token, mv))
            })
            .collect()
    }

    /// Full token stream of one game
    pub fn tokenize_game(&self, game: &CanonicalGame) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(game.len() + 4);
        tokens.push(SpecialToken::Start.token());
        tokens.push(SpecialToken::side(game.initial_side()).token());
        tokens.extend(game.moves().iter().map(|mv| self.token_of(mv)));
        if let Some(result) = SpecialToken::result(game.result()) {
            tokens.push(result.token());
        }
        tokens.push(SpecialToken::End.token());
        tokens
    }
}
