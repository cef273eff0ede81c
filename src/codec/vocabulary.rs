//! Vocabulary fitting and persistence
//!
//! A [`Vocabulary`] maps canonical move strings to [`Token`] ids. It is built
//! once by [`Vocabulary::fit`] and never changes afterwards; sessions share it
//! behind an `Arc`.
//!
//! # File Format
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "vocab_size": 1977,
//!   "special_tokens": { "<START>": 0, "<END>": 1, ... },
//!   "moves": ["e2e4", "e7e5", ...]
//! }
//! ```
//!
//! `moves[i]` has id `SpecialToken::COUNT + i`. Loading rejects any file whose
//! version, special-token layout or declared size differs from what this build
//! produces.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chess_engine::Square;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::token::{SpecialToken, Token};
use crate::error::{ChessLmError, ChessLmResult};

pub const VOCABULARY_FORMAT_VERSION: u32 = 1;

/// Closed mapping between canonical move strings and token ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    moves: Vec<String>,
    ids: HashMap<String, Token>,
}

#[derive(Serialize, Deserialize)]
struct VocabularyFile {
    format_version: u32,
    vocab_size: usize,
    special_tokens: BTreeMap<String, u32>,
    moves: Vec<String>,
}

impl Vocabulary {
    /// Assign ids to move strings in first-seen order after the special block
    ///
    /// Deterministic: the same ordered corpus always yields the same ids.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let vocab = Vocabulary::fit(["e2e4", "e7e5", "e2e4"]);
    /// assert_eq!(vocab.len(), SpecialToken::COUNT + 2);
    /// assert_eq!(vocab.token("e7e5"), Some(Token(10)));
    /// ```
    pub fn fit<I, S>(corpus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Vocabulary {
            moves: Vec::new(),
            ids: HashMap::new(),
        };
        for text in corpus {
            let text = text.as_ref();
            if !vocabulary.ids.contains_key(text) {
                let token = Token((SpecialToken::COUNT + vocabulary.moves.len()) as u32);
                vocabulary.ids.insert(text.to_string(), token);
                vocabulary.moves.push(text.to_string());
            }
        }
        info!("[VOCAB] Fitted {} move tokens", vocabulary.moves.len());
        vocabulary
    }

    /// Every origin/destination pair plus last-rank promotions, in square order
    ///
    /// Covers any legal move of any position, so nothing encodes to `UNKNOWN`.
    /// Most entries are geometrically impossible and never selected.
    pub fn exhaustive() -> Self {
        let squares: Vec<Square> = (0..64).filter_map(Square::from_index).collect();
        let mut moves = Vec::with_capacity(64 * 63 + 176);
        for &from in &squares {
            for &to in &squares {
                if from != to {
                    moves.push(format!("{}{}", from, to));
                }
            }
        }
        for (from_rank, to_rank) in [(6, 7), (1, 0)] {
            for &from in squares.iter().filter(|sq| sq.rank() == from_rank) {
                for &to in squares
                    .iter()
                    .filter(|sq| sq.rank() == to_rank && sq.file().abs_diff(from.file()) <= 1)
                {
                    for letter in ['q', 'r', 'b', 'n'] {
                        moves.push(format!("{}{}{}", from, to, letter));
                    }
                }
            }
        }
        Self::fit(moves)
    }

    /// Build from an explicit id-ordered move list, rejecting duplicates
    pub fn from_moves(moves: Vec<String>) -> ChessLmResult<Self> {
        let mut ids = HashMap::with_capacity(moves.len());
        for (offset, text) in moves.iter().enumerate() {
            let token = Token((SpecialToken::COUNT + offset) as u32);
            if ids.insert(text.clone(), token).is_some() {
                return Err(ChessLmError::config(format!(
                    "vocabulary lists move '{}' twice",
                    text
                )));
            }
        }
        Ok(Vocabulary { moves, ids })
    }

    /// Total number of ids, special tokens included
    pub fn len(&self) -> usize {
        SpecialToken::COUNT + self.moves.len()
    }

    /// True when no move tokens were fitted
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn token(&self, move_string: &str) -> Option<Token> {
        self.ids.get(move_string).copied()
    }

    /// Token for a move string, `UNKNOWN` when it was never fitted
    pub fn token_or_unknown(&self, move_string: &str) -> Token {
        self.token(move_string)
            .unwrap_or_else(|| SpecialToken::Unknown.token())
    }

    /// Move string of a move token, `None` for special or unassigned ids
    pub fn move_string(&self, token: Token) -> Option<&str> {
        token
            .index()
            .checked_sub(SpecialToken::COUNT)
            .and_then(|offset| self.moves.get(offset))
            .map(String::as_str)
    }

    pub fn contains(&self, token: Token) -> bool {
        token.index() < self.len()
    }

    /// Move tokens in id order
    pub fn moves(&self) -> impl Iterator<Item = (Token, &str)> + '_ {
        self.moves
            .iter()
            .enumerate()
            .map(|(offset, text)| (Token((SpecialToken::COUNT + offset) as u32), text.as_str()))
    }

    /// Fail unless the vocabulary has exactly `expected` ids
    ///
    /// Used to check a model's output width against the loaded vocabulary.
    pub fn ensure_size(&self, expected: usize) -> ChessLmResult<()> {
        if self.len() != expected {
            return Err(ChessLmError::config(format!(
                "vocabulary has {} tokens but {} were expected",
                self.len(),
                expected
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> ChessLmResult<String> {
        let file = VocabularyFile {
            format_version: VOCABULARY_FORMAT_VERSION,
            vocab_size: self.len(),
            special_tokens: special_layout(),
            moves: self.moves.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Parse and validate a serialized vocabulary
    ///
    /// # Errors
    ///
    /// - [`ChessLmError::Json`] if the text is not a vocabulary document
    /// - [`ChessLmError::ConfigurationError`] on version, layout or size mismatch
    pub fn from_json(text: &str) -> ChessLmResult<Self> {
        let file: VocabularyFile = serde_json::from_str(text)?;

        if file.format_version != VOCABULARY_FORMAT_VERSION {
            return Err(ChessLmError::config(format!(
                "vocabulary format version {} is not supported (expected {})",
                file.format_version, VOCABULARY_FORMAT_VERSION
            )));
        }
        if file.special_tokens != special_layout() {
            return Err(ChessLmError::config(
                "special token layout does not match this build",
            ));
        }
        let vocabulary = Self::from_moves(file.moves)?;
        if vocabulary.len() != file.vocab_size {
            return Err(ChessLmError::config(format!(
                "declared vocab_size {} but file holds {} tokens",
                file.vocab_size,
                vocabulary.len()
            )));
        }
        Ok(vocabulary)
    }

    pub fn save(&self, path: &Path) -> ChessLmResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        info!("[VOCAB] Saved {} tokens to {:?}", self.len(), path);
        Ok(())
    }

    pub fn load(path: &Path) -> ChessLmResult<Self> {
        let contents = fs::read_to_string(path)?;
        let vocabulary = Self::from_json(&contents).map_err(|err| match err {
            ChessLmError::Json(e) => {
                ChessLmError::config(format!("vocabulary file {:?} is unreadable: {}", path, e))
            }
            other => other,
        })?;
        debug!("[VOCAB] Loaded {} tokens from {:?}", vocabulary.len(), path);
        Ok(vocabulary)
    }
}

fn special_layout() -> BTreeMap<String, u32> {
    SpecialToken::ALL
        .iter()
        .map(|special| (special.name().to_string(), special.token().id()))
        .collect()
}
