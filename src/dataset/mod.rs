//! Training example construction
//!
//! ## Overview
//!
//! [`ExampleBuilder`] turns canonical games into fixed-length supervised
//! windows for an external trainer:
//!
//! 1. Each game is tokenized by the [`MoveCodec`]
//!    (`START, SIDE_*, moves..., RESULT_*, END`).
//! 2. A window starting at offset `s` takes `input = tokens[s..s+L]` and
//!    `target = tokens[s+1..s+L+1]`, so every target is the token that
//!    follows its input position.
//! 3. Windows advance by `stride` (overlapping when `stride < L`, disjoint
//!    when `stride == L`). The last window of a stream is the first one that
//!    reaches its end; shorter windows are right-padded with `PAD` and the
//!    padded positions are cleared in `mask`.
//! 4. `checkmate[i]` marks a target that is a mating move. Only the last move
//!    of a game that ends in mate carries the label.
//!
//! ## Boundary Modes
//!
//! - [`BoundaryMode::PerGame`] - windows never cross a game
//! - [`BoundaryMode::Packed`] - games are streamed back to back, so the only
//!   cross-game adjacency inside a window is `END` followed by `START`
//!
//! ## Laziness
//!
//! [`ExampleBuilder::build`] returns an [`Examples`] iterator that tokenizes
//! games on demand and holds at most one window plus one game of tokens.
//! It has no randomness: building again from the same games yields the same
//! sequence.

use std::collections::VecDeque;
use std::io::Write;
use std::slice;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::{MoveCodec, SpecialToken, Token};
use crate::config::DatasetConfig;
use crate::error::{ChessLmError, ChessLmResult};
use crate::reducer::CanonicalGame;

/// How windows treat game boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    #[default]
    PerGame,
    Packed,
}

/// One fixed-length training window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: Vec<Token>,
    /// `input` shifted left by one position
    pub target: Vec<Token>,
    /// `true` for real positions, `false` for `PAD`
    pub mask: Vec<bool>,
    /// `true` where `target` is a move that delivers checkmate
    pub checkmate: Vec<bool>,
}

impl TrainingExample {
    /// Number of unpadded positions
    pub fn valid_len(&self) -> usize {
        self.mask.iter().take_while(|&&real| real).count()
    }
}

/// Windowing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleBuilder {
    window_length: usize,
    stride: usize,
    boundary: BoundaryMode,
}

impl ExampleBuilder {
    /// Disjoint per-game windows of `window_length`
    pub fn new(window_length: usize) -> ChessLmResult<Self> {
        Self::with_options(window_length, window_length, BoundaryMode::PerGame)
    }

    /// # Errors
    ///
    /// [`ChessLmError::ConfigurationError`] unless
    /// `1 <= stride <= window_length`.
    pub fn with_options(
        window_length: usize,
        stride: usize,
        boundary: BoundaryMode,
    ) -> ChessLmResult<Self> {
        if window_length == 0 {
            return Err(ChessLmError::config("window_length must be at least 1"));
        }
        if stride == 0 || stride > window_length {
            return Err(ChessLmError::config(format!(
                "stride must be in 1..={}, got {}",
                window_length, stride
            )));
        }
        Ok(ExampleBuilder {
            window_length,
            stride,
            boundary,
        })
    }

    pub fn from_config(config: &DatasetConfig) -> ChessLmResult<Self> {
        Self::with_options(config.window_length, config.stride, config.boundary)
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// Lazy example sequence over `games`
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let builder = ExampleBuilder::new(16)?;
    /// let first: Vec<_> = builder.build(&codec, &games).collect();
    /// let again: Vec<_> = builder.build(&codec, &games).collect();
    /// assert_eq!(first, again);
    /// ```
    pub fn build<'a>(&self, codec: &'a MoveCodec, games: &'a [CanonicalGame]) -> Examples<'a> {
        debug!(
            "[DATASET] Windowing {} games (window {}, stride {}, {:?})",
            games.len(),
            self.window_length,
            self.stride,
            self.boundary
        );
        Examples {
            codec,
            games: games.iter(),
            builder: *self,
            buffer: VecDeque::with_capacity(self.window_length * 2),
        }
    }
}

/// Lazy, finite iterator of [`TrainingExample`]s
///
/// Cloning captures the current position; each clone continues independently.
#[derive(Debug, Clone)]
pub struct Examples<'a> {
    codec: &'a MoveCodec,
    games: slice::Iter<'a, CanonicalGame>,
    builder: ExampleBuilder,
    /// Pending tokens, each with its checkmate label
    buffer: VecDeque<(Token, bool)>,
}

impl Examples<'_> {
    /// Tokens a full window needs: `L` inputs plus the final target
    fn span(&self) -> usize {
        self.builder.window_length + 1
    }

    /// Load tokens until a window can be cut; false once nothing is left
    fn fill(&mut self) -> bool {
        let span = self.span();
        match self.builder.boundary {
            BoundaryMode::PerGame => {
                while self.buffer.len() < 2 {
                    self.buffer.clear();
                    match self.games.next() {
                        Some(game) => self.load(game),
                        None => return false,
                    }
                }
                true
            }
            BoundaryMode::Packed => {
                while self.buffer.len() < span {
                    match self.games.next() {
                        Some(game) => self.load(game),
                        None => break,
                    }
                }
                self.buffer.len() >= 2
            }
        }
    }

    /// Append one game's tokens, labelling its mating move
    fn load(&mut self, game: &CanonicalGame) {
        let tokens = self.codec.tokenize_game(game);
        // START, SIDE, then the moves
        let mating_index = game.ends_in_checkmate().then_some(1 + game.len());
        self.buffer.extend(
            tokens
                .into_iter()
                .enumerate()
                .map(|(index, token)| (token, Some(index) == mating_index)),
        );
    }

    fn cut_window(&self) -> TrainingExample {
        let length = self.builder.window_length;
        let real = length.min(self.buffer.len() - 1);
        let pad = SpecialToken::Pad.token();

        let mut input = Vec::with_capacity(length);
        let mut target = Vec::with_capacity(length);
        let mut mask = Vec::with_capacity(length);
        let mut checkmate = Vec::with_capacity(length);
        for i in 0..length {
            if i < real {
                let (next, mates) = self.buffer[i + 1];
                input.push(self.buffer[i].0);
                target.push(next);
                mask.push(true);
                checkmate.push(mates);
            } else {
                input.push(pad);
                target.push(pad);
                mask.push(false);
                checkmate.push(false);
            }
        }
        TrainingExample {
            input,
            target,
            mask,
            checkmate,
        }
    }
}

impl Iterator for Examples<'_> {
    type Item = TrainingExample;

    fn next(&mut self) -> Option<TrainingExample> {
        if !self.fill() {
            self.buffer.clear();
            return None;
        }
        let example = self.cut_window();

        let source_drained = match self.builder.boundary {
            BoundaryMode::PerGame => true,
            BoundaryMode::Packed => self.games.len() == 0,
        };
        if source_drained && self.buffer.len() <= self.span() {
            // This window reached the end of the stream
            self.buffer.clear();
        } else {
            let step = self.builder.stride.min(self.buffer.len());
            self.buffer.drain(..step);
        }
        Some(example)
    }
}

/// Deterministic train/validation split by whole game
///
/// Each game goes to validation with probability `validation_split`, drawn
/// from an RNG seeded with `seed`.
pub fn split_games(
    games: Vec<CanonicalGame>,
    validation_split: f64,
    seed: u64,
) -> (Vec<CanonicalGame>, Vec<CanonicalGame>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (validation, train): (Vec<_>, Vec<_>) = games
        .into_iter()
        .partition(|_| rng.random::<f64>() < validation_split);
    info!(
        "[DATASET] Split {} train / {} validation games (seed {})",
        train.len(),
        validation.len(),
        seed
    );
    (train, validation)
}

/// Write examples as JSON lines, returning how many were written
pub fn write_jsonl<W, I>(writer: &mut W, examples: I) -> ChessLmResult<usize>
where
    W: Write,
    I: IntoIterator<Item = TrainingExample>,
{
    let mut count = 0;
    for example in examples {
        serde_json::to_writer(&mut *writer, &example)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests;
