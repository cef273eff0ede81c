//! Legality-constrained move selection
//!
//! ## Overview
//!
//! [`ConstrainedDecoder`] turns one next-token score vector from a sequence
//! model into one legal move and plays it on the [`BoardState`]:
//!
//! 1. Build the legal-token set from `state.legal_moves()` through the codec
//! 2. Keep only the scores of those tokens; every other entry is discarded
//! 3. Shape the kept scores with the temperature in log space (softmax for
//!    logits, `p^(1/T)` for probabilities); a `+inf` score takes all the mass
//! 4. Restrict to the top-k legal candidates, if configured
//! 5. Renormalize, then take the argmax (greedy) or sample
//! 6. Apply the move to the state and return it
//!
//! Legality filtering always comes before temperature and top-k, so an
//! illegal token can never win by carrying more raw mass. When nothing legal
//! carries usable mass (all zero, all `-inf`, NaN) the decoder samples
//! uniformly among legal candidates.
//!
//! ## Failure
//!
//! The decoder never guesses. A finished game, a score vector of the wrong
//! width, or a position whose legal moves are all missing from the
//! vocabulary are [`ChessLmError::Decode`] errors and end the session.

mod sampling;

use chess_engine::{BoardState, Move};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::codec::{MoveCodec, Token};
use crate::config::DecodingConfig;
use crate::error::{ChessLmError, ChessLmResult};

/// How the model's output vector is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    /// Unnormalized log-probabilities
    #[default]
    Logits,
    /// Non-negative probabilities (not necessarily summing to one)
    Probabilities,
}

/// One legal choice with its renormalized probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub token: Token,
    pub mv: Move,
    pub probability: f64,
}

/// Picks legal moves from model scores
#[derive(Debug, Clone)]
pub struct ConstrainedDecoder {
    codec: MoveCodec,
    config: DecodingConfig,
    rng: StdRng,
}

impl ConstrainedDecoder {
    /// # Errors
    ///
    /// [`ChessLmError::ConfigurationError`] for a non-positive or non-finite
    /// temperature or `top_k == Some(0)`.
    pub fn new(codec: MoveCodec, config: DecodingConfig) -> ChessLmResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(ConstrainedDecoder { codec, config, rng })
    }

    pub fn codec(&self) -> &MoveCodec {
        &self.codec
    }

    pub fn config(&self) -> &DecodingConfig {
        &self.config
    }

    /// Renormalized distribution over the legal tokens of `state`
    ///
    /// Candidates come back in legal-move generation order. Entries cut by
    /// top-k stay in the list with probability zero.
    pub fn legal_distribution(
        &self,
        scores: &[f32],
        state: &BoardState,
    ) -> ChessLmResult<Vec<Candidate>> {
        if scores.len() != self.codec.vocab_size() {
            return Err(ChessLmError::decode(format!(
                "model returned {} scores for a vocabulary of {}",
                scores.len(),
                self.codec.vocab_size()
            )));
        }

        let legal = self.codec.legal_tokens(state);
        if legal.is_empty() {
            let reason = if state.legal_moves().is_empty() {
                "no legal moves in this position".to_string()
            } else {
                format!(
                    "none of the legal moves in {} is in the vocabulary",
                    state.to_fen()
                )
            };
            return Err(ChessLmError::decode(reason));
        }

        let legal_scores: Vec<f32> = legal.iter().map(|(token, _)| scores[token.index()]).collect();
        let mut weights = sampling::shape(&legal_scores, self.config.score_kind, self.config.temperature);

        let has_mass = weights.iter().any(|&w| w > 0.0) && weights.iter().all(|w| w.is_finite());
        if has_mass {
            if let Some(k) = self.config.top_k {
                sampling::keep_top_k(&mut weights, k);
            }
        } else {
            debug!("[DECODER] No usable mass on {} legal tokens, sampling uniformly", legal.len());
            weights.fill(1.0);
        }
        sampling::normalize(&mut weights);

        Ok(legal
            .into_iter()
            .zip(weights)
            .map(|((token, mv), probability)| Candidate {
                token,
                mv,
                probability,
            })
            .collect())
    }

    /// Pick one legal candidate from `scores` without playing it
    ///
    /// # Errors
    ///
    /// [`ChessLmError::Decode`] if the game is already over or no legal move
    /// can be represented.
    pub fn choose(&mut self, scores: &[f32], state: &BoardState) -> ChessLmResult<Candidate> {
        if let Some(kind) = state.is_terminal() {
            return Err(ChessLmError::decode(format!("game is already over: {}", kind)));
        }

        let candidates = self.legal_distribution(scores, state)?;
        let probabilities: Vec<f64> = candidates.iter().map(|c| c.probability).collect();

        let choice = if self.config.greedy {
            // Ties go to the lowest token id
            let best = probabilities
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            candidates
                .iter()
                .filter(|c| c.probability >= best)
                .min_by_key(|c| c.token)
                .copied()
        } else {
            sampling::sample(&probabilities, &mut self.rng).map(|index| candidates[index])
        };
        let chosen = choice
            .or_else(|| sampling::argmax(&probabilities).map(|index| candidates[index]))
            .ok_or_else(|| ChessLmError::decode("empty candidate set"))?;

        trace!(
            "[DECODER] Selected {} (token {}, p = {:.4}) from {} candidates",
            chosen.mv,
            chosen.token,
            chosen.probability,
            candidates.len()
        );
        Ok(chosen)
    }

    /// Choose a legal move from `scores`, apply it to `state` and return it
    ///
    /// # Errors
    ///
    /// [`ChessLmError::Decode`] if the game is already over or no legal move
    /// can be represented; `state` is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let mut state = BoardState::new();
    /// let before = state.clone();
    /// let scores = model.next_token_scores(&context)?;
    /// let mv = decoder.select_move(&scores, &mut state)?;
    /// context.push(decoder.codec().encode(&mv, &before));
    /// ```
    pub fn select_move(&mut self, scores: &[f32], state: &mut BoardState) -> ChessLmResult<Move> {
        let chosen = self.choose(scores, state)?;
        state.apply(chosen.mv)?;
        Ok(chosen.mv)
    }
}
