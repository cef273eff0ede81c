//! Sequence model seam
//!
//! The trained network lives outside this crate. Anything that maps a token
//! context to one score per vocabulary entry can drive a play session by
//! implementing [`SequenceModel`].

use thiserror::Error;

use crate::codec::Token;
use crate::decoder::ScoreKind;

/// Errors reported by a model implementation
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("context of {len} tokens exceeds the model limit of {max}")]
    ContextTooLong { len: usize, max: usize },

    #[error("model backend failed: {message}")]
    Backend { message: String },
}

/// Next-token scorer over a fixed vocabulary
pub trait SequenceModel {
    /// Width of the output vector
    fn vocab_size(&self) -> usize;

    /// Longest context the model accepts
    fn max_context(&self) -> usize;

    /// How [`SequenceModel::next_token_scores`] output should be read
    fn score_kind(&self) -> ScoreKind {
        ScoreKind::Logits
    }

    /// One score per vocabulary token for the position after `context`
    fn next_token_scores(&mut self, context: &[Token]) -> Result<Vec<f32>, ModelError>;
}

/// Model with no preference: equal logits everywhere
///
/// Useful for self-play smoke runs; the decoder's legality filter turns it
/// into a uniformly random legal mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformModel {
    vocab_size: usize,
    max_context: usize,
}

impl UniformModel {
    pub fn new(vocab_size: usize, max_context: usize) -> Self {
        UniformModel {
            vocab_size,
            max_context,
        }
    }
}

impl SequenceModel for UniformModel {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn max_context(&self) -> usize {
        self.max_context
    }

    fn next_token_scores(&mut self, context: &[Token]) -> Result<Vec<f32>, ModelError> {
        if context.len() > self.max_context {
            return Err(ModelError::ContextTooLong {
                len: context.len(),
                max: self.max_context,
            });
        }
        Ok(vec![0.0; self.vocab_size])
    }
}
