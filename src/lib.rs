//! Chess sequence-model tooling
//!
//! Sits between chess rules ([`chess_engine`]) and a next-token model.
//!
//! ## Training Data Flow
//!
//! ```text
//! RawGameRecord --GameReducer--> CanonicalGame --MoveCodec--> tokens
//!               --ExampleBuilder--> TrainingExample (external trainer)
//! ```
//!
//! ## Play Data Flow
//!
//! ```text
//! BoardState --MoveCodec--> legal tokens ----+
//! context --SequenceModel--> scores ---------+--> ConstrainedDecoder --> Move --> BoardState
//! ```
//!
//! ## Module Organization
//!
//! - `codec` - Canonical move strings, [`Token`]s and the [`Vocabulary`]
//! - `reducer` - Raw records to validated [`CanonicalGame`]s
//! - `dataset` - Windowing into [`TrainingExample`]s
//! - `decoder` - Legality-constrained move selection
//! - `model` - The [`SequenceModel`] seam
//! - `session` - Turn-by-turn [`PlaySession`]
//! - `config` - JSON configuration

pub mod codec;
pub mod config;
pub mod dataset;
pub mod decoder;
pub mod error;
pub mod model;
pub mod reducer;
pub mod session;

pub use codec::{canonical_move_string, MoveCodec, SpecialToken, Token, Vocabulary};
pub use config::{ChessLmConfig, DatasetConfig, DecodingConfig};
pub use dataset::{split_games, write_jsonl, BoundaryMode, ExampleBuilder, Examples, TrainingExample};
pub use decoder::{Candidate, ConstrainedDecoder, ScoreKind};
pub use error::{ChessLmError, ChessLmResult};
pub use model::{ModelError, SequenceModel, UniformModel};
pub use reducer::{CanonicalGame, CorpusReport, GameReducer, MalformedGame, RawGameRecord, RawMove};
pub use session::{PlaySession, SessionPhase};
