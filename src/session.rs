//! Play session state machine
//!
//! A [`PlaySession`] owns one game: its [`BoardState`], the token context fed
//! to the model, and the decoder. Each ply moves through
//!
//! ```text
//! AwaitingMove --(model_move / human_move)--> MoveApplied
//! MoveApplied  --(is_terminal)--------------> GameOver | AwaitingMove
//! AwaitingMove --(model or decoder error)---> Aborted
//! ```
//!
//! Rendering the board and reading the human's input belong to the caller.
//! A human move that does not resolve is reported and the session keeps
//! waiting; a failing model move aborts the session and every later move is
//! refused.

use chess_engine::{resolve_notation, to_san, BoardState, GameResult, Move, TerminalKind};
use tracing::{debug, info, trace, warn};

use crate::codec::{SpecialToken, Token};
use crate::decoder::ConstrainedDecoder;
use crate::error::{ChessLmError, ChessLmResult};
use crate::model::SequenceModel;

/// Where a session stands between plies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingMove,
    MoveApplied,
    GameOver(TerminalKind),
    /// The model or decoder failed; the game cannot continue
    Aborted,
}

/// One game between a model and a human, or a model and itself
pub struct PlaySession<M: SequenceModel> {
    decoder: ConstrainedDecoder,
    model: M,
    initial: BoardState,
    state: BoardState,
    context: Vec<Token>,
    moves: Vec<Move>,
    phase: SessionPhase,
    max_context: usize,
}

impl<M: SequenceModel> PlaySession<M> {
    /// Start a session at `state`
    ///
    /// # Errors
    ///
    /// [`ChessLmError::ConfigurationError`] when the model's output width or
    /// score kind does not match the decoder, or `max_context < 2`.
    pub fn new(
        decoder: ConstrainedDecoder,
        model: M,
        state: BoardState,
        max_context: usize,
    ) -> ChessLmResult<Self> {
        decoder.codec().vocabulary().ensure_size(model.vocab_size())?;
        if model.score_kind() != decoder.config().score_kind {
            return Err(ChessLmError::config(format!(
                "model produces {:?} but the decoder expects {:?}",
                model.score_kind(),
                decoder.config().score_kind
            )));
        }
        let max_context = max_context.min(model.max_context());
        if max_context < 2 {
            return Err(ChessLmError::config("max_context must be at least 2"));
        }

        let context = vec![
            SpecialToken::Start.token(),
            SpecialToken::side(state.side_to_move()).token(),
        ];
        let mut session = PlaySession {
            decoder,
            model,
            initial: state.clone(),
            state,
            context,
            moves: Vec::new(),
            phase: SessionPhase::AwaitingMove,
            max_context,
        };
        session.check_terminal();
        info!("[SESSION] New game from {}", session.initial.to_fen());
        Ok(session)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Every token of the game so far
    pub fn context(&self) -> &[Token] {
        &self.context
    }

    /// The trailing part of the context that fits the model
    pub fn model_context(&self) -> &[Token] {
        let start = self.context.len().saturating_sub(self.max_context);
        &self.context[start..]
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::GameOver(_))
    }

    /// Result once the game is over
    pub fn result(&self) -> Option<GameResult> {
        match self.phase {
            SessionPhase::GameOver(kind) => Some(kind.result()),
            _ => None,
        }
    }

    /// Ask the model for a move and play it
    ///
    /// Any failure moves the session to [`SessionPhase::Aborted`].
    pub fn model_move(&mut self) -> ChessLmResult<Move> {
        self.ensure_awaiting()?;
        match self.next_model_move() {
            Ok(mv) => Ok(mv),
            Err(err) => {
                warn!("[SESSION] Aborted after {} plies: {}", self.moves.len(), err);
                self.phase = SessionPhase::Aborted;
                Err(err)
            }
        }
    }

    fn next_model_move(&mut self) -> ChessLmResult<Move> {
        let start = self.context.len().saturating_sub(self.max_context);
        let scores = self.model.next_token_scores(&self.context[start..])?;
        let chosen = self.decoder.choose(&scores, &self.state)?;
        self.state.apply(chosen.mv)?;
        self.record(chosen.mv, chosen.token);
        Ok(chosen.mv)
    }

    /// Play a move typed as SAN or UCI
    ///
    /// Unreadable or illegal text leaves the session waiting for another try.
    pub fn human_move(&mut self, notation: &str) -> ChessLmResult<Move> {
        self.ensure_awaiting()?;
        let mv = resolve_notation(&self.state, notation)?;
        let token = self.decoder.codec().encode(&mv, &self.state);
        self.state.apply(mv)?;
        self.record(mv, token);
        Ok(mv)
    }

    /// Let the model play both sides until the game ends or `max_plies` pass
    pub fn play_out(&mut self, max_plies: usize) -> ChessLmResult<Option<TerminalKind>> {
        for _ in 0..max_plies {
            if let SessionPhase::GameOver(kind) = self.phase {
                return Ok(Some(kind));
            }
            self.model_move()?;
        }
        match self.phase {
            SessionPhase::GameOver(kind) => Ok(Some(kind)),
            _ => Ok(None),
        }
    }

    /// Moves played so far in SAN
    pub fn san_moves(&self) -> ChessLmResult<Vec<String>> {
        let mut replay = self.initial.clone();
        let mut sans = Vec::with_capacity(self.moves.len());
        for mv in &self.moves {
            sans.push(to_san(&replay, mv)?);
            replay.apply(*mv)?;
        }
        Ok(sans)
    }

    fn ensure_awaiting(&self) -> ChessLmResult<()> {
        match self.phase {
            SessionPhase::AwaitingMove => Ok(()),
            SessionPhase::GameOver(kind) => {
                Err(ChessLmError::decode(format!("game is already over: {}", kind)))
            }
            SessionPhase::MoveApplied => Err(ChessLmError::decode("previous move still pending")),
            SessionPhase::Aborted => Err(ChessLmError::decode("session was aborted")),
        }
    }

    fn record(&mut self, mv: Move, token: Token) {
        self.phase = SessionPhase::MoveApplied;
        self.context.push(token);
        self.moves.push(mv);
        debug!("[SESSION] Ply {}: {} (token {})", self.moves.len(), mv, token);
        self.check_terminal();
    }

    fn check_terminal(&mut self) {
        match self.state.is_terminal() {
            Some(kind) => {
                if let Some(result) = SpecialToken::result(kind.result()) {
                    self.context.push(result.token());
                }
                self.context.push(SpecialToken::End.token());
                self.phase = SessionPhase::GameOver(kind);
                info!(
                    "[SESSION] Game over after {} plies: {} ({})",
                    self.moves.len(),
                    kind,
                    kind.result()
                );
            }
            None => {
                self.phase = SessionPhase::AwaitingMove;
                trace!("[SESSION] Awaiting move {}", self.state.fullmove_number());
            }
        }
    }
}
