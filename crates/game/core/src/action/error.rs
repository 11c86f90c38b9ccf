//! Protocol errors.
//!
//! Everything an action can be rejected for. A rejected action never mutates
//! shared state; the engine discards its working copy.

use crate::config::GameConfig;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{MatchPhase, PlayerId, Side};

/// Errors raised by action transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Call made outside the phase that accepts it (includes repeated selections).
    #[error("wrong phase: expected {expected}, observed {observed}")]
    WrongPhase {
        expected: MatchPhase,
        observed: MatchPhase,
    },

    /// Caller does not hold the seat that acts in this phase.
    #[error("player {} is not seated as {side} (phase {observed})", .caller.short())]
    NotYourTurn {
        caller: PlayerId,
        side: Side,
        observed: MatchPhase,
    },

    /// P1 tried to take the open P2 seat.
    #[error("player already holds the opposing seat")]
    SelfPlay,

    /// Target index outside the range allowed for the hero.
    #[error("hero {hero} (alive: {alive}) cannot target slot {target}")]
    InvalidTarget { hero: usize, target: u8, alive: bool },

    /// Move does not carry exactly one command per hero.
    #[error("expected {expected} commands, found {found}")]
    WrongMoveCount { expected: usize, found: usize },

    /// Reveal does not re-derive the published commitment.
    #[error("disclosed move does not match commitment (round {})", .context.round)]
    CommitmentMismatch { context: ErrorContext },

    /// State broke a per-phase invariant.
    #[error("invariant violated in {}: {detail}", .context.phase)]
    InvariantViolated {
        context: ErrorContext,
        detail: &'static str,
    },
}

impl ProtocolError {
    pub fn wrong_phase(expected: MatchPhase, observed: MatchPhase) -> Self {
        Self::WrongPhase { expected, observed }
    }

    pub fn wrong_move_count(found: usize) -> Self {
        Self::WrongMoveCount {
            expected: GameConfig::HEROES_PER_SIDE,
            found,
        }
    }
}

impl GameError for ProtocolError {
    fn severity(&self) -> ErrorSeverity {
        use ProtocolError::*;
        match self {
            WrongPhase { .. } | NotYourTurn { .. } | SelfPlay => ErrorSeverity::Validation,
            InvalidTarget { .. } | WrongMoveCount { .. } => ErrorSeverity::Validation,
            CommitmentMismatch { .. } => ErrorSeverity::Fatal,
            InvariantViolated { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ProtocolError::*;
        match self {
            WrongPhase { .. } => "PROTOCOL_WRONG_PHASE",
            NotYourTurn { .. } => "PROTOCOL_NOT_YOUR_TURN",
            SelfPlay => "PROTOCOL_SELF_PLAY",
            InvalidTarget { .. } => "PROTOCOL_INVALID_TARGET",
            WrongMoveCount { .. } => "PROTOCOL_WRONG_MOVE_COUNT",
            CommitmentMismatch { .. } => "PROTOCOL_COMMITMENT_MISMATCH",
            InvariantViolated { .. } => "PROTOCOL_INVARIANT_VIOLATED",
        }
    }
}
