//! Error types for action execution pipeline.

use crate::action::ProtocolError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::MatchPhase;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

impl std::fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Rejection of an action by the game engine.
///
/// Always names the phase the action expected next to the state it actually
/// ran against, so desynced clients can be diagnosed from the error alone.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(
    "{action} rejected during {stage} (expected phase {expected}, observed {}, round {}, version {}): {error}",
    .context.phase, .context.round, .context.version
)]
pub struct ExecuteError {
    /// Name of the rejected call.
    pub action: &'static str,
    /// Phase the call is valid in.
    pub expected: MatchPhase,
    /// State the call ran against.
    pub context: ErrorContext,
    /// Pipeline stage that failed.
    pub stage: TransitionPhase,
    #[source]
    pub error: ProtocolError,
}

impl ExecuteError {
    pub(crate) fn new(
        action: &'static str,
        expected: MatchPhase,
        context: ErrorContext,
        failure: TransitionPhaseError<ProtocolError>,
    ) -> Self {
        Self {
            action,
            expected,
            context,
            stage: failure.phase,
            error: failure.error,
        }
    }

    /// Phase observed when the call was rejected.
    pub fn observed(&self) -> MatchPhase {
        self.context.phase
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
