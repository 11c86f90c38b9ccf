//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the match authority, repositories and providers so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use arena_core::{
    ErrorSeverity, ExecuteError, GameError, MatchPhase, PlayerId, ProtocolError, ReconcileError,
};

pub use crate::repository::RepositoryError;
use crate::types::MatchId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine refused the call. Not retryable as is.
    #[error(transparent)]
    Rejected(#[from] ExecuteError),

    /// The write was based on an outdated view of the match.
    #[error(
        "stale write to {match_id}: expected {expected} at version {expected_version}, observed {observed} at version {observed_version}"
    )]
    StaleWrite {
        match_id: MatchId,
        expected: MatchPhase,
        observed: MatchPhase,
        expected_version: u64,
        observed_version: u64,
    },

    #[error("move reconciliation failed")]
    Reconciliation(#[from] ReconcileError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0} not found")]
    MatchNotFound(MatchId),

    #[error("no pending moves cached for {match_id} in phase {phase}")]
    MissingPendingMoves { match_id: MatchId, phase: MatchPhase },

    /// Moves that could never be disclosed or submitted for this side.
    #[error("invalid moves for {match_id}")]
    InvalidMoves {
        match_id: MatchId,
        #[source]
        source: ProtocolError,
    },

    #[error("no commitment published in {match_id} (phase {phase})")]
    MissingCommitment { match_id: MatchId, phase: MatchPhase },

    #[error("player {} is not seated in {match_id}", .player.short())]
    NotInMatch { match_id: MatchId, player: PlayerId },

    #[error("move provider chose {found} heroes, expected {expected}")]
    ProviderChoice { expected: usize, found: usize },

    #[error("{match_id} exceeded the round limit of {limit}")]
    RoundLimit { match_id: MatchId, limit: u32 },

    #[error("state stream for {0} closed")]
    StreamClosed(MatchId),

    #[error("match authority command channel closed")]
    CommandChannelClosed,

    #[error("match authority reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Returns true when resubmitting against a fresh view may succeed.
    ///
    /// Retry policy belongs to the caller; the runtime never retries itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleWrite { .. })
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rejected(error) => error.severity(),
            Self::StaleWrite { .. } => ErrorSeverity::Recoverable,
            Self::Reconciliation(error) => error.severity(),
            Self::MatchNotFound(_)
            | Self::MissingPendingMoves { .. }
            | Self::MissingCommitment { .. }
            | Self::InvalidMoves { .. }
            | Self::NotInMatch { .. } => ErrorSeverity::Validation,
            Self::ProviderChoice { .. } | Self::RoundLimit { .. } => ErrorSeverity::Validation,
            Self::Repository(_)
            | Self::StreamClosed(_)
            | Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }
}
