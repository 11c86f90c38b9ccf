//! Event types for different topics.

use arena_core::{ErrorSeverity, MatchPhase, PlayerId, RoundReport};
use serde::{Deserialize, Serialize};

use crate::types::{MatchId, MatchSummary};

/// Events describing accepted changes to a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A match was opened by its creator.
    Created { summary: MatchSummary },

    /// A call was accepted and moved the match from `from` to `to`.
    ActionAccepted {
        match_id: MatchId,
        action: String,
        caller: PlayerId,
        from: MatchPhase,
        to: MatchPhase,
        version: u64,
    },

    /// A disclosure resolved a round.
    RoundResolved {
        match_id: MatchId,
        report: Box<RoundReport>,
    },

    /// The match reached a terminal phase.
    Finished {
        match_id: MatchId,
        phase: MatchPhase,
        round: u32,
    },
}

impl MatchEvent {
    pub fn match_id(&self) -> MatchId {
        match self {
            MatchEvent::Created { summary } => summary.match_id,
            MatchEvent::ActionAccepted { match_id, .. }
            | MatchEvent::RoundResolved { match_id, .. }
            | MatchEvent::Finished { match_id, .. } => *match_id,
        }
    }
}

/// Events describing calls the authority refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProtocolEvent {
    Rejected {
        match_id: MatchId,
        action: String,
        caller: PlayerId,
        /// Phase the caller expected the match to be in.
        expected: MatchPhase,
        /// Phase the match was actually in.
        observed: MatchPhase,
        error: String,
        retryable: bool,
        severity: ErrorSeverity,
    },
}
