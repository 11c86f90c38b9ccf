//! Common identifiers used throughout the runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use arena_core::{MatchPhase, PlayerId, SharedMatchState};

/// Match identifier assigned by the authority, in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match-{}", self.0)
    }
}

/// Shared state as last observed by a writer.
///
/// Every submission carries one; the authority rejects it as stale unless it
/// still describes the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precondition {
    pub phase: MatchPhase,
    pub version: u64,
}

impl Precondition {
    pub fn of(state: &SharedMatchState) -> Self {
        Self {
            phase: state.phase,
            version: state.version,
        }
    }

    pub fn holds(&self, state: &SharedMatchState) -> bool {
        self.phase == state.phase && self.version == state.version
    }
}

/// Directory entry for a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub phase: MatchPhase,
    pub round: u32,
    pub version: u64,
    pub p1: Option<PlayerId>,
    pub p2: Option<PlayerId>,
}

impl MatchSummary {
    pub fn of(match_id: MatchId, state: &SharedMatchState) -> Self {
        Self {
            match_id,
            phase: state.phase,
            round: state.round,
            version: state.version,
            p1: state.p1.player,
            p2: state.p2.player,
        }
    }
}
