//! Commit/reveal calls.
//!
//! One round is three calls in a fixed order, enforced purely by phase gating:
//! P1 publishes a commitment, P2 submits its move in the clear, P1 discloses
//! the move behind the commitment. The disclosure resolves the round.

use crate::commit::{Blinding, Commitment, Nonce, verify_blinded};
use crate::engine::resolver::{self, RoundReport};
use crate::state::{MatchPhase, PlayerId, RoundMoves, SharedMatchState};

use super::{ActionTransition, ProtocolError};

/// P1 locks in its move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PublishCommitment {
    pub commitment: Commitment,
    pub nonce: Nonce,
}

/// P2 moves in the clear after seeing only P1's digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubmitCleartextMove {
    pub moves: RoundMoves,
}

/// P1 opens its commitment.
///
/// Carries the round's blinding instead of the secret; see [`crate::commit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscloseMove {
    pub moves: RoundMoves,
    pub blinding: Blinding,
}

impl ActionTransition for PublishCommitment {
    type Output = ();

    fn expected_phase(&self) -> MatchPhase {
        MatchPhase::P1Commit
    }

    fn apply(&self, _caller: &PlayerId, state: &mut SharedMatchState) -> Result<(), ProtocolError> {
        state.commitment = Some(self.commitment);
        state.nonce = Some(self.nonce);
        state.phase = MatchPhase::P2CommitAndReveal;
        Ok(())
    }
}

impl ActionTransition for SubmitCleartextMove {
    type Output = ();

    fn expected_phase(&self) -> MatchPhase {
        MatchPhase::P2CommitAndReveal
    }

    fn pre_validate(&self, _caller: &PlayerId, state: &SharedMatchState) -> Result<(), ProtocolError> {
        self.moves.validate(&state.p2.alive())
    }

    fn apply(&self, _caller: &PlayerId, state: &mut SharedMatchState) -> Result<(), ProtocolError> {
        state.p2_moves = Some(self.moves);
        state.phase = MatchPhase::P1Reveal;
        Ok(())
    }
}

impl ActionTransition for DiscloseMove {
    type Output = RoundReport;

    fn expected_phase(&self) -> MatchPhase {
        MatchPhase::P1Reveal
    }

    fn pre_validate(&self, _caller: &PlayerId, state: &SharedMatchState) -> Result<(), ProtocolError> {
        self.moves.validate(&state.p1.alive())?;

        let (Some(commitment), Some(nonce)) = (state.commitment, state.nonce) else {
            return Err(ProtocolError::InvariantViolated {
                context: state.context(),
                detail: "reveal phase without a published commitment",
            });
        };
        if !verify_blinded(&commitment, &self.blinding, &self.moves, &nonce) {
            return Err(ProtocolError::CommitmentMismatch {
                context: state.context(),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        _caller: &PlayerId,
        state: &mut SharedMatchState,
    ) -> Result<RoundReport, ProtocolError> {
        let p2_moves = state.p2_moves.ok_or_else(|| ProtocolError::InvariantViolated {
            context: state.context(),
            detail: "reveal phase without p2 moves",
        })?;

        let report = resolver::resolve_round(state, &self.moves, &p2_moves);
        resolver::apply_report(state, &report);
        Ok(report)
    }
}
