use crate::state::{MatchPhase, PlayerId, SharedMatchState};

use super::ProtocolError;

/// Defines how a concrete call mutates shared match state.
///
/// The engine checks the phase and the caller's seat before any hook runs,
/// then drives `pre_validate → apply → post_validate` on a working copy.
/// Hooks receive the caller so selections can seat a joining player.
pub trait ActionTransition {
    type Output;

    /// Phase in which this call is accepted.
    fn expected_phase(&self) -> MatchPhase;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _caller: &PlayerId,
        _state: &SharedMatchState,
    ) -> Result<(), ProtocolError> {
        Ok(())
    }

    /// Applies the call by mutating the state directly. Implementations may
    /// assume that `pre_validate` has already run successfully.
    fn apply(
        &self,
        caller: &PlayerId,
        state: &mut SharedMatchState,
    ) -> Result<Self::Output, ProtocolError>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, state: &SharedMatchState) -> Result<(), ProtocolError> {
        state.check_invariants()
    }
}
