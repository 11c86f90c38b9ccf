//! Action transition dispatch and execution logic.

use crate::action::{ActionKind, ActionTransition, ProtocolError};
use crate::state::{PlayerId, SharedMatchState};

use super::errors::{TransitionPhase, TransitionPhaseError};
use super::resolver::RoundReport;

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    caller: &PlayerId,
    state: &mut SharedMatchState,
) -> Result<T::Output, TransitionPhaseError<ProtocolError>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(caller, state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let output = transition
        .apply(caller, state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(output)
}

/// Routes each call to its transition. Only disclosures produce a report.
pub(super) fn execute_transition(
    kind: &ActionKind,
    caller: &PlayerId,
    state: &mut SharedMatchState,
) -> Result<Option<RoundReport>, TransitionPhaseError<ProtocolError>> {
    match kind {
        ActionKind::SelectFirstHero(transition) => {
            drive_transition(transition, caller, state).map(|()| None)
        }
        ActionKind::SelectFirstTwoHeroes(transition) => {
            drive_transition(transition, caller, state).map(|()| None)
        }
        ActionKind::SelectLastTwoHeroes(transition) => {
            drive_transition(transition, caller, state).map(|()| None)
        }
        ActionKind::SelectLastHero(transition) => {
            drive_transition(transition, caller, state).map(|()| None)
        }
        ActionKind::PublishCommitment(transition) => {
            drive_transition(transition, caller, state).map(|()| None)
        }
        ActionKind::SubmitCleartextMove(transition) => {
            drive_transition(transition, caller, state).map(|()| None)
        }
        ActionKind::DiscloseMove(transition) => drive_transition(transition, caller, state).map(Some),
    }
}
