//! Phase gating and action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`SharedMatchState`].
//! It checks phase and seat, runs the transition pipeline on a working copy
//! and only commits that copy once every stage passed, so a rejected call
//! leaves the state untouched.

mod errors;
pub mod resolver;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use resolver::{Hit, RoundOutcome, RoundReport, apply_report, resolve_round};

use crate::action::{Action, ProtocolError};
use crate::state::{MatchPhase, SharedMatchState};

/// Complete outcome of an accepted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Name of the accepted call.
    pub action: &'static str,

    /// Phase before and after the call.
    pub from: MatchPhase,
    pub to: MatchPhase,

    /// Version after the call.
    pub version: u64,

    /// Report of the round this call resolved, for disclosures.
    pub report: Option<RoundReport>,
}

/// Game engine that validates and executes calls against one match.
///
/// All state mutations flow through the three-phase action pipeline:
/// pre_validate → apply → post_validate
pub struct GameEngine<'a> {
    state: &'a mut SharedMatchState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut SharedMatchState) -> Self {
        Self { state }
    }

    /// Executes an action.
    ///
    /// Enforces phase and seat before any transition hook runs:
    /// - the action must be the one the current phase accepts
    /// - the caller must hold the acting seat, or join P2's open seat
    ///
    /// On success the version is incremented by exactly one.
    pub fn execute(&mut self, action: &Action) -> Result<ExecutionOutcome, ExecuteError> {
        let name = action.name();
        let expected = action.kind.expected_phase();
        let context = self.state.context();
        let reject = |failure| ExecuteError::new(name, expected, context, failure);

        self.validate_turn(action)
            .map_err(|error| reject(TransitionPhaseError::new(TransitionPhase::PreValidate, error)))?;

        let mut working = self.state.clone();
        let report = transition::execute_transition(&action.kind, &action.caller, &mut working)
            .map_err(reject)?;

        working.version += 1;
        let from = self.state.phase;
        *self.state = working;

        Ok(ExecutionOutcome {
            action: name,
            from,
            to: self.state.phase,
            version: self.state.version,
            report,
        })
    }

    /// Validates that the action fits the phase and the caller holds the seat.
    fn validate_turn(&self, action: &Action) -> Result<(), ProtocolError> {
        let expected = action.kind.expected_phase();
        let observed = self.state.phase;
        if expected != observed {
            return Err(ProtocolError::wrong_phase(expected, observed));
        }

        let Some(side) = observed.acting_side() else {
            return Err(ProtocolError::wrong_phase(expected, observed));
        };

        match self.state.side(side).player {
            Some(seated) if seated == action.caller => Ok(()),
            // P2's open seat: the selection itself decides who may join.
            None => Ok(()),
            Some(_) => Err(ProtocolError::NotYourTurn {
                caller: action.caller,
                side,
                observed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, SelectFirstHero, SelectFirstTwoHeroes};
    use crate::error::{ErrorSeverity, GameError};
    use crate::state::{Hero, PlayerId, PlayerSecret};

    fn player(byte: u8) -> PlayerId {
        PlayerSecret::from_bytes([byte; 32]).player_id()
    }

    fn first_hero(caller: PlayerId) -> Action {
        Action::new(caller, SelectFirstHero { hero: Hero::default() }.into())
    }

    #[test]
    fn accepted_action_bumps_version() {
        let mut state = SharedMatchState::new(player(1));
        let outcome = GameEngine::new(&mut state).execute(&first_hero(player(1))).unwrap();

        assert_eq!(outcome.from, MatchPhase::SelectingP1First);
        assert_eq!(outcome.to, MatchPhase::SelectingP2First);
        assert_eq!(outcome.version, 1);
        assert_eq!(state.p1.heroes.len(), 1);
    }

    #[test]
    fn repeated_selection_is_a_phase_violation() {
        let mut state = SharedMatchState::new(player(1));
        GameEngine::new(&mut state).execute(&first_hero(player(1))).unwrap();
        let before = state.clone();

        let err = GameEngine::new(&mut state).execute(&first_hero(player(1))).unwrap_err();

        assert_eq!(err.expected, MatchPhase::SelectingP1First);
        assert_eq!(err.observed(), MatchPhase::SelectingP2First);
        assert_eq!(err.stage, TransitionPhase::PreValidate);
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(state, before);
    }

    #[test]
    fn wrong_caller_is_rejected() {
        let mut state = SharedMatchState::new(player(1));
        let err = GameEngine::new(&mut state).execute(&first_hero(player(2))).unwrap_err();

        assert!(matches!(err.error, ProtocolError::NotYourTurn { .. }));
        assert_eq!(state.version, 0);
    }

    #[test]
    fn first_p2_selection_takes_the_open_seat() {
        let mut state = SharedMatchState::new(player(1));
        GameEngine::new(&mut state).execute(&first_hero(player(1))).unwrap();

        let join = |caller| {
            Action::new(
                caller,
                ActionKind::from(SelectFirstTwoHeroes {
                    heroes: [Hero::default(); 2],
                }),
            )
        };

        let err = GameEngine::new(&mut state).execute(&join(player(1))).unwrap_err();
        assert_eq!(err.error, ProtocolError::SelfPlay);

        GameEngine::new(&mut state).execute(&join(player(2))).unwrap();
        assert_eq!(state.p2.player, Some(player(2)));
        assert!(!state.is_open());
    }
}
