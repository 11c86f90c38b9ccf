//! Hero selection calls.
//!
//! Selection runs once per match in a fixed snake order so neither side
//! picks its whole roster with full knowledge of the other's:
//!
//! | Phase            | Call                   | Heroes |
//! |------------------|------------------------|--------|
//! | SelectingP1First | `SelectFirstHero`      | P1 +1  |
//! | SelectingP2First | `SelectFirstTwoHeroes` | P2 +2  |
//! | SelectingP1Last  | `SelectLastTwoHeroes`  | P1 +2  |
//! | SelectingP2Last  | `SelectLastHero`       | P2 +1  |
//!
//! P2's seat is taken by whoever makes the `SelectFirstTwoHeroes` call.

use crate::state::{Hero, MatchPhase, PlayerId, SharedMatchState, Side};

use super::{ActionTransition, ProtocolError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectFirstHero {
    pub hero: Hero,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectFirstTwoHeroes {
    pub heroes: [Hero; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectLastTwoHeroes {
    pub heroes: [Hero; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectLastHero {
    pub hero: Hero,
}

/// Appends heroes to a side's roster and advances the phase.
fn enlist(
    state: &mut SharedMatchState,
    side: Side,
    heroes: &[Hero],
    next: MatchPhase,
) -> Result<(), ProtocolError> {
    let context = state.context();
    state
        .side_mut(side)
        .heroes
        .try_extend_from_slice(heroes)
        .map_err(|_| ProtocolError::InvariantViolated {
            context,
            detail: "roster already full",
        })?;
    state.phase = next;
    Ok(())
}

impl ActionTransition for SelectFirstHero {
    type Output = ();

    fn expected_phase(&self) -> MatchPhase {
        MatchPhase::SelectingP1First
    }

    fn apply(&self, _caller: &PlayerId, state: &mut SharedMatchState) -> Result<(), ProtocolError> {
        enlist(state, Side::P1, &[self.hero], MatchPhase::SelectingP2First)
    }
}

impl ActionTransition for SelectFirstTwoHeroes {
    type Output = ();

    fn expected_phase(&self) -> MatchPhase {
        MatchPhase::SelectingP2First
    }

    fn pre_validate(&self, caller: &PlayerId, state: &SharedMatchState) -> Result<(), ProtocolError> {
        if state.p1.player.as_ref() == Some(caller) {
            return Err(ProtocolError::SelfPlay);
        }
        Ok(())
    }

    fn apply(&self, caller: &PlayerId, state: &mut SharedMatchState) -> Result<(), ProtocolError> {
        state.p2.player.get_or_insert(*caller);
        enlist(state, Side::P2, &self.heroes, MatchPhase::SelectingP1Last)
    }
}

impl ActionTransition for SelectLastTwoHeroes {
    type Output = ();

    fn expected_phase(&self) -> MatchPhase {
        MatchPhase::SelectingP1Last
    }

    fn apply(&self, _caller: &PlayerId, state: &mut SharedMatchState) -> Result<(), ProtocolError> {
        enlist(state, Side::P1, &self.heroes, MatchPhase::SelectingP2Last)
    }
}

impl ActionTransition for SelectLastHero {
    type Output = ();

    fn expected_phase(&self) -> MatchPhase {
        MatchPhase::SelectingP2Last
    }

    fn apply(&self, _caller: &PlayerId, state: &mut SharedMatchState) -> Result<(), ProtocolError> {
        enlist(state, Side::P2, &[self.hero], MatchPhase::P1Commit)
    }
}
