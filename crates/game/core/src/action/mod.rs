//! Action domain - the calls a player can make against a match.
//!
//! # Module Structure
//!
//! - `error`: Protocol errors raised while validating or applying a call
//! - `selection`: The four hero selection calls
//! - `round`: Commit, cleartext move and disclosure calls
//!
//! Every call implements [`ActionTransition`]; [`ActionKind`] is the closed
//! set the engine dispatches over.

pub mod error;
pub mod round;
pub mod selection;
mod transition;

pub use error::ProtocolError;
pub use round::{DiscloseMove, PublishCommitment, SubmitCleartextMove};
pub use selection::{SelectFirstHero, SelectFirstTwoHeroes, SelectLastHero, SelectLastTwoHeroes};
pub use transition::ActionTransition;

use crate::state::{MatchPhase, PlayerId};

/// Every call accepted by the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    SelectFirstHero(SelectFirstHero),
    SelectFirstTwoHeroes(SelectFirstTwoHeroes),
    SelectLastTwoHeroes(SelectLastTwoHeroes),
    SelectLastHero(SelectLastHero),
    PublishCommitment(PublishCommitment),
    SubmitCleartextMove(SubmitCleartextMove),
    DiscloseMove(DiscloseMove),
}

impl ActionKind {
    /// Stable snake_case name used in logs and errors.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Phase in which this call is accepted.
    pub fn expected_phase(&self) -> MatchPhase {
        match self {
            Self::SelectFirstHero(action) => action.expected_phase(),
            Self::SelectFirstTwoHeroes(action) => action.expected_phase(),
            Self::SelectLastTwoHeroes(action) => action.expected_phase(),
            Self::SelectLastHero(action) => action.expected_phase(),
            Self::PublishCommitment(action) => action.expected_phase(),
            Self::SubmitCleartextMove(action) => action.expected_phase(),
            Self::DiscloseMove(action) => action.expected_phase(),
        }
    }
}

/// A call together with the player making it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub caller: PlayerId,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(caller: PlayerId, kind: ActionKind) -> Self {
        Self { caller, kind }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

macro_rules! impl_into_kind {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ActionKind {
                fn from(action: $variant) -> Self {
                    Self::$variant(action)
                }
            }
        )*
    };
}

impl_into_kind!(
    SelectFirstHero,
    SelectFirstTwoHeroes,
    SelectLastTwoHeroes,
    SelectLastHero,
    PublishCommitment,
    SubmitCleartextMove,
    DiscloseMove,
);
