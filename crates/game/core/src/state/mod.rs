//! Authoritative match state representation.
//!
//! This module owns the public, shared state of a match together with the
//! data types it is built from. Runtime layers clone or stream this state
//! but mutate it exclusively through the engine.
pub mod types;

use arrayvec::ArrayVec;

use crate::action::ProtocolError;
use crate::combat::Stance;
use crate::commit::{Commitment, Nonce};
use crate::config::GameConfig;
use crate::engine::RoundReport;
use crate::error::ErrorContext;

pub use types::{
    ArmorPiece, ArmorSlot, Hero, HeroBuilder, Item, MatchPhase, PlayerId, PlayerPrivateState,
    PlayerSecret, RoundCommand, RoundMoves, ShortId, Side,
};

const HEROES: usize = GameConfig::HEROES_PER_SIDE;

/// Heroes selected so far by one side, in slot order.
pub type Roster = ArrayVec<Hero, HEROES>;

/// Public state of one side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideState {
    /// Seated player. Only P2's seat can be empty, until P2's first selection.
    pub player: Option<PlayerId>,
    pub heroes: Roster,
    /// Damage accumulated per hero, `0..=MAX_HP`.
    pub damage: [u32; HEROES],
    /// Stance each hero used in the last resolved round.
    pub stances: [Stance; HEROES],
}

impl SideState {
    pub fn seated(player: PlayerId) -> Self {
        Self {
            player: Some(player),
            ..Self::default()
        }
    }

    /// A hero is alive iff its accumulated damage is below `MAX_HP`.
    pub fn is_alive(&self, hero: usize) -> bool {
        hero < self.heroes.len() && self.damage[hero] < GameConfig::MAX_HP
    }

    pub fn alive(&self) -> [bool; HEROES] {
        core::array::from_fn(|hero| self.is_alive(hero))
    }

    pub fn any_alive(&self) -> bool {
        (0..HEROES).any(|hero| self.is_alive(hero))
    }

    /// Remaining health of a hero.
    pub fn health(&self, hero: usize) -> u32 {
        GameConfig::MAX_HP.saturating_sub(self.damage[hero])
    }
}

/// Canonical snapshot of the shared match state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharedMatchState {
    pub phase: MatchPhase,

    /// Resolved rounds. Increases by exactly one per resolution.
    pub round: u32,

    /// Accepted actions so far, i.e. the position in the authority's log.
    ///
    /// Writers quote the version they observed; the authority rejects
    /// writes against any other version as stale.
    pub version: u64,

    pub p1: SideState,
    pub p2: SideState,

    /// P1's published digest. Present iff phase ∈ {P2CommitAndReveal, P1Reveal}.
    pub commitment: Option<Commitment>,

    /// Nonce published with the commitment, same presence rule.
    pub nonce: Option<Nonce>,

    /// P2's cleartext move. Present iff phase = P1Reveal.
    pub p2_moves: Option<RoundMoves>,

    /// Report of the most recently resolved round.
    pub last_round: Option<RoundReport>,
}

impl SharedMatchState {
    /// Creates a match seated by its creator as P1 with P2's seat open.
    pub fn new(creator: PlayerId) -> Self {
        Self {
            phase: MatchPhase::SelectingP1First,
            round: 0,
            version: 0,
            p1: SideState::seated(creator),
            p2: SideState::default(),
            commitment: None,
            nonce: None,
            p2_moves: None,
            last_round: None,
        }
    }

    /// Creates a match with both seats taken.
    pub fn with_players(p1: PlayerId, p2: PlayerId) -> Self {
        Self {
            p2: SideState::seated(p2),
            ..Self::new(p1)
        }
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::P1 => &self.p1,
            Side::P2 => &self.p2,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::P1 => &mut self.p1,
            Side::P2 => &mut self.p2,
        }
    }

    /// Seat held by `player`, if any.
    pub fn side_of(&self, player: &PlayerId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.side(*side).player.as_ref() == Some(player))
    }

    /// Returns true while P2's seat can still be taken.
    pub fn is_open(&self) -> bool {
        self.p2.player.is_none() && !self.phase.is_terminal()
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext::new(self.phase, self.round, self.version)
    }

    /// Checks the per-phase presence invariants.
    pub fn check_invariants(&self) -> Result<(), ProtocolError> {
        let violated = |detail: &'static str| {
            Err(ProtocolError::InvariantViolated {
                context: self.context(),
                detail,
            })
        };

        let [p1_size, p2_size] = self.phase.roster_sizes();
        if self.p1.heroes.len() != p1_size || self.p2.heroes.len() != p2_size {
            return violated("roster size does not match phase");
        }
        if self.p1.player.is_none() {
            return violated("p1 seat is empty");
        }
        if p2_size > 0 && self.p2.player.is_none() {
            return violated("p2 holds heroes without a seated player");
        }
        if self.p1.player.is_some() && self.p1.player == self.p2.player {
            return violated("both seats held by the same player");
        }

        let committed = matches!(
            self.phase,
            MatchPhase::P2CommitAndReveal | MatchPhase::P1Reveal
        );
        if self.commitment.is_some() != committed || self.nonce.is_some() != committed {
            return violated("commitment presence does not match phase");
        }
        if self.p2_moves.is_some() != (self.phase == MatchPhase::P1Reveal) {
            return violated("p2 move presence does not match phase");
        }

        let over_cap = [&self.p1, &self.p2]
            .iter()
            .any(|side| side.damage.iter().any(|damage| *damage > GameConfig::MAX_HP));
        if over_cap {
            return violated("damage accumulator above MAX_HP");
        }

        if self.phase.is_in_round() && !(self.p1.any_alive() && self.p2.any_alive()) {
            return violated("round phase with a defeated side");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(byte: u8) -> PlayerId {
        PlayerSecret::from_bytes([byte; 32]).player_id()
    }

    #[test]
    fn new_match_satisfies_invariants() {
        let state = SharedMatchState::new(player(1));
        assert!(state.check_invariants().is_ok());
        assert!(state.is_open());
        assert_eq!(state.side_of(&player(1)), Some(Side::P1));
        assert_eq!(state.side_of(&player(2)), None);
    }

    #[test]
    fn stray_commitment_breaks_invariants() {
        let mut state = SharedMatchState::new(player(1));
        state.commitment = Some(Commitment([0; 32]));

        assert!(matches!(
            state.check_invariants(),
            Err(ProtocolError::InvariantViolated { .. })
        ));
    }

    #[test]
    fn heroes_are_alive_below_max_hp() {
        let mut side = SideState::seated(player(1));
        side.heroes.push(Hero::default());
        side.heroes.push(Hero::default());
        side.damage = [GameConfig::MAX_HP - 1, GameConfig::MAX_HP, 0];

        assert_eq!(side.alive(), [true, false, false]);
        assert_eq!(side.health(0), 1);
        assert_eq!(side.health(1), 0);
    }
}
