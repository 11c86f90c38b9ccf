//! Player-relative projection of a match.
//!
//! [`project`] merges shared state with one player's private state. The
//! viewer's seat is found by deriving its public id from the secret; the
//! same shared state projected for the two players yields mirrored
//! ally/enemy framing. Projection reads only.

use arrayvec::ArrayVec;

use crate::combat::Stance;
use crate::config::GameConfig;
use crate::engine::RoundReport;
use crate::state::{
    Hero, MatchPhase, PlayerId, PlayerPrivateState, RoundMoves, SharedMatchState, Side, SideState,
};
use crate::stats::{CombatStats, stats};

const HEROES: usize = GameConfig::HEROES_PER_SIDE;

/// Where the viewer sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seat {
    Player(Side),
    /// Not seated, but may take the open P2 seat.
    Open,
    Spectator,
}

impl Seat {
    pub fn side(self) -> Option<Side> {
        match self {
            Seat::Player(side) => Some(side),
            Seat::Open | Seat::Spectator => None,
        }
    }

    /// Side whose heroes are shown as allies.
    fn perspective(self) -> Side {
        match self {
            Seat::Player(side) => side,
            Seat::Open => Side::P2,
            Seat::Spectator => Side::P1,
        }
    }
}

/// Call the viewer is expected to make next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum NextCall {
    SelectFirstHero,
    SelectFirstTwoHeroes,
    SelectLastTwoHeroes,
    SelectLastHero,
    PublishCommitment,
    SubmitCleartextMove,
    DiscloseMove,
}

impl NextCall {
    /// Call accepted in `phase`, if any.
    pub const fn for_phase(phase: MatchPhase) -> Option<Self> {
        match phase {
            MatchPhase::SelectingP1First => Some(Self::SelectFirstHero),
            MatchPhase::SelectingP2First => Some(Self::SelectFirstTwoHeroes),
            MatchPhase::SelectingP1Last => Some(Self::SelectLastTwoHeroes),
            MatchPhase::SelectingP2Last => Some(Self::SelectLastHero),
            MatchPhase::P1Commit => Some(Self::PublishCommitment),
            MatchPhase::P2CommitAndReveal => Some(Self::SubmitCleartextMove),
            MatchPhase::P1Reveal => Some(Self::DiscloseMove),
            MatchPhase::P1Win | MatchPhase::P2Win | MatchPhase::Tie => None,
        }
    }

    /// Number of heroes a selection call picks.
    pub const fn heroes(self) -> usize {
        match self {
            Self::SelectFirstHero | Self::SelectLastHero => 1,
            Self::SelectFirstTwoHeroes | Self::SelectLastTwoHeroes => 2,
            _ => 0,
        }
    }
}

/// Result of a finished match for the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
    Tie,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroView {
    pub slot: u8,
    pub hero: Hero,
    pub stats: CombatStats,
    pub damage: u32,
    pub health: u32,
    pub alive: bool,
    pub stance: Stance,
}

impl HeroView {
    fn of(side: &SideState) -> ArrayVec<HeroView, HEROES> {
        side.heroes
            .iter()
            .enumerate()
            .map(|(slot, hero)| HeroView {
                slot: slot as u8,
                hero: *hero,
                stats: stats(hero),
                damage: side.damage[slot],
                health: side.health(slot),
                alive: side.is_alive(slot),
                stance: side.stances[slot],
            })
            .collect()
    }
}

/// A match as one player sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub me: PlayerId,
    pub seat: Seat,
    pub opponent: Option<PlayerId>,
    pub phase: MatchPhase,
    pub round: u32,
    pub version: u64,
    pub allies: ArrayVec<HeroView, HEROES>,
    pub enemies: ArrayVec<HeroView, HEROES>,
    /// Moves cached in the viewer's private state.
    pub my_pending: Option<RoundMoves>,
    /// Whether the viewer's commitment or cleartext move for this round is published.
    pub my_committed: bool,
    pub opponent_committed: bool,
    /// Opponent's move for this round, once published in the clear.
    pub opponent_moves: Option<RoundMoves>,
    pub last_round: Option<RoundReport>,
    pub next_call: Option<NextCall>,
    pub outcome: Option<Outcome>,
}

impl PlayerView {
    /// Returns true when the viewer should act now.
    pub fn my_turn(&self) -> bool {
        self.next_call.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Alive flags of the viewer's heroes, by slot.
    pub fn allies_alive(&self) -> [bool; HEROES] {
        core::array::from_fn(|slot| self.allies.get(slot).is_some_and(|hero| hero.alive))
    }
}

/// Projects shared state for the owner of `private`.
pub fn project(shared: &SharedMatchState, private: &PlayerPrivateState) -> PlayerView {
    let me = private.player_id();
    let seat = match shared.side_of(&me) {
        Some(side) => Seat::Player(side),
        None if shared.is_open() => Seat::Open,
        None => Seat::Spectator,
    };
    let mine = seat.perspective();
    let theirs = mine.opponent();

    let published = |side: Side| match side {
        Side::P1 => shared.commitment.is_some(),
        Side::P2 => shared.p2_moves.is_some(),
    };

    // P1's cleartext only ever appears inside the resolved round report.
    let opponent_moves = match theirs {
        Side::P2 => shared.p2_moves,
        Side::P1 => None,
    };

    let acting = shared.phase.acting_side() == Some(mine);
    let may_act = match seat {
        Seat::Player(_) => acting,
        Seat::Open => acting && shared.phase == MatchPhase::SelectingP2First,
        Seat::Spectator => false,
    };

    let outcome = match (seat, shared.phase) {
        (_, MatchPhase::Tie) if seat.side().is_some() => Some(Outcome::Tie),
        (Seat::Player(side), phase) => phase
            .winner()
            .map(|winner| if winner == side { Outcome::Won } else { Outcome::Lost }),
        _ => None,
    };

    PlayerView {
        me,
        seat,
        opponent: shared.side(theirs).player,
        phase: shared.phase,
        round: shared.round,
        version: shared.version,
        allies: HeroView::of(shared.side(mine)),
        enemies: HeroView::of(shared.side(theirs)),
        my_pending: seat.side().and(private.pending),
        my_committed: seat.side().is_some() && published(mine),
        opponent_committed: published(theirs),
        opponent_moves,
        last_round: shared.last_round.clone(),
        next_call: if may_act { NextCall::for_phase(shared.phase) } else { None },
        outcome,
    }
}
