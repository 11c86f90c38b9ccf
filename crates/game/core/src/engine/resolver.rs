//! Round resolution.
//!
//! Both sides strike simultaneously. Every hit of a round is computed from
//! the state as it was before the round, then all hits are applied at once,
//! so a hero killed this round still lands its own blow. Death only keeps a
//! hero out of the *next* round.

use arrayvec::ArrayVec;

use crate::combat::{Stance, calculate_damage};
use crate::config::GameConfig;
use crate::state::{MatchPhase, RoundMoves, SharedMatchState, Side};
use crate::stats::{CombatStats, stats};

const HEROES: usize = GameConfig::HEROES_PER_SIDE;

/// One blow struck during a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    /// Side of the attacker.
    pub side: Side,
    pub attacker: u8,
    /// Enemy slot struck.
    pub target: u8,
    /// Damage from the damage model.
    pub damage: u32,
    /// Portion that landed before the target reached `MAX_HP`.
    pub applied: u32,
}

/// How a resolved round leaves the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RoundOutcome {
    Continue,
    P1Win,
    P2Win,
    Tie,
}

impl RoundOutcome {
    fn from_survivors(p1_alive: bool, p2_alive: bool) -> Self {
        match (p1_alive, p2_alive) {
            (true, true) => Self::Continue,
            (true, false) => Self::P1Win,
            (false, true) => Self::P2Win,
            (false, false) => Self::Tie,
        }
    }

    /// Phase the match moves to.
    pub const fn next_phase(self) -> MatchPhase {
        match self {
            Self::Continue => MatchPhase::P1Commit,
            Self::P1Win => MatchPhase::P1Win,
            Self::P2Win => MatchPhase::P2Win,
            Self::Tie => MatchPhase::Tie,
        }
    }
}

/// Everything that happened in one resolved round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    /// Number of this round, starting at 1.
    pub round: u32,
    /// Moves of both sides, `[p1, p2]`.
    pub moves: [RoundMoves; 2],
    pub hits: ArrayVec<Hit, { 2 * HEROES }>,
    /// Accumulated damage after the round, `[p1, p2]`.
    pub damage: [[u32; HEROES]; 2],
    /// Stances after the round, `[p1, p2]`.
    pub stances: [[Stance; HEROES]; 2],
    pub outcome: RoundOutcome,
}

impl RoundReport {
    pub fn hits_by(&self, side: Side) -> impl Iterator<Item = &Hit> {
        self.hits.iter().filter(move |hit| hit.side == side)
    }
}

/// Pre-round view of one side.
struct Snapshot {
    stats: [CombatStats; HEROES],
    alive: [bool; HEROES],
    /// Stances for this round: chosen ones for living heroes, previous otherwise.
    stances: [Stance; HEROES],
}

impl Snapshot {
    fn take(state: &SharedMatchState, side: Side, moves: &RoundMoves) -> Self {
        let side_state = state.side(side);
        let alive = side_state.alive();
        Self {
            stats: core::array::from_fn(|hero| {
                side_state.heroes.get(hero).map(stats).unwrap_or_default()
            }),
            alive,
            stances: core::array::from_fn(|hero| {
                if alive[hero] {
                    moves.0[hero].stance
                } else {
                    side_state.stances[hero]
                }
            }),
        }
    }
}

/// Resolves one round. Pure: `state` is only read.
///
/// `state` must be a match with full rosters; the caller applies the result
/// with [`apply_report`].
pub fn resolve_round(
    state: &SharedMatchState,
    p1_moves: &RoundMoves,
    p2_moves: &RoundMoves,
) -> RoundReport {
    let moves = [*p1_moves, *p2_moves];
    let snapshots = [
        Snapshot::take(state, Side::P1, p1_moves),
        Snapshot::take(state, Side::P2, p2_moves),
    ];

    let mut damage = [state.p1.damage, state.p2.damage];
    let mut hits = ArrayVec::new();

    for side in Side::BOTH {
        let attackers = &snapshots[side.index()];
        let defenders = &snapshots[side.opponent().index()];

        for (attacker, command) in moves[side.index()].commands().iter().enumerate() {
            if !attackers.alive[attacker] {
                continue;
            }
            // Living heroes always carry a slot; validation rejects the sentinel.
            let Some(target) = command.target_slot() else {
                continue;
            };

            let dealt = calculate_damage(
                &attackers.stats[attacker],
                attackers.stances[attacker],
                &defenders.stats[target],
                defenders.stances[target],
            );

            let accumulated = &mut damage[side.opponent().index()][target];
            let before = *accumulated;
            *accumulated = before.saturating_add(dealt).min(GameConfig::MAX_HP);

            hits.push(Hit {
                side,
                attacker: attacker as u8,
                target: target as u8,
                damage: dealt,
                applied: *accumulated - before,
            });
        }
    }

    let any_alive = |side: Side| damage[side.index()].iter().any(|d| *d < GameConfig::MAX_HP);

    RoundReport {
        round: state.round + 1,
        moves,
        hits,
        damage,
        stances: [snapshots[0].stances, snapshots[1].stances],
        outcome: RoundOutcome::from_survivors(any_alive(Side::P1), any_alive(Side::P2)),
    }
}

/// Writes a resolved round into shared state and closes the round.
pub fn apply_report(state: &mut SharedMatchState, report: &RoundReport) {
    for side in Side::BOTH {
        let side_state = state.side_mut(side);
        side_state.damage = report.damage[side.index()];
        side_state.stances = report.stances[side.index()];
    }

    state.round = report.round;
    state.commitment = None;
    state.nonce = None;
    state.p2_moves = None;
    state.phase = report.outcome.next_phase();
    state.last_round = Some(report.clone());
}
