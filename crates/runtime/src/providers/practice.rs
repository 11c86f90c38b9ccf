//! Automated practice opponent.
//!
//! [`PracticeProvider`] decides; [`PracticeOpponent`] is the actor that
//! watches the match and plays the decisions through an ordinary
//! [`PlayerSession`]. It has no access to the other player's private state
//! and no shortcut into the authority.

use arena_core::{
    ArmorPiece, GameConfig, Hero, Item, NextCall, PlayerView, RoundCommand, RoundMoves, Stance,
};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::{MoveProvider, Result, RuntimeError};
use crate::session::PlayerSession;

const fn loadout(left: Item, right: Item, armor: ArmorPiece, chest: ArmorPiece) -> Hero {
    Hero {
        left_hand: left,
        right_hand: right,
        helmet: armor,
        chest,
        skirt: armor,
        greaves: armor,
    }
}

/// Loadouts the practice opponent drafts from.
const ROSTER: [Hero; 6] = [
    loadout(Item::Sword, Item::Shield, ArmorPiece::Metal, ArmorPiece::Metal),
    loadout(Item::Axe, Item::Axe, ArmorPiece::Leather, ArmorPiece::Metal),
    loadout(Item::Bow, Item::None, ArmorPiece::Leather, ArmorPiece::Leather),
    loadout(Item::Spear, Item::Shield, ArmorPiece::None, ArmorPiece::Leather),
    loadout(Item::Sword, Item::Sword, ArmorPiece::None, ArmorPiece::None),
    loadout(Item::Spear, Item::None, ArmorPiece::Leather, ArmorPiece::Metal),
];

/// Odds (one in N) of striking a random living enemy instead of the weakest.
const FEINT_ODDS: u32 = 4;

/// Seeded decision policy for practice matches.
///
/// Focuses fire on the weakest living enemy and shifts each hero's stance
/// with its remaining health: aggressive while healthy, defensive when hurt.
pub struct PracticeProvider {
    rng: StdRng,
}

impl PracticeProvider {
    /// Creates a provider; `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    fn stance_for(health: u32) -> Stance {
        if health * 3 > GameConfig::MAX_HP * 2 {
            Stance::Aggressive
        } else if health * 3 > GameConfig::MAX_HP {
            Stance::Neutral
        } else {
            Stance::Defensive
        }
    }

    fn pick_target(&mut self, view: &PlayerView) -> u8 {
        let living: Vec<_> = view.enemies.iter().filter(|enemy| enemy.alive).collect();
        if living.is_empty() {
            return 0;
        }

        if self.rng.gen_range(0..FEINT_ODDS) == 0 {
            return living[self.rng.gen_range(0..living.len())].slot;
        }

        living
            .iter()
            .min_by_key(|enemy| (enemy.health, enemy.slot))
            .map_or(0, |enemy| enemy.slot)
    }
}

#[async_trait]
impl MoveProvider for PracticeProvider {
    async fn choose_heroes(&mut self, _view: &PlayerView, count: usize) -> Result<Vec<Hero>> {
        Ok((0..count)
            .map(|_| ROSTER[self.rng.gen_range(0..ROSTER.len())])
            .collect())
    }

    async fn choose_moves(&mut self, view: &PlayerView) -> Result<RoundMoves> {
        let target = self.pick_target(view);
        let mut commands = [RoundCommand::idle(); GameConfig::HEROES_PER_SIDE];
        for ally in view.allies.iter().filter(|ally| ally.alive) {
            commands[ally.slot as usize] = RoundCommand::new(target, Self::stance_for(ally.health));
        }
        Ok(RoundMoves::new(commands))
    }
}

/// Independent task that plays one seat of a match.
///
/// Reacts to the state stream: whenever the projected view says it is this
/// seat's turn, asks its provider and issues the matching session call.
pub struct PracticeOpponent<P> {
    session: PlayerSession,
    provider: P,
    round_limit: u32,
}

impl<P: MoveProvider + 'static> PracticeOpponent<P> {
    pub fn new(session: PlayerSession, provider: P) -> Self {
        Self {
            session,
            provider,
            round_limit: GameConfig::DEFAULT_ROUND_LIMIT,
        }
    }

    pub fn with_round_limit(mut self, round_limit: u32) -> Self {
        self.round_limit = round_limit;
        self
    }

    /// Runs the opponent on its own tokio task.
    pub fn spawn(self) -> JoinHandle<Result<PlayerView>> {
        tokio::spawn(self.run())
    }

    /// Plays until the match is over and returns the final view.
    pub async fn run(mut self) -> Result<PlayerView> {
        let match_id = self.session.match_id();
        let mut stream = self.session.subscribe().await?;

        loop {
            let snapshot = Arc::clone(&stream.borrow_and_update());
            self.session.observe(snapshot);
            let view = self.session.current_view()?;

            if view.is_over() {
                info!(
                    target: "arena::practice",
                    %match_id,
                    phase = %view.phase,
                    round = view.round,
                    outcome = ?view.outcome,
                    "Practice match over"
                );
                return Ok(view);
            }

            if view.round >= self.round_limit {
                return Err(RuntimeError::RoundLimit {
                    match_id,
                    limit: self.round_limit,
                });
            }

            if view.my_turn() {
                match self.act(&view).await {
                    Ok(()) => {}
                    // The match moved on; the stream delivers the newer state.
                    Err(err) if err.is_retryable() => {
                        debug!(target: "arena::practice", %match_id, error = %err, "Retrying on fresh state");
                    }
                    Err(err) => return Err(err),
                }
            }

            if stream.changed().await.is_err() {
                return Err(RuntimeError::StreamClosed(match_id));
            }
        }
    }

    async fn act(&mut self, view: &PlayerView) -> Result<()> {
        let Some(call) = view.next_call else {
            return Ok(());
        };
        debug!(
            target: "arena::practice",
            match_id = %self.session.match_id(),
            call = %call,
            round = view.round,
            version = view.version,
            "Acting"
        );

        match call {
            NextCall::SelectFirstHero => {
                let [hero] = self.heroes(view).await?;
                self.session.select_first_hero(hero).await?;
            }
            NextCall::SelectFirstTwoHeroes => {
                let heroes = self.heroes(view).await?;
                self.session.select_first_two_heroes(heroes).await?;
            }
            NextCall::SelectLastTwoHeroes => {
                let heroes = self.heroes(view).await?;
                self.session.select_last_two_heroes(heroes).await?;
            }
            NextCall::SelectLastHero => {
                let [hero] = self.heroes(view).await?;
                self.session.select_last_hero(hero).await?;
            }
            NextCall::PublishCommitment => {
                let moves = self.provider.choose_moves(view).await?;
                self.session.set_pending_moves(moves)?;
                self.session.publish_commitment().await?;
            }
            NextCall::SubmitCleartextMove => {
                let moves = self.provider.choose_moves(view).await?;
                self.session.submit_cleartext_move(moves).await?;
            }
            NextCall::DiscloseMove => {
                self.session.disclose_move().await?;
            }
        }
        Ok(())
    }

    async fn heroes<const N: usize>(&mut self, view: &PlayerView) -> Result<[Hero; N]> {
        let heroes = self.provider.choose_heroes(view, N).await?;
        let found = heroes.len();
        heroes
            .try_into()
            .map_err(|_| RuntimeError::ProviderChoice { expected: N, found })
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{PlayerPrivateState, PlayerSecret, SharedMatchState, project};

    use super::*;

    fn midgame_view() -> PlayerView {
        let p1 = PlayerSecret::from_bytes([1; 32]);
        let p2 = PlayerSecret::from_bytes([2; 32]);
        let mut state = SharedMatchState::with_players(p1.player_id(), p2.player_id());
        for side in [&mut state.p1, &mut state.p2] {
            side.heroes.extend([Hero::UNARMED; 3]);
        }
        state.phase = arena_core::MatchPhase::P1Commit;
        state.p1.damage = [0, 150, 290];
        state.p2.damage = [100, GameConfig::MAX_HP, 250];

        project(&state, &PlayerPrivateState::new(p1))
    }

    #[tokio::test]
    async fn stances_follow_health_and_dead_heroes_idle() {
        let view = midgame_view();
        let moves = PracticeProvider::new(Some(3))
            .choose_moves(&view)
            .await
            .unwrap();

        assert_eq!(
            moves.stances(),
            [Stance::Aggressive, Stance::Neutral, Stance::Defensive]
        );
        assert!(moves.validate(&view.allies_alive()).is_ok());
        assert!(moves.targets().iter().all(|target| *target != 1));
    }

    #[tokio::test]
    async fn same_seed_same_decisions() {
        let view = midgame_view();
        let mut a = PracticeProvider::new(Some(42));
        let mut b = PracticeProvider::new(Some(42));

        for _ in 0..16 {
            assert_eq!(
                a.choose_moves(&view).await.unwrap(),
                b.choose_moves(&view).await.unwrap()
            );
            assert_eq!(
                a.choose_heroes(&view, 2).await.unwrap(),
                b.choose_heroes(&view, 2).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn weakest_enemy_is_the_usual_target() {
        let view = midgame_view();
        let mut provider = PracticeProvider::new(Some(7));
        let mut focused = 0;
        for _ in 0..64 {
            if provider.choose_moves(&view).await.unwrap().targets()[0] == 2 {
                focused += 1;
            }
        }
        assert!(focused > 32, "focused {focused} of 64");
    }
}
