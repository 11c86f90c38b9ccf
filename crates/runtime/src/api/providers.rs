//! Asynchronous abstraction for sourcing a player's decisions.
//!
//! Runtime users plug in [`MoveProvider`] implementations so a seat can be
//! played by human input, scripted fixtures, or automated opponents. Providers
//! only decide; the calls are issued through a [`crate::PlayerSession`] like
//! any other player's.
use arena_core::{Hero, PlayerView, RoundCommand, RoundMoves, Stance};
use async_trait::async_trait;

use super::errors::Result;

/// Trait for choosing heroes and round moves from a player's view.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Practice opponents
/// - Scripted/replayed matches
/// - Testing fixtures
#[async_trait]
pub trait MoveProvider: Send {
    /// Choose `count` heroes for the selection call the view expects.
    async fn choose_heroes(&mut self, view: &PlayerView, count: usize) -> Result<Vec<Hero>>;

    /// Choose this round's moves. Living heroes must name an enemy slot.
    async fn choose_moves(&mut self, view: &PlayerView) -> Result<RoundMoves>;
}

/// A provider that fields fists-only heroes and has every living hero strike
/// the first living enemy from a neutral stance.
/// Useful for testing or as a fallback.
pub struct UnarmedProvider;

#[async_trait]
impl MoveProvider for UnarmedProvider {
    async fn choose_heroes(&mut self, _view: &PlayerView, count: usize) -> Result<Vec<Hero>> {
        Ok(vec![Hero::UNARMED; count])
    }

    async fn choose_moves(&mut self, view: &PlayerView) -> Result<RoundMoves> {
        let target = view
            .enemies
            .iter()
            .find(|enemy| enemy.alive)
            .map_or(0, |enemy| enemy.slot);
        let alive = view.allies_alive();

        Ok(RoundMoves::new(core::array::from_fn(|slot| {
            if alive[slot] {
                RoundCommand::new(target, Stance::Neutral)
            } else {
                RoundCommand::idle()
            }
        })))
    }
}
