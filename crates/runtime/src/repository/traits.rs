//! Repository contract for player-owned private state.

use arena_core::{PlayerId, PlayerPrivateState};

use crate::api::Result;
use crate::types::MatchId;

/// Key under which a player's private state for one match is stored.
pub fn private_key(match_id: MatchId, player: &PlayerId) -> String {
    format!("{}.{}", match_id.0, player)
}

/// Store for [`PlayerPrivateState`].
///
/// Each key has exactly one owner, the player it belongs to; keeping at most
/// one writer per key is the caller's responsibility.
pub trait PrivateStateRepository: Send + Sync {
    /// Load the state stored under `key`.
    fn load(&self, key: &str) -> Result<Option<PlayerPrivateState>>;

    /// Save `state` under `key`, replacing any previous value.
    fn save(&self, key: &str, state: &PlayerPrivateState) -> Result<()>;

    /// Delete the state under `key`. Missing keys are not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// List all stored keys in ascending order.
    fn list_keys(&self) -> Result<Vec<String>>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.load(key)?.is_some())
    }
}
