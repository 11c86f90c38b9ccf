//! In-memory PrivateStateRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use arena_core::PlayerPrivateState;

use crate::api::Result;
use crate::repository::{PrivateStateRepository, RepositoryError};

/// In-memory implementation of PrivateStateRepository.
///
/// Contents are lost with the process, which is exactly the "client
/// restarted" case reconciliation exists for.
pub struct InMemoryPrivateStore {
    states: RwLock<HashMap<String, PlayerPrivateState>>,
}

impl InMemoryPrivateStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPrivateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivateStateRepository for InMemoryPrivateStore {
    fn load(&self, key: &str) -> Result<Option<PlayerPrivateState>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.get(key).cloned())
    }

    fn save(&self, key: &str, state: &PlayerPrivateState) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.insert(key.to_owned(), state.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut keys: Vec<String> = states.keys().cloned().collect();
        keys.sort_unstable();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{PlayerSecret, RoundMoves};

    use super::*;

    #[test]
    fn save_load_delete() {
        let store = InMemoryPrivateStore::new();
        let state = PlayerPrivateState::new(PlayerSecret::from_bytes([1; 32]))
            .with_pending(RoundMoves::default());

        store.save("b", &state).unwrap();
        store.save("a", &state).unwrap();

        assert_eq!(store.load("b").unwrap(), Some(state));
        assert_eq!(store.list_keys().unwrap(), vec!["a".to_owned(), "b".to_owned()]);

        store.delete("b").unwrap();
        assert!(!store.exists("b").unwrap());
        store.delete("missing").unwrap();
    }
}
