//! File-based PrivateStateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use arena_core::PlayerPrivateState;

use crate::api::Result;
use crate::repository::{PrivateStateRepository, RepositoryError};

const EXTENSION: &str = "bin";

/// File-based implementation of PrivateStateRepository.
///
/// Stores each key as an individual bincode file.
///
/// # File Format
///
/// States are stored as `{key}.bin`. Writes go to `{key}.bin.tmp` first and
/// are renamed into place, so a crash never leaves a half-written state.
pub struct FilePrivateStore {
    base_dir: PathBuf,
}

impl FilePrivateStore {
    /// Create a new file-based store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a state file.
    fn state_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            && !key.starts_with('.');
        if !valid {
            return Err(RepositoryError::InvalidKey(key.to_owned()).into());
        }
        Ok(self.base_dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl PrivateStateRepository for FilePrivateStore {
    fn load(&self, key: &str) -> Result<Option<PlayerPrivateState>> {
        let path = self.state_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let state: PlayerPrivateState = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!(target: "arena::repository", key, "Loaded private state");

        Ok(Some(state))
    }

    fn save(&self, key: &str, state: &PlayerPrivateState) -> Result<()> {
        let path = self.state_path(key)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(target: "arena::repository", key, path = %path.display(), "Saved private state");

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.state_path(key)?;

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!(target: "arena::repository", key, "Deleted private state");
        }

        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION)
                && let Some(key) = path.file_stem().and_then(|stem| stem.to_str())
            {
                keys.push(key.to_owned());
            }
        }

        keys.sort_unstable();
        Ok(keys)
    }
}
