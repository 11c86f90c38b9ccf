//! High-level runtime orchestrator.
//!
//! The runtime owns the match authority worker, wires up command/event
//! channels, and exposes a builder-based API for clients to host matches.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use arena_core::GameConfig;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::{FilePrivateStore, InMemoryPrivateStore, PrivateStateRepository};
use crate::workers::AuthorityWorker;

/// Parses the value `lookup` returns for `key`, ignoring unparseable values.
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable environment value");
            None
        }
    }
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Seed for practice opponents. `None` draws from OS entropy.
    pub practice_seed: Option<u64>,
    /// Directory of the file-backed private-state store. `None` keeps
    /// private state in memory.
    pub data_dir: Option<PathBuf>,
    /// Finished matches the authority keeps queryable before evicting the
    /// oldest one.
    pub finished_retention: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            practice_seed: None,
            data_dir: None,
            finished_retention: 64,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `ARENA_*` environment variables.
    ///
    /// - `ARENA_EVENT_BUFFER`: event bus capacity per topic
    /// - `ARENA_COMMAND_BUFFER`: authority command queue capacity
    /// - `ARENA_PRACTICE_SEED`: practice opponent seed
    /// - `ARENA_DATA_DIR`: file-backed private-state directory
    /// - `ARENA_ROUND_LIMIT`: rounds before automated players give up
    /// - `ARENA_FINISHED_RETENTION`: finished matches kept queryable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            game_config: parse_var(&lookup, "ARENA_ROUND_LIMIT")
                .map(GameConfig::with_round_limit)
                .unwrap_or(defaults.game_config),
            event_buffer_size: parse_var::<usize>(&lookup, "ARENA_EVENT_BUFFER")
                .unwrap_or(defaults.event_buffer_size)
                .max(1),
            command_buffer_size: parse_var::<usize>(&lookup, "ARENA_COMMAND_BUFFER")
                .unwrap_or(defaults.command_buffer_size)
                .max(1),
            practice_seed: parse_var(&lookup, "ARENA_PRACTICE_SEED"),
            data_dir: lookup("ARENA_DATA_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            finished_retention: parse_var(&lookup, "ARENA_FINISHED_RETENTION")
                .unwrap_or(defaults.finished_retention),
        }
    }

    /// Opens the private-state store this configuration names.
    pub fn private_store(&self) -> Result<Arc<dyn PrivateStateRepository>> {
        let store: Arc<dyn PrivateStateRepository> = match &self.data_dir {
            Some(dir) => Arc::new(FilePrivateStore::new(dir)?),
            None => Arc::new(InMemoryPrivateStore::new()),
        };
        Ok(store)
    }
}

/// Main runtime that hosts matches.
///
/// Design: Runtime owns the authority worker.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    config: RuntimeConfig,

    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Background worker
    authority_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Shutdown the runtime gracefully
    ///
    /// The authority stops once every handle, including clones held by
    /// sessions, has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.authority_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the runtime and spawn the authority worker
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Runtime {
        let config = self.config;
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let worker = AuthorityWorker::new(command_rx, event_bus.clone(), config.finished_retention);
        let authority_handle = tokio::spawn(worker.run());

        Runtime {
            config,
            handle: RuntimeHandle::new(command_tx, event_bus),
            authority_handle,
        }
    }
}
