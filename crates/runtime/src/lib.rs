//! Runtime orchestration for commit-reveal arena matches.
//!
//! This crate wires the deterministic rules of `arena-core` into an async
//! runtime: a single-writer match authority, per-match state streams, a
//! topic-based event bus, private-state repositories, the player session
//! call surface and automated practice opponents. Consumers embed
//! [`Runtime`] and drive matches through [`RuntimeHandle`] and
//! [`PlayerSession`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`session`] is one player's seat in one match
//! - [`providers`] holds automated players
//! - [`repository`] stores player-owned private state
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod providers;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod types;

mod workers;

pub use api::{MoveProvider, Result, RuntimeError, RuntimeHandle, UnarmedProvider};
pub use events::{Event, EventBus, MatchEvent, ProtocolEvent, Topic};
pub use providers::{PracticeOpponent, PracticeProvider};
pub use repository::{
    FilePrivateStore, InMemoryPrivateStore, PrivateStateRepository, RepositoryError, private_key,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::PlayerSession;
pub use types::{MatchId, MatchSummary, Precondition};
pub use workers::{Receipt, StateStream};
