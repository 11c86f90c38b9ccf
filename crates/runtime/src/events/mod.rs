//! Topic-based event bus for runtime events.
//!
//! This module provides a flexible event system where events are published to
//! specific topics, and consumers can subscribe only to the topics they need.
//! The per-match state stream is separate (see [`crate::RuntimeHandle::subscribe_state`]);
//! events describe what happened, the stream carries what the state now is.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{MatchEvent, ProtocolEvent};
