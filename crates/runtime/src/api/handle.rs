//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! creating matches, submitting calls, reading snapshots and streaming events
//! from specific topics.
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use arena_core::{Action, PlayerId, SharedMatchState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::types::{MatchId, MatchSummary, Precondition};
use crate::workers::{Command, Receipt, StateStream};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Open a match with `creator` in the P1 seat.
    pub async fn create_match(
        &self,
        creator: PlayerId,
    ) -> Result<(MatchId, Arc<SharedMatchState>)> {
        self.request(|reply| Command::CreateMatch { creator, reply })
            .await
    }

    /// Submit a call against the state the caller last observed.
    ///
    /// Fails with [`RuntimeError::StaleWrite`] if the match moved on since
    /// `expected` was taken, and with [`RuntimeError::Rejected`] if the engine
    /// refuses the call. Either way the match is left untouched.
    pub async fn submit(
        &self,
        match_id: MatchId,
        expected: Precondition,
        action: Action,
    ) -> Result<Receipt> {
        self.request(|reply| Command::Submit {
            match_id,
            expected,
            action,
            reply,
        })
        .await?
    }

    /// Query the current match state (read-only snapshot)
    pub async fn query(&self, match_id: MatchId) -> Result<Arc<SharedMatchState>> {
        self.request(|reply| Command::Query { match_id, reply })
            .await?
    }

    /// Stream of snapshots of one match, starting with the current one.
    pub async fn subscribe_state(&self, match_id: MatchId) -> Result<StateStream> {
        self.request(|reply| Command::Subscribe { match_id, reply })
            .await?
    }

    /// Running matches whose P2 seat can still be taken.
    pub async fn open_matches(&self) -> Result<Vec<MatchSummary>> {
        self.request(|reply| Command::OpenMatches { reply }).await
    }

    /// Running matches `player` is seated in.
    pub async fn matches_for(&self, player: PlayerId) -> Result<Vec<MatchSummary>> {
        self.request(|reply| Command::MatchesFor { player, reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Match` - Match creation, accepted calls, resolved rounds
    /// - `Topic::Protocol` - Rejected calls, including stale writes
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use arena_runtime::Topic;
    ///
    /// let mut rx = handle.subscribe(Topic::Match);
    /// while let Ok(event) = rx.recv().await {
    ///     // Handle match events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
