//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{MatchEvent, ProtocolEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Match lifecycle (creation, accepted actions, resolved rounds)
    Match,
    /// Rejected calls
    Protocol,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Match(MatchEvent),
    Protocol(ProtocolEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Match(_) => Topic::Match,
            Event::Protocol(_) => Topic::Protocol,
        }
    }
}

impl From<MatchEvent> for Event {
    fn from(event: MatchEvent) -> Self {
        Event::Match(event)
    }
}

impl From<ProtocolEvent> for Event {
    fn from(event: ProtocolEvent) -> Self {
        Event::Protocol(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Delivery is best-effort: slow subscribers lag and
/// events published with no subscriber are dropped.
#[derive(Clone)]
pub struct EventBus {
    match_tx: broadcast::Sender<Event>,
    protocol_tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            match_tx: broadcast::channel(capacity).0,
            protocol_tx: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Match => &self.match_tx,
            Topic::Protocol => &self.protocol_tx,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{PlayerSecret, SharedMatchState};

    use super::*;
    use crate::types::{MatchId, MatchSummary};

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut matches = bus.subscribe(Topic::Match);
        let mut protocol = bus.subscribe(Topic::Protocol);

        let creator = PlayerSecret::from_bytes([1; 32]).player_id();
        let summary = MatchSummary::of(MatchId(7), &SharedMatchState::new(creator));
        bus.publish(MatchEvent::Created { summary });

        let Event::Match(MatchEvent::Created { summary }) = matches.recv().await.unwrap() else {
            panic!("expected a created event");
        };
        assert_eq!(summary.match_id, MatchId(7));
        assert!(protocol.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::default();
        let creator = PlayerSecret::from_bytes([1; 32]).player_id();
        let summary = MatchSummary::of(MatchId(1), &SharedMatchState::new(creator));
        bus.publish(MatchEvent::Created { summary });
    }
}
