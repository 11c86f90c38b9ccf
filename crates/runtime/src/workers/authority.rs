//! Match authority worker that owns every [`arena_core::SharedMatchState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], executes calls via
//! [`arena_core::GameEngine`], streams snapshots over per-match `watch`
//! channels and publishes [`Event`]s on the bus. It is the only writer of
//! shared state; everyone else reads immutable snapshots.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info};

use arena_core::{
    Action, ErrorSeverity, ExecuteError, ExecutionOutcome, GameEngine, GameError, PlayerId,
    SharedMatchState,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, MatchEvent, ProtocolEvent};
use crate::types::{MatchId, MatchSummary, Precondition};

/// Snapshot stream of one match.
pub type StateStream = watch::Receiver<Arc<SharedMatchState>>;

/// Accepted submission together with the state it produced.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub match_id: MatchId,
    pub outcome: ExecutionOutcome,
    pub state: Arc<SharedMatchState>,
}

impl Receipt {
    /// Precondition a follow-up write from the same caller should quote.
    pub fn precondition(&self) -> Precondition {
        Precondition::of(&self.state)
    }
}

/// Commands that can be sent to the match authority
pub enum Command {
    /// Open a new match seated by `creator` as P1.
    CreateMatch {
        creator: PlayerId,
        reply: oneshot::Sender<(MatchId, Arc<SharedMatchState>)>,
    },
    /// Apply a call, provided the match still matches `expected`.
    Submit {
        match_id: MatchId,
        expected: Precondition,
        action: Action,
        reply: oneshot::Sender<Result<Receipt>>,
    },
    /// Read the current snapshot.
    Query {
        match_id: MatchId,
        reply: oneshot::Sender<Result<Arc<SharedMatchState>>>,
    },
    /// Open a snapshot stream. The receiver starts at the current state.
    Subscribe {
        match_id: MatchId,
        reply: oneshot::Sender<Result<StateStream>>,
    },
    /// List running matches with an open P2 seat.
    OpenMatches {
        reply: oneshot::Sender<Vec<MatchSummary>>,
    },
    /// List running matches `player` is seated in.
    MatchesFor {
        player: PlayerId,
        reply: oneshot::Sender<Vec<MatchSummary>>,
    },
}

struct MatchEntry {
    state: Arc<SharedMatchState>,
    stream: watch::Sender<Arc<SharedMatchState>>,
}

impl MatchEntry {
    fn new(state: SharedMatchState) -> Self {
        let state = Arc::new(state);
        let (stream, _) = watch::channel(Arc::clone(&state));
        Self { state, stream }
    }

    fn publish(&mut self, state: SharedMatchState) {
        self.state = Arc::new(state);
        // Keeps the last value even when nobody is subscribed.
        self.stream.send_replace(Arc::clone(&self.state));
    }
}

/// Background task that serializes every write to shared match state.
///
/// Finished matches stay queryable until more than `finished_retention`
/// of them have piled up; the oldest are evicted first.
pub struct AuthorityWorker {
    matches: BTreeMap<MatchId, MatchEntry>,
    finished: VecDeque<MatchId>,
    finished_retention: usize,
    next_id: u64,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl AuthorityWorker {
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        finished_retention: usize,
    ) -> Self {
        Self {
            matches: BTreeMap::new(),
            finished: VecDeque::new(),
            finished_retention,
            next_id: 1,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every command sender is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "arena::authority", matches = self.matches.len(), "Match authority stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::CreateMatch { creator, reply } => {
                let created = self.create_match(creator);
                let _ = reply.send(created);
            }
            Command::Submit {
                match_id,
                expected,
                action,
                reply,
            } => {
                let result = self.submit(match_id, expected, action);
                let _ = reply.send(result);
            }
            Command::Query { match_id, reply } => {
                let result = self.entry(match_id).map(|entry| Arc::clone(&entry.state));
                let _ = reply.send(result);
            }
            Command::Subscribe { match_id, reply } => {
                let result = self.entry(match_id).map(|entry| entry.stream.subscribe());
                let _ = reply.send(result);
            }
            Command::OpenMatches { reply } => {
                let _ = reply.send(self.summaries(|state| state.is_open()));
            }
            Command::MatchesFor { player, reply } => {
                let _ = reply.send(self.summaries(|state| {
                    !state.phase.is_terminal() && state.side_of(&player).is_some()
                }));
            }
        }
    }

    fn entry(&self, match_id: MatchId) -> Result<&MatchEntry> {
        self.matches
            .get(&match_id)
            .ok_or(RuntimeError::MatchNotFound(match_id))
    }

    fn summaries(&self, filter: impl Fn(&SharedMatchState) -> bool) -> Vec<MatchSummary> {
        self.matches
            .iter()
            .filter(|(_, entry)| filter(entry.state.as_ref()))
            .map(|(id, entry)| MatchSummary::of(*id, &entry.state))
            .collect()
    }

    fn create_match(&mut self, creator: PlayerId) -> (MatchId, Arc<SharedMatchState>) {
        let match_id = MatchId(self.next_id);
        self.next_id += 1;

        let entry = MatchEntry::new(SharedMatchState::new(creator));
        let state = Arc::clone(&entry.state);
        self.matches.insert(match_id, entry);

        info!(
            target: "arena::authority",
            %match_id,
            creator = %creator.short(),
            "Match created"
        );
        self.event_bus.publish(MatchEvent::Created {
            summary: MatchSummary::of(match_id, &state),
        });

        (match_id, state)
    }

    fn submit(
        &mut self,
        match_id: MatchId,
        expected: Precondition,
        action: Action,
    ) -> Result<Receipt> {
        let entry = self
            .matches
            .get_mut(&match_id)
            .ok_or(RuntimeError::MatchNotFound(match_id))?;

        if !expected.holds(&entry.state) {
            let error = RuntimeError::StaleWrite {
                match_id,
                expected: expected.phase,
                observed: entry.state.phase,
                expected_version: expected.version,
                observed_version: entry.state.version,
            };
            debug!(
                target: "arena::authority",
                %match_id,
                action = action.name(),
                expected = %expected.phase,
                observed = %entry.state.phase,
                expected_version = expected.version,
                observed_version = entry.state.version,
                "Stale write rejected"
            );
            publish_rejection(&self.event_bus, match_id, &action, expected, &entry.state, &error);
            return Err(error);
        }

        let mut working = SharedMatchState::clone(&entry.state);
        let outcome = match GameEngine::new(&mut working).execute(&action) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                log_rejection(match_id, &action, &rejection);
                let error = RuntimeError::Rejected(rejection);
                publish_rejection(&self.event_bus, match_id, &action, expected, &entry.state, &error);
                return Err(error);
            }
        };

        entry.publish(working);
        let state = Arc::clone(&entry.state);

        debug!(
            target: "arena::authority",
            %match_id,
            action = outcome.action,
            caller = %action.caller.short(),
            from = %outcome.from,
            to = %outcome.to,
            version = outcome.version,
            "Action accepted"
        );
        self.event_bus.publish(MatchEvent::ActionAccepted {
            match_id,
            action: outcome.action.to_owned(),
            caller: action.caller,
            from: outcome.from,
            to: outcome.to,
            version: outcome.version,
        });

        if let Some(report) = &outcome.report {
            info!(
                target: "arena::authority",
                %match_id,
                round = report.round,
                outcome = %report.outcome,
                p1_damage = ?report.damage[0],
                p2_damage = ?report.damage[1],
                "Round resolved"
            );
            self.event_bus.publish(MatchEvent::RoundResolved {
                match_id,
                report: Box::new(report.clone()),
            });
        }

        if state.phase.is_terminal() {
            info!(
                target: "arena::authority",
                %match_id,
                phase = %state.phase,
                round = state.round,
                "Match finished"
            );
            self.event_bus.publish(MatchEvent::Finished {
                match_id,
                phase: state.phase,
                round: state.round,
            });
            self.retire(match_id);
        }

        Ok(Receipt {
            match_id,
            outcome,
            state,
        })
    }

    fn retire(&mut self, match_id: MatchId) {
        self.finished.push_back(match_id);
        while self.finished.len() > self.finished_retention {
            let Some(evicted) = self.finished.pop_front() else {
                break;
            };
            self.matches.remove(&evicted);
            debug!(target: "arena::authority", match_id = %evicted, "Evicted finished match");
        }
    }
}

fn log_rejection(match_id: MatchId, action: &Action, rejection: &ExecuteError) {
    if rejection.severity() == ErrorSeverity::Validation {
        debug!(
            target: "arena::authority",
            %match_id,
            action = rejection.action,
            stage = %rejection.stage,
            expected = %rejection.expected,
            observed = %rejection.observed(),
            version = rejection.context.version,
            error = %rejection.error,
            "Action rejected"
        );
    } else {
        error!(
            target: "arena::authority",
            %match_id,
            action = rejection.action,
            caller = %action.caller.short(),
            stage = %rejection.stage,
            code = rejection.error_code(),
            severity = rejection.severity().as_str(),
            round = rejection.context.round,
            error = %rejection.error,
            "Action failed verification"
        );
    }
}

fn publish_rejection(
    bus: &EventBus,
    match_id: MatchId,
    action: &Action,
    expected: Precondition,
    observed: &SharedMatchState,
    error: &RuntimeError,
) {
    bus.publish(Event::Protocol(ProtocolEvent::Rejected {
        match_id,
        action: action.name().to_owned(),
        caller: action.caller,
        expected: match error {
            RuntimeError::Rejected(rejection) => rejection.expected,
            _ => expected.phase,
        },
        observed: observed.phase,
        error: error.to_string(),
        retryable: error.is_retryable(),
        severity: error.severity(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    use arena_core::{MatchPhase, PlayerSecret};

    fn worker(finished_retention: usize) -> AuthorityWorker {
        let (_tx, rx) = mpsc::channel(1);
        AuthorityWorker::new(rx, EventBus::new(), finished_retention)
    }

    fn finish(worker: &mut AuthorityWorker, byte: u8) -> MatchId {
        let creator = PlayerSecret::from_bytes([byte; 32]).player_id();
        let (match_id, state) = worker.create_match(creator);
        let mut state = SharedMatchState::clone(&state);
        state.phase = MatchPhase::Tie;
        if let Some(entry) = worker.matches.get_mut(&match_id) {
            entry.publish(state);
        }
        worker.retire(match_id);
        match_id
    }

    #[test]
    fn oldest_finished_matches_are_evicted_past_retention() {
        let mut worker = worker(2);
        let running = worker.create_match(PlayerSecret::from_bytes([9; 32]).player_id()).0;
        let first = finish(&mut worker, 1);
        let second = finish(&mut worker, 2);
        assert!(worker.entry(first).is_ok());

        let third = finish(&mut worker, 3);
        assert!(matches!(worker.entry(first), Err(RuntimeError::MatchNotFound(id)) if id == first));
        assert!(worker.entry(second).is_ok());
        assert!(worker.entry(third).is_ok());
        assert!(worker.entry(running).is_ok());
    }

    #[test]
    fn zero_retention_drops_matches_as_they_finish() {
        let mut worker = worker(0);
        let finished = finish(&mut worker, 1);

        assert!(worker.entry(finished).is_err());
        assert!(worker.finished.is_empty());
        assert!(worker.matches.is_empty());
    }
}
