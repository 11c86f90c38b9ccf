//! One player's seat in one match.
//!
//! [`PlayerSession`] is the call surface a client drives: the four selection
//! calls, the commit/reveal calls and the private-state accessors. It keeps
//! the last snapshot it observed and quotes it on every write, so a session
//! acting on an outdated view gets [`RuntimeError::StaleWrite`] back instead
//! of overwriting someone else's progress.
//!
//! Private state goes through a [`PrivateStateRepository`] on every call. A
//! session rebuilt after a restart therefore picks up whatever the store
//! still holds, and falls back to reconciliation for a move that was
//! committed but never saved.

use std::sync::Arc;

use rand::RngCore;
use tracing::{debug, error, warn};

use arena_core::commit::{self, Blinding};
use arena_core::{
    Action, ActionKind, DiscloseMove, Hero, MatchPhase, Nonce, PlayerId, PlayerPrivateState,
    PlayerSecret, PlayerView, PublishCommitment, RoundMoves, SelectFirstHero,
    SelectFirstTwoHeroes, SelectLastHero, SelectLastTwoHeroes, SharedMatchState, Side,
    SubmitCleartextMove, project,
};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::repository::{PrivateStateRepository, private_key};
use crate::types::{MatchId, Precondition};
use crate::workers::{Receipt, StateStream};

/// Draws a nonce from the thread RNG.
fn fresh_nonce() -> Nonce {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Nonce::from_bytes(bytes)
}

pub struct PlayerSession {
    handle: RuntimeHandle,
    store: Arc<dyn PrivateStateRepository>,
    secret: PlayerSecret,
    player: PlayerId,
    match_id: MatchId,
    key: String,
    snapshot: Arc<SharedMatchState>,
}

impl PlayerSession {
    /// Opens a new match and takes its P1 seat.
    pub async fn create_match(
        handle: RuntimeHandle,
        store: Arc<dyn PrivateStateRepository>,
        secret: PlayerSecret,
    ) -> Result<Self> {
        let player = secret.player_id();
        let (match_id, snapshot) = handle.create_match(player).await?;
        let key = private_key(match_id, &player);
        store.save(&key, &PlayerPrivateState::new(secret.clone()))?;

        debug!(target: "arena::session", %match_id, player = %player.short(), "Created match");

        Ok(Self {
            handle,
            store,
            secret,
            player,
            match_id,
            key,
            snapshot,
        })
    }

    /// Attaches to an existing match.
    ///
    /// Works both for a seated player reconnecting and for a newcomer eyeing
    /// the open P2 seat; the seat itself is only taken by the first P2
    /// selection. Anything the store already holds for this player is kept.
    pub async fn join(
        handle: RuntimeHandle,
        store: Arc<dyn PrivateStateRepository>,
        secret: PlayerSecret,
        match_id: MatchId,
    ) -> Result<Self> {
        let player = secret.player_id();
        let snapshot = handle.query(match_id).await?;
        if snapshot.side_of(&player).is_none() && !snapshot.is_open() {
            return Err(RuntimeError::NotInMatch { match_id, player });
        }

        let key = private_key(match_id, &player);
        if !store.exists(&key)? {
            store.save(&key, &PlayerPrivateState::new(secret.clone()))?;
        }

        debug!(
            target: "arena::session",
            %match_id,
            player = %player.short(),
            phase = %snapshot.phase,
            version = snapshot.version,
            "Joined match"
        );

        Ok(Self {
            handle,
            store,
            secret,
            player,
            match_id,
            key,
            snapshot,
        })
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn player_id(&self) -> PlayerId {
        self.player
    }

    /// Last snapshot this session observed.
    pub fn snapshot(&self) -> &Arc<SharedMatchState> {
        &self.snapshot
    }

    /// Precondition the next write will quote.
    pub fn precondition(&self) -> Precondition {
        Precondition::of(&self.snapshot)
    }

    /// Records a snapshot delivered from elsewhere, e.g. the state stream.
    ///
    /// Older snapshots than the one already held are ignored.
    pub fn observe(&mut self, snapshot: Arc<SharedMatchState>) {
        if snapshot.version >= self.snapshot.version {
            self.snapshot = snapshot;
        }
    }

    /// Fetches the current snapshot from the authority.
    pub async fn refresh(&mut self) -> Result<Arc<SharedMatchState>> {
        let snapshot = self.handle.query(self.match_id).await?;
        self.observe(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Refreshes and projects the match for this player.
    pub async fn view(&mut self) -> Result<PlayerView> {
        self.refresh().await?;
        self.current_view()
    }

    /// Projects the last observed snapshot without asking the authority.
    pub fn current_view(&self) -> Result<PlayerView> {
        Ok(project(&self.snapshot, &self.get_private_state()?))
    }

    /// Snapshot stream of this match.
    pub async fn subscribe(&self) -> Result<StateStream> {
        self.handle.subscribe_state(self.match_id).await
    }

    /// Reads this player's private state from the store.
    ///
    /// A missing entry yields a fresh state with nothing pending.
    pub fn get_private_state(&self) -> Result<PlayerPrivateState> {
        Ok(self
            .store
            .load(&self.key)?
            .unwrap_or_else(|| PlayerPrivateState::new(self.secret.clone())))
    }

    pub fn set_private_state(&self, state: &PlayerPrivateState) -> Result<()> {
        self.store.save(&self.key, state)
    }

    /// Caches the moves the next commitment or cleartext submission uses.
    ///
    /// Moves are checked against this player's side as last observed. A
    /// player still eyeing the open seat is checked as P2.
    pub fn set_pending_moves(&self, moves: RoundMoves) -> Result<()> {
        let side = self.snapshot.side_of(&self.player).unwrap_or(Side::P2);
        self.check_moves(&moves, side)?;
        let private = self.get_private_state()?.with_pending(moves);
        self.set_private_state(&private)
    }

    /// Rejects moves the engine would refuse at disclosure.
    ///
    /// A published commitment cannot be withdrawn, so committed moves must
    /// already be disclosable.
    fn check_moves(&self, moves: &RoundMoves, side: Side) -> Result<()> {
        moves
            .validate(&self.snapshot.side(side).alive())
            .map_err(|source| RuntimeError::InvalidMoves {
                match_id: self.match_id,
                source,
            })
    }

    fn clear_pending_moves(&self) -> Result<()> {
        let mut private = self.get_private_state()?;
        private.pending = None;
        self.set_private_state(&private)
    }

    async fn submit(&mut self, kind: ActionKind) -> Result<Receipt> {
        let action = Action::new(self.player, kind);
        let receipt = self
            .handle
            .submit(self.match_id, self.precondition(), action)
            .await?;
        self.observe(Arc::clone(&receipt.state));
        Ok(receipt)
    }

    pub async fn select_first_hero(&mut self, hero: Hero) -> Result<Receipt> {
        self.submit(SelectFirstHero { hero }.into()).await
    }

    pub async fn select_first_two_heroes(&mut self, heroes: [Hero; 2]) -> Result<Receipt> {
        self.submit(SelectFirstTwoHeroes { heroes }.into()).await
    }

    pub async fn select_last_two_heroes(&mut self, heroes: [Hero; 2]) -> Result<Receipt> {
        self.submit(SelectLastTwoHeroes { heroes }.into()).await
    }

    pub async fn select_last_hero(&mut self, hero: Hero) -> Result<Receipt> {
        self.submit(SelectLastHero { hero }.into()).await
    }

    /// Commits to the pending moves under a fresh random nonce.
    pub async fn publish_commitment(&mut self) -> Result<Receipt> {
        self.publish_commitment_with_nonce(fresh_nonce()).await
    }

    /// Commits to the pending moves under `nonce`.
    ///
    /// The pending moves stay cached until they are disclosed.
    pub async fn publish_commitment_with_nonce(&mut self, nonce: Nonce) -> Result<Receipt> {
        let private = self.get_private_state()?;
        let Some(moves) = private.pending else {
            return Err(RuntimeError::MissingPendingMoves {
                match_id: self.match_id,
                phase: self.snapshot.phase,
            });
        };

        self.check_moves(&moves, Side::P1)?;
        let commitment = commit::commit(&self.secret, &moves, &nonce);
        self.submit(PublishCommitment { commitment, nonce }.into())
            .await
    }

    /// Submits `moves` in the clear and clears the pending cache.
    pub async fn submit_cleartext_move(&mut self, moves: RoundMoves) -> Result<Receipt> {
        let receipt = self.submit(SubmitCleartextMove { moves }.into()).await?;
        self.clear_pending_moves()?;
        Ok(receipt)
    }

    /// Discloses the committed moves, resolving the round.
    ///
    /// Uses the pending cache when present. Without it the committed moves
    /// are recovered from the published commitment; a commitment is never
    /// replaced by a new one.
    pub async fn disclose_move(&mut self) -> Result<Receipt> {
        if self.snapshot.phase != MatchPhase::P1Reveal {
            self.refresh().await?;
        }
        let (Some(commitment), Some(nonce)) = (self.snapshot.commitment, self.snapshot.nonce)
        else {
            return Err(RuntimeError::MissingCommitment {
                match_id: self.match_id,
                phase: self.snapshot.phase,
            });
        };

        let moves = match self.get_private_state()?.pending {
            Some(moves) => moves,
            None => {
                warn!(
                    target: "arena::session",
                    match_id = %self.match_id,
                    round = self.snapshot.round,
                    version = self.snapshot.version,
                    "Pending moves lost; reconciling against the published commitment"
                );
                commit::recover(&self.secret, &nonce, &commitment).map_err(|err| {
                    error!(
                        target: "arena::session",
                        match_id = %self.match_id,
                        round = self.snapshot.round,
                        error = %err,
                        "Reconciliation failed"
                    );
                    RuntimeError::Reconciliation(err)
                })?
            }
        };

        let blinding: Blinding = commit::blinding(&self.secret, &nonce);
        let receipt = self.submit(DiscloseMove { moves, blinding }.into()).await?;
        self.clear_pending_moves()?;
        Ok(receipt)
    }
}
