//! Lost and restored private state across the commit/reveal window.

mod common;

use std::sync::Arc;

use arena_core::{MatchPhase, RoundMoves, Stance};
use arena_runtime::{
    FilePrivateStore, PlayerSession, PrivateStateRepository, RuntimeError, private_key,
};
use tempfile::TempDir;

use common::{all, memory_store, seated_match, secret, start};

fn mixed_moves() -> RoundMoves {
    RoundMoves::from_parts(
        [2, 0, 1],
        [Stance::Defensive, Stance::Aggressive, Stance::Neutral],
    )
}

#[tokio::test]
async fn restarted_client_recovers_its_committed_move() {
    let runtime = start();
    let (mut p1, mut p2) = seated_match(&runtime).await;
    let match_id = p1.match_id();

    p1.set_pending_moves(mixed_moves()).unwrap();
    let committed = p1.publish_commitment().await.unwrap();
    let commitment = committed.state.commitment;
    drop(p1);

    p2.refresh().await.unwrap();
    p2.submit_cleartext_move(all(0, Stance::Neutral)).await.unwrap();

    // Same secret, empty store: the cleartext is gone.
    let mut p1 = PlayerSession::join(runtime.handle(), memory_store(), secret(1), match_id)
        .await
        .unwrap();
    assert_eq!(p1.get_private_state().unwrap().pending, None);
    assert_eq!(p1.snapshot().commitment, commitment);

    let receipt = p1.disclose_move().await.unwrap();
    let report = receipt.outcome.report.unwrap();
    assert_eq!(report.moves[0], mixed_moves());
    assert_eq!(receipt.state.phase, MatchPhase::P1Commit);
    assert_eq!(receipt.state.commitment, None);
}

#[tokio::test]
async fn cleared_cache_is_reconciled_in_place() {
    let runtime = start();
    let (mut p1, mut p2) = seated_match(&runtime).await;

    p1.set_pending_moves(mixed_moves()).unwrap();
    p1.publish_commitment().await.unwrap();

    let mut private = p1.get_private_state().unwrap();
    private.pending = None;
    p1.set_private_state(&private).unwrap();

    p2.refresh().await.unwrap();
    p2.submit_cleartext_move(all(1, Stance::Neutral)).await.unwrap();
    p1.refresh().await.unwrap();

    let receipt = p1.disclose_move().await.unwrap();
    assert_eq!(receipt.outcome.report.unwrap().moves[0], mixed_moves());
}

#[tokio::test]
async fn file_store_keeps_pending_moves_across_sessions() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn PrivateStateRepository> = Arc::new(FilePrivateStore::new(dir.path()).unwrap());
    let runtime = start();
    let handle = runtime.handle();

    let mut p1 = PlayerSession::create_match(handle.clone(), Arc::clone(&store), secret(1))
        .await
        .unwrap();
    let match_id = p1.match_id();
    let mut p2 = PlayerSession::join(handle.clone(), common::memory_store(), secret(2), match_id)
        .await
        .unwrap();

    p1.select_first_hero(arena_core::Hero::UNARMED).await.unwrap();
    p2.refresh().await.unwrap();
    p2.select_first_two_heroes([arena_core::Hero::UNARMED; 2]).await.unwrap();
    p1.refresh().await.unwrap();
    p1.select_last_two_heroes([arena_core::Hero::UNARMED; 2]).await.unwrap();
    p2.refresh().await.unwrap();
    p2.select_last_hero(arena_core::Hero::UNARMED).await.unwrap();
    p1.refresh().await.unwrap();

    p1.set_pending_moves(mixed_moves()).unwrap();
    p1.publish_commitment().await.unwrap();
    drop(p1);

    let key = private_key(match_id, &secret(1).player_id());
    let reopened = FilePrivateStore::new(dir.path()).unwrap();
    assert_eq!(reopened.load(&key).unwrap().unwrap().pending, Some(mixed_moves()));

    p2.refresh().await.unwrap();
    p2.submit_cleartext_move(all(0, Stance::Aggressive)).await.unwrap();

    let mut p1 = PlayerSession::join(handle, Arc::new(reopened), secret(1), match_id)
        .await
        .unwrap();
    let receipt = p1.disclose_move().await.unwrap();
    assert_eq!(receipt.outcome.report.unwrap().moves[0], mixed_moves());
    assert_eq!(store.load(&key).unwrap().unwrap().pending, None);
}

#[tokio::test]
async fn disclosure_before_any_commitment_is_refused() {
    let runtime = start();
    let (mut p1, _p2) = seated_match(&runtime).await;

    let err = p1.disclose_move().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::MissingCommitment {
            phase: MatchPhase::P1Commit,
            ..
        }
    ));
}
