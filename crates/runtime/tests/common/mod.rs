#![allow(dead_code)]

use std::sync::Arc;

use arena_core::{Hero, PlayerSecret, RoundCommand, RoundMoves, Stance};
use arena_runtime::{
    InMemoryPrivateStore, PlayerSession, PrivateStateRepository, Runtime, RuntimeConfig,
};

pub fn secret(byte: u8) -> PlayerSecret {
    PlayerSecret::from_bytes([byte; 32])
}

pub fn memory_store() -> Arc<dyn PrivateStateRepository> {
    Arc::new(InMemoryPrivateStore::new())
}

pub fn start() -> Runtime {
    Runtime::builder().config(RuntimeConfig::default()).build()
}

/// Every hero strikes `target` from `stance`.
pub fn all(target: u8, stance: Stance) -> RoundMoves {
    RoundMoves::new([RoundCommand::new(target, stance); 3])
}

/// P1 creates a match, P2 joins it, both pick fists-only heroes.
pub async fn seated_match(runtime: &Runtime) -> (PlayerSession, PlayerSession) {
    let handle = runtime.handle();
    let mut p1 = PlayerSession::create_match(handle.clone(), memory_store(), secret(1))
        .await
        .unwrap();
    let mut p2 = PlayerSession::join(handle, memory_store(), secret(2), p1.match_id())
        .await
        .unwrap();

    p1.select_first_hero(Hero::UNARMED).await.unwrap();
    p2.refresh().await.unwrap();
    p2.select_first_two_heroes([Hero::UNARMED; 2]).await.unwrap();
    p1.refresh().await.unwrap();
    p1.select_last_two_heroes([Hero::UNARMED; 2]).await.unwrap();
    p2.refresh().await.unwrap();
    p2.select_last_hero(Hero::UNARMED).await.unwrap();
    p1.refresh().await.unwrap();

    (p1, p2)
}
