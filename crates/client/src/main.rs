//! Arena client binary.
//!
//! Composition root: loads configuration, sets up logging, starts the
//! runtime and plays one practice match between two automated players,
//! logging every resolved round. The final views of both players are
//! printed to stdout as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Reproducible match with debug logs
//! ARENA_PRACTICE_SEED=7 RUST_LOG=arena=debug cargo run -p arena-client
//!
//! # Keep private state on disk
//! ARENA_DATA_DIR=/tmp/arena cargo run -p arena-client
//! ```

mod logging;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::broadcast::error::RecvError;

use arena_core::PlayerSecret;
use arena_runtime::{
    Event, MatchEvent, PlayerSession, PracticeOpponent, PracticeProvider, Runtime, RuntimeConfig,
    Topic,
};

fn draw_secret(rng: &mut StdRng) -> PlayerSecret {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    PlayerSecret::from_bytes(bytes)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = logging::setup_logging()?;
    let config = RuntimeConfig::from_env();

    tracing::info!("Starting arena client");
    tracing::info!("Practice seed: {:?}", config.practice_seed);
    tracing::info!("Private state: {:?}", config.data_dir);

    let store = config
        .private_store()
        .context("failed to open the private-state store")?;
    let seed = config.practice_seed;
    let round_limit = config.game_config.round_limit;
    let runtime = Runtime::builder().config(config).build();
    let handle = runtime.handle();

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let p1 = PlayerSession::create_match(handle.clone(), store.clone(), draw_secret(&mut rng)).await?;
    let match_id = p1.match_id();
    let p2 = PlayerSession::join(handle.clone(), store, draw_secret(&mut rng), match_id).await?;

    let mut events = handle.subscribe(Topic::Match);
    let reporter = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::Match(MatchEvent::RoundResolved { match_id, report })) => {
                    tracing::info!(
                        "{match_id} round {}: P1 took {:?}, P2 took {:?}",
                        report.round,
                        report.damage[0],
                        report.damage[1]
                    );
                }
                Ok(Event::Match(MatchEvent::Finished { .. })) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Round reporter skipped {skipped} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let first = PracticeOpponent::new(p1, PracticeProvider::new(seed))
        .with_round_limit(round_limit)
        .spawn();
    let second = PracticeOpponent::new(p2, PracticeProvider::new(seed.map(|s| s.wrapping_add(1))))
        .with_round_limit(round_limit)
        .spawn();

    let first = first.await??;
    let second = second.await??;
    reporter.await?;

    tracing::info!(
        "{match_id} finished after {} rounds: {}",
        first.round,
        first.phase
    );

    println!("{}", serde_json::to_string_pretty(&[&first, &second])?);

    drop(handle);
    runtime.shutdown().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
