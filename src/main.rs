//! Chess Duel Server
//!
//! Demo entrypoint: runs a scripted two-player game against the in-memory
//! store, exercising the full create / join / move / resign flow.

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use chess_duel::protocol::SessionSnapshot;
use chess_duel::{MemoryStore, PlayerId, SessionService, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Chess Duel Server v{}", VERSION);

    // Store handle constructed once and injected; no ambient globals.
    let store = Arc::new(MemoryStore::new());
    let service = SessionService::new(store);

    demo_game(&service).await
}

/// Scripted two-player game: create, join, a short opening, a rejected
/// out-of-turn attempt, then resignation.
async fn demo_game(service: &SessionService<MemoryStore>) -> anyhow::Result<()> {
    info!("=== Starting Demo Game ===");

    let alice = PlayerId::from("alice");
    let bob = PlayerId::from("bob");

    let session = service.create_session(alice.clone()).await?;
    info!("Share this code with a friend: {}", session.code);

    let (_, color) = service.join_session(&session.code, bob.clone()).await?;
    info!("Second player seated as {}", color);

    let script = [
        (&alice, "e2", "e4"),
        (&bob, "e7", "e5"),
        (&alice, "g1", "f3"),
        (&bob, "b8", "c6"),
        (&alice, "f1", "c4"),
    ];
    for (player, from, to) in script {
        service.submit_move(&session.id, player, from, to).await?;
    }

    // Out of turn: white just moved, so this must be rejected.
    if let Err(e) = service.submit_move(&session.id, &alice, "d2", "d4").await {
        info!("Out-of-turn attempt rejected as expected: {}", e);
    }

    let finished = service.resign(&session.id, &bob).await?;
    let snapshot = SessionSnapshot::from(&finished);
    info!(
        "Game over after {} moves, result: {}",
        snapshot.moves.len(),
        serde_json::to_string(&snapshot.result)?
    );

    Ok(())
}
