//! Serpent Arena Server
//!
//! Demo driver: runs a scripted deterministic match, verifies it replays
//! to the same state hash, then drives a live arena through the async
//! runner.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use serpent_arena::{
    advance_tick, derive_arena_seed, game::events::GameEventData, game::REFERENCE_TICK_MS,
    spawn_arena, Arena, ArenaCommand, ArenaConfig, InputFrame, MatchResult, PlayerId, TICK_RATE,
    VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Serpent Arena Server v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    demo_deterministic_match()?;
    demo_runner().await?;

    Ok(())
}

/// Scripted steering for player `i` at tick `t`: smooth, player-specific
/// weaving with occasional boost.
fn scripted_input(t: u32, i: usize) -> InputFrame {
    let steer = ((t as f32) / 30.0 + i as f32 * 1.7).sin() * 0.1;
    let mut frame = InputFrame::with_steer(steer);
    if (t / 90) % (i as u32 + 2) == 0 {
        frame.flags |= InputFrame::FLAG_BOOST;
    }
    frame
}

/// Run a full scripted match synchronously and verify determinism by
/// replaying it.
fn demo_deterministic_match() -> Result<()> {
    info!("=== Scripted Match ===");

    let arena_id = [1u8; 16];
    let player_ids: Vec<PlayerId> = (0..4).map(|i| PlayerId::new([i; 16])).collect();
    let id_bytes: Vec<[u8; 16]> = player_ids.iter().map(|p| p.0).collect();
    let seed = derive_arena_seed(&arena_id, &id_bytes);
    info!("Arena id: {}", hex::encode(arena_id));
    info!("Derived seed: {}", seed);

    let run = |label: &str| -> Result<([u8; 32], Vec<MatchResult>)> {
        let mut arena = Arena::new(800.0, 600.0, seed, ArenaConfig::default())?;
        for id in &player_ids {
            arena.add_snake(*id);
        }

        let max_ticks = TICK_RATE * 90;
        let mut results = Vec::new();
        let mut total_events = 0usize;

        for t in 0..max_ticks {
            let mut inputs = BTreeMap::new();
            for (i, id) in player_ids.iter().enumerate() {
                inputs.insert(*id, scripted_input(t, i));
            }

            let tick_result = advance_tick(&mut arena, &inputs, REFERENCE_TICK_MS);
            total_events += tick_result.events.len();

            for event in &tick_result.events {
                if let GameEventData::SnakeDied {
                    player_id, cause, ..
                } = &event.data
                {
                    info!(
                        "[{label}] snake {} died at tick {}: {:?}",
                        hex::encode(&player_id.0[..4]),
                        event.tick,
                        cause
                    );
                }
            }
            results.extend(tick_result.results);

            if arena.alive_count() == 0 {
                info!("[{label}] all snakes dead at tick {}", arena.tick);
                break;
            }
        }

        info!("[{label}] {} events, {} results", total_events, results.len());
        Ok((arena.compute_hash(), results))
    };

    let (hash, results) = run("live")?;
    info!("Final state hash: {}", hex::encode(hash));
    for result in &results {
        info!("Result: {}", serde_json::to_string(result)?);
    }

    // Replay with the same seed and inputs; the hash must match.
    let (replay_hash, _) = run("replay")?;
    if hash == replay_hash {
        info!("Determinism verified: replay hash matches");
    } else {
        anyhow::bail!("determinism failure: replay hash differs");
    }

    Ok(())
}

/// Drive a live arena through the async runner for a couple of seconds.
async fn demo_runner() -> Result<()> {
    info!("=== Runner Demo ===");

    let arena = Arena::new(800.0, 600.0, 777, ArenaConfig::default())?;
    let mut handle = spawn_arena(arena);

    let alice = PlayerId::random();
    let bob = PlayerId::random();
    handle.commands.send(ArenaCommand::Join(alice)).await?;
    handle.commands.send(ArenaCommand::Join(bob)).await?;

    // Steer the two apart, let the arena run, then disconnect one.
    handle
        .commands
        .send(ArenaCommand::Input(alice, InputFrame::with_steer(0.06)))
        .await?;
    handle
        .commands
        .send(ArenaCommand::Input(bob, InputFrame::with_steer(-0.06)))
        .await?;

    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.commands.send(ArenaCommand::Leave(alice)).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.commands.send(ArenaCommand::Stop).await?;

    let final_arena = handle.task.await?;
    info!(
        "Runner demo done: {} ticks, final hash {}",
        final_arena.tick,
        hex::encode(final_arena.compute_hash())
    );

    while let Ok(report) = handle.reports.try_recv() {
        info!("Report: {}", serde_json::to_string(&report)?);
    }

    Ok(())
}
