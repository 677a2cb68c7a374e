//! Arena Driver
//!
//! Runs one arena as a tokio task at the reference tick rate. Each arena
//! is an independent unit of work; multiple matches run as multiple tasks
//! with no shared mutable state.
//!
//! Commands (joins, leaves, inputs) arrive on an mpsc channel and are
//! drained only at tick boundaries, so external mutation can never
//! interleave with the phases inside a tick.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::game::events::{GameEventData, MatchResult};
use crate::game::input::InputFrame;
use crate::game::snapshot::ArenaSnapshot;
use crate::game::state::{Arena, PlayerId};
use crate::game::tick::advance_tick;
use crate::TICK_RATE;

/// External mutation of a running arena. Applied at the next tick
/// boundary, never mid-tick.
#[derive(Clone, Copy, Debug)]
pub enum ArenaCommand {
    /// Add a player at the spawn point
    Join(PlayerId),
    /// Remove a player (disconnect); emits a terminal result if the
    /// snake was still alive
    Leave(PlayerId),
    /// Latest input frame for a player; reapplied every tick until
    /// replaced, like a held controller
    Input(PlayerId, InputFrame),
    /// Stop the arena after the current tick
    Stop,
}

/// A terminal result stamped with the wall-clock time it was produced,
/// ready for the persistence collaborator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MatchReport {
    /// The simulation's result contract
    #[serde(flatten)]
    pub result: MatchResult,
    /// When the runner observed the result
    pub finished_at: DateTime<Utc>,
}

/// Channels for one spawned arena.
pub struct ArenaHandle {
    /// Send commands to the arena task
    pub commands: mpsc::Sender<ArenaCommand>,
    /// Receive terminal results as they happen
    pub reports: mpsc::Receiver<MatchReport>,
    /// Subscribe-side of the per-tick snapshot broadcast
    pub snapshots: broadcast::Receiver<ArenaSnapshot>,
    /// The driver task; resolves to the final arena state
    pub task: JoinHandle<Arena>,
}

/// Spawn an arena on its own tokio task, returning its channels.
pub fn spawn_arena(arena: Arena) -> ArenaHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(256);
    let (report_tx, report_rx) = mpsc::channel(64);
    let (snapshot_tx, snapshot_rx) = broadcast::channel(16);

    let task = tokio::spawn(run_arena(arena, cmd_rx, report_tx, snapshot_tx));

    ArenaHandle {
        commands: cmd_tx,
        reports: report_rx,
        snapshots: snapshot_rx,
        task,
    }
}

/// Drive an arena at the reference tick rate until stopped.
///
/// Returns the final arena state. The loop also stops when every command
/// sender is gone, since nothing could ever change the arena again.
pub async fn run_arena(
    mut arena: Arena,
    mut commands: mpsc::Receiver<ArenaCommand>,
    reports: mpsc::Sender<MatchReport>,
    snapshots: broadcast::Sender<ArenaSnapshot>,
) -> Arena {
    let tick_period = Duration::from_secs(1) / TICK_RATE;
    let mut interval = tokio::time::interval(tick_period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut latest_inputs: BTreeMap<PlayerId, InputFrame> = BTreeMap::new();
    let mut last_tick = Instant::now();

    info!(
        width = arena.width,
        height = arena.height,
        seed = arena.rng_seed,
        "arena task started"
    );

    loop {
        interval.tick().await;

        // Drain commands at the tick boundary only.
        let mut stop = false;
        loop {
            match commands.try_recv() {
                Ok(ArenaCommand::Join(id)) => arena.queue_join(id),
                Ok(ArenaCommand::Leave(id)) => {
                    arena.queue_leave(id);
                    latest_inputs.remove(&id);
                }
                Ok(ArenaCommand::Input(id, frame)) => {
                    latest_inputs.insert(id, frame);
                }
                Ok(ArenaCommand::Stop) => stop = true,
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    stop = true;
                    break;
                }
            }
        }

        // Measured dt keeps traversal speed right even when the driver
        // lags behind the reference rate.
        let dt_ms = last_tick.elapsed().as_secs_f32() * 1000.0;
        last_tick = Instant::now();

        let result = advance_tick(&mut arena, &latest_inputs, dt_ms);

        for event in &result.events {
            match &event.data {
                GameEventData::SnakeDied {
                    player_id,
                    cause,
                    score,
                    ..
                } => {
                    info!(
                        player = %hex::encode(&player_id.0[..4]),
                        ?cause,
                        score,
                        tick = event.tick,
                        "snake died"
                    );
                }
                GameEventData::SnakeJoined { player_id, .. } => {
                    info!(player = %hex::encode(&player_id.0[..4]), tick = event.tick, "snake joined");
                }
                GameEventData::SnakeLeft { player_id } => {
                    info!(player = %hex::encode(&player_id.0[..4]), tick = event.tick, "snake left");
                }
                _ => debug!(?event, "event"),
            }
        }

        for terminal in result.results {
            let report = MatchReport {
                result: terminal,
                finished_at: Utc::now(),
            };
            if reports.send(report).await.is_err() {
                warn!("report receiver dropped; result discarded");
            }
        }

        // No receivers is fine; broadcast keeps only the latest ticks.
        let _ = snapshots.send(arena.snapshot());

        // Periodic checkpoint for replay verification.
        if arena.tick % (TICK_RATE * 10) == 0 {
            debug!(
                tick = arena.tick,
                hash = %hex::encode(arena.compute_hash()),
                alive = arena.alive_count(),
                "checkpoint"
            );
        }

        if stop {
            break;
        }
    }

    info!(tick = arena.tick, "arena task stopped");
    arena
}

// =============================================================================
// TESTS
// =============================================================================
