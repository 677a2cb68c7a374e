//! Broadcast Snapshots
//!
//! Per-tick view of the arena handed to the broadcast collaborator.
//! Enough for clients to render the state without replaying physics.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::state::PlayerId;

/// One snake as seen by clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    /// Owning player
    pub id: PlayerId,
    /// Head position
    pub head: Vec2,
    /// Body segments, nearest-head first
    pub segments: Vec<Vec2>,
    /// Current score
    pub score: u32,
    /// Whether the snake is still alive
    pub alive: bool,
}

/// The whole arena at one tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    /// Tick this snapshot was taken at
    pub tick: u32,
    /// Current food position, if one is live
    pub food: Option<Vec2>,
    /// All snakes, in id order
    pub snakes: Vec<SnakeSnapshot>,
}
