//! Arena State
//!
//! The authoritative world state for one running match. Snakes are keyed
//! by player id in a BTreeMap so every sweep over them runs in the same
//! order on every host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::ArenaRng;
use crate::core::vec2::Vec2;
use crate::game::config::{ArenaConfig, ArenaError};
use crate::game::events::GameEvent;
use crate::game::snake::Snake;
use crate::game::snapshot::{ArenaSnapshot, SnakeSnapshot};

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create a fresh random id.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// =============================================================================
// ARENA
// =============================================================================

/// Complete state of one match.
///
/// Exclusively owned and mutated by its tick driver; joins and leaves
/// arriving mid-tick are queued and applied only at the next tick
/// boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Arena {
    /// Arena width, fixed for the match
    pub width: f32,

    /// Arena height, fixed for the match
    pub height: f32,

    /// Current tick
    pub tick: u32,

    /// RNG seed (for verification/replay)
    pub rng_seed: u64,

    /// Seedable RNG owned by this arena
    #[serde(skip)]
    pub rng: ArenaRng,

    /// All snakes (BTreeMap for deterministic iteration)
    pub snakes: BTreeMap<PlayerId, Snake>,

    /// The single live food item. None only transiently between
    /// consumption and respawn within a tick.
    pub food: Option<Vec2>,

    /// Tuning constants, immutable for the arena's lifetime
    pub config: ArenaConfig,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pending_events: Vec<GameEvent>,

    /// Joins to apply at the next tick boundary
    #[serde(skip)]
    pending_joins: Vec<PlayerId>,

    /// Leaves to apply at the next tick boundary
    #[serde(skip)]
    pending_leaves: Vec<PlayerId>,
}

impl Arena {
    /// Create a new arena with the given bounds, RNG seed, and tuning.
    ///
    /// The first food item is spawned immediately, so `food` is populated
    /// for the whole match apart from the instant between consumption and
    /// respawn.
    pub fn new(
        width: f32,
        height: f32,
        rng_seed: u64,
        config: ArenaConfig,
    ) -> Result<Self, ArenaError> {
        config.validate()?;

        if !width.is_finite()
            || !height.is_finite()
            || width <= 2.0 * config.food_margin
            || height <= 2.0 * config.food_margin
        {
            return Err(ArenaError::BoundsTooSmall {
                width,
                height,
                margin: config.food_margin,
            });
        }

        let mut arena = Self {
            width,
            height,
            tick: 0,
            rng_seed,
            rng: ArenaRng::new(rng_seed),
            snakes: BTreeMap::new(),
            food: None,
            config,
            pending_events: Vec::new(),
            pending_joins: Vec::new(),
            pending_leaves: Vec::new(),
        };
        arena.spawn_food();
        Ok(arena)
    }

    /// Fixed spawn point for joining snakes.
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.width * 0.75, self.height / 2.0)
    }

    /// Construct and register a snake for `id` at the spawn point.
    ///
    /// Joining twice is a no-op that returns the existing snake;
    /// overlapping spawns of different players are allowed (the spawn
    /// immunity window keeps them from killing each other instantly).
    pub fn add_snake(&mut self, id: PlayerId) -> &Snake {
        if !self.snakes.contains_key(&id) {
            let spawn = self.spawn_point();
            let snake = Snake::new(id, spawn, self.tick, &self.config);
            self.pending_events
                .push(GameEvent::snake_joined(self.tick, id, spawn));
            self.snakes.insert(id, snake);
        }
        &self.snakes[&id]
    }

    /// Remove a snake outright, returning it.
    pub fn remove_snake(&mut self, id: &PlayerId) -> Option<Snake> {
        self.snakes.remove(id)
    }

    /// Queue a join to be applied at the next tick boundary.
    pub fn queue_join(&mut self, id: PlayerId) {
        self.pending_joins.push(id);
    }

    /// Queue a leave to be applied at the next tick boundary.
    pub fn queue_leave(&mut self, id: PlayerId) {
        self.pending_leaves.push(id);
    }

    /// Drain the queued joins (tick driver only).
    pub(crate) fn take_pending_joins(&mut self) -> Vec<PlayerId> {
        std::mem::take(&mut self.pending_joins)
    }

    /// Drain the queued leaves (tick driver only).
    pub(crate) fn take_pending_leaves(&mut self) -> Vec<PlayerId> {
        std::mem::take(&mut self.pending_leaves)
    }

    /// Place the food item uniformly at random inside the margin-inset
    /// play field, replacing any existing one. There is always exactly one
    /// live food item after this returns.
    pub fn spawn_food(&mut self) -> Vec2 {
        let margin = self.config.food_margin;
        let position = self.rng.point_in_rect(
            Vec2::new(margin, margin),
            Vec2::new(self.width - margin, self.height - margin),
        );
        self.food = Some(position);
        self.pending_events
            .push(GameEvent::food_spawned(self.tick, position));
        position
    }

    /// Get a snake by id.
    pub fn get_snake(&self, id: &PlayerId) -> Option<&Snake> {
        self.snakes.get(id)
    }

    /// Get a snake mutably by id.
    pub fn get_snake_mut(&mut self, id: &PlayerId) -> Option<&mut Snake> {
        self.snakes.get_mut(id)
    }

    /// Count of snakes still alive.
    pub fn alive_count(&self) -> usize {
        self.snakes.values().filter(|s| s.alive).count()
    }

    /// Per-tick broadcast snapshot: everything a client needs to render
    /// the arena without replaying physics.
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            tick: self.tick,
            food: self.food,
            snakes: self
                .snakes
                .values()
                .map(|s| SnakeSnapshot {
                    id: s.id,
                    head: s.head,
                    segments: s.segments().to_vec(),
                    score: s.score,
                    alive: s.alive,
                })
                .collect(),
        }
    }

    /// Compute hash of current state for determinism verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            // Snakes in sorted order (BTreeMap guarantees this)
            for snake in self.snakes.values() {
                hasher.update_uuid(snake.id.as_bytes());
                hasher.update_bool(snake.alive);
                hasher.update_u32(snake.score);
                hasher.update_f32(snake.angle);
                hasher.update_vec2(snake.head);
                hasher.update_u32(snake.segments().len() as u32);
                for seg in snake.segments() {
                    hasher.update_vec2(*seg);
                }
            }

            // Food
            hasher.update_bool(self.food.is_some());
            if let Some(food) = self.food {
                hasher.update_vec2(food);
            }
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
