//! Arena Tuning
//!
//! All simulation constants live in one immutable struct that is handed to
//! the arena at construction. Two arenas can run with different tuning
//! (difficulty modes) without any cross-talk; nothing here is a process
//! global.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference tick duration in milliseconds (60 Hz).
///
/// `Snake::advance` scales elapsed time by this so a slower or faster tick
/// driver still yields the same average traversal speed.
pub const REFERENCE_TICK_MS: f32 = 1000.0 / 60.0;

/// Validation failures for arena construction.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// A tuning value is non-finite, non-positive, or otherwise unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    /// Arena bounds too small for the configured food margin.
    #[error("arena bounds {width}x{height} too small for food margin {margin}")]
    BoundsTooSmall {
        /// Requested arena width
        width: f32,
        /// Requested arena height
        height: f32,
        /// Configured food spawn margin
        margin: f32,
    },
}

/// Immutable per-arena tuning constants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Cruising speed, world units per reference tick.
    pub base_speed: f32,

    /// Speed while the boost input is held.
    pub sprint_speed: f32,

    /// Maximum steering change per tick, radians.
    pub turn_speed: f32,

    /// Spacing between consecutive body segments.
    pub segment_dist: f32,

    /// Number of body segments a snake spawns with (head excluded).
    pub start_length: usize,

    /// Segments gained per food item eaten.
    pub growth_per_food: usize,

    /// Points awarded per food item eaten.
    pub score_per_food: u32,

    /// When true, leaving the arena bounds is lethal.
    /// When false, the head wraps to the opposite edge instead.
    pub walls_enabled: bool,

    /// Visual body width; every collision radius derives from it.
    pub body_width: f32,

    /// Food never spawns closer than this to an arena edge.
    pub food_margin: f32,

    /// Whether a snake can die on its own body.
    pub self_collision: bool,

    /// Ticks after spawn during which a snake cannot die to body or
    /// head-on contact. Walls still apply. Zero disables the grace period.
    pub spawn_immunity_ticks: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            base_speed: 3.5,
            sprint_speed: 6.5,
            turn_speed: 0.12,
            segment_dist: 10.0,
            start_length: 15,
            growth_per_food: 5,
            score_per_food: 10,
            walls_enabled: true,
            body_width: 16.0,
            food_margin: 50.0,
            self_collision: true,
            spawn_immunity_ticks: 120,
        }
    }
}

impl ArenaConfig {
    /// Body segments adjacent to the head that self-collision skips, so a
    /// tight turn cannot clip the snake's own neck.
    pub const NECK_SEGMENTS: usize = 4;

    /// Radius within which a head picks up food.
    #[inline]
    pub fn food_pickup_radius(&self) -> f32 {
        self.body_width + 10.0
    }

    /// Radius within which a head dies on another snake's body segment.
    #[inline]
    pub fn body_hit_radius(&self) -> f32 {
        self.body_width
    }

    /// Radius within which a head dies on its own body segment.
    /// Tighter than the enemy radius; adjacent coils overlap slightly.
    #[inline]
    pub fn self_hit_radius(&self) -> f32 {
        self.body_width / 1.5
    }

    /// Radius within which two heads collide head-on.
    #[inline]
    pub fn head_on_radius(&self) -> f32 {
        self.body_width * 1.5
    }

    /// Check every tuning value for sanity.
    pub fn validate(&self) -> Result<(), ArenaError> {
        fn positive(value: f32, what: &'static str) -> Result<(), ArenaError> {
            if !value.is_finite() || value <= 0.0 {
                return Err(ArenaError::InvalidConfig(what));
            }
            Ok(())
        }

        positive(self.base_speed, "base_speed must be positive and finite")?;
        positive(self.sprint_speed, "sprint_speed must be positive and finite")?;
        positive(self.turn_speed, "turn_speed must be positive and finite")?;
        positive(self.segment_dist, "segment_dist must be positive and finite")?;
        positive(self.body_width, "body_width must be positive and finite")?;
        if !self.food_margin.is_finite() || self.food_margin < 0.0 {
            return Err(ArenaError::InvalidConfig(
                "food_margin must be non-negative and finite",
            ));
        }
        if self.start_length == 0 {
            return Err(ArenaError::InvalidConfig("start_length must be at least 1"));
        }
        if self.growth_per_food == 0 {
            return Err(ArenaError::InvalidConfig(
                "growth_per_food must be at least 1",
            ));
        }
        Ok(())
    }
}
