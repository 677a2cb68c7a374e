//! Core deterministic primitives.
//!
//! Geometry, seedable randomness, and state hashing. Everything the
//! simulation needs that is not game logic lives here.

pub mod hash;
pub mod rng;
pub mod vec2;

// Re-export core types
pub use hash::{compute_state_hash, StateHash};
pub use rng::{derive_arena_seed, ArenaRng};
pub use vec2::{normalize_angle, Vec2};
