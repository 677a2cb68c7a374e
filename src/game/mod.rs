//! Game Logic Module
//!
//! All simulation code. Single-threaded per arena, no I/O, deterministic
//! for a fixed seed and input sequence.
//!
//! ## Module Structure
//!
//! - `config`: immutable per-arena tuning constants
//! - `input`: per-tick player input frames
//! - `snake`: snake entity, movement, trailing body
//! - `state`: arena state and player ids
//! - `tick`: authoritative simulation loop
//! - `collision`: cross-snake collision detection
//! - `events`: game events and terminal match results
//! - `snapshot`: per-tick broadcast views

pub mod collision;
pub mod config;
pub mod events;
pub mod input;
pub mod snake;
pub mod snapshot;
pub mod state;
pub mod tick;

// Re-export key types
pub use config::{ArenaConfig, ArenaError, REFERENCE_TICK_MS};
pub use events::{DeathCause, GameEvent, GameEventData, MatchResult};
pub use input::InputFrame;
pub use snake::Snake;
pub use snapshot::{ArenaSnapshot, SnakeSnapshot};
pub use state::{Arena, PlayerId};
pub use tick::{advance_tick, TickResult};
