//! # Serpent Arena Server
//!
//! Authoritative server-side simulation for a multiplayer slither-style
//! arena game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SERPENT ARENA SERVER                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - f32 2D vector and angle helpers           │
//! │  ├── rng.rs      - Seedable Xorshift128+ PRNG                │
//! │  └── hash.rs     - State hashing for replay verification     │
//! │                                                              │
//! │  game/           - Simulation (deterministic per seed)       │
//! │  ├── config.rs   - Immutable per-arena tuning                │
//! │  ├── input.rs    - Per-tick player input frames              │
//! │  ├── snake.rs    - Snake entity and trailing body            │
//! │  ├── state.rs    - Arena state, player ids                   │
//! │  ├── tick.rs     - Authoritative simulation loop             │
//! │  ├── collision.rs- Cross-snake collision detection           │
//! │  ├── events.rs   - Events and terminal match results         │
//! │  └── snapshot.rs - Per-tick broadcast views                  │
//! │                                                              │
//! │  runner.rs       - One tokio task per arena (non-determ.)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Simulation Contract
//!
//! Each arena is advanced by a single tick driver. Within a tick the
//! phases run strictly in order for all snakes: steering/movement, food
//! consumption, pairwise collision. External mutation (joins, leaves,
//! inputs) is queued and applied only at tick boundaries. Given the same
//! seed and input sequence, two arenas produce bit-identical state - the
//! food spawn RNG is owned by the arena and seeded explicitly, and snakes
//! are kept in a BTreeMap so every sweep is ordered.
//!
//! Transport, persistence, auth, and rendering are external
//! collaborators: the simulation consumes [`game::InputFrame`]s and emits
//! [`game::ArenaSnapshot`]s plus one [`game::MatchResult`] per player.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod runner;

// Re-export commonly used types
pub use crate::core::rng::{derive_arena_seed, ArenaRng};
pub use crate::core::vec2::Vec2;
pub use game::{
    advance_tick, Arena, ArenaConfig, ArenaError, ArenaSnapshot, InputFrame, MatchResult,
    PlayerId, TickResult,
};
pub use runner::{spawn_arena, ArenaCommand, ArenaHandle, MatchReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
