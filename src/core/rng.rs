//! Seedable Random Number Generator
//!
//! Uses Xorshift128+ for fast, high-quality randomness. The generator is
//! owned by the arena and injected at construction, so a recorded seed
//! replays the exact food-spawn sequence in tests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::vec2::Vec2;

/// Seedable PRNG using the Xorshift128+ algorithm.
///
/// Given the same seed, produces the same sequence on every platform.
/// There is one instance per arena; nothing in the simulation reaches for
/// a global random source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaRng {
    state: [u64; 2],
}

impl Default for ArenaRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ArenaRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a uniform `f32` in `[0, 1)`.
    ///
    /// Uses the upper 24 bits so every value is exactly representable.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        const SCALE: f32 = 1.0 / (1u32 << 24) as f32;
        (self.next_u64() >> 40) as f32 * SCALE
    }

    /// Generate a uniform `f32` in `[min, max)`.
    ///
    /// Degenerate ranges (`min >= max`) collapse to `min`.
    #[inline]
    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + self.next_f32() * (max - min)
    }

    /// Generate a uniform point in the axis-aligned rectangle
    /// `[min.x, max.x) x [min.y, max.y)`.
    #[inline]
    pub fn point_in_rect(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(
            self.next_f32_range(min.x, max.x),
            self.next_f32_range(min.y, max.y),
        )
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive an arena seed from match parameters.
///
/// Hashes the arena id together with the sorted player ids, so the seed is
/// unique per match, reproducible after it, and not chosen by any single
/// player.
///
/// # Parameters
///
/// - `arena_id`: unique match identifier
/// - `player_ids`: all player ids (MUST be sorted for determinism)
pub fn derive_arena_seed(arena_id: &[u8; 16], player_ids: &[[u8; 16]]) -> u64 {
    let mut hasher = Sha256::new();

    // Domain separator
    hasher.update(b"SERPENT_ARENA_SEED_V1");

    // Arena id (unique per match)
    hasher.update(arena_id);

    // Player ids (sorted for determinism)
    // IMPORTANT: Caller must ensure player_ids is sorted!
    for pid in player_ids {
        hasher.update(pid);
    }

    let hash = hasher.finalize();

    // Take first 8 bytes as seed
    u64::from_le_bytes(hash[0..8].try_into().expect("hash is 32 bytes"))
}

// =============================================================================
// TESTS
// =============================================================================
