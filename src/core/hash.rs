//! State Hashing for Verification
//!
//! Deterministic hashing of arena state, used to compare two simulations
//! tick-for-tick (replay validation, determinism tests) and for periodic
//! checkpoint logging in the runner.

use sha2::{Digest, Sha256};

use super::vec2::Vec2;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for arena state.
///
/// Wraps SHA-256 with helpers for the simulation's value types. Floats are
/// hashed by bit pattern, so two states hash equal exactly when every
/// coordinate is bit-identical. Order of updates is critical.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for arena state.
    pub fn for_arena_state() -> Self {
        Self::new(b"SERPENT_ARENA_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f32 value, by bit pattern.
    #[inline]
    pub fn update_f32(&mut self, value: f32) {
        self.hasher.update(value.to_bits().to_le_bytes());
    }

    /// Update with a Vec2.
    #[inline]
    pub fn update_vec2(&mut self, value: Vec2) {
        self.update_f32(value.x);
        self.update_f32(value.y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a UUID (16 bytes).
    #[inline]
    pub fn update_uuid(&mut self, uuid: &[u8; 16]) {
        self.hasher.update(uuid);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for arena verification.
///
/// This function is called by `Arena::compute_hash()`.
/// The parameter is a closure that adds state-specific data.
pub fn compute_state_hash<F>(tick: u32, rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_arena_state();

    // Always hash tick and seed first
    hasher.update_u32(tick);
    hasher.update_u64(rng_seed);

    // Add game-specific state
    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_state_same_hash() {
        let h1 = compute_state_hash(10, 42, |h| {
            h.update_vec2(Vec2::new(1.5, -2.5));
            h.update_bool(true);
        });
        let h2 = compute_state_hash(10, 42, |h| {
            h.update_vec2(Vec2::new(1.5, -2.5));
            h.update_bool(true);
        });
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_different_state_different_hash() {
        let h1 = compute_state_hash(10, 42, |h| h.update_f32(1.0));
        let h2 = compute_state_hash(10, 42, |h| h.update_f32(1.0000001));
        assert_ne!(h1, h2);

        let h3 = compute_state_hash(11, 42, |h| h.update_f32(1.0));
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_update_order_matters() {
        let h1 = compute_state_hash(0, 0, |h| {
            h.update_u32(1);
            h.update_u32(2);
        });
        let h2 = compute_state_hash(0, 0, |h| {
            h.update_u32(2);
            h.update_u32(1);
        });
        assert_ne!(h1, h2);
    }
}
