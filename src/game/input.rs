//! Per-Tick Player Input
//!
//! The transport collaborator delivers one `InputFrame` per player per
//! tick: a steering delta and a boost flag. Frames are sanitized here so a
//! single player's malformed input can never abort the shared tick.

use serde::{Deserialize, Serialize};

/// Raw input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Requested change of heading this tick, radians. Positive turns
    /// clockwise in screen coordinates (y grows downward). The simulation
    /// clamps the magnitude to the configured turn rate.
    pub steer: f32,

    /// Action flags (packed bits):
    /// - Bit 0: boost held this frame
    /// - Bit 1-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Boost flag bit
    pub const FLAG_BOOST: u8 = 0x01;

    /// Create a new neutral input frame.
    pub const fn new() -> Self {
        Self {
            steer: 0.0,
            flags: 0,
        }
    }

    /// Create input with a steering delta.
    pub const fn with_steer(steer: f32) -> Self {
        Self { steer, flags: 0 }
    }

    /// Create input with steering and boost.
    pub const fn with_steer_boost(steer: f32) -> Self {
        Self {
            steer,
            flags: Self::FLAG_BOOST,
        }
    }

    /// Check if boost is held this frame.
    #[inline]
    pub fn boost_held(&self) -> bool {
        self.flags & Self::FLAG_BOOST != 0
    }

    /// Steering delta with the clamp policy applied: non-finite values are
    /// ignored (treated as 0), anything else is clamped to
    /// `[-turn_speed, turn_speed]`.
    #[inline]
    pub fn clamped_steer(&self, turn_speed: f32) -> f32 {
        if !self.steer.is_finite() {
            return 0.0;
        }
        self.steer.clamp(-turn_speed, turn_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_frame() {
        let frame = InputFrame::new();
        assert_eq!(frame.steer, 0.0);
        assert!(!frame.boost_held());
        assert_eq!(frame.clamped_steer(0.12), 0.0);
    }

    #[test]
    fn test_boost_flag() {
        assert!(InputFrame::with_steer_boost(0.0).boost_held());
        assert!(!InputFrame::with_steer(0.5).boost_held());
    }

    #[test]
    fn test_steer_clamped_to_turn_rate() {
        assert_eq!(InputFrame::with_steer(10.0).clamped_steer(0.12), 0.12);
        assert_eq!(InputFrame::with_steer(-10.0).clamped_steer(0.12), -0.12);
        assert_eq!(InputFrame::with_steer(0.05).clamped_steer(0.12), 0.05);
    }

    #[test]
    fn test_non_finite_steer_ignored() {
        assert_eq!(InputFrame::with_steer(f32::NAN).clamped_steer(0.12), 0.0);
        assert_eq!(
            InputFrame::with_steer(f32::INFINITY).clamped_steer(0.12),
            0.0
        );
        assert_eq!(
            InputFrame::with_steer(f32::NEG_INFINITY).clamped_steer(0.12),
            0.0
        );
    }
}
