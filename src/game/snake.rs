//! Snake Entity
//!
//! One snake per connected player: head pose, heading, and the trailing
//! body. The head is integrated here; the body follows by resampling a
//! bounded history of head positions at fixed spacing, so growth never
//! changes how the body tracks the path already travelled.

use std::collections::VecDeque;
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::vec2::{normalize_angle, Vec2};
use crate::game::config::{ArenaConfig, REFERENCE_TICK_MS};
use crate::game::state::PlayerId;

/// Minimum head travel before a new trail sample is recorded.
///
/// Must stay below the per-tick travel at base speed, and must not scale
/// with segment spacing: sampling too sparsely turns the body into a
/// rigid line when the snake grows.
const TRAIL_SAMPLE_MIN_DIST: f32 = 2.0;

/// Head displacement in one step beyond which the body is re-laid instead
/// of dragged. Only wraparound teleports ever travel this far.
const TELEPORT_SNAP_DIST: f32 = 100.0;

/// Per-player snake state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snake {
    /// Owning player
    pub id: PlayerId,

    /// False once dead; never transitions back
    pub alive: bool,

    /// Accumulated score
    pub score: u32,

    /// Heading in radians, kept in `(-PI, PI]`
    pub angle: f32,

    /// Head position (not part of `segments`)
    pub head: Vec2,

    /// Tick the snake entered the arena
    pub spawned_tick: u32,

    /// Tick the snake died, once it has
    pub died_tick: Option<u32>,

    /// Body segments, nearest-head first
    segments: Vec<Vec2>,

    /// Segment count the body is resampled to; grows with food
    target_length: usize,

    /// Recent head positions, newest first, trimmed to body length
    trail: VecDeque<Vec2>,
}

impl Snake {
    /// Create a snake at `spawn`, facing left (`angle = PI`), with the
    /// configured number of segments laid out behind the head at
    /// `segment_dist` spacing.
    pub fn new(id: PlayerId, spawn: Vec2, tick: u32, config: &ArenaConfig) -> Self {
        let angle = PI;
        let behind = Vec2::from_angle(angle + PI);

        let segments: Vec<Vec2> = (1..=config.start_length)
            .map(|i| spawn + behind * (i as f32 * config.segment_dist))
            .collect();

        // Seed the trail with a straight line covering the whole body, so
        // the first resample reproduces the spawn layout exactly.
        let mut trail = VecDeque::new();
        trail.push_back(spawn);
        trail.push_back(spawn + behind * ((config.start_length + 1) as f32 * config.segment_dist));

        Self {
            id,
            alive: true,
            score: 0,
            angle,
            head: spawn,
            spawned_tick: tick,
            died_tick: None,
            segments,
            target_length: config.start_length,
            trail,
        }
    }

    /// Body segments, nearest-head first. The head itself is excluded.
    pub fn segments(&self) -> &[Vec2] {
        &self.segments
    }

    /// Current body length in segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the body has no segments (never happens for a snake
    /// built through `new` with a valid config).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Ticks survived so far, or from spawn to death once dead.
    pub fn survival_ticks(&self, current_tick: u32) -> u32 {
        self.died_tick
            .unwrap_or(current_tick)
            .saturating_sub(self.spawned_tick)
    }

    /// Whether the spawn-immunity window still shields this snake from
    /// body and head-on collisions.
    pub fn is_immune(&self, current_tick: u32, config: &ArenaConfig) -> bool {
        current_tick.saturating_sub(self.spawned_tick) < config.spawn_immunity_ticks
    }

    /// Apply a steering delta. The caller clamps the delta to the turn
    /// rate (`InputFrame::clamped_steer`); the heading is normalized back
    /// into `(-PI, PI]` afterwards.
    pub fn steer(&mut self, delta: f32) {
        self.angle = normalize_angle(self.angle + delta);
    }

    /// Advance the head along the current heading.
    ///
    /// `dt_ms` is elapsed real time; it is normalized to the 60 Hz
    /// reference tick so any tick driver yields the same average speed.
    /// Negative or non-finite `dt_ms` clamps to a no-op move.
    ///
    /// Only the head moves here; the trailing body is updated by
    /// `update_body` after the wall policy has been applied.
    pub fn advance(&mut self, dt_ms: f32, boost: bool, config: &ArenaConfig) {
        if !self.alive {
            return;
        }

        let dt = if dt_ms.is_finite() && dt_ms > 0.0 {
            dt_ms
        } else {
            0.0
        };

        let speed = if boost {
            config.sprint_speed
        } else {
            config.base_speed
        };
        let move_dist = speed * (dt / REFERENCE_TICK_MS);

        self.head += Vec2::from_angle(self.angle) * move_dist;
    }

    /// Apply the boundary policy to the post-move head position.
    ///
    /// With walls enabled, a head outside `[0, width] x [0, height]` kills
    /// the snake and the method returns true. With walls disabled the head
    /// wraps to the opposite edge and the check never fires.
    pub fn check_wall_collision(
        &mut self,
        width: f32,
        height: f32,
        tick: u32,
        config: &ArenaConfig,
    ) -> bool {
        if !self.alive {
            return false;
        }

        if config.walls_enabled {
            if self.head.x < 0.0 || self.head.x > width || self.head.y < 0.0 || self.head.y > height
            {
                self.kill(tick);
                return true;
            }
        } else {
            if self.head.x < 0.0 {
                self.head.x = width;
            } else if self.head.x > width {
                self.head.x = 0.0;
            }
            if self.head.y < 0.0 {
                self.head.y = height;
            } else if self.head.y > height {
                self.head.y = 0.0;
            }
        }
        false
    }

    /// Record the head into the trail and resample the body at
    /// `segment_dist` intervals. Called once per tick, after movement and
    /// the wall policy.
    pub fn update_body(&mut self, config: &ArenaConfig) {
        if !self.alive {
            return;
        }

        match self.trail.front().map(|p| p.distance(self.head)) {
            Some(step) if step > TELEPORT_SNAP_DIST => {
                // Wraparound teleport: dragging the trail across the jump
                // would lay the body through the middle of the arena.
                self.reseed_trail(config);
            }
            Some(step) if step >= TRAIL_SAMPLE_MIN_DIST => {
                self.trail.push_front(self.head);
            }
            Some(_) => {
                // Not enough travel for a fresh sample; keep the first
                // trail point glued to the head.
                if let Some(front) = self.trail.front_mut() {
                    *front = self.head;
                }
            }
            None => self.trail.push_front(self.head),
        }

        let max_needed = (self.target_length as f32 + 1.0) * config.segment_dist;
        self.trim_trail(max_needed);

        self.rebuild_segments(config);
    }

    /// Consume one food item: extend the body and bump the score.
    ///
    /// The new segments stack on the tail and spread out over the next
    /// resamples, so `segments` grows by exactly `growth_per_food` at the
    /// consumption event itself.
    pub fn grow(&mut self, config: &ArenaConfig) {
        let tail = *self.segments.last().unwrap_or(&self.head);
        for _ in 0..config.growth_per_food {
            self.segments.push(tail);
        }
        self.target_length += config.growth_per_food;
        self.score = self.score.saturating_add(config.score_per_food);
    }

    /// Whether the head currently overlaps the snake's own body, skipping
    /// the neck segments right behind the head.
    pub fn hits_own_body(&self, config: &ArenaConfig) -> bool {
        let radius = config.self_hit_radius();
        let radius_sq = radius * radius;
        self.segments
            .iter()
            .skip(ArenaConfig::NECK_SEGMENTS)
            .any(|seg| self.head.distance_squared(*seg) < radius_sq)
    }

    /// Mark the snake dead. The transition is one-way; calling this on an
    /// already dead snake keeps the original death tick.
    pub fn kill(&mut self, tick: u32) {
        if self.alive {
            self.alive = false;
            self.died_tick = Some(tick);
        }
    }

    fn reseed_trail(&mut self, config: &ArenaConfig) {
        let behind = Vec2::from_angle(self.angle + PI);
        self.trail.clear();
        self.trail.push_back(self.head);
        self.trail
            .push_back(self.head + behind * ((self.target_length + 1) as f32 * config.segment_dist));
    }

    fn trim_trail(&mut self, max_len: f32) {
        let mut acc = 0.0;
        for i in 0..self.trail.len().saturating_sub(1) {
            let a = self.trail[i];
            let b = self.trail[i + 1];
            acc += a.distance(b);
            if acc > max_len {
                let keep = i + 2;
                while self.trail.len() > keep {
                    self.trail.pop_back();
                }
                return;
            }
        }
    }

    fn rebuild_segments(&mut self, config: &ArenaConfig) {
        if self.segments.len() != self.target_length {
            self.segments.resize(self.target_length, self.head);
        }

        for i in 0..self.target_length {
            let dist = (i + 1) as f32 * config.segment_dist;
            self.segments[i] = self.sample_trail(dist);
        }
    }

    /// Walk the trail from the head, returning the point `distance_from_head`
    /// along it. Past the recorded end, the oldest sample is returned.
    fn sample_trail(&self, distance_from_head: f32) -> Vec2 {
        if self.trail.len() <= 1 {
            return self.head;
        }

        let mut remaining = distance_from_head;
        for i in 0..self.trail.len() - 1 {
            let a = self.trail[i];
            let b = self.trail[i + 1];
            let seg_len = a.distance(b);
            if seg_len <= 1e-4 {
                continue;
            }

            if remaining <= seg_len {
                let t = remaining / seg_len;
                return a.lerp(b, t);
            }

            remaining -= seg_len;
        }

        *self.trail.back().unwrap_or(&self.head)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ArenaConfig {
        ArenaConfig::default()
    }

    fn snake_at(x: f32, y: f32) -> Snake {
        Snake::new(PlayerId::new([1; 16]), Vec2::new(x, y), 0, &config())
    }

    #[test]
    fn test_spawn_layout() {
        let snake = snake_at(600.0, 300.0);
        let config = config();

        assert!(snake.alive);
        assert_eq!(snake.score, 0);
        assert_eq!(snake.angle, PI);
        assert_eq!(snake.len(), config.start_length);

        // Facing left, so the body extends to the right of the head.
        for (i, seg) in snake.segments().iter().enumerate() {
            let expected_x = 600.0 + (i + 1) as f32 * config.segment_dist;
            assert!(
                (seg.x - expected_x).abs() < 1e-2,
                "segment {i} at x={}, expected {expected_x}",
                seg.x
            );
            assert!((seg.y - 300.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_move_left_at_base_speed() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        // One 60 Hz tick at base speed moves the head ~3.5 units left.
        snake.advance(16.67, false, &config);
        assert!((snake.head.x - (600.0 - 3.5)).abs() < 0.01);
        assert!((snake.head.y - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_boost_uses_sprint_speed() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        snake.advance(16.67, true, &config);
        assert!((snake.head.x - (600.0 - 6.5)).abs() < 0.01);
    }

    #[test]
    fn test_negative_dt_is_noop() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();
        let before = snake.head;

        snake.advance(-16.67, false, &config);
        assert_eq!(snake.head, before);

        snake.advance(f32::NAN, false, &config);
        assert_eq!(snake.head, before);
    }

    #[test]
    fn test_dt_normalization_is_frame_rate_independent() {
        let config = config();

        // One 33.33 ms tick vs two 16.67 ms ticks travel the same distance.
        let mut slow = snake_at(600.0, 300.0);
        slow.advance(2.0 * REFERENCE_TICK_MS, false, &config);

        let mut fast = snake_at(600.0, 300.0);
        fast.advance(REFERENCE_TICK_MS, false, &config);
        fast.advance(REFERENCE_TICK_MS, false, &config);

        assert!((slow.head.x - fast.head.x).abs() < 1e-3);
    }

    #[test]
    fn test_wall_collision_kills() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        snake.head = Vec2::new(-1.0, 300.0);
        assert!(snake.check_wall_collision(800.0, 600.0, 42, &config));
        assert!(!snake.alive);
        assert_eq!(snake.died_tick, Some(42));

        // Death is one-way: a later in-bounds check never revives.
        snake.head = Vec2::new(400.0, 300.0);
        assert!(!snake.check_wall_collision(800.0, 600.0, 43, &config));
        assert!(!snake.alive);
        assert_eq!(snake.died_tick, Some(42));
    }

    #[test]
    fn test_walls_disabled_wraps() {
        let mut snake = snake_at(600.0, 300.0);
        let config = ArenaConfig {
            walls_enabled: false,
            ..config()
        };

        snake.head = Vec2::new(-1.0, 300.0);
        assert!(!snake.check_wall_collision(800.0, 600.0, 0, &config));
        assert!(snake.alive);
        assert_eq!(snake.head.x, 800.0);

        snake.head = Vec2::new(400.0, 601.0);
        assert!(!snake.check_wall_collision(800.0, 600.0, 0, &config));
        assert_eq!(snake.head.y, 0.0);
    }

    #[test]
    fn test_grow_extends_by_exact_amount() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        assert_eq!(snake.len(), 15);
        snake.grow(&config);
        assert_eq!(snake.len(), 20);
        assert_eq!(snake.score, config.score_per_food);

        snake.grow(&config);
        assert_eq!(snake.len(), 25);
        assert_eq!(snake.score, 2 * config.score_per_food);
    }

    #[test]
    fn test_length_never_shrinks_while_moving() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        let mut previous = snake.len();
        for tick in 0..120 {
            snake.steer(0.05);
            snake.advance(REFERENCE_TICK_MS, false, &config);
            snake.update_body(&config);
            if tick == 40 {
                snake.grow(&config);
            }
            assert!(snake.len() >= previous);
            previous = snake.len();
        }
        assert_eq!(snake.len(), 20);
    }

    #[test]
    fn test_body_follows_head_on_straight_path() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        for _ in 0..60 {
            snake.advance(REFERENCE_TICK_MS, false, &config);
            snake.update_body(&config);
        }

        // Moving straight left, every segment sits segment_dist behind
        // the one before it, on the head's path.
        for (i, seg) in snake.segments().iter().enumerate() {
            let expected_x = snake.head.x + (i + 1) as f32 * config.segment_dist;
            assert!(
                (seg.x - expected_x).abs() < 0.1,
                "segment {i} at x={} expected {expected_x}",
                seg.x
            );
            assert!((seg.y - 300.0).abs() < 0.1);
        }
    }

    #[test]
    fn test_segment_spacing_preserved_through_turns() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        for _ in 0..200 {
            snake.steer(0.08);
            snake.advance(REFERENCE_TICK_MS, false, &config);
            snake.update_body(&config);
        }

        // Consecutive segments stay near the configured spacing even on a
        // curved path (chord length is slightly under arc length).
        let segs = snake.segments();
        for pair in segs.windows(2) {
            let gap = pair[0].distance(pair[1]);
            assert!(
                gap > 0.5 * config.segment_dist && gap < 1.5 * config.segment_dist,
                "segment gap {gap} out of range"
            );
        }
    }

    #[test]
    fn test_angle_stays_normalized() {
        let mut snake = snake_at(600.0, 300.0);

        for _ in 0..200 {
            snake.steer(0.12);
            assert!(snake.angle > -PI && snake.angle <= PI);
        }
        for _ in 0..400 {
            snake.steer(-0.12);
            assert!(snake.angle > -PI && snake.angle <= PI);
        }
    }

    #[test]
    fn test_self_collision_detected_beyond_neck() {
        let mut snake = snake_at(600.0, 300.0);
        let config = config();

        // Head apart from the body: no hit.
        assert!(!snake.hits_own_body(&config));

        // Teleport the head onto the 6th body segment (well past the
        // neck gap) without updating the body.
        snake.head = Vec2::new(660.0, 300.0);
        assert!(snake.hits_own_body(&config));

        // On the first neck segment: ignored.
        snake.head = Vec2::new(610.0, 300.0);
        assert!(!snake.hits_own_body(&config));
    }

    #[test]
    fn test_spawn_immunity_window() {
        let config = config();
        let snake = Snake::new(PlayerId::new([1; 16]), Vec2::ZERO, 100, &config);

        assert!(snake.is_immune(100, &config));
        assert!(snake.is_immune(100 + config.spawn_immunity_ticks - 1, &config));
        assert!(!snake.is_immune(100 + config.spawn_immunity_ticks, &config));
    }

    #[test]
    fn test_survival_ticks() {
        let config = config();
        let mut snake = Snake::new(PlayerId::new([1; 16]), Vec2::ZERO, 100, &config);

        assert_eq!(snake.survival_ticks(160), 60);
        snake.kill(220);
        assert_eq!(snake.survival_ticks(500), 120);
    }
}
