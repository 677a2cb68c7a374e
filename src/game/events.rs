//! Game Events
//!
//! Events generated during simulation, consumed by the broadcast and
//! persistence collaborators.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::state::PlayerId;
use crate::TICK_RATE;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Snake deaths processed first
    Death = 0,
    /// Then food pickups
    FoodEaten = 1,
    /// Then food respawns
    FoodSpawned = 2,
    /// Then joins/leaves
    Membership = 3,
    /// Lowest priority
    Other = 255,
}

/// How a snake died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Head left the arena bounds
    Wall,
    /// Head ran into the snake's own body
    SelfCollision,
    /// Head ran into another snake's body
    Body {
        /// Owner of the body that was hit
        other: PlayerId,
    },
    /// Two heads met in the same tick; both die
    HeadOn {
        /// The other snake in the head-on collision
        other: PlayerId,
    },
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A snake joined the arena
    SnakeJoined {
        /// The joining player
        player_id: PlayerId,
        /// Where the snake spawned
        spawn: Vec2,
    },

    /// A snake left the arena (disconnect or match teardown)
    SnakeLeft {
        /// The leaving player
        player_id: PlayerId,
    },

    /// A snake died
    SnakeDied {
        /// The dead player
        player_id: PlayerId,
        /// What killed it
        cause: DeathCause,
        /// Final score
        score: u32,
        /// Ticks survived from spawn to death
        survival_ticks: u32,
    },

    /// A snake ate the food item
    FoodEaten {
        /// The eating player
        player_id: PlayerId,
        /// Where the food was
        position: Vec2,
        /// Score after eating
        new_score: u32,
        /// Body length after growing
        new_length: usize,
    },

    /// A new food item appeared
    FoodSpawned {
        /// Where it spawned
        position: Vec2,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Player involved (for tie-breaking)
    pub player_id: Option<PlayerId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        let player_id = match &data {
            GameEventData::SnakeJoined { player_id, .. } => Some(*player_id),
            GameEventData::SnakeLeft { player_id } => Some(*player_id),
            GameEventData::SnakeDied { player_id, .. } => Some(*player_id),
            GameEventData::FoodEaten { player_id, .. } => Some(*player_id),
            GameEventData::FoodSpawned { .. } => None,
        };

        Self {
            tick,
            priority,
            player_id,
            data,
        }
    }

    /// Create snake joined event.
    pub fn snake_joined(tick: u32, player_id: PlayerId, spawn: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::Membership,
            GameEventData::SnakeJoined { player_id, spawn },
        )
    }

    /// Create snake left event.
    pub fn snake_left(tick: u32, player_id: PlayerId) -> Self {
        Self::new(
            tick,
            EventPriority::Membership,
            GameEventData::SnakeLeft { player_id },
        )
    }

    /// Create snake died event.
    pub fn snake_died(
        tick: u32,
        player_id: PlayerId,
        cause: DeathCause,
        score: u32,
        survival_ticks: u32,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::Death,
            GameEventData::SnakeDied {
                player_id,
                cause,
                score,
                survival_ticks,
            },
        )
    }

    /// Create food eaten event.
    pub fn food_eaten(
        tick: u32,
        player_id: PlayerId,
        position: Vec2,
        new_score: u32,
        new_length: usize,
    ) -> Self {
        Self::new(
            tick,
            EventPriority::FoodEaten,
            GameEventData::FoodEaten {
                player_id,
                position,
                new_score,
                new_length,
            },
        )
    }

    /// Create food spawned event.
    pub fn food_spawned(tick: u32, position: Vec2) -> Self {
        Self::new(
            tick,
            EventPriority::FoodSpawned,
            GameEventData::FoodSpawned { position },
        )
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.player_id == other.player_id
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then player_id
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.player_id.cmp(&other.player_id))
    }
}

/// Terminal result for one snake, emitted exactly once per player: on
/// death, or on leave if the player disconnects while still alive.
///
/// This is the shape the persistence collaborator's score-submission
/// endpoint consumes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The player this result belongs to
    pub player_id: PlayerId,
    /// Final score
    pub score: u32,
    /// Time survived, in seconds
    pub duration_seconds: f32,
}

impl MatchResult {
    /// Build a result from a survival span measured in ticks.
    pub fn from_ticks(player_id: PlayerId, score: u32, survival_ticks: u32) -> Self {
        Self {
            player_id,
            score,
            duration_seconds: survival_ticks as f32 / TICK_RATE as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        let id1 = PlayerId::new([1; 16]);
        let id2 = PlayerId::new([2; 16]);

        let death = GameEvent::snake_died(10, id1, DeathCause::Wall, 0, 100);
        let food = GameEvent::food_eaten(10, id1, Vec2::ZERO, 10, 20);
        let death2 = GameEvent::snake_died(10, id2, DeathCause::Wall, 0, 100);

        // Same tick, but death < food pickup
        assert!(death < food);

        // Same tick and priority, but id1 < id2
        assert!(death < death2);
    }

    #[test]
    fn test_result_duration() {
        let id = PlayerId::new([7; 16]);
        let result = MatchResult::from_ticks(id, 120, 600);
        assert_eq!(result.score, 120);
        assert!((result.duration_seconds - 10.0).abs() < 1e-6);
    }
}
