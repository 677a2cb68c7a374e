//! Authoritative Simulation Tick
//!
//! One call advances the whole arena by one step. Within a tick the three
//! phases run strictly in order, each completing for every snake before
//! the next begins:
//!
//! 1. steering + movement + boundary policy
//! 2. food consumption and respawn
//! 3. pairwise collision on the post-movement state
//!
//! Queued joins and leaves are applied only at the tick boundary, before
//! phase 1, so no snake appears or disappears mid-phase.

use std::collections::BTreeMap;

use crate::game::collision::{check_all_collisions, points_within};
use crate::game::events::{DeathCause, GameEvent, MatchResult};
use crate::game::input::InputFrame;
use crate::game::state::{Arena, PlayerId};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Terminal results produced this tick (deaths and live leaves),
    /// for the persistence collaborator
    pub results: Vec<MatchResult>,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `arena` - The arena (will be mutated)
/// * `inputs` - Player inputs for this tick (BTreeMap for deterministic
///   order); players without an entry coast straight ahead
/// * `dt_ms` - Elapsed real time since the previous tick, milliseconds
///
/// An arena with no snakes only advances its tick counter. A single
/// player's malformed input (non-finite steer, out-of-range delta) is
/// clamped and can never abort the tick for the others.
pub fn advance_tick(
    arena: &mut Arena,
    inputs: &BTreeMap<PlayerId, InputFrame>,
    dt_ms: f32,
) -> TickResult {
    let config = arena.config.clone();
    let mut results = Vec::new();

    // Tick boundary: apply queued leaves, then joins.
    for id in arena.take_pending_leaves() {
        if let Some(snake) = arena.remove_snake(&id) {
            let tick = arena.tick;
            arena.push_event(GameEvent::snake_left(tick, id));
            if snake.alive {
                // Disconnected while alive: emit the terminal result now.
                results.push(MatchResult::from_ticks(
                    id,
                    snake.score,
                    snake.survival_ticks(tick),
                ));
            }
        }
    }
    for id in arena.take_pending_joins() {
        arena.add_snake(id);
    }

    arena.tick += 1;
    let tick = arena.tick;

    let ids: Vec<PlayerId> = arena.snakes.keys().copied().collect();
    let mut deaths: Vec<(PlayerId, DeathCause)> = Vec::new();

    // Phase 1: steering, movement, boundary policy. Every head moves
    // before any cross-snake check.
    let (width, height) = (arena.width, arena.height);
    for id in &ids {
        let frame = inputs.get(id).copied().unwrap_or_default();
        let snake = match arena.get_snake_mut(id) {
            Some(s) if s.alive => s,
            _ => continue,
        };

        snake.steer(frame.clamped_steer(config.turn_speed));
        snake.advance(dt_ms, frame.boost_held(), &config);
        if snake.check_wall_collision(width, height, tick, &config) {
            deaths.push((*id, DeathCause::Wall));
        } else {
            snake.update_body(&config);
        }
    }

    // Phase 2: food. The single item goes to the first head (id order)
    // inside the pickup radius; respawn is immediate, so food is None
    // only within this block.
    if let Some(food_pos) = arena.food {
        let pickup = config.food_pickup_radius();
        let eater = ids.iter().copied().find(|id| {
            arena
                .get_snake(id)
                .map(|s| s.alive && points_within(s.head, food_pos, pickup))
                .unwrap_or(false)
        });

        if let Some(id) = eater {
            arena.food = None;
            let snake = arena.get_snake_mut(&id).expect("eater exists");
            snake.grow(&config);
            let (new_score, new_length) = (snake.score, snake.len());
            arena.push_event(GameEvent::food_eaten(
                tick, id, food_pos, new_score, new_length,
            ));
            arena.spawn_food();
        }
    }

    // Phase 3: pairwise collision. All verdicts are computed against the
    // post-movement state before any death is applied, so two heads
    // meeting in the same tick both register.
    let verdicts = check_all_collisions(arena);
    for (id, cause) in verdicts {
        deaths.push((id, cause));
    }

    // Finalize deaths: flip alive, emit the event and the terminal result.
    for (id, cause) in deaths {
        if let Some(snake) = arena.get_snake_mut(&id) {
            snake.kill(tick);
            let (score, survival) = (snake.score, snake.survival_ticks(tick));
            arena.push_event(GameEvent::snake_died(tick, id, cause, score, survival));
            results.push(MatchResult::from_ticks(id, score, survival));
        }
    }

    TickResult {
        events: arena.take_events(),
        results,
    }
}

// =============================================================================
// TESTS
// =============================================================================
