//! Cross-Snake Collision Detection
//!
//! Pairwise checks that need to compare entities across the arena. They
//! run on the post-movement state of every snake, so verdicts are
//! simultaneous-tick-consistent: every head has moved before any check,
//! and all verdicts are collected before any death is applied.

use std::collections::BTreeMap;

use crate::core::vec2::Vec2;
use crate::game::events::DeathCause;
use crate::game::state::{Arena, PlayerId};

/// Check whether two points lie within `radius` of each other.
#[inline]
pub fn points_within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

/// Collision sweep over all live snakes.
///
/// Returns each victim with the cause that killed it, keyed by player id.
/// A snake struck multiple ways in the same tick keeps the first verdict
/// in sweep order: self-collision, then pairs in ascending id order.
/// The verdicts are a pure function of the arena state; nothing is
/// mutated here, so iteration order can never privilege a snake.
pub fn check_all_collisions(arena: &Arena) -> BTreeMap<PlayerId, DeathCause> {
    let config = &arena.config;
    let mut verdicts: BTreeMap<PlayerId, DeathCause> = BTreeMap::new();

    // Immune or dead snakes take no part as victims; their bodies still
    // kill others.
    let vulnerable = |id: &PlayerId| {
        arena
            .get_snake(id)
            .map(|s| s.alive && !s.is_immune(arena.tick, config))
            .unwrap_or(false)
    };

    let ids: Vec<PlayerId> = arena
        .snakes
        .values()
        .filter(|s| s.alive)
        .map(|s| s.id)
        .collect();

    // Self-collision
    if config.self_collision {
        for id in &ids {
            if !vulnerable(id) {
                continue;
            }
            let snake = &arena.snakes[id];
            if snake.hits_own_body(config) {
                verdicts.entry(*id).or_insert(DeathCause::SelfCollision);
            }
        }
    }

    // Pairwise checks, each unordered pair visited once
    let body_radius = config.body_hit_radius();
    let head_radius = config.head_on_radius();

    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let (id_a, id_b) = (ids[i], ids[j]);
            let a = &arena.snakes[&id_a];
            let b = &arena.snakes[&id_b];

            // Head-on: both heads in the same cell this tick means both
            // die. No winner, regardless of length or iteration order.
            if points_within(a.head, b.head, head_radius) {
                if vulnerable(&id_a) {
                    verdicts
                        .entry(id_a)
                        .or_insert(DeathCause::HeadOn { other: id_b });
                }
                if vulnerable(&id_b) {
                    verdicts
                        .entry(id_b)
                        .or_insert(DeathCause::HeadOn { other: id_a });
                }
                continue;
            }

            // Head into the other's body: the head's owner dies.
            if vulnerable(&id_a)
                && b.segments()
                    .iter()
                    .any(|seg| points_within(a.head, *seg, body_radius))
            {
                verdicts
                    .entry(id_a)
                    .or_insert(DeathCause::Body { other: id_b });
            }
            if vulnerable(&id_b)
                && a.segments()
                    .iter()
                    .any(|seg| points_within(b.head, *seg, body_radius))
            {
                verdicts
                    .entry(id_b)
                    .or_insert(DeathCause::Body { other: id_a });
            }
        }
    }

    verdicts
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::ArenaConfig;

    fn arena_no_immunity() -> Arena {
        let config = ArenaConfig {
            spawn_immunity_ticks: 0,
            ..ArenaConfig::default()
        };
        Arena::new(800.0, 600.0, 1, config).expect("valid arena")
    }

    #[test]
    fn test_points_within() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!(points_within(a, b, 5.0));
        assert!(!points_within(a, b, 4.9));
    }

    #[test]
    fn test_head_on_kills_both() {
        let mut arena = arena_no_immunity();
        let id1 = PlayerId::new([1; 16]);
        let id2 = PlayerId::new([2; 16]);
        arena.add_snake(id1);
        arena.add_snake(id2);

        // Both snakes spawn at the same point: heads overlap.
        let verdicts = check_all_collisions(&arena);
        assert_eq!(
            verdicts.get(&id1),
            Some(&DeathCause::HeadOn { other: id2 })
        );
        assert_eq!(
            verdicts.get(&id2),
            Some(&DeathCause::HeadOn { other: id1 })
        );
    }

    #[test]
    fn test_head_into_body_kills_the_head_owner() {
        // Self-collision off so the overlapping spawn bodies cannot
        // produce a competing verdict.
        let config = ArenaConfig {
            spawn_immunity_ticks: 0,
            self_collision: false,
            ..ArenaConfig::default()
        };
        let mut arena = Arena::new(800.0, 600.0, 1, config).unwrap();
        let id1 = PlayerId::new([1; 16]);
        let id2 = PlayerId::new([2; 16]);
        arena.add_snake(id1);
        arena.add_snake(id2);

        // Snake 1's head onto the middle of snake 2's body; snake 2's
        // head far away from everything.
        let target = arena.snakes[&id2].segments()[7];
        arena.get_snake_mut(&id1).unwrap().head = target;
        arena.get_snake_mut(&id2).unwrap().head = Vec2::new(100.0, 100.0);

        let verdicts = check_all_collisions(&arena);
        assert_eq!(verdicts.get(&id1), Some(&DeathCause::Body { other: id2 }));
        assert_eq!(verdicts.get(&id2), None);
    }

    #[test]
    fn test_spawn_immunity_shields_victim() {
        let config = ArenaConfig::default(); // immunity enabled
        let mut arena = Arena::new(800.0, 600.0, 1, config).unwrap();
        let id1 = PlayerId::new([1; 16]);
        let id2 = PlayerId::new([2; 16]);
        arena.add_snake(id1);
        arena.add_snake(id2);

        // Overlapping spawns, but both within the immunity window.
        let verdicts = check_all_collisions(&arena);
        assert!(verdicts.is_empty());
    }

    #[test]
    fn test_dead_snakes_ignored() {
        let mut arena = arena_no_immunity();
        let id1 = PlayerId::new([1; 16]);
        let id2 = PlayerId::new([2; 16]);
        arena.add_snake(id1);
        arena.add_snake(id2);
        arena.get_snake_mut(&id2).unwrap().kill(0);

        // Overlapping heads, but one snake is already dead.
        let verdicts = check_all_collisions(&arena);
        assert!(verdicts.is_empty());
    }

    #[test]
    fn test_far_head_registers_nothing() {
        let mut arena = arena_no_immunity();
        let id1 = PlayerId::new([1; 16]);
        let id2 = PlayerId::new([2; 16]);
        arena.add_snake(id1);
        arena.add_snake(id2);
        arena.get_snake_mut(&id2).unwrap().head = Vec2::new(100.0, 100.0);

        let verdicts = check_all_collisions(&arena);
        // Snake 2's head is hundreds of units from every body segment.
        assert_eq!(verdicts.get(&id2), None);
        // Snake 1's head still sits on snake 2's spawn-overlapped body.
        assert_eq!(verdicts.get(&id1), Some(&DeathCause::Body { other: id2 }));
    }

    #[test]
    fn test_self_collision_verdict() {
        let mut arena = arena_no_immunity();
        let id = PlayerId::new([1; 16]);
        arena.add_snake(id);

        // Fold the head back onto the snake's own body.
        let own_segment = arena.snakes[&id].segments()[7];
        arena.get_snake_mut(&id).unwrap().head = own_segment;

        let verdicts = check_all_collisions(&arena);
        assert_eq!(verdicts.get(&id), Some(&DeathCause::SelfCollision));
    }

    #[test]
    fn test_self_collision_disabled() {
        let config = ArenaConfig {
            spawn_immunity_ticks: 0,
            self_collision: false,
            ..ArenaConfig::default()
        };
        let mut arena = Arena::new(800.0, 600.0, 1, config).unwrap();
        let id = PlayerId::new([1; 16]);
        arena.add_snake(id);

        let own_segment = arena.snakes[&id].segments()[7];
        arena.get_snake_mut(&id).unwrap().head = own_segment;

        let verdicts = check_all_collisions(&arena);
        assert!(verdicts.is_empty());
    }
}
