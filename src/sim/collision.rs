//! Collision detection and response
//!
//! Runs once per tick after every entity has moved. Detection reads only the
//! post-movement hitboxes; responses are applied afterwards, so the result
//! does not depend on the order entities are stored in.
//!
//! The pair scan is O(n²). That is fine for the capped enemy counts this game
//! uses, but it is the first thing to replace (with a grid or sweep-and-prune)
//! if the cap grows into the hundreds.

use super::countdown::Countdown;
use super::entity::Entity;
use super::state::GameEvent;

/// What the arbiter did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Contacts that cost the player time
    pub penalties: u32,
    /// Seconds actually removed from the countdown
    pub penalty_seconds: i32,
    /// Enemies overlapping the player
    pub player_contacts: u32,
    /// Overlapping enemy pairs
    pub enemy_contacts: u32,
}

/// Detect overlaps and apply the response policy:
///
/// - player × enemy, first tick of contact: penalty once, latch `has_collided`, bounce
/// - player × enemy, continued contact: bounce only
/// - player × enemy, apart: clear `has_collided` so the next contact counts
/// - enemy × enemy: both bounce every tick they overlap, no penalty
///
/// An enemy bounces at most once per tick however many overlaps it has.
pub fn resolve_collisions(
    entities: &mut [Entity],
    countdown: &mut Countdown,
    events: &mut Vec<GameEvent>,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let player_index = entities.iter().position(|e| e.is_player());
    let mut touching_player = vec![false; entities.len()];
    let mut bounce = vec![false; entities.len()];

    // Detect
    if let Some(p) = player_index {
        let player_box = *entities[p].hitbox();
        for (i, entity) in entities.iter().enumerate() {
            if i != p && entity.hitbox().overlaps(&player_box) {
                touching_player[i] = true;
                bounce[i] = true;
                report.player_contacts += 1;
            }
        }
    }
    for i in 0..entities.len() {
        if Some(i) == player_index {
            continue;
        }
        for j in (i + 1)..entities.len() {
            if Some(j) == player_index {
                continue;
            }
            if entities[i].hitbox().overlaps(entities[j].hitbox()) {
                bounce[i] = true;
                bounce[j] = true;
                report.enemy_contacts += 1;
            }
        }
    }

    // Apply
    for (i, entity) in entities.iter_mut().enumerate() {
        if Some(i) == player_index {
            continue;
        }
        if touching_player[i] {
            if !entity.has_collided {
                entity.has_collided = true;
                let change = countdown.apply_penalty(entity.penalty_secs());
                if change.applied > 0 {
                    report.penalties += 1;
                    report.penalty_seconds += change.applied;
                    if let Some(archetype) = entity.archetype() {
                        log::info!(
                            "{} #{} cost {} s, {} s left",
                            archetype.name(),
                            entity.id,
                            change.applied,
                            countdown.remaining()
                        );
                        events.push(GameEvent::PenaltyApplied {
                            enemy_id: entity.id,
                            archetype,
                            seconds: change.applied,
                            remaining: countdown.remaining(),
                        });
                    }
                }
            }
        } else {
            entity.has_collided = false;
        }
        if bounce[i] {
            entity.vel = -entity.vel;
        }
    }

    report
}
