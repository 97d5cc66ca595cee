//! Fixed timestep simulation tick
//!
//! Each phase runs for every entity before the next phase starts, so no
//! entity ever sees a half-updated sibling:
//!
//! input → wander → movement → animation → collisions → spawning

use super::animation::{Facing, select_facing};
use super::collision::{CollisionReport, resolve_collisions};
use super::entity::{DirectionSet, player_velocity};
use super::movement::{integrate, wander};
use super::spawner::try_spawn;
use super::state::{GamePhase, GameState};
use crate::error::ConfigError;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Replace the held direction keys (None keeps the previous set)
    pub directions: Option<DirectionSet>,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The tick ran (false while paused or after game over)
    pub ran: bool,
    pub collisions: CollisionReport,
    /// Entities that hit an arena edge
    pub edge_hits: u32,
    pub spawned: Option<u32>,
    /// This tick ended the game
    pub game_over: bool,
}

/// Advance the game state by one fixed timestep. A negative or non-finite
/// `dt_ms` is treated as zero elapsed time.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) -> Result<StepReport, ConfigError> {
    let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
    let mut report = StepReport::default();
    if state.phase != GamePhase::Playing {
        return Ok(report);
    }
    report.ran = true;

    // Input: the player's velocity comes only from held keys
    if let Some(directions) = input.directions {
        state.input = directions;
    }
    let held = state.input;
    let speed = state.player_speed;
    if let Some(player) = state.player_mut() {
        player.vel = player_velocity(&held, speed);
    }

    // Wander: enemies occasionally pick a new direction
    for entity in state.entities.iter_mut() {
        wander(entity, &mut state.rng);
    }

    // Movement for everyone
    let arena = state.arena;
    for entity in state.entities.iter_mut() {
        if integrate(entity, &arena, dt_ms).any() {
            report.edge_hits += 1;
        }
    }

    // Animation from the new velocities
    let threshold = state.facing_threshold;
    for entity in state.entities.iter_mut() {
        let facing = if entity.is_player() && held.is_empty() {
            Facing::Idle
        } else {
            select_facing(entity.vel, entity.facing(), entity.role.facing_bias(), threshold)
        };
        entity.set_facing(facing);
        entity.advance_animation(dt_ms);
        entity.confine(&arena);
    }

    state.stats.ticks += 1;
    state.stats.elapsed_ms += dt_ms as f64;

    // Collisions against post-movement positions
    report.collisions = resolve_collisions(&mut state.entities, &mut state.countdown, &mut state.events);
    state.stats.penalties += report.collisions.penalties;
    state.stats.penalty_seconds += report.collisions.penalty_seconds.max(0) as u32;
    if state.finish_if_expired() {
        report.game_over = true;
        return Ok(report);
    }

    // Spawning
    state.spawner.update(dt_ms);
    report.spawned = try_spawn(state)?;

    // Ensure deterministic ordering
    state.normalize_order();
    Ok(report)
}
