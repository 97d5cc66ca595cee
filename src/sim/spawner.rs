//! Enemy spawning
//!
//! `EnemyManager` is a two-state machine: ready or cooling down. A spawn
//! happens only when ready and below the live-enemy cap; otherwise the attempt
//! is a silent no-op and the next tick tries again.

use glam::Vec2;
use rand::Rng;

use super::entity::{Archetype, EntitySpec, Role};
use super::geometry::{Arena, Hitbox};
use super::movement::random_direction;
use super::state::{GameEvent, GameState};
use crate::clamp_to_bounds;
use crate::consts::SPAWN_PLACEMENT_ATTEMPTS;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Spawn cap and cooldown bookkeeping. Holds no entity references; the live
/// count is read from the game state on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyManager {
    max_enemies: usize,
    cooldown_ms: f32,
    on_cooldown: bool,
    elapsed_cooldown_ms: f32,
    band_inset: f32,
    safe_distance: f32,
}

impl EnemyManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            max_enemies: settings.max_enemies,
            cooldown_ms: settings.spawn_cooldown_ms,
            on_cooldown: false,
            elapsed_cooldown_ms: 0.0,
            band_inset: settings.spawn_band_inset,
            safe_distance: settings.spawn_safe_distance,
        }
    }

    pub fn max_enemies(&self) -> usize {
        self.max_enemies
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.on_cooldown
    }

    pub fn elapsed_cooldown_ms(&self) -> f32 {
        self.elapsed_cooldown_ms
    }

    pub fn can_spawn(&self, live_enemies: usize) -> bool {
        live_enemies < self.max_enemies && !self.on_cooldown
    }

    /// Accumulate cooldown time; leaves cooldown once the duration has passed
    pub fn update(&mut self, dt_ms: f32) {
        if !self.on_cooldown {
            return;
        }
        self.elapsed_cooldown_ms += dt_ms;
        if self.elapsed_cooldown_ms >= self.cooldown_ms {
            self.on_cooldown = false;
            self.elapsed_cooldown_ms = 0.0;
        }
    }

    pub fn reset(&mut self) {
        self.on_cooldown = false;
        self.elapsed_cooldown_ms = 0.0;
    }

    fn start_cooldown(&mut self) {
        self.on_cooldown = true;
        self.elapsed_cooldown_ms = 0.0;
    }

    /// Random top-left position inside the vertical spawn band and clear of
    /// the player. `None` when no attempt found a free spot.
    pub fn pick_spawn_point<R: Rng + ?Sized>(
        &self,
        arena: &Arena,
        size: Vec2,
        player: Option<&Hitbox>,
        rng: &mut R,
    ) -> Option<Vec2> {
        let max = arena.max_position(size);
        let band_top = self.band_inset.min(max.y);
        let band_bottom = (arena.height - self.band_inset - size.y).clamp(band_top, max.y);

        for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
            let x = if max.x > 0.0 { rng.random_range(0.0..=max.x) } else { 0.0 };
            let y = if band_bottom > band_top {
                rng.random_range(band_top..=band_bottom)
            } else {
                band_top
            };
            let pos = Vec2::new(x, y);
            let center = pos + size * 0.5;
            let clear = player.is_none_or(|p| p.center().distance(center) >= self.safe_distance);
            if clear {
                return Some(pos);
            }
        }
        None
    }
}

/// Try to spawn a random enemy. `Ok(None)` is the normal refusal: cap
/// reached, cooling down, or no free spot this tick.
pub fn try_spawn(state: &mut GameState) -> Result<Option<u32>, ConfigError> {
    if !state.spawner.can_spawn(state.enemy_count()) {
        return Ok(None);
    }

    let archetype = Archetype::ALL[state.rng.random_range(0..Archetype::ALL.len())];
    let size = Role::Enemy(archetype).sprite_size(state.library())?;
    let player = state.player().map(|p| *p.hitbox());
    let Some(pos) = state
        .spawner
        .pick_spawn_point(&state.arena, size, player.as_ref(), &mut state.rng)
    else {
        log::warn!("No free spawn point for a {} this tick", archetype.name());
        return Ok(None);
    };

    spawn(state, archetype, pos).map(Some)
}

/// Spawn a specific archetype at an explicit position, subject to the same
/// cap and cooldown as random spawns. The position is clamped into the arena.
pub fn spawn_at(state: &mut GameState, archetype: Archetype, pos: Vec2) -> Result<Option<u32>, ConfigError> {
    if !state.spawner.can_spawn(state.enemy_count()) {
        log::debug!("Spawn of {} refused (cap or cooldown)", archetype.name());
        return Ok(None);
    }
    if !pos.is_finite() {
        return Err(ConfigError::NonFinitePosition { x: pos.x, y: pos.y });
    }
    let size = Role::Enemy(archetype).sprite_size(state.library())?;
    let pos = clamp_to_bounds(pos, size, state.arena.bounds());
    spawn(state, archetype, pos).map(Some)
}

fn spawn(state: &mut GameState, archetype: Archetype, pos: Vec2) -> Result<u32, ConfigError> {
    let vel = random_direction(&mut state.rng, archetype.stats().speed);
    let id = state.add_entity(EntitySpec::enemy(archetype, pos, vel))?;
    state.spawner.start_cooldown();
    state.stats.enemies_spawned += 1;
    state.events.push(GameEvent::EnemySpawned { id, archetype });
    log::info!(
        "Spawned {} #{} at ({:.0}, {:.0}), {} live",
        archetype.name(),
        id,
        pos.x,
        pos.y,
        state.enemy_count()
    );
    Ok(id)
}
