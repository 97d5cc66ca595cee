//! Game state and core simulation types
//!
//! The entity list here is the single source of truth for what is alive.
//! Other systems refer to entities by id and look them up in this list.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::AnimationLibrary;
use super::countdown::Countdown;
use super::entity::{Archetype, DirectionSet, Entity, EntitySpec, Role};
use super::geometry::Arena;
use super::spawner::EnemyManager;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Both cadences suspended
    Paused,
    /// Countdown ran out
    GameOver,
}

/// Running totals for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Simulation ticks run
    pub ticks: u64,
    /// Simulated milliseconds survived
    pub elapsed_ms: f64,
    /// Penalising contacts
    pub penalties: u32,
    /// Seconds lost to penalties
    pub penalty_seconds: u32,
    pub enemies_spawned: u32,
}

/// Notifications for sound and presentation collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned {
        id: u32,
        archetype: Archetype,
    },
    PenaltyApplied {
        enemy_id: u32,
        archetype: Archetype,
        seconds: i32,
        remaining: i32,
    },
    SecondElapsed {
        remaining: i32,
    },
    GameOver {
        stats: SessionStats,
    },
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub arena: Arena,
    pub phase: GamePhase,
    /// Live entities, sorted by id; the player is always first
    pub entities: Vec<Entity>,
    pub countdown: Countdown,
    pub spawner: EnemyManager,
    pub stats: SessionStats,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Keys held by the player
    pub input: DirectionSet,
    pub player_speed: f32,
    pub facing_threshold: f32,
    pub(crate) rng: Pcg32,
    library: Arc<AnimationLibrary>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the player at its spawn point
    pub fn new(settings: &Settings, arena: Arena, library: Arc<AnimationLibrary>) -> Result<Self, ConfigError> {
        validate_arena(settings, &arena, &library)?;

        let mut state = Self {
            arena,
            phase: GamePhase::Playing,
            entities: Vec::new(),
            countdown: Countdown::new(settings.start_seconds),
            spawner: EnemyManager::new(settings),
            stats: SessionStats::default(),
            events: Vec::new(),
            input: DirectionSet::empty(),
            player_speed: settings.player_speed,
            facing_threshold: settings.facing_threshold,
            rng: Pcg32::seed_from_u64(settings.seed),
            library,
            next_id: 1,
        };

        let id = state.next_entity_id();
        let spawn = Vec2::new(settings.player_spawn.0, settings.player_spawn.1);
        let mut player = Entity::new(id, EntitySpec::player(spawn), &state.library)?;
        player.confine(&state.arena);
        state.entities.push(player);

        log::info!(
            "New run: arena {}x{}, {} s on the clock, seed {}",
            arena.width,
            arena.height,
            settings.start_seconds,
            settings.seed
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.is_player())
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.is_player())
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies().count()
    }

    /// Build and insert an entity, returning its id
    pub fn add_entity(&mut self, spec: EntitySpec) -> Result<u32, ConfigError> {
        let id = self.next_entity_id();
        let entity = Entity::new(id, spec, &self.library)?;
        self.entities.push(entity);
        self.normalize_order();
        Ok(id)
    }

    /// Latch game over once the countdown has expired
    pub fn finish_if_expired(&mut self) -> bool {
        if !self.countdown.is_game_over() || self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {:.1} s ({} penalties, {} s lost)",
            self.stats.elapsed_ms / 1000.0,
            self.stats.penalties,
            self.stats.penalty_seconds
        );
        self.events.push(GameEvent::GameOver { stats: self.stats });
        true
    }

    /// Hand queued events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}

/// The arena must hold every sprite and leave room for the spawn band
fn validate_arena(settings: &Settings, arena: &Arena, library: &AnimationLibrary) -> Result<(), ConfigError> {
    let too_small = |reason: String| ConfigError::ArenaTooSmall {
        width: arena.width,
        height: arena.height,
        reason,
    };
    if !(arena.width.is_finite() && arena.height.is_finite() && arena.width > 0.0 && arena.height > 0.0) {
        return Err(too_small("dimensions must be positive".to_string()));
    }

    let player = Role::Player.sprite_size(library)?;
    if !arena.fits(player) {
        return Err(too_small(format!("player sprite is {}x{}", player.x, player.y)));
    }
    for archetype in Archetype::ALL {
        // Resolves every facing now so spawning can never hit a missing key
        Entity::new(0, EntitySpec::enemy(archetype, Vec2::ZERO, Vec2::X), library)?;
        let size = Role::Enemy(archetype).sprite_size(library)?;
        if !arena.fits(size) {
            return Err(too_small(format!("{} sprite is {}x{}", archetype.name(), size.x, size.y)));
        }
        if settings.spawn_band_inset * 2.0 + size.y > arena.height {
            return Err(too_small(format!(
                "no room for a {} px spawn band inset",
                settings.spawn_band_inset
            )));
        }
    }
    Ok(())
}
