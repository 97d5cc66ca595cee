//! Game settings and balance
//!
//! Loaded from JSON on native builds; every field falls back to its default
//! when absent from the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Gameplay tuning and audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Arena width used when the host does not pass one to `init`
    pub arena_width: f32,
    /// Arena height used when the host does not pass one to `init`
    pub arena_height: f32,

    // === Countdown ===
    /// Seconds on the clock at the start of a run
    pub start_seconds: i32,

    // === Enemies ===
    /// Maximum number of live enemies
    pub max_enemies: usize,
    /// Refractory period after each spawn (ms)
    pub spawn_cooldown_ms: f32,
    /// Spawns keep this distance from the top and bottom edges
    pub spawn_band_inset: f32,
    /// Spawns keep this distance from the player's centre
    pub spawn_safe_distance: f32,

    // === Player ===
    /// Player speed (px per 60 Hz frame)
    pub player_speed: f32,
    /// Player spawn point (top-left of the sprite)
    pub player_spawn: (f32, f32),

    // === Animation ===
    /// Below this speed an entity keeps its current facing
    pub facing_threshold: f32,

    // === RNG ===
    /// Seed for spawn placement, archetype choice and wandering
    pub seed: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all cues
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            start_seconds: START_SECONDS,

            max_enemies: MAX_ENEMIES,
            spawn_cooldown_ms: SPAWN_COOLDOWN_MS,
            spawn_band_inset: SPAWN_BAND_INSET,
            spawn_safe_distance: SPAWN_SAFE_DISTANCE,

            player_speed: PLAYER_SPEED,
            player_spawn: (PLAYER_SPAWN_X, PLAYER_SPAWN_Y),

            facing_threshold: FACING_THRESHOLD,

            seed: DEFAULT_SEED,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        if self.start_seconds <= 0 {
            return Err(invalid("start_seconds", "must be at least 1"));
        }
        if self.max_enemies == 0 {
            return Err(invalid("max_enemies", "must be at least 1"));
        }
        non_negative("spawn_cooldown_ms", self.spawn_cooldown_ms)?;
        non_negative("spawn_band_inset", self.spawn_band_inset)?;
        non_negative("spawn_safe_distance", self.spawn_safe_distance)?;
        positive("player_speed", self.player_speed)?;
        non_negative("player_spawn.x", self.player_spawn.0)?;
        non_negative("player_spawn.y", self.player_spawn.1)?;
        non_negative("facing_threshold", self.facing_threshold)?;
        unit("master_volume", self.master_volume)?;
        unit("sfx_volume", self.sfx_volume)?;
        Ok(())
    }

    /// Effective cue volume (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be a positive number, got {value}")))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("must be zero or positive, got {value}")))
    }
}

fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(name, format!("must be between 0.0 and 1.0, got {value}")))
    }
}
