//! Campus Dodge - countdown-survival arcade game core
//!
//! Core modules:
//! - `sim`: Simulation (movement, animation, collisions, spawning, countdown)
//! - `session`: Control surface driving the simulation and countdown cadences
//! - `settings`: Data-driven game balance and audio levels
//! - `audio`: Event hooks mapped to sound cues
//! - `error`: Configuration and session errors

pub mod audio;
pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SessionError};
pub use session::{GameEventSink, Session, TickReport};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f32 = 1000.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: usize = 8;
    /// Longest wall-clock gap a single frame may feed into the simulation
    pub const MAX_FRAME_MS: f32 = 250.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 650.0;

    /// Sprite dimensions shared by every built-in animation
    pub const SPRITE_WIDTH: f32 = 32.0;
    pub const SPRITE_HEIGHT: f32 = 46.0;

    /// Player defaults
    pub const PLAYER_SPAWN_X: f32 = 350.0;
    pub const PLAYER_SPAWN_Y: f32 = 550.0;
    pub const PLAYER_SPEED: f32 = 4.0; // px per 60 Hz frame
    pub const PLAYER_FACING_BIAS: f32 = 1.0;

    /// Session defaults
    pub const START_SECONDS: i32 = 60;
    pub const MAX_ENEMIES: usize = 8;
    pub const SPAWN_COOLDOWN_MS: f32 = 3000.0;
    /// Spawns stay this far from the top and bottom edges
    pub const SPAWN_BAND_INSET: f32 = 60.0;
    /// Minimum distance between a new enemy's centre and the player's
    pub const SPAWN_SAFE_DISTANCE: f32 = 150.0;
    /// Placement retries before a spawn attempt gives up for this tick
    pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 16;

    /// Below this speed the current facing is kept (avoids jitter near zero)
    pub const FACING_THRESHOLD: f32 = 0.1;

    /// Countdown cues play only in the final seconds
    pub const LAST_SECONDS_WARNING: i32 = 10;

    pub const DEFAULT_SEED: u64 = 0x5EED_CA4D;
}

/// Clamp a top-left position so a sprite of `size` stays inside `[0, bounds]`
#[inline]
pub fn clamp_to_bounds(pos: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    let max = (bounds - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}

/// Scale factor turning a per-frame velocity into a displacement for `dt_ms`
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::SIM_DT_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_bounds() {
        let size = Vec2::new(32.0, 46.0);
        let bounds = Vec2::new(800.0, 650.0);
        assert_eq!(clamp_to_bounds(Vec2::new(-5.0, 700.0), size, bounds), Vec2::new(0.0, 604.0));
        assert_eq!(clamp_to_bounds(Vec2::new(10.0, 20.0), size, bounds), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_frame_scale_is_one_at_sim_rate() {
        assert!((frame_scale(consts::SIM_DT_MS) - 1.0).abs() < f32::EPSILON);
        assert!((frame_scale(consts::SIM_DT_MS * 2.0) - 2.0).abs() < 1e-5);
    }
}
