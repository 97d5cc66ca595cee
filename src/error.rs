//! Error types
//!
//! Configuration errors surface at construction time; session errors mark
//! calls made in the wrong lifecycle state. Expected refusals (spawn cap,
//! active cooldown, no overlap) are ordinary return values, not errors.

use thiserror::Error;

/// Invalid or missing configuration, detected before gameplay starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown animation key `{0}`")]
    UnknownAnimation(String),
    #[error("animation `{key}` has no frames")]
    EmptyAnimation { key: String },
    #[error("animation `{key}` frame {index} has zero duration")]
    ZeroDuration { key: String, index: usize },
    #[error("animation `{key}` frame {index} has non-positive size {width}x{height}")]
    InvalidFrameSize {
        key: String,
        index: usize,
        width: f32,
        height: f32,
    },
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("arena {width}x{height} is too small: {reason}")]
    ArenaTooSmall {
        width: f32,
        height: f32,
        reason: String,
    },
    #[error("position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f32, y: f32 },
    #[error("velocity ({x}, {y}) is invalid: {reason}")]
    InvalidVelocity { x: f32, y: f32, reason: &'static str },
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session operation called in a state that does not allow it
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session used before init()")]
    NotInitialized,
    #[error("session is over; call reset() to play again")]
    GameOver,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
