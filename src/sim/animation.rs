//! Animation templates, playback, and facing selection
//!
//! A template is an ordered list of frames, each shown for a fixed duration.
//! Templates are looked up by string key once, when an entity is built, and
//! shared immutably afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SPRITE_HEIGHT, SPRITE_WIDTH};
use crate::error::ConfigError;

/// Which way an entity is drawn as facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Standing still (player only)
    Idle,
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// The four walking facings, in the order animation sets store them
    pub const WALKING: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Idle => "idle",
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// Build the library key for a sprite prefix and facing, e.g. `yapper_left`
pub fn animation_key(prefix: &str, facing: Facing) -> String {
    format!("{}_{}", prefix, facing.as_str())
}

/// Pick a facing from a velocity (screen coordinates, y down)
///
/// Vertical wins only when `|vy| > |vx| * bias`, so near-diagonal motion
/// does not flicker between animations. Below `threshold` the current
/// facing is kept.
pub fn select_facing(vel: Vec2, current: Facing, bias: f32, threshold: f32) -> Facing {
    if vel.length() < threshold {
        return current;
    }
    if vel.y.abs() > vel.x.abs() * bias {
        if vel.y > 0.0 { Facing::Down } else { Facing::Up }
    } else if vel.x > 0.0 {
        Facing::Right
    } else {
        Facing::Left
    }
}

/// A single frame of a sprite animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    /// Image reference handed to the renderer
    pub image: String,
    /// How long the frame is shown
    pub duration_ms: u32,
    pub width: f32,
    pub height: f32,
}

impl AnimationFrame {
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// An ordered, restartable frame sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTemplate {
    pub frames: Vec<AnimationFrame>,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_looping() -> bool {
    true
}

impl AnimationTemplate {
    /// Reject templates that could not be played back
    pub fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if self.frames.is_empty() {
            return Err(ConfigError::EmptyAnimation { key: key.to_string() });
        }
        for (index, frame) in self.frames.iter().enumerate() {
            if frame.duration_ms == 0 {
                return Err(ConfigError::ZeroDuration {
                    key: key.to_string(),
                    index,
                });
            }
            if !(frame.width > 0.0 && frame.height > 0.0) {
                return Err(ConfigError::InvalidFrameSize {
                    key: key.to_string(),
                    index,
                    width: frame.width,
                    height: frame.height,
                });
            }
        }
        Ok(())
    }
}

/// Key-to-template lookup service
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    templates: HashMap<String, Arc<AnimationTemplate>>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, validating it first
    pub fn insert(&mut self, key: impl Into<String>, template: AnimationTemplate) -> Result<(), ConfigError> {
        let key = key.into();
        template.validate(&key)?;
        self.templates.insert(key, Arc::new(template));
        Ok(())
    }

    /// Look up a template; a missing key is a configuration error
    pub fn get(&self, key: &str) -> Result<Arc<AnimationTemplate>, ConfigError> {
        self.templates
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownAnimation(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Build a library from a JSON object of `key -> template`
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: HashMap<String, AnimationTemplate> = serde_json::from_str(json)?;
        let mut library = Self::new();
        for (key, template) in raw {
            library.insert(key, template)?;
        }
        log::info!("Loaded {} animation templates", library.len());
        Ok(library)
    }

    /// Library covering the player and every enemy archetype.
    ///
    /// Walk cycles use four 120 ms frames; the player's idle pose breathes
    /// with two slow frames.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        for prefix in ["player", "student", "lecturer", "yapper"] {
            for facing in Facing::WALKING {
                let key = animation_key(prefix, facing);
                templates.insert(key.clone(), Arc::new(strip(&key, 4, 120, true)));
            }
        }
        let idle = animation_key("player", Facing::Idle);
        templates.insert(idle.clone(), Arc::new(strip(&idle, 2, 400, true)));
        Self { templates }
    }
}

/// A sprite-sheet strip of `count` equally timed frames
fn strip(key: &str, count: usize, duration_ms: u32, looping: bool) -> AnimationTemplate {
    AnimationTemplate {
        frames: (0..count)
            .map(|i| AnimationFrame {
                image: format!("{key}/{i}"),
                duration_ms,
                width: SPRITE_WIDTH,
                height: SPRITE_HEIGHT,
            })
            .collect(),
        looping,
    }
}

/// Playback state of one entity's current animation
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    facing: Facing,
    template: Arc<AnimationTemplate>,
    frame_index: usize,
    elapsed_ms: f32,
    finished: bool,
}

impl AnimationPlayer {
    pub fn new(facing: Facing, template: Arc<AnimationTemplate>) -> Self {
        Self {
            facing,
            template,
            frame_index: 0,
            elapsed_ms: 0.0,
            finished: false,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Non-looping template that reached its last frame
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Switch animation; re-selecting the current facing keeps the timer running.
    /// Returns true when the animation actually changed.
    pub fn switch_to(&mut self, facing: Facing, template: Arc<AnimationTemplate>) -> bool {
        if facing == self.facing {
            return false;
        }
        *self = Self::new(facing, template);
        true
    }

    /// Accumulate time and step through frames
    pub fn advance(&mut self, dt_ms: f32) {
        if self.finished || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.elapsed_ms += dt_ms;
        loop {
            let duration = self.template.frames[self.frame_index].duration_ms as f32;
            if self.elapsed_ms < duration {
                break;
            }
            self.elapsed_ms -= duration;
            if self.frame_index + 1 < self.template.frames.len() {
                self.frame_index += 1;
            } else if self.template.looping {
                self.frame_index = 0;
            } else {
                self.finished = true;
                self.elapsed_ms = 0.0;
                break;
            }
        }
    }

    pub fn current_frame(&self) -> &AnimationFrame {
        &self.template.frames[self.frame_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(image: &str, duration_ms: u32) -> AnimationFrame {
        AnimationFrame {
            image: image.to_string(),
            duration_ms,
            width: 32.0,
            height: 46.0,
        }
    }

    fn template(looping: bool) -> Arc<AnimationTemplate> {
        Arc::new(AnimationTemplate {
            frames: vec![frame("a", 100), frame("b", 100), frame("c", 100)],
            looping,
        })
    }

    #[test]
    fn test_advance_ignores_bad_time() {
        let mut player = AnimationPlayer::new(Facing::Down, template(true));
        player.advance(150.0);
        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -50.0, 0.0] {
            player.advance(dt);
            assert_eq!(player.frame_index(), 1);
            assert_eq!(player.elapsed_ms(), 50.0);
        }
    }

    #[test]
    fn test_select_facing_dominant_axis() {
        assert_eq!(select_facing(Vec2::new(3.0, 0.0), Facing::Down, 1.0, 0.1), Facing::Right);
        assert_eq!(select_facing(Vec2::new(-3.0, 1.0), Facing::Down, 1.0, 0.1), Facing::Left);
        // y grows downward
        assert_eq!(select_facing(Vec2::new(0.0, 2.0), Facing::Left, 1.0, 0.1), Facing::Down);
        assert_eq!(select_facing(Vec2::new(0.5, -2.0), Facing::Left, 1.0, 0.1), Facing::Up);
    }

    #[test]
    fn test_select_facing_bias_prefers_horizontal_on_diagonal() {
        let diagonal = Vec2::new(1.0, 1.1);
        assert_eq!(select_facing(diagonal, Facing::Up, 1.0, 0.1), Facing::Down);
        assert_eq!(select_facing(diagonal, Facing::Up, 1.2, 0.1), Facing::Right);
    }

    #[test]
    fn test_select_facing_keeps_current_below_threshold() {
        let tiny = Vec2::new(0.01, 0.01);
        assert_eq!(select_facing(tiny, Facing::Right, 1.0, 0.1), Facing::Right);
        assert_eq!(select_facing(Vec2::ZERO, Facing::Up, 1.0, 0.1), Facing::Up);
    }

    #[test]
    fn test_advance_loops() {
        let mut player = AnimationPlayer::new(Facing::Down, template(true));
        player.advance(99.0);
        assert_eq!(player.frame_index(), 0);
        player.advance(1.0);
        assert_eq!(player.frame_index(), 1);
        player.advance(200.0);
        assert_eq!(player.frame_index(), 0);
        assert_eq!(player.current_frame().image, "a");
        assert!(!player.is_finished());
    }

    #[test]
    fn test_advance_non_looping_holds_last_frame() {
        let mut player = AnimationPlayer::new(Facing::Down, template(false));
        player.advance(1000.0);
        assert_eq!(player.frame_index(), 2);
        assert!(player.is_finished());
        player.advance(500.0);
        assert_eq!(player.current_frame().image, "c");
    }

    #[test]
    fn test_redundant_switch_keeps_timer() {
        let tpl = template(true);
        let mut player = AnimationPlayer::new(Facing::Right, tpl.clone());
        player.advance(150.0);
        assert!(!player.switch_to(Facing::Right, tpl.clone()));
        assert_eq!(player.frame_index(), 1);
        assert!((player.elapsed_ms() - 50.0).abs() < 1e-4);

        assert!(player.switch_to(Facing::Left, tpl));
        assert_eq!(player.frame_index(), 0);
        assert_eq!(player.elapsed_ms(), 0.0);
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn test_library_lookup_and_missing_key() {
        let library = AnimationLibrary::builtin();
        assert!(library.get("player_idle").is_ok());
        assert!(library.get("yapper_left").is_ok());
        let err = library.get("dean_left").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAnimation(ref key) if key == "dean_left"));
    }

    #[test]
    fn test_library_rejects_invalid_templates() {
        let mut library = AnimationLibrary::new();
        let empty = AnimationTemplate {
            frames: Vec::new(),
            looping: true,
        };
        assert!(matches!(library.insert("x", empty), Err(ConfigError::EmptyAnimation { .. })));

        let zero = AnimationTemplate {
            frames: vec![frame("a", 0)],
            looping: true,
        };
        assert!(matches!(library.insert("x", zero), Err(ConfigError::ZeroDuration { index: 0, .. })));
        assert!(library.is_empty());
    }

    #[test]
    fn test_library_from_json() {
        let json = r#"{
            "player_idle": { "frames": [ { "image": "idle.png", "duration_ms": 200, "width": 32, "height": 46 } ] },
            "player_up": { "frames": [ { "image": "up.png", "duration_ms": 100, "width": 32, "height": 46 } ], "looping": false }
        }"#;
        let library = AnimationLibrary::from_json_str(json).unwrap();
        assert_eq!(library.len(), 2);
        assert!(library.get("player_idle").unwrap().looping);
        assert!(!library.get("player_up").unwrap().looping);
    }
}
