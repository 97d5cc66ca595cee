//! Sound cues driven by game events
//!
//! The core never waits on audio. `AudioManager` turns game events into cues
//! and hands them to a backend that does the actual playback.

use crate::consts::LAST_SECONDS_WARNING;
use crate::session::GameEventSink;
use crate::settings::Settings;
use crate::sim::{Archetype, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A new enemy walked in
    EnemySpawn,
    /// Player bumped into an enemy and lost time
    Bump(Archetype),
    /// Countdown tick during the final seconds
    ClockTick,
    /// Countdown ran out
    GameOver,
}

/// Something that can play a cue at a volume
pub trait SoundBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl SoundBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("cue {:?} at volume {:.2}", effect, volume);
    }
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<B: SoundBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with levels taken from settings
    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        let mut manager = Self::new(backend);
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_muted(settings.muted);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }
}

/// The cue for an event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::EnemySpawned { .. } => Some(SoundEffect::EnemySpawn),
        GameEvent::PenaltyApplied { archetype, .. } => Some(SoundEffect::Bump(*archetype)),
        GameEvent::SecondElapsed { remaining } if *remaining > 0 && *remaining <= LAST_SECONDS_WARNING => {
            Some(SoundEffect::ClockTick)
        }
        GameEvent::SecondElapsed { .. } => None,
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
    }
}

impl<B: SoundBackend> GameEventSink for AudioManager<B> {
    fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = cue_for(event) {
            self.play(effect);
        }
    }
}
