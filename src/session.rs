//! Session control surface
//!
//! A `Session` owns the game state and drives both cadences, the 60 Hz
//! simulation step and the one-second countdown, from a single `tick` call.
//! Everything runs on the caller's thread, so state is never mutated
//! concurrently. A host that ticks from another thread can wrap the whole
//! session in one `Mutex`.

use std::sync::Arc;

use glam::Vec2;

use crate::consts::SIM_DT_MS;
use crate::error::{ConfigError, SessionError};
use crate::settings::Settings;
use crate::sim::{
    AnimationLibrary, Archetype, Arena, DirectionSet, FrameDriver, GameEvent, GamePhase, GameState, SessionStats,
    Snapshot, TickInput, spawn_at, tick,
};

/// Subscriber for game events (sound, presentation). Fire-and-forget: the
/// session does not wait on or inspect what the sink does.
pub trait GameEventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// What one `Session::tick` call did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The session was stopped; nothing ran
    pub halted: bool,
    /// Fixed simulation steps run
    pub steps: usize,
    /// Countdown seconds elapsed
    pub seconds: u32,
    pub penalties: u32,
    pub penalty_seconds: i32,
    pub spawned: Vec<u32>,
    /// The game ended during this call
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Running,
    Stopped,
}

pub struct Session {
    settings: Settings,
    library: Arc<AnimationLibrary>,
    arena: Option<Arena>,
    state: Option<GameState>,
    driver: FrameDriver,
    input: DirectionSet,
    lifecycle: Lifecycle,
    sinks: Vec<Box<dyn GameEventSink + Send>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("arena", &self.arena)
            .field("lifecycle", &self.lifecycle)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Validate the configuration; gameplay starts with `init`
    pub fn new(settings: Settings, library: AnimationLibrary) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            library: Arc::new(library),
            arena: None,
            state: None,
            driver: FrameDriver::new(),
            input: DirectionSet::empty(),
            lifecycle: Lifecycle::Uninitialized,
            sinks: Vec::new(),
        })
    }

    /// Start a run in an arena of the given size
    pub fn init(&mut self, arena_width: f32, arena_height: f32) -> Result<(), SessionError> {
        let arena = Arena::new(arena_width, arena_height);
        let state = GameState::new(&self.settings, arena, Arc::clone(&self.library))?;
        self.arena = Some(arena);
        self.state = Some(state);
        self.driver.reset();
        self.input = DirectionSet::empty();
        self.lifecycle = Lifecycle::Running;
        Ok(())
    }

    /// Start over in the same arena
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let arena = self.arena.ok_or(SessionError::NotInitialized)?;
        log::info!("Session reset");
        self.init(arena.width, arena.height)
    }

    /// Halt both cadences, then drop the run. Later ticks are no-ops.
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            log::info!("Session stopped");
        }
        self.lifecycle = Lifecycle::Stopped;
        self.state = None;
        self.driver.reset();
    }

    /// Feed elapsed wall-clock time; runs as many fixed steps as are due
    pub fn tick(&mut self, elapsed_ms: f32) -> Result<TickReport, SessionError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => return Err(SessionError::NotInitialized),
            Lifecycle::Stopped => {
                return Ok(TickReport {
                    halted: true,
                    ..TickReport::default()
                });
            }
            Lifecycle::Running => {}
        }
        let state = self.state.as_mut().ok_or(SessionError::NotInitialized)?;
        match state.phase {
            GamePhase::GameOver => return Err(SessionError::GameOver),
            GamePhase::Paused => return Ok(TickReport::default()),
            GamePhase::Playing => {}
        }

        let mut report = TickReport::default();
        let input = TickInput {
            directions: Some(self.input),
        };
        let steps = self.driver.advance(elapsed_ms);
        for _ in 0..steps {
            let step = tick(state, &input, SIM_DT_MS)?;
            report.steps += 1;
            report.penalties += step.collisions.penalties;
            report.penalty_seconds += step.collisions.penalty_seconds;
            report.spawned.extend(step.spawned);
            if step.game_over {
                report.game_over = true;
                break;
            }

            if self.driver.complete_step() {
                state.countdown.tick_second();
                report.seconds += 1;
                state.events.push(GameEvent::SecondElapsed {
                    remaining: state.countdown.remaining(),
                });
                if state.finish_if_expired() {
                    report.game_over = true;
                    break;
                }
            }
        }

        self.dispatch_events();
        Ok(report)
    }

    /// Replace the held direction keys; applied from the next step on
    pub fn set_directional_input(&mut self, pressed: DirectionSet) {
        self.input = pressed;
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        let state = self.running_state()?;
        if state.phase == GamePhase::Playing {
            state.phase = GamePhase::Paused;
            log::info!("Paused");
        }
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        let state = self.running_state()?;
        if state.phase == GamePhase::Paused {
            state.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
        Ok(())
    }

    pub fn is_game_over(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.countdown.is_game_over())
    }

    /// Seconds left; the configured start value before `init`
    pub fn remaining_seconds(&self) -> i32 {
        self.state
            .as_ref()
            .map_or(self.settings.start_seconds, |s| s.countdown.remaining())
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.state.as_ref().map(|s| s.phase)
    }

    /// Copy of everything a render pass needs
    pub fn snapshot(&self) -> Result<Snapshot, SessionError> {
        let state = self.state.as_ref().ok_or(SessionError::NotInitialized)?;
        Ok(Snapshot::capture(state))
    }

    /// Spawn a specific enemy, subject to the usual cap and cooldown.
    /// `Ok(None)` means the spawn was refused for this tick.
    pub fn spawn_enemy_at(&mut self, archetype: Archetype, pos: Vec2) -> Result<Option<u32>, SessionError> {
        let state = self.running_state()?;
        let id = spawn_at(state, archetype, pos)?;
        self.dispatch_events();
        Ok(id)
    }

    pub fn stats(&self) -> Option<SessionStats> {
        self.state.as_ref().map(|s| s.stats)
    }

    /// Read-only access to the live state
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn subscribe(&mut self, sink: Box<dyn GameEventSink + Send>) {
        self.sinks.push(sink);
    }

    /// Initialised state that has not ended
    fn running_state(&mut self) -> Result<&mut GameState, SessionError> {
        let state = self.state.as_mut().ok_or(SessionError::NotInitialized)?;
        if state.phase == GamePhase::GameOver {
            return Err(SessionError::GameOver);
        }
        Ok(state)
    }

    fn dispatch_events(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let events = state.drain_events();
        for event in &events {
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;
    use std::sync::Mutex;

    fn session(settings: Settings) -> Session {
        let mut session = Session::new(settings, AnimationLibrary::builtin()).unwrap();
        session.init(800.0, 650.0).unwrap();
        session
    }

    /// Random spawns stay far enough away that they cannot reach the player
    /// within a few seconds
    fn quiet_settings() -> Settings {
        Settings {
            spawn_safe_distance: 400.0,
            ..Settings::default()
        }
    }

    struct Collect(Arc<Mutex<Vec<GameEvent>>>);

    impl GameEventSink for Collect {
        fn on_event(&mut self, event: &GameEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_yapper_scenario() {
        let mut session = session(Settings::default());
        let id = session
            .spawn_enemy_at(Archetype::Yapper, Vec2::new(350.0, 550.0))
            .unwrap()
            .unwrap();

        session.tick(SIM_DT_MS).unwrap();
        assert_eq!(session.remaining_seconds(), 50);
        assert!(session.state().unwrap().entity(id).unwrap().has_collided);

        session.tick(SIM_DT_MS).unwrap();
        assert_eq!(session.remaining_seconds(), 50);
    }

    #[test]
    fn test_penalty_once_across_many_ticks() {
        let mut session = session(Settings::default());
        session
            .spawn_enemy_at(Archetype::Lecturer, Vec2::new(350.0, 550.0))
            .unwrap()
            .unwrap();
        let mut penalties = 0;
        // 20 steps at 1.5 px can't carry it clear of the player
        for _ in 0..20 {
            penalties += session.tick(SIM_DT_MS).unwrap().penalties;
        }
        assert_eq!(penalties, 1);
        assert_eq!(session.remaining_seconds(), 55);
    }

    #[test]
    fn test_countdown_second_after_sixty_steps() {
        let mut session = session(quiet_settings());
        let mut seconds = 0;
        for _ in 0..59 {
            seconds += session.tick(SIM_DT_MS).unwrap().seconds;
        }
        assert_eq!(seconds, 0);
        assert_eq!(session.remaining_seconds(), 60);
        assert_eq!(session.tick(SIM_DT_MS).unwrap().seconds, 1);
        assert_eq!(session.remaining_seconds(), 59);
    }

    #[test]
    fn test_game_over_is_sticky_until_reset() {
        let mut session = session(Settings {
            start_seconds: 5,
            ..Settings::default()
        });
        session
            .spawn_enemy_at(Archetype::Yapper, Vec2::new(350.0, 550.0))
            .unwrap()
            .unwrap();
        let report = session.tick(SIM_DT_MS).unwrap();
        assert!(report.game_over);
        assert!(session.is_game_over());
        assert_eq!(session.remaining_seconds(), 0);

        assert!(matches!(session.tick(SIM_DT_MS), Err(SessionError::GameOver)));
        assert!(matches!(
            session.spawn_enemy_at(Archetype::Student, Vec2::ZERO),
            Err(SessionError::GameOver)
        ));
        assert!(session.is_game_over());
        assert_eq!(session.remaining_seconds(), 0);

        session.reset().unwrap();
        assert!(!session.is_game_over());
        assert_eq!(session.remaining_seconds(), 5);
        assert_eq!(session.state().unwrap().enemy_count(), 0);
    }

    #[test]
    fn test_operations_before_init_fail() {
        let mut session = Session::new(Settings::default(), AnimationLibrary::builtin()).unwrap();
        assert!(matches!(session.tick(SIM_DT_MS), Err(SessionError::NotInitialized)));
        assert!(matches!(session.reset(), Err(SessionError::NotInitialized)));
        assert!(matches!(session.snapshot(), Err(SessionError::NotInitialized)));
        assert!(matches!(
            session.spawn_enemy_at(Archetype::Student, Vec2::ZERO),
            Err(SessionError::NotInitialized)
        ));
        assert!(!session.is_game_over());
        assert_eq!(session.remaining_seconds(), 60);
    }

    #[test]
    fn test_invalid_settings_rejected_up_front() {
        let settings = Settings {
            start_seconds: 0,
            ..Settings::default()
        };
        assert!(Session::new(settings, AnimationLibrary::builtin()).is_err());

        let mut session = Session::new(Settings::default(), AnimationLibrary::builtin()).unwrap();
        let err = session.init(10.0, 10.0).unwrap_err();
        assert!(matches!(err, SessionError::Config(ConfigError::ArenaTooSmall { .. })));
    }

    #[test]
    fn test_stopped_session_ignores_ticks() {
        let mut session = session(Settings::default());
        session.stop();
        let report = session.tick(SIM_DT_MS).unwrap();
        assert!(report.halted);
        assert_eq!(report.steps, 0);
        assert!(session.state().is_none());

        session.init(800.0, 650.0).unwrap();
        assert!(!session.tick(SIM_DT_MS).unwrap().halted);
    }

    #[test]
    fn test_pause_suspends_both_cadences() {
        let mut session = session(quiet_settings());
        session.pause().unwrap();
        for _ in 0..200 {
            session.tick(SIM_DT_MS).unwrap();
        }
        assert_eq!(session.remaining_seconds(), 60);
        assert_eq!(session.stats().unwrap().ticks, 0);

        session.resume().unwrap();
        session.tick(SIM_DT_MS).unwrap();
        assert_eq!(session.stats().unwrap().ticks, 1);
        assert_eq!(session.phase(), Some(GamePhase::Playing));
    }

    #[test]
    fn test_directional_input_moves_player() {
        let mut session = session(quiet_settings());
        session.set_directional_input([Direction::Left].into_iter().collect());
        for _ in 0..3 {
            session.tick(SIM_DT_MS).unwrap();
        }
        let snapshot = session.snapshot().unwrap();
        let player = snapshot.player().unwrap();
        assert!((player.position.x - 338.0).abs() < 1e-3);
        assert_eq!(player.animation_key, "player_left");
    }

    #[test]
    fn test_events_reach_subscribers() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut session = session(Settings::default());
        session.subscribe(Box::new(Collect(Arc::clone(&events))));
        session
            .spawn_enemy_at(Archetype::Student, Vec2::new(350.0, 550.0))
            .unwrap()
            .unwrap();
        session.tick(SIM_DT_MS).unwrap();

        let events = events.lock().unwrap();
        assert!(matches!(events[0], GameEvent::EnemySpawned { archetype: Archetype::Student, .. }));
        assert!(matches!(events[1], GameEvent::PenaltyApplied { seconds: 3, .. }));
        assert!(session.state().unwrap().events.is_empty());
    }
}
