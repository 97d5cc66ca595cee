//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod animation;
pub mod clock;
pub mod collision;
pub mod countdown;
pub mod entity;
pub mod geometry;
pub mod movement;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use animation::{
    AnimationFrame, AnimationLibrary, AnimationPlayer, AnimationTemplate, Facing, animation_key, select_facing,
};
pub use clock::FrameDriver;
pub use collision::{CollisionReport, resolve_collisions};
pub use countdown::{Countdown, CountdownChange};
pub use entity::{
    Archetype, ArchetypeStats, Direction, DirectionSet, Entity, EntitySpec, Role, player_velocity,
};
pub use geometry::{Arena, Hitbox};
pub use movement::{EdgeHit, integrate, random_direction, wander};
pub use snapshot::{EntityView, Snapshot};
pub use spawner::{EnemyManager, spawn_at, try_spawn};
pub use state::{GameEvent, GamePhase, GameState, SessionStats};
pub use tick::{StepReport, TickInput, tick};
