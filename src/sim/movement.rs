//! Movement integration
//!
//! Convention: screen coordinates, y grows downward. Every entity moves by
//! `x' = x + vx * s`, `y' = y + vy * s`, where `s` scales the per-frame
//! velocity to the elapsed time so movement does not depend on frame rate.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, Role};
use super::geometry::Arena;
use crate::frame_scale;

/// Axes on which an entity hit the arena edge this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeHit {
    pub x: bool,
    pub y: bool,
}

impl EdgeHit {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Advance one entity and keep it inside the arena.
///
/// Enemies bounce: each axis that left the bounds has its velocity component
/// reversed, independently of the other axis. The player is only clamped.
pub fn integrate(entity: &mut Entity, arena: &Arena, dt_ms: f32) -> EdgeHit {
    let unclamped = entity.pos() + entity.vel * frame_scale(dt_ms);
    let max = arena.max_position(entity.size());

    let hit = EdgeHit {
        x: unclamped.x < 0.0 || unclamped.x > max.x,
        y: unclamped.y < 0.0 || unclamped.y > max.y,
    };

    entity.set_position(unclamped.clamp(Vec2::ZERO, max));

    if matches!(entity.role, Role::Enemy(_)) {
        if hit.x {
            entity.vel.x = -entity.vel.x;
        }
        if hit.y {
            entity.vel.y = -entity.vel.y;
        }
        if hit.any() {
            log::debug!("Enemy {} bounced off arena edge {:?}", entity.id, hit);
        }
    }

    hit
}

/// Random 8-way direction scaled to `speed`; never the zero vector
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> Vec2 {
    loop {
        let dx = rng.random_range(-1i32..=1);
        let dy = rng.random_range(-1i32..=1);
        if dx != 0 || dy != 0 {
            return Vec2::new(dx as f32, dy as f32).normalize() * speed;
        }
    }
}

/// Occasionally give an enemy a fresh direction. Returns true if it turned.
pub fn wander<R: Rng + ?Sized>(entity: &mut Entity, rng: &mut R) -> bool {
    let Some(archetype) = entity.archetype() else {
        return false;
    };
    let stats = archetype.stats();
    if rng.random_bool(stats.wander_chance) {
        entity.vel = random_direction(rng, stats.speed);
        true
    } else {
        false
    }
}
