//! Entities: the player and the enemy archetypes
//!
//! One flat struct covers every entity. Per-archetype differences (speed,
//! penalty, wandering, sprite set) live in const tables looked up by tag.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{AnimationLibrary, AnimationPlayer, AnimationTemplate, Facing, animation_key};
use super::geometry::{Arena, Hitbox};
use crate::clamp_to_bounds;
use crate::consts::PLAYER_FACING_BIAS;
use crate::error::ConfigError;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Quick but cheap to bump into
    Student,
    /// Slow, medium penalty
    Lecturer,
    /// Costs the most time
    Yapper,
}

/// Constants shared by every enemy of one archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeStats {
    /// Movement speed (px per 60 Hz frame)
    pub speed: f32,
    /// Seconds removed from the countdown on contact
    pub penalty_secs: i32,
    /// Per-tick probability of picking a new random direction
    pub wander_chance: f64,
    /// Vertical-dominance factor for facing selection
    pub facing_bias: f32,
    /// Animation key prefix
    pub sprite: &'static str,
}

const STUDENT: ArchetypeStats = ArchetypeStats {
    speed: 2.5,
    penalty_secs: 3,
    wander_chance: 0.02,
    facing_bias: 1.0,
    sprite: "student",
};

const LECTURER: ArchetypeStats = ArchetypeStats {
    speed: 1.5,
    penalty_secs: 5,
    wander_chance: 0.01,
    facing_bias: 1.2,
    sprite: "lecturer",
};

const YAPPER: ArchetypeStats = ArchetypeStats {
    speed: 2.0,
    penalty_secs: 10,
    wander_chance: 0.03,
    facing_bias: 1.1,
    sprite: "yapper",
};

impl Archetype {
    pub const ALL: [Archetype; 3] = [Archetype::Student, Archetype::Lecturer, Archetype::Yapper];

    pub const fn stats(&self) -> &'static ArchetypeStats {
        match self {
            Archetype::Student => &STUDENT,
            Archetype::Lecturer => &LECTURER,
            Archetype::Yapper => &YAPPER,
        }
    }

    pub fn name(&self) -> &'static str {
        self.stats().sprite
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Enemy(Archetype),
}

impl Role {
    pub fn sprite(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Enemy(archetype) => archetype.stats().sprite,
        }
    }

    pub fn facing_bias(&self) -> f32 {
        match self {
            Role::Player => PLAYER_FACING_BIAS,
            Role::Enemy(archetype) => archetype.stats().facing_bias,
        }
    }

    /// Size of the first frame the role is shown with
    pub(crate) fn sprite_size(&self, library: &AnimationLibrary) -> Result<Vec2, ConfigError> {
        let key = animation_key(self.sprite(), self.initial_facing());
        Ok(library.get(&key)?.frames[0].size())
    }

    /// Facing a freshly built entity starts in
    pub fn initial_facing(&self) -> Facing {
        match self {
            Role::Player => Facing::Idle,
            Role::Enemy(_) => Facing::Down,
        }
    }
}

/// Movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const fn bit(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Down => 1 << 1,
            Direction::Left => 1 << 2,
            Direction::Right => 1 << 3,
        }
    }
}

/// Set of currently held direction keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Summed key directions in screen space; opposite keys cancel
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.contains(Direction::Left) {
            axis.x -= 1.0;
        }
        if self.contains(Direction::Right) {
            axis.x += 1.0;
        }
        if self.contains(Direction::Up) {
            axis.y -= 1.0;
        }
        if self.contains(Direction::Down) {
            axis.y += 1.0;
        }
        axis
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::empty();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

/// Player velocity for the held keys; diagonals are normalised to `speed`
pub fn player_velocity(input: &DirectionSet, speed: f32) -> Vec2 {
    input.axis().normalize_or_zero() * speed
}

/// Construction parameters for an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySpec {
    pub role: Role,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl EntitySpec {
    pub fn player(position: Vec2) -> Self {
        Self {
            role: Role::Player,
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn enemy(archetype: Archetype, position: Vec2, velocity: Vec2) -> Self {
        Self {
            role: Role::Enemy(archetype),
            position,
            velocity,
        }
    }
}

/// Templates for every facing an entity can show, resolved at construction
#[derive(Debug, Clone)]
struct AnimationSet {
    idle: Option<Arc<AnimationTemplate>>,
    walking: [Arc<AnimationTemplate>; 4],
}

impl AnimationSet {
    fn resolve(role: Role, library: &AnimationLibrary) -> Result<Self, ConfigError> {
        let prefix = role.sprite();
        let idle = match role {
            Role::Player => Some(library.get(&animation_key(prefix, Facing::Idle))?),
            Role::Enemy(_) => None,
        };
        let walking = [
            library.get(&animation_key(prefix, Facing::Up))?,
            library.get(&animation_key(prefix, Facing::Down))?,
            library.get(&animation_key(prefix, Facing::Left))?,
            library.get(&animation_key(prefix, Facing::Right))?,
        ];
        Ok(Self { idle, walking })
    }

    fn get(&self, facing: Facing) -> Option<&Arc<AnimationTemplate>> {
        match facing {
            Facing::Idle => self.idle.as_ref(),
            Facing::Up => Some(&self.walking[0]),
            Facing::Down => Some(&self.walking[1]),
            Facing::Left => Some(&self.walking[2]),
            Facing::Right => Some(&self.walking[3]),
        }
    }
}

/// A live entity in the arena
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub role: Role,
    /// Velocity (px per 60 Hz frame, screen coordinates)
    pub vel: Vec2,
    /// Set while in continuous contact with the player (enemies only)
    pub has_collided: bool,
    pos: Vec2,
    hitbox: Hitbox,
    anim: AnimationPlayer,
    animations: AnimationSet,
}

impl Entity {
    /// Build an entity, resolving every animation its role needs
    pub fn new(id: u32, spec: EntitySpec, library: &AnimationLibrary) -> Result<Self, ConfigError> {
        let EntitySpec {
            role,
            position,
            velocity,
        } = spec;
        if !position.is_finite() {
            return Err(ConfigError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        if !velocity.is_finite() {
            return Err(ConfigError::InvalidVelocity {
                x: velocity.x,
                y: velocity.y,
                reason: "not finite",
            });
        }
        if matches!(role, Role::Enemy(_)) && velocity == Vec2::ZERO {
            return Err(ConfigError::InvalidVelocity {
                x: 0.0,
                y: 0.0,
                reason: "enemies must be moving",
            });
        }

        let animations = AnimationSet::resolve(role, library)?;
        let facing = role.initial_facing();
        let template = animations
            .get(facing)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownAnimation(animation_key(role.sprite(), facing)))?;
        let anim = AnimationPlayer::new(facing, template);
        let hitbox = Hitbox::from_pos_size(position, anim.current_frame().size());

        Ok(Self {
            id,
            role,
            vel: velocity,
            has_collided: false,
            pos: position,
            hitbox,
            anim,
            animations,
        })
    }

    /// Top-left corner
    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Move the entity; the hitbox follows immediately
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.sync_hitbox();
    }

    /// Dimensions of the frame currently shown
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.anim.current_frame().size()
    }

    #[inline]
    pub fn hitbox(&self) -> &Hitbox {
        &self.hitbox
    }

    pub fn center(&self) -> Vec2 {
        self.hitbox.center()
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }

    pub fn archetype(&self) -> Option<Archetype> {
        match self.role {
            Role::Enemy(archetype) => Some(archetype),
            Role::Player => None,
        }
    }

    /// Countdown penalty for touching this entity (zero for the player)
    pub fn penalty_secs(&self) -> i32 {
        self.archetype().map_or(0, |a| a.stats().penalty_secs)
    }

    pub fn facing(&self) -> Facing {
        self.anim.facing()
    }

    pub fn animation(&self) -> &AnimationPlayer {
        &self.anim
    }

    pub fn animation_key(&self) -> String {
        animation_key(self.role.sprite(), self.anim.facing())
    }

    /// Show the animation for `facing`. Re-selecting the current facing, or a
    /// facing the role has no animation for, changes nothing.
    pub fn set_facing(&mut self, facing: Facing) -> bool {
        let Some(template) = self.animations.get(facing).cloned() else {
            return false;
        };
        let changed = self.anim.switch_to(facing, template);
        if changed {
            self.sync_hitbox();
        }
        changed
    }

    /// Step the current animation; frame size changes resize the hitbox
    pub fn advance_animation(&mut self, dt_ms: f32) {
        let before = self.anim.frame_index();
        self.anim.advance(dt_ms);
        if self.anim.frame_index() != before {
            self.sync_hitbox();
        }
    }

    /// Clamp into the arena without touching velocity
    pub fn confine(&mut self, arena: &Arena) {
        let clamped = clamp_to_bounds(self.pos, self.size(), arena.bounds());
        if clamped != self.pos {
            self.set_position(clamped);
        }
    }

    fn sync_hitbox(&mut self) {
        self.hitbox = Hitbox::from_pos_size(self.pos, self.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_table() {
        assert_eq!(Archetype::Student.stats().penalty_secs, 3);
        assert_eq!(Archetype::Lecturer.stats().penalty_secs, 5);
        assert_eq!(Archetype::Yapper.stats().penalty_secs, 10);
        for archetype in Archetype::ALL {
            assert!(archetype.stats().speed > 0.0);
        }
    }

    #[test]
    fn test_direction_set_axis() {
        let set: DirectionSet = [Direction::Up, Direction::Right].into_iter().collect();
        assert_eq!(set.axis(), Vec2::new(1.0, -1.0));

        let mut cancel = DirectionSet::empty();
        cancel.insert(Direction::Left);
        cancel.insert(Direction::Right);
        assert_eq!(cancel.axis(), Vec2::ZERO);
        cancel.remove(Direction::Left);
        assert!(cancel.contains(Direction::Right));
        assert!(!cancel.contains(Direction::Left));
    }

    #[test]
    fn test_player_velocity_diagonal_is_normalized() {
        let diagonal: DirectionSet = [Direction::Down, Direction::Left].into_iter().collect();
        let vel = player_velocity(&diagonal, 4.0);
        assert!((vel.length() - 4.0).abs() < 1e-5);
        assert!(vel.x < 0.0 && vel.y > 0.0);

        assert_eq!(player_velocity(&DirectionSet::empty(), 4.0), Vec2::ZERO);
    }

    #[test]
    fn test_new_entity_hitbox_matches_sprite() {
        let library = AnimationLibrary::builtin();
        let player = Entity::new(1, EntitySpec::player(Vec2::new(350.0, 550.0)), &library).unwrap();
        assert_eq!(player.hitbox().min, Vec2::new(350.0, 550.0));
        assert_eq!(player.hitbox().size, Vec2::new(32.0, 46.0));
        assert_eq!(player.facing(), Facing::Idle);
        assert_eq!(player.animation_key(), "player_idle");
    }

    #[test]
    fn test_set_position_moves_hitbox() {
        let library = AnimationLibrary::builtin();
        let spec = EntitySpec::enemy(Archetype::Student, Vec2::new(10.0, 10.0), Vec2::new(1.0, 0.0));
        let mut enemy = Entity::new(2, spec, &library).unwrap();
        enemy.set_position(Vec2::new(40.0, 90.0));
        assert_eq!(enemy.hitbox().min, Vec2::new(40.0, 90.0));
    }

    #[test]
    fn test_missing_animation_fails_construction() {
        let full = AnimationLibrary::builtin();
        // No lecturer sprites and no player idle pose
        let mut library = AnimationLibrary::new();
        for prefix in ["player", "student", "yapper"] {
            for facing in Facing::WALKING {
                let key = animation_key(prefix, facing);
                library.insert(key.clone(), (*full.get(&key).unwrap()).clone()).unwrap();
            }
        }
        let spec = EntitySpec::enemy(Archetype::Lecturer, Vec2::ZERO, Vec2::X);
        let err = Entity::new(3, spec, &library).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAnimation(ref key) if key == "lecturer_up"));

        // Player idle is also missing
        let err = Entity::new(4, EntitySpec::player(Vec2::ZERO), &library).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAnimation(ref key) if key == "player_idle"));
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let library = AnimationLibrary::builtin();
        let err = Entity::new(5, EntitySpec::player(Vec2::new(f32::NAN, 0.0)), &library).unwrap_err();
        assert!(matches!(err, ConfigError::NonFinitePosition { .. }));
    }

    #[test]
    fn test_non_finite_velocity_rejected() {
        let library = AnimationLibrary::builtin();
        let spec = EntitySpec::enemy(Archetype::Student, Vec2::new(10.0, 10.0), Vec2::new(f32::NAN, 1.0));
        let err = Entity::new(5, spec, &library).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVelocity { .. }));

        let mut spec = EntitySpec::player(Vec2::new(10.0, 10.0));
        spec.velocity = Vec2::new(0.0, f32::INFINITY);
        assert!(Entity::new(6, spec, &library).is_err());
    }

    #[test]
    fn test_stationary_enemy_rejected() {
        let library = AnimationLibrary::builtin();
        let spec = EntitySpec::enemy(Archetype::Lecturer, Vec2::new(10.0, 10.0), Vec2::ZERO);
        let err = Entity::new(5, spec, &library).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVelocity { x: 0.0, y: 0.0, .. }));

        // A standing player is fine
        assert!(Entity::new(6, EntitySpec::player(Vec2::new(10.0, 10.0)), &library).is_ok());
    }

    #[test]
    fn test_enemy_has_no_idle_facing() {
        let library = AnimationLibrary::builtin();
        let spec = EntitySpec::enemy(Archetype::Yapper, Vec2::ZERO, Vec2::X);
        let mut enemy = Entity::new(6, spec, &library).unwrap();
        assert!(!enemy.set_facing(Facing::Idle));
        assert!(enemy.set_facing(Facing::Left));
        assert_eq!(enemy.animation_key(), "yapper_left");
    }

    #[test]
    fn test_confine_clamps_without_bounce() {
        let library = AnimationLibrary::builtin();
        let mut player = Entity::new(1, EntitySpec::player(Vec2::new(900.0, -10.0)), &library).unwrap();
        player.vel = Vec2::new(4.0, -4.0);
        player.confine(&Arena::new(800.0, 650.0));
        assert_eq!(player.pos(), Vec2::new(768.0, 0.0));
        assert_eq!(player.vel, Vec2::new(4.0, -4.0));
    }
}
