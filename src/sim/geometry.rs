//! Axis-aligned geometry for hitboxes and the arena
//!
//! Positions are the top-left corner of a sprite in screen coordinates
//! (x grows to the right, y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle used for overlap tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Hitbox {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, size }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Interval intersection on both axes. Rectangles that only share an
    /// edge do not overlap.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// The rectangle entities may move within
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Largest valid top-left position for a sprite of `size`
    #[inline]
    pub fn max_position(&self, size: Vec2) -> Vec2 {
        (self.bounds() - size).max(Vec2::ZERO)
    }

    /// Whether a sprite of `size` fits inside the arena at all
    pub fn fits(&self, size: Vec2) -> bool {
        size.x <= self.width && size.y <= self.height
    }

    /// Whether a sprite of `size` at `pos` lies fully inside the arena
    pub fn contains(&self, pos: Vec2, size: Vec2) -> bool {
        let max = self.max_position(size);
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= max.x && pos.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hitbox(x: f32, y: f32, w: f32, h: f32) -> Hitbox {
        Hitbox::from_pos_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_full_and_partial() {
        let a = hitbox(350.0, 550.0, 32.0, 46.0);
        assert!(a.overlaps(&a));
        assert!(a.overlaps(&hitbox(370.0, 580.0, 32.0, 46.0)));
        assert!(hitbox(370.0, 580.0, 32.0, 46.0).overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = hitbox(0.0, 0.0, 32.0, 46.0);
        assert!(!a.overlaps(&hitbox(32.0, 0.0, 32.0, 46.0)));
        assert!(!a.overlaps(&hitbox(0.0, 46.0, 32.0, 46.0)));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        let a = hitbox(0.0, 0.0, 32.0, 46.0);
        // Same rows, far apart columns
        assert!(!a.overlaps(&hitbox(100.0, 10.0, 32.0, 46.0)));
        // Same columns, far apart rows
        assert!(!a.overlaps(&hitbox(10.0, 100.0, 32.0, 46.0)));
    }

    #[test]
    fn test_arena_limits() {
        let arena = Arena::new(800.0, 650.0);
        let size = Vec2::new(32.0, 46.0);
        assert_eq!(arena.max_position(size), Vec2::new(768.0, 604.0));
        assert!(arena.contains(Vec2::new(768.0, 604.0), size));
        assert!(!arena.contains(Vec2::new(768.5, 0.0), size));
        assert!(arena.fits(size));
        assert!(!Arena::new(20.0, 650.0).fits(size));
    }
}
