//! Axis-aligned hitboxes and overlap tests
//!
//! Bodies are anchored at their bottom-center point (the runner's feet, an
//! obstacle's base). A [`Hitbox`] describes the collision rectangle relative
//! to that anchor; [`Aabb`] is the resolved world-space rectangle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision box size and offset relative to a bottom-center anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Width and height in pixels
    pub size: Vec2,
    /// Shift of the box's bottom-center away from the anchor
    pub offset: Vec2,
}

impl Hitbox {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
        }
    }

    pub const fn with_offset(self, x: f32, y: f32) -> Self {
        Self {
            size: self.size,
            offset: Vec2::new(x, y),
        }
    }
}

/// World-space axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Resolve a hitbox against its body's anchor
    pub fn from_anchor(anchor: Vec2, hitbox: &Hitbox) -> Self {
        let bottom_center = anchor + hitbox.offset;
        let half_w = hitbox.size.x / 2.0;
        Self {
            min: Vec2::new(bottom_center.x - half_w, bottom_center.y - hitbox.size.y),
            max: Vec2::new(bottom_center.x + half_w, bottom_center.y),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}
