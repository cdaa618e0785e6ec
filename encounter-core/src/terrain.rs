//! Passability boundary between the core and the host's map.
//!
//! The core only ever asks single-point questions; there is no pathfinding.

use bevy::prelude::*;

/// Answers whether a world position is traversable
pub trait Passability {
    fn is_passable(&self, position: Vec2) -> bool;
}

impl<F> Passability for F
where
    F: Fn(Vec2) -> bool,
{
    fn is_passable(&self, position: Vec2) -> bool {
        self(position)
    }
}

/// Unbounded map with no obstacles
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl Passability for OpenField {
    fn is_passable(&self, _position: Vec2) -> bool {
        true
    }
}

/// Axis-aligned walkable rectangle (edges inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedArena {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundedArena {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Square arena centred on the origin
    pub fn centered(half_extent: f32) -> Self {
        Self::new(Vec2::splat(-half_extent), Vec2::splat(half_extent))
    }
}

impl Passability for BoundedArena {
    fn is_passable(&self, position: Vec2) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.y >= self.min.y
            && position.y <= self.max.y
    }
}
