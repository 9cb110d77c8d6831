//! Axis-aligned bodies shared by the player, enemies and projectiles.

use bevy::prelude::*;

use crate::constants::{PRUNE_MARGIN_BOTTOM, PRUNE_MARGIN_SIDE, PRUNE_MARGIN_TOP};

/// Position and extent of an actor in playfield pixels.
///
/// The playfield origin is the top-left corner and +y points down, so `top()`
/// is the smaller y value.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Build a body from its top-left corner.
    pub fn from_top_left(left: f32, top: f32, size: Vec2) -> Self {
        Self {
            center: Vec2::new(left + size.x * 0.5, top + size.y * 0.5),
            size,
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size.x * 0.5
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.x * 0.5
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }

    /// Strict overlap test: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True once the whole box has left the playfield plus its pruning margins.
    pub fn is_outside(&self, playfield: Vec2) -> bool {
        self.bottom() < -PRUNE_MARGIN_TOP
            || self.top() > playfield.y + PRUNE_MARGIN_BOTTOM
            || self.right() < -PRUNE_MARGIN_SIDE
            || self.left() > playfield.x + PRUNE_MARGIN_SIDE
    }

    /// Shift horizontally so the box stays within `[0, width]`.
    pub fn clamp_x(&mut self, width: f32) {
        let half = self.size.x * 0.5;
        self.center.x = if width <= self.size.x {
            width * 0.5
        } else {
            self.center.x.clamp(half, width - half)
        };
    }
}

/// Insertion index of a simulated entity.
///
/// Sweeps and direct-mode targeting walk entities in ascending order, which
/// stands in for the order of the active entity list.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnOrder(pub u64);

/// Source of [`SpawnOrder`] values.
#[derive(Resource, Debug, Default)]
pub struct SpawnCounter {
    next: u64,
}

impl SpawnCounter {
    pub fn next_order(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.next);
        self.next += 1;
        order
    }
}

/// Convert a playfield position to a Bevy world translation.
///
/// The 2D camera sits at the playfield centre with +y up.
pub fn to_world(position: Vec2, playfield: Vec2) -> Vec2 {
    Vec2::new(
        position.x - playfield.x * 0.5,
        playfield.y * 0.5 - position.y,
    )
}
