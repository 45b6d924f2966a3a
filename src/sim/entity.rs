//! Shared mobile-entity capability
//!
//! Both the player and the pursuers compose a `Body`; they differ only in how
//! they decide which way to go.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionModel, apply_tunnel_wrap};
use super::direction::Direction;
use super::grid::Grid;
use crate::pixel_to_grid;

/// Body outline; scales the two render radii
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    #[default]
    Normal,
    Wide,
    Tall,
}

impl BodyShape {
    pub const ALL: [BodyShape; 3] = [BodyShape::Normal, BodyShape::Wide, BodyShape::Tall];

    /// Largest mean of the two multipliers over every shape
    pub const MAX_MEAN_MULTIPLIER: f32 = 1.1;

    /// (x, y) radius multipliers
    pub fn multipliers(self) -> Vec2 {
        match self {
            BodyShape::Normal => Vec2::ONE,
            BodyShape::Wide => Vec2::new(1.3, 0.9),
            BodyShape::Tall => Vec2::new(0.9, 1.3),
        }
    }
}

/// A circle that moves through the maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Center, in pixels
    pub pos: Vec2,
    pub facing: Direction,
    /// Pixels per second
    pub speed: f32,
    /// Base radius before size/shape multipliers
    pub radius: f32,
    pub size: f32,
    pub shape: BodyShape,
}

impl Body {
    pub fn new(pos: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            pos,
            facing: Direction::Right,
            speed,
            radius,
            size: 1.0,
            shape: BodyShape::Normal,
        }
    }

    /// Render radii (x, y)
    pub fn effective_radius(&self) -> Vec2 {
        self.shape.multipliers() * (self.radius * self.size)
    }

    /// Single radius used for walls and contact: mean of the render radii
    pub fn collision_radius(&self) -> f32 {
        let r = self.effective_radius();
        (r.x + r.y) / 2.0
    }

    /// Grid cell under the center as (row, col)
    pub fn cell(&self) -> (i32, i32) {
        pixel_to_grid(self.pos)
    }

    pub fn next_position(&self, dir: Direction, distance: f32) -> Vec2 {
        self.pos + dir.unit() * distance
    }

    pub fn can_move(&self, grid: &Grid, model: &CollisionModel, dir: Direction, distance: f32) -> bool {
        model.can_move(grid, self.pos, self.collision_radius(), dir, distance)
    }

    /// Move `distance` along `dir` if the gate allows it, applying tunnel wrap.
    /// Facing is left untouched. Returns whether the body moved.
    pub fn try_step(&mut self, grid: &Grid, model: &CollisionModel, dir: Direction, distance: f32) -> bool {
        if !self.can_move(grid, model, dir, distance) {
            return false;
        }
        self.pos = apply_tunnel_wrap(grid, self.next_position(dir, distance));
        true
    }

    /// Circle-circle overlap
    pub fn touches(&self, other_pos: Vec2, other_radius: f32) -> bool {
        self.pos.distance(other_pos) < self.collision_radius() + other_radius
    }
}
