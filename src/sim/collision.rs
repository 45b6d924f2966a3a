//! Wall collision, the movement gate, tunnel wrap and pellet pickup
//!
//! Entities are circles but the maze is a grid of squares. Instead of exact
//! circle-vs-square intersection, a small constellation of offsets around the
//! center is tested. Each offset is swept from the center outward through every
//! cell it crosses, so a larger radius can never pass a check that a smaller
//! radius fails.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::Grid;
use crate::consts::CELL_SIZE;
use crate::{pixel_to_cell, pixel_to_grid};

/// Cardinal sample offset, as a fraction of radius
pub const CARDINAL_FRACTION: f32 = 0.7;
/// Diagonal sample offset per axis, as a fraction of radius
pub const DIAGONAL_FRACTION: f32 = 0.5;

const CROSS_5: [Vec2; 5] = [
    Vec2::ZERO,
    Vec2::new(CARDINAL_FRACTION, 0.0),
    Vec2::new(-CARDINAL_FRACTION, 0.0),
    Vec2::new(0.0, CARDINAL_FRACTION),
    Vec2::new(0.0, -CARDINAL_FRACTION),
];

const FULL_9: [Vec2; 9] = [
    Vec2::ZERO,
    Vec2::new(CARDINAL_FRACTION, 0.0),
    Vec2::new(-CARDINAL_FRACTION, 0.0),
    Vec2::new(0.0, CARDINAL_FRACTION),
    Vec2::new(0.0, -CARDINAL_FRACTION),
    Vec2::new(DIAGONAL_FRACTION, DIAGONAL_FRACTION),
    Vec2::new(-DIAGONAL_FRACTION, DIAGONAL_FRACTION),
    Vec2::new(DIAGONAL_FRACTION, -DIAGONAL_FRACTION),
    Vec2::new(-DIAGONAL_FRACTION, -DIAGONAL_FRACTION),
];

/// Which points around an entity's center are tested against walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplePattern {
    /// Center plus four cardinal offsets
    #[default]
    Cross5,
    /// `Cross5` plus four diagonal offsets (stricter around wall corners)
    Full9,
}

impl SamplePattern {
    /// Offsets as fractions of the collision radius
    pub fn factors(self) -> &'static [Vec2] {
        match self {
            SamplePattern::Cross5 => &CROSS_5,
            SamplePattern::Full9 => &FULL_9,
        }
    }
}

/// Collision queries against a borrowed grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionModel {
    pub pattern: SamplePattern,
}

impl CollisionModel {
    pub fn new(pattern: SamplePattern) -> Self {
        Self { pattern }
    }

    /// True if a circle of `radius` centered at `pos` overlaps a wall
    pub fn is_wall_collision(&self, grid: &Grid, pos: Vec2, radius: f32) -> bool {
        self.pattern
            .factors()
            .iter()
            .any(|&factor| sweep_hits_wall(grid, pos, pos + factor * radius))
    }

    /// True if moving `distance` along `dir` lands somewhere wall-free.
    /// Pure predicate; nothing is mutated.
    pub fn can_move(&self, grid: &Grid, pos: Vec2, radius: f32, dir: Direction, distance: f32) -> bool {
        !self.is_wall_collision(grid, pos + dir.unit() * distance, radius)
    }
}

/// Walk every cell the segment `from -> to` passes through (grid DDA),
/// returning true on the first wall.
fn sweep_hits_wall(grid: &Grid, from: Vec2, to: Vec2) -> bool {
    let mut col = pixel_to_cell(from.x);
    let mut row = pixel_to_cell(from.y);
    if grid.cell_at(row, col).is_wall() {
        return true;
    }

    let end_col = pixel_to_cell(to.x);
    let end_row = pixel_to_cell(to.y);
    let delta = to - from;
    let (step_col, mut t_max_x, t_delta_x) = axis_setup(from.x, delta.x, col);
    let (step_row, mut t_max_y, t_delta_y) = axis_setup(from.y, delta.y, row);

    let steps = (end_col - col).abs() + (end_row - row).abs();
    for _ in 0..steps {
        if row == end_row && col == end_col {
            break;
        }
        if t_max_x < t_max_y {
            col += step_col;
            t_max_x += t_delta_x;
        } else if t_max_y < t_max_x {
            row += step_row;
            t_max_y += t_delta_y;
        } else {
            // Exactly through a cell corner: both side cells are touched
            if grid.cell_at(row, col + step_col).is_wall()
                || grid.cell_at(row + step_row, col).is_wall()
            {
                return true;
            }
            col += step_col;
            row += step_row;
            t_max_x += t_delta_x;
            t_max_y += t_delta_y;
        }
        if grid.cell_at(row, col).is_wall() {
            return true;
        }
    }

    grid.cell_at(end_row, end_col).is_wall()
}

/// (step, parametric distance to first boundary, parametric cell width) for one axis
fn axis_setup(origin: f32, delta: f32, cell: i32) -> (i32, f32, f32) {
    if delta > 0.0 {
        (1, ((cell + 1) as f32 * CELL_SIZE - origin) / delta, CELL_SIZE / delta)
    } else if delta < 0.0 {
        (-1, (cell as f32 * CELL_SIZE - origin) / delta, CELL_SIZE / -delta)
    } else {
        (0, f32::INFINITY, f32::INFINITY)
    }
}

/// Teleport across the maze when inside the tunnel row's pixel band and past an edge.
/// Everywhere else this is a no-op.
pub fn apply_tunnel_wrap(grid: &Grid, pos: Vec2) -> Vec2 {
    let Some(row) = grid.tunnel_row() else {
        return pos;
    };
    let top = row as f32 * CELL_SIZE;
    if pos.y < top || pos.y >= top + CELL_SIZE {
        return pos;
    }

    let width = grid.pixel_width();
    if pos.x < 0.0 {
        Vec2::new(width, pos.y)
    } else if pos.x > width {
        Vec2::new(0.0, pos.y)
    } else {
        pos
    }
}

/// Collect whatever pellet lies under `pos`; 0 if none or off-grid
pub fn collect_at(grid: &mut Grid, pos: Vec2) -> u32 {
    let (row, col) = pixel_to_grid(pos);
    grid.collect(row, col)
}
