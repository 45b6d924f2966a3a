//! The controlled entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionModel, collect_at};
use super::direction::Direction;
use super::entity::{Body, BodyShape};
use super::grid::Grid;
use crate::consts::{CELL_SIZE, PLAYER_RADIUS, PLAYER_SPEED};

/// Widest mouth opening (radians)
const MOUTH_MAX: f32 = std::f32::consts::FRAC_PI_2;
/// Animation phase advance per live tick
const MOUTH_STEP: f32 = 0.3;
/// Grid snap only kicks in this close to a cell center (pixels)
const SNAP_DISTANCE: f32 = 3.0;

/// Optional smoothing when a move is blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionAssist {
    /// Blocked means no movement this tick
    #[default]
    None,
    /// When blocked near a cell center, snap onto it to help cornering
    GridSnap,
}

/// Result of one motion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    pub moved: bool,
    /// Points collected at the new position (0 if none)
    pub points: u32,
}

/// Player appearance chosen before the round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerLook {
    pub shape: BodyShape,
    pub size: f32,
    /// RGBA
    pub color: [f32; 4],
}

impl Default for PlayerLook {
    fn default() -> Self {
        Self {
            shape: BodyShape::Normal,
            size: 1.0,
            color: [1.0, 1.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub color: [f32; 4],
    /// Current mouth opening (radians)
    pub mouth_angle: f32,
    mouth_phase: f32,
}

impl Player {
    pub fn new(spawn: Vec2, look: &PlayerLook) -> Self {
        let mut body = Body::new(spawn, PLAYER_SPEED, PLAYER_RADIUS);
        body.shape = look.shape;
        body.size = look.size;
        Self {
            body,
            color: look.color,
            mouth_angle: std::f32::consts::FRAC_PI_3,
            mouth_phase: 0.0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn facing(&self) -> Direction {
        self.body.facing
    }

    /// Overwrite the facing immediately. Walkability is checked when moving,
    /// not here, so a turn can be requested before the corner opens.
    pub fn set_direction(&mut self, dir: Direction) {
        self.body.facing = dir;
    }

    /// Advance the mouth animation one tick
    pub fn animate(&mut self) {
        self.mouth_phase += MOUTH_STEP;
        self.mouth_angle = MOUTH_MAX * (0.3 + 0.7 * (1.0 + self.mouth_phase.sin()) / 2.0);
    }

    /// Try to move along the current facing by `speed * dt`, collecting any
    /// pellet at the new position.
    pub fn step(&mut self, grid: &mut Grid, model: &CollisionModel, dt: f32, assist: MotionAssist) -> StepOutcome {
        let distance = self.body.speed * dt;
        if self.body.try_step(grid, model, self.body.facing, distance) {
            let points = collect_at(grid, self.body.pos);
            if points > 0 {
                log::debug!("Collected {} points at {:?}", points, self.body.cell());
            }
            return StepOutcome { moved: true, points };
        }

        if assist == MotionAssist::GridSnap {
            self.snap_to_cell_center(grid, model);
        }
        StepOutcome::default()
    }

    fn snap_to_cell_center(&mut self, grid: &Grid, model: &CollisionModel) {
        let (row, col) = self.body.cell();
        let center = Vec2::new(
            (col as f32 + 0.5) * CELL_SIZE,
            (row as f32 + 0.5) * CELL_SIZE,
        );
        let offset = center - self.body.pos;
        if offset.x.abs() < SNAP_DISTANCE
            && offset.y.abs() < SNAP_DISTANCE
            && !model.is_wall_collision(grid, center, self.body.collision_radius())
        {
            self.body.pos = center;
        }
    }
}
