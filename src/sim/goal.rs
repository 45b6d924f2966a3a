//! Goal marker: a single target point placed once per round

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{CellType, Grid};
use crate::cell_center;
use crate::consts::GOAL_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalMarker {
    /// Center of the chosen cell, in pixels
    pub pos: Vec2,
}

impl GoalMarker {
    /// Pick a uniformly random traversable cell (empty or pellet). With no
    /// such cell, fall back to the maze center.
    pub fn place<R: Rng>(grid: &Grid, rng: &mut R) -> Self {
        let candidates: Vec<(usize, usize)> = grid
            .iter_cells()
            .filter(|&(_, _, cell)| matches!(cell, CellType::Empty | CellType::Pellet))
            .map(|(row, col, _)| (row, col))
            .collect();

        let pos = if candidates.is_empty() {
            log::warn!("No open cell for the goal marker, using maze center");
            Vec2::new(grid.pixel_width() / 2.0, grid.pixel_height() / 2.0)
        } else {
            let (row, col) = candidates[rng.random_range(0..candidates.len())];
            cell_center(col, row)
        };
        log::debug!("Goal marker placed at {:?}", pos);
        Self { pos }
    }

    /// Centers closer than the player radius plus the marker radius
    pub fn reached(&self, player_pos: Vec2, player_radius: f32) -> bool {
        self.pos.distance(player_pos) < player_radius + GOAL_RADIUS
    }
}
