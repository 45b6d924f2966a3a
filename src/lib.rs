//! Maze Chase - a maze-navigation arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze grid, collision, movement, pursuit)
//! - `settings`: Player preferences and round configuration
//! - `web`: Browser bindings for the renderer/orchestrator (wasm32 only)

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Size of one maze cell in pixels (classic 8x8 tiles)
    pub const CELL_SIZE: f32 = 8.0;

    /// Classic maze dimensions, in cells
    pub const MAZE_WIDTH: usize = 28;
    pub const MAZE_HEIGHT: usize = 31;
    /// The only row where horizontal wrap-around is allowed
    pub const TUNNEL_ROW: usize = 14;

    /// Largest frame delta applied to motion (tab resume, frame hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Lead-in before motion and the countdown begin
    pub const READY_SECS: f32 = 3.0;
    /// Default round length
    pub const ROUND_SECS: u32 = 60;
    /// Default lives (two spare)
    pub const START_LIVES: u8 = 3;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 3.0;
    pub const PLAYER_SPEED: f32 = 80.0; // pixels per second
    /// Player spawn cell (col, row)
    pub const PLAYER_SPAWN: (usize, usize) = (14, 29);

    /// Pursuer defaults - slightly smaller and slower than the player
    pub const PURSUER_RADIUS: f32 = CELL_SIZE * 0.4;
    pub const PURSUER_SPEED: f32 = 60.0;
    /// Pursuer spawn cells (col, row), all on open pellet paths
    pub const PURSUER_SPAWNS: [(usize, usize); 4] = [(6, 14), (21, 14), (6, 15), (21, 15)];

    /// Goal marker radius
    pub const GOAL_RADIUS: f32 = CELL_SIZE * 0.2;

    /// Points per collectible
    pub const PELLET_POINTS: u32 = 10;
    pub const POWER_PELLET_POINTS: u32 = 50;
}

/// Convert a pixel coordinate to a grid index (floor division, may be negative)
#[inline]
pub fn pixel_to_cell(coord: f32) -> i32 {
    (coord / consts::CELL_SIZE).floor() as i32
}

/// Pixel position to (row, col)
#[inline]
pub fn pixel_to_grid(pos: Vec2) -> (i32, i32) {
    (pixel_to_cell(pos.y), pixel_to_cell(pos.x))
}

/// Pixel center of the cell at (col, row)
#[inline]
pub fn cell_center(col: usize, row: usize) -> Vec2 {
    Vec2::new(
        col as f32 * consts::CELL_SIZE + consts::CELL_SIZE / 2.0,
        row as f32 * consts::CELL_SIZE + consts::CELL_SIZE / 2.0,
    )
}
