//! Facing directions and their unit vectors

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A discrete facing direction, in the classic right/down/left/up order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Right,
    Down,
    Left,
    Up,
}

/// Unit vectors indexed by `Direction as usize` (screen space, y grows down)
const UNIT_VECTORS: [Vec2; 4] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, -1.0),
];

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Unit displacement for this direction
    #[inline]
    pub fn unit(self) -> Vec2 {
        UNIT_VECTORS[self as usize]
    }

    /// Render rotation in radians (0 = right, pi/2 = down, ...)
    #[inline]
    pub fn rotation(self) -> f32 {
        self as usize as f32 * std::f32::consts::FRAC_PI_2
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    /// Parse a browser key name ("ArrowUp") or a plain name ("up")
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "right" => Some(Direction::Right),
            "ArrowDown" | "down" => Some(Direction::Down),
            "ArrowLeft" | "left" => Some(Direction::Left),
            "ArrowUp" | "up" => Some(Direction::Up),
            _ => None,
        }
    }
}
