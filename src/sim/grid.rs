//! Maze grid: cell types, pellet collection and reset
//!
//! The grid only tracks consumable-cell state. Entities are never stored in it,
//! and the only write path is pellet collection (plus `reset`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH, POWER_PELLET_POINTS, PELLET_POINTS, TUNNEL_ROW};

/// Classification of a maze square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellType {
    Empty = 0,
    Wall = 1,
    Pellet = 2,
    PowerPellet = 3,
    Tunnel = 4,
    GhostHouse = 5,
}

impl CellType {
    /// Only walls block movement
    #[inline]
    pub fn is_wall(self) -> bool {
        self == CellType::Wall
    }

    pub fn is_collectible(self) -> bool {
        matches!(self, CellType::Pellet | CellType::PowerPellet)
    }

    /// Points awarded for collecting this cell
    pub fn points(self) -> u32 {
        match self {
            CellType::Pellet => PELLET_POINTS,
            CellType::PowerPellet => POWER_PELLET_POINTS,
            _ => 0,
        }
    }
}

impl TryFrom<u8> for CellType {
    type Error = GridError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => CellType::Empty,
            1 => CellType::Wall,
            2 => CellType::Pellet,
            3 => CellType::PowerPellet,
            4 => CellType::Tunnel,
            5 => CellType::GhostHouse,
            _ => return Err(GridError::UnknownCell { code }),
        })
    }
}

/// Errors raised when building a grid from raw cell codes
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell code {code}")]
    UnknownCell { code: u8 },
    #[error("tunnel row {row} is outside a grid of height {height}")]
    TunnelOutOfRange { row: usize, height: usize },
}

/// Classic arcade layout
/// 0 = empty, 1 = wall, 2 = pellet, 3 = power pellet, 4 = tunnel, 5 = ghost house
#[rustfmt::skip]
pub const CLASSIC_LAYOUT: [[u8; MAZE_WIDTH]; MAZE_HEIGHT] = [
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,1,1,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,3,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,3,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,2,1],
    [1,2,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,2,1],
    [1,2,2,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,2,2,1],
    [1,1,1,1,1,1,2,1,1,1,1,1,0,1,1,0,1,1,1,1,1,2,1,1,1,1,1,1],
    [0,0,0,0,0,1,2,1,1,1,1,1,0,1,1,0,1,1,1,1,1,2,1,0,0,0,0,0],
    [0,0,0,0,0,1,2,1,1,0,0,0,0,0,0,0,0,0,0,1,1,2,1,0,0,0,0,0],
    [0,0,0,0,0,1,2,1,1,0,1,1,1,5,5,1,1,1,0,1,1,2,1,0,0,0,0,0],
    [1,1,1,1,1,1,2,1,1,0,1,5,5,5,5,5,5,1,0,1,1,2,1,1,1,1,1,1],
    [4,0,0,0,0,0,2,0,0,0,1,5,5,5,5,5,5,1,0,0,0,2,0,0,0,0,0,4],
    [1,1,1,1,1,1,2,1,1,0,1,5,5,5,5,5,5,1,0,1,1,2,1,1,1,1,1,1],
    [0,0,0,0,0,1,2,1,1,0,1,1,1,1,1,1,1,1,0,1,1,2,1,0,0,0,0,0],
    [0,0,0,0,0,1,2,1,1,0,0,0,0,0,0,0,0,0,0,1,1,2,1,0,0,0,0,0],
    [0,0,0,0,0,1,2,1,1,0,1,1,1,1,1,1,1,1,0,1,1,2,1,0,0,0,0,0],
    [1,1,1,1,1,1,2,1,1,0,1,1,1,1,1,1,1,1,0,1,1,2,1,1,1,1,1,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,1,1,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,2,1,1,1,1,2,1,1,1,1,1,2,1,1,2,1,1,1,1,1,2,1,1,1,1,2,1],
    [1,3,2,2,1,1,2,2,2,2,2,2,2,0,0,2,2,2,2,2,2,2,1,1,2,2,3,1],
    [1,1,1,2,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,2,1,1,1],
    [1,1,1,2,1,1,2,1,1,2,1,1,1,1,1,1,1,1,2,1,1,2,1,1,2,1,1,1],
    [1,2,2,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,1,1,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,1,1,2,1],
    [1,2,1,1,1,1,1,1,1,1,1,1,2,1,1,2,1,1,1,1,1,1,1,1,1,1,2,1],
    [1,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
];

/// A rectangular maze with a pristine copy for restarts.
/// Only built through `new`/`classic`, which keep `cells` and `pristine` the same length.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major live cells
    cells: Vec<CellType>,
    /// Cells as constructed; `reset` copies these back
    pristine: Vec<CellType>,
    tunnel_row: Option<usize>,
}

impl Grid {
    /// Build a grid from rows of raw cell codes
    pub fn new<R: AsRef<[u8]>>(rows: &[R], tunnel_row: Option<usize>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        if let Some(row) = tunnel_row {
            if row >= height {
                return Err(GridError::TunnelOutOfRange { row, height });
            }
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, codes) in rows.iter().enumerate() {
            let codes = codes.as_ref();
            if codes.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found: codes.len(),
                });
            }
            for &code in codes {
                cells.push(CellType::try_from(code)?);
            }
        }

        Ok(Self {
            width,
            height,
            pristine: cells.clone(),
            cells,
            tunnel_row,
        })
    }

    /// The compiled-in arcade maze with its tunnel on row 14
    pub fn classic() -> Self {
        let cells: Vec<CellType> = CLASSIC_LAYOUT
            .iter()
            .flatten()
            .map(|&code| CellType::try_from(code).unwrap_or(CellType::Wall))
            .collect();
        Self {
            width: MAZE_WIDTH,
            height: MAZE_HEIGHT,
            pristine: cells.clone(),
            cells,
            tunnel_row: Some(TUNNEL_ROW),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tunnel_row(&self) -> Option<usize> {
        self.tunnel_row
    }

    /// True if `row` is the tunnel row
    #[inline]
    pub fn is_tunnel_row(&self, row: i32) -> bool {
        self.tunnel_row.is_some_and(|t| row == t as i32)
    }

    #[inline]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Cell at (row, col), strict: `None` when out of range
    pub fn get(&self, row: i32, col: i32) -> Option<CellType> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Cell at (row, col) for collision purposes.
    ///
    /// Out-of-range reads as `Wall`, except off the left/right edge of the
    /// tunnel row, which reads as `Tunnel` (wrap-eligible, never blocking).
    pub fn cell_at(&self, row: i32, col: i32) -> CellType {
        match self.get(row, col) {
            Some(cell) => cell,
            None if self.is_tunnel_row(row) => CellType::Tunnel,
            None => CellType::Wall,
        }
    }

    /// Collect the pellet at (row, col) and return its points.
    ///
    /// Returns 0 for anything that is not a pellet, including out-of-range
    /// coordinates and already-collected cells.
    pub fn collect(&mut self, row: i32, col: i32) -> u32 {
        let Some(i) = self.index(row, col) else {
            return 0;
        };
        let cell = self.cells[i];
        if !cell.is_collectible() {
            return 0;
        }
        self.cells[i] = CellType::Empty;
        cell.points()
    }

    /// Restore every cell to its value at construction
    pub fn reset(&mut self) {
        self.cells.copy_from_slice(&self.pristine);
    }

    /// Pellets and power pellets still on the board
    pub fn pellets_remaining(&self) -> usize {
        self.cells.iter().filter(|c| c.is_collectible()).count()
    }

    /// Iterate every cell as (row, col, cell)
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, CellType)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i / self.width, i % self.width, cell))
    }

    /// Width of the maze in pixels
    #[inline]
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * crate::consts::CELL_SIZE
    }

    #[inline]
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * crate::consts::CELL_SIZE
    }
}
