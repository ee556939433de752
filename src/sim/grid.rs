//! Grid geometry: cells, directions, toroidal wrapping
//!
//! The board is a fixed `COLS x ROWS` grid of unit cells. Coordinates wrap
//! modulo the grid size, so the snake re-enters on the opposite edge instead
//! of leaving the board.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{COLS, ROWS};

/// A grid cell position
pub type Cell = IVec2;

/// Wrap a cell onto the board (toroidal topology)
#[inline]
pub fn wrap_cell(cell: Cell) -> Cell {
    Cell::new(cell.x.rem_euclid(COLS), cell.y.rem_euclid(ROWS))
}

/// True if the cell lies within `[0, COLS) x [0, ROWS)`
#[inline]
pub fn in_bounds(cell: Cell) -> bool {
    (0..COLS).contains(&cell.x) && (0..ROWS).contains(&cell.y)
}

/// One of the four cardinal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector for this direction (screen coordinates, y grows downward)
    pub fn vector(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// The exact opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Mirrored direction under the invert effect (up <-> down, left <-> right)
    pub fn inverted(self) -> Self {
        self.opposite()
    }
}
