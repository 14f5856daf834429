//! Core type definitions for the simulator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offsets of the Moore neighborhood, row by row, self excluded.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A coordinate on the unbounded plane. Arithmetic wraps at the `i64` edges, so
/// `i64::MAX` and `i64::MIN` are neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
}

impl Cell {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// The 8 surrounding cells. Never clamped, so coordinates may go negative.
    pub fn neighbors(&self) -> [Cell; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// Whether `other` is one of the 8 surrounding cells
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self != other
            && self.x.wrapping_sub(other.x).unsigned_abs() <= 1
            && self.y.wrapping_sub(other.y).unsigned_abs() <= 1
    }
}

impl From<(i64, i64)> for Cell {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle spanned by two corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Cell,
    pub max: Cell,
}

impl Bounds {
    pub fn new(min: Cell, max: Cell) -> Self {
        Self { min, max }
    }

    /// The degenerate bounds reported for an empty grid
    pub fn origin() -> Self {
        Self::new(Cell::new(0, 0), Cell::new(0, 0))
    }

    /// Smallest bounds covering every cell, or `None` when there are none.
    pub fn covering<'a, I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut cells = cells.into_iter();
        let first = *cells.next()?;
        Some(cells.fold(Self::new(first, first), |acc, cell| Self {
            min: Cell::new(acc.min.x.min(cell.x), acc.min.y.min(cell.y)),
            max: Cell::new(acc.max.x.max(cell.x), acc.max.y.max(cell.y)),
        }))
    }

    /// Grow by `margin` cells on every side
    pub fn dilate(&self, margin: i64) -> Self {
        Self {
            min: self.min.offset(-margin, -margin),
            max: self.max.offset(margin, margin),
        }
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        (self.min.x..=self.max.x).contains(&cell.x) && (self.min.y..=self.max.y).contains(&cell.y)
    }

    /// Columns spanned; saturates at `u64::MAX` for the full `i64` range.
    pub fn width(&self) -> u64 {
        self.max.x.abs_diff(self.min.x).saturating_add(1)
    }

    pub fn height(&self) -> u64 {
        self.max.y.abs_diff(self.min.y).saturating_add(1)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::origin()
    }
}
