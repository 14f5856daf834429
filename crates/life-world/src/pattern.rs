//! Building grids from matrices and textual patterns.

use crate::grid::Grid;
use life_core::{Cell, Error, PatternFormat, Result, ALIVE_MARKER};
use tracing::debug;

impl Grid {
    /// Build a grid from rows of flags, where any non-zero value at `rows[y][x]`
    /// is a live cell at `(x, y)`. Rows must all have the same length.
    pub fn try_from_matrix<R: AsRef<[i32]>>(rows: &[R]) -> Result<Grid> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if let Some(y) = rows.iter().position(|row| row.as_ref().len() != width) {
            return Err(Error::InvalidMatrix(format!(
                "row {} has {} columns, expected {}",
                y,
                rows[y].as_ref().len(),
                width
            )));
        }

        let mut grid = Grid::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.as_ref().iter().enumerate() {
                if value != 0 {
                    grid.insert(Cell::new(x as i64, y as i64));
                }
            }
        }
        Ok(grid)
    }

    /// Like [`Grid::try_from_matrix`], but a malformed matrix yields an empty grid.
    pub fn from_matrix<R: AsRef<[i32]>>(rows: &[R]) -> Grid {
        Self::try_from_matrix(rows).unwrap_or_else(|e| {
            debug!("Falling back to an empty grid: {}", e);
            Grid::new()
        })
    }

    /// Parse a delimited pattern. Each row is trimmed, and every `x` becomes a live
    /// cell at its column and row offset; any other character is dead.
    pub fn try_from_pattern(text: &str, format: PatternFormat) -> Result<Grid> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidPattern("pattern is blank".to_string()));
        }

        let mut grid = Grid::new();
        for (y, row) in text.split(format.row_delimiter).enumerate() {
            for (x, glyph) in row.trim().chars().enumerate() {
                if glyph == ALIVE_MARKER {
                    grid.insert(Cell::new(x as i64, y as i64));
                }
            }
        }
        Ok(grid)
    }

    /// Like [`Grid::try_from_pattern`], but a blank pattern yields an empty grid.
    pub fn from_pattern(text: &str, format: PatternFormat) -> Grid {
        Self::try_from_pattern(text, format).unwrap_or_else(|e| {
            debug!("Falling back to an empty grid: {}", e);
            Grid::new()
        })
    }
}
