//! Sparse grid of live cells on an unbounded plane.

use life_core::{Bounds, Cell, DEAD_GLYPH, LIVE_GLYPH};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The set of live cells. Every cell not in the set is dead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: HashSet<Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    pub fn remove(&mut self, cell: &Cell) -> bool {
        self.cells.remove(cell)
    }

    pub fn is_alive(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterator over live cells, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Number of live cells among the 8 neighbors of `cell`
    pub fn live_neighbors(&self, cell: &Cell) -> usize {
        cell.neighbors()
            .iter()
            .filter(|neighbor| self.is_alive(neighbor))
            .count()
    }

    /// Compute the next generation.
    ///
    /// Only live cells and their neighbors can be alive afterwards, so the neighbor
    /// counts are accumulated from the live cells alone and everything else is skipped.
    pub fn step(&self) -> Grid {
        let mut counts: HashMap<Cell, u8> = HashMap::with_capacity(self.cells.len() * 8);
        for cell in &self.cells {
            for neighbor in cell.neighbors() {
                *counts.entry(neighbor).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .filter(|(cell, count)| match count {
                3 => true,
                2 => self.is_alive(cell),
                _ => false,
            })
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Component-wise min/max over live cells; the origin pair when empty.
    pub fn bounds(&self) -> Bounds {
        Bounds::covering(&self.cells).unwrap_or_else(Bounds::origin)
    }

    /// Render the live area, anchored at the minimum bound so cells at negative
    /// coordinates are kept. An empty grid renders as an empty string.
    ///
    /// The output is dense: a grid whose cells lie far apart still produces one
    /// glyph for every position of its bounding box.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        self.render_region(self.bounds())
    }

    /// Render a fixed window, one glyph per cell and one line per row.
    /// Allocates `region.width() * region.height()` glyphs.
    pub fn render_region(&self, region: Bounds) -> String {
        let rows: Vec<String> = (region.min.y..=region.max.y)
            .map(|y| {
                (region.min.x..=region.max.x)
                    .map(|x| {
                        if self.is_alive(&Cell::new(x, y)) {
                            LIVE_GLYPH
                        } else {
                            DEAD_GLYPH
                        }
                    })
                    .collect()
            })
            .collect();
        rows.join("\n")
    }
}

impl FromIterator<Cell> for Grid {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
