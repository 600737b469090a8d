//! The cabinet grid: a sparse set of cells split into identical sections,
//! plus one door and one motor terminal point per section.
//!
//! Population rule, per section: even rows (0-based) hold every column,
//! odd rows hold only the section's first column. Odd rows are therefore
//! narrow vertical links between the wide rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use super::coord::Coord;

/// Weight of entering a cell that belongs to a wide row.
pub const WIDE_CELL_WEIGHT: u32 = 100;
/// Weight of entering a cell in a single-column (narrow) row.
pub const NARROW_CELL_WEIGHT: u32 = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid grid configuration: {sections} sections x {rows} rows x {cols} cols")]
    InvalidConfig {
        sections: usize,
        rows: usize,
        cols: usize,
    },
}

/// Shape of a grid: number of sections and the per-section rows/columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub sections: usize,
    pub rows: usize,
    pub cols: usize,
}

impl GridConfig {
    pub fn new(sections: usize, rows: usize, cols: usize) -> Self {
        GridConfig {
            sections,
            rows,
            cols,
        }
    }

    /// Number of cells the population rule produces for this shape.
    pub fn expected_cells(&self) -> usize {
        let wide_rows = self.rows.div_ceil(2);
        let narrow_rows = self.rows / 2;
        self.sections * (wide_rows * self.cols + narrow_rows)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig::new(5, 7, 4)
    }
}

/// The two kinds of terminal point a section carries.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialKind {
    Door,
    Motor,
}

impl SpecialKind {
    /// Fixed wiring length outside the grid, added once per endpoint.
    pub fn offset(self) -> u32 {
        match self {
            SpecialKind::Door => 1000,
            SpecialKind::Motor => 500,
        }
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialKind::Door => write!(f, "Door"),
            SpecialKind::Motor => write!(f, "Motor"),
        }
    }
}

/// A door or motor terminal. Identified by `(section, kind)`; any UI state
/// attached to it lives with the caller.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialPoint {
    pub section: usize,
    pub kind: SpecialKind,
    pub coord: Coord,
}

impl fmt::Display for SpecialPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.section + 1)
    }
}

/// Sparse cabinet grid. Immutable once built; a rebuild produces a new value.
#[derive(Clone, Debug)]
pub struct Grid {
    config: GridConfig,
    cells: BTreeSet<Coord>,
    special_points: Vec<SpecialPoint>,
}

impl Grid {
    /// Build the grid for `sections` sections of `rows` x `cols`.
    pub fn build(sections: usize, rows: usize, cols: usize) -> Result<Grid, GridError> {
        if sections == 0 || rows == 0 || cols == 0 {
            return Err(GridError::InvalidConfig {
                sections,
                rows,
                cols,
            });
        }

        let config = GridConfig::new(sections, rows, cols);
        let mut cells = BTreeSet::new();
        let mut special_points = Vec::with_capacity(sections * 2);
        // Last wide row; with an even row count the final row is narrow.
        let motor_row = (rows - 1) & !1;

        for section in 0..sections {
            let first_col = section * cols;
            for row in 0..rows {
                if row % 2 == 0 {
                    for col in 0..cols {
                        cells.insert(Coord::new(row, first_col + col));
                    }
                } else {
                    cells.insert(Coord::new(row, first_col));
                }
            }

            special_points.push(SpecialPoint {
                section,
                kind: SpecialKind::Door,
                coord: Coord::new(0, first_col),
            });
            special_points.push(SpecialPoint {
                section,
                kind: SpecialKind::Motor,
                coord: Coord::new(motor_row, first_col + cols - 1),
            });
        }

        Ok(Grid {
            config,
            cells,
            special_points,
        })
    }

    pub fn from_config(config: GridConfig) -> Result<Grid, GridError> {
        Self::build(config.sections, config.rows, config.cols)
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    /// True iff a cell exists immediately left or right of `(row, col)`.
    pub fn has_horizontal_neighbor(&self, row: usize, col: usize) -> bool {
        let left = col
            .checked_sub(1)
            .is_some_and(|c| self.cells.contains(&Coord::new(row, c)));
        let right = col
            .checked_add(1)
            .is_some_and(|c| self.cells.contains(&Coord::new(row, c)));
        left || right
    }

    /// Cost of stepping onto `coord`, decided by its row shape alone.
    pub fn cell_weight(&self, coord: Coord) -> u32 {
        if self.has_horizontal_neighbor(coord.row, coord.col) {
            WIDE_CELL_WEIGHT
        } else {
            NARROW_CELL_WEIGHT
        }
    }

    /// Existing grid-adjacent cells of `coord`.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        coord.orthogonal().filter(|c| self.cells.contains(c))
    }

    pub fn special_points(&self) -> &[SpecialPoint] {
        &self.special_points
    }

    pub fn special_point(&self, section: usize, kind: SpecialKind) -> Option<SpecialPoint> {
        self.special_points
            .iter()
            .find(|p| p.section == section && p.kind == kind)
            .copied()
    }

    /// Section index owning `coord`, if the cell exists.
    pub fn section_of(&self, coord: Coord) -> Option<usize> {
        self.contains(coord).then(|| coord.col / self.config.cols)
    }
}
