//! Session state for one open document (UI-agnostic).

mod cursor;
mod resolver;

pub use cursor::{MAX_SCAN_ROW, PendingRow};
pub use resolver::{Connection, Unresolved};

use tracing::debug;
use wireplan_engine::engine::{
    Endpoint, Grid, GridConfig, Measurement, RouteError, SpecialKind, SpecialPoint, measure,
};

use crate::batch::FIRST_DATA_ROW;
use crate::error::Result;
use crate::mapping::MappingTable;

/// Everything one document session works with: the grid, the document's
/// mapping table, the locked start point and the manual measurement cursor.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    mappings: MappingTable,
    locked_start: Option<SpecialPoint>,
    cursor_row: usize,
}

impl Session {
    pub fn new(grid: Grid, mappings: MappingTable) -> Self {
        Session {
            grid,
            mappings,
            locked_start: None,
            cursor_row: FIRST_DATA_ROW,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    pub fn mappings_mut(&mut self) -> &mut MappingTable {
        &mut self.mappings
    }

    /// Replace the grid with one of a new shape. On error the current grid
    /// is kept. A locked start point survives if its section still exists.
    pub fn rebuild(&mut self, config: GridConfig) -> Result<()> {
        let grid = Grid::from_config(config)?;
        self.locked_start = self
            .locked_start
            .and_then(|locked| grid.special_point(locked.section, locked.kind));
        self.grid = grid;
        debug!(?config, cells = self.grid.cell_count(), "grid rebuilt");
        Ok(())
    }

    pub fn locked_start(&self) -> Option<SpecialPoint> {
        self.locked_start
    }

    /// Lock the given door/motor as the start of manual measurements, or
    /// unlock it if it is already locked. Returns the lock after the call.
    pub fn toggle_lock(&mut self, section: usize, kind: SpecialKind) -> Option<SpecialPoint> {
        let point = self.grid.special_point(section, kind)?;
        self.locked_start = if self.locked_start == Some(point) {
            None
        } else {
            Some(point)
        };
        self.locked_start
    }

    pub fn unlock(&mut self) {
        self.locked_start = None;
    }

    /// Route between two endpoints on this session's grid.
    pub fn measure(
        &self,
        start: Endpoint,
        end: Endpoint,
    ) -> std::result::Result<Measurement, RouteError> {
        measure(&self.grid, start, end)
    }

    /// Route from the locked start point, if one is locked.
    pub fn measure_from_locked(
        &self,
        end: Endpoint,
    ) -> Option<std::result::Result<Measurement, RouteError>> {
        let start = self.locked_start?;
        Some(self.measure(Endpoint::Special(start), end))
    }
}
