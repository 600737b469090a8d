//! Component reference mappings: which grid cell a reference like `F1` or
//! the terminal block `X20:` is wired at.

mod store;
mod table;

pub use store::MappingStore;
pub use table::MappingTable;

use serde::{Deserialize, Serialize};
use wireplan_engine::engine::Coord;

/// A stored mapping, keyed by its canonical reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub key: String,
    pub row: usize,
    pub col: usize,
    /// Treat the reference as the back/bottom side unless the text says so.
    pub default_to_bottom: bool,
    #[serde(default)]
    pub description: String,
}

impl Mapping {
    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }
}

/// The result of a lookup: the matching mapping plus the effective side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub mapping: Mapping,
    /// Explicit side marker on the query, or the mapping's default.
    pub back_side: bool,
}

impl ResolvedMapping {
    pub fn coord(&self) -> Coord {
        self.mapping.coord()
    }
}
