//! wireplan-core - UI-agnostic session model, component mappings and sheets.

pub mod batch;
pub mod error;
pub mod mapping;
pub mod session;
pub mod storage;

pub use batch::{
    BatchReport, Sheet, StandardMeasurement, UnmappedReport, apply_standard_measurements,
    find_unmapped_references, process_all, process_until,
};
pub use error::{Result, WireplanError};
pub use mapping::{Mapping, MappingStore, MappingTable, ResolvedMapping};
pub use session::{Connection, PendingRow, Session, Unresolved};
pub use storage::CsvSheet;

pub use wireplan_engine::engine::{Coord, Distance, Grid, GridConfig};
