//! Cabinet routing engine API.
//!
//! - [`Coord`] - Grid coordinates (`row,col` notation)
//! - [`Grid`], [`GridConfig`], [`SpecialPoint`] - Sparse cabinet grid and its door/motor terminals
//! - [`shortest_path`], [`path_distance`], [`measure`] - Routing and wire length
//! - [`extract_reference`], [`ConnectionPoint`], [`ComponentClass`] - Reference text grammar

mod coord;
mod grid;
mod path;
mod reference;

pub use coord::Coord;
pub use grid::{
    Grid, GridConfig, GridError, NARROW_CELL_WEIGHT, SpecialKind, SpecialPoint, WIDE_CELL_WEIGHT,
};
pub use path::{
    Distance, Endpoint, INITIAL_MOVE, Measurement, RouteError, TERMINAL_ALLOWANCE, measure,
    path_distance, shortest_path,
};
pub use reference::{
    ComponentClass, ConnectionPoint, SIDE_MARKER, TERMINAL_SEPARATOR, extract_all_references,
    extract_reference, group_prefix, strip_side_marker,
};
