//! Shortest routes over the cabinet grid and their physical length.
//!
//! Routing is Dijkstra over the sparse cell set. Entering a cell costs
//! [`WIDE_CELL_WEIGHT`](super::grid::WIDE_CELL_WEIGHT) or
//! [`NARROW_CELL_WEIGHT`](super::grid::NARROW_CELL_WEIGHT) depending on whether the
//! cell has a horizontal neighbour. Equal-cost frontier entries pop in
//! discovery order, and a node's predecessor only changes on a strictly
//! shorter distance, so the chosen path is deterministic.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use thiserror::Error;

use super::coord::Coord;
use super::grid::{Grid, SpecialPoint};

/// Lead-out from the start cell (10 cm).
pub const INITIAL_MOVE: u32 = 100;
/// Allowance for the final drop onto a component terminal. Not applied when
/// the route ends at a door or motor, which carry their own offset.
pub const TERMINAL_ALLOWANCE: u32 = 200;

/// Wire length in millimetres.
pub type Distance = u32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Cell {0} is not part of the grid")]
    UnknownCell(Coord),

    #[error("No route from {from} to {to}")]
    NoPath { from: Coord, to: Coord },
}

/// One end of a measured connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Cell(Coord),
    Special(SpecialPoint),
}

impl Endpoint {
    pub fn coord(&self) -> Coord {
        match self {
            Endpoint::Cell(coord) => *coord,
            Endpoint::Special(point) => point.coord,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self, Endpoint::Special(_))
    }

    /// Door/motor offset, zero for plain cells.
    pub fn offset(&self) -> Distance {
        match self {
            Endpoint::Cell(_) => 0,
            Endpoint::Special(point) => point.kind.offset(),
        }
    }
}

/// A routed connection between two endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Measurement {
    pub path: Vec<Coord>,
    pub distance: Distance,
}

/// Minimum-weight path from `start` to `end`, both inclusive.
/// Returns `None` when either cell is missing or `end` is unreachable.
pub fn shortest_path(grid: &Grid, start: Coord, end: Coord) -> Option<Vec<Coord>> {
    if !grid.contains(start) || !grid.contains(end) {
        return None;
    }

    let mut dist: HashMap<Coord, u32> = HashMap::new();
    let mut prev: HashMap<Coord, Coord> = HashMap::new();
    let mut frontier = BinaryHeap::new();
    let mut seq: u64 = 0;

    dist.insert(start, 0);
    frontier.push(Reverse((0u32, seq, start)));

    while let Some(Reverse((cost, _, u))) = frontier.pop() {
        if u == end {
            break;
        }
        // Stale entry: a shorter distance was recorded after this push.
        if dist.get(&u).is_some_and(|&best| cost > best) {
            continue;
        }
        for v in grid.neighbors(u) {
            let alt = cost + grid.cell_weight(v);
            if dist.get(&v).is_none_or(|&known| alt < known) {
                dist.insert(v, alt);
                prev.insert(v, u);
                seq += 1;
                frontier.push(Reverse((alt, seq, v)));
            }
        }
    }

    if !dist.contains_key(&end) {
        return None;
    }

    let mut path = vec![end];
    let mut current = end;
    while let Some(&p) = prev.get(&current) {
        path.push(p);
        current = p;
    }
    path.reverse();
    Some(path)
}

/// Physical length of `path`: the initial move, the weight of every
/// interior cell, and the terminal allowance unless the path ends at a
/// special point. A single-cell path is the initial move only.
pub fn path_distance(grid: &Grid, path: &[Coord], ends_in_special: bool) -> Distance {
    match path.len() {
        0 => 0,
        1 => INITIAL_MOVE,
        n => {
            let interior: Distance = path[1..n - 1].iter().map(|&c| grid.cell_weight(c)).sum();
            let terminal = if ends_in_special { 0 } else { TERMINAL_ALLOWANCE };
            INITIAL_MOVE + interior + terminal
        }
    }
}

/// Route between two endpoints and total the length, including each
/// special endpoint's fixed offset.
pub fn measure(grid: &Grid, start: Endpoint, end: Endpoint) -> Result<Measurement, RouteError> {
    let from = start.coord();
    let to = end.coord();
    for coord in [from, to] {
        if !grid.contains(coord) {
            return Err(RouteError::UnknownCell(coord));
        }
    }

    let path = shortest_path(grid, from, to).ok_or(RouteError::NoPath { from, to })?;
    let distance = path_distance(grid, &path, end.is_special()) + start.offset() + end.offset();
    Ok(Measurement { path, distance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::{SpecialKind, WIDE_CELL_WEIGHT};

    fn c(row: usize, col: usize) -> Coord {
        Coord::new(row, col)
    }

    #[test]
    fn test_same_cell_path() {
        let grid = Grid::build(1, 3, 3).unwrap();
        assert_eq!(shortest_path(&grid, c(2, 2), c(2, 2)), Some(vec![c(2, 2)]));
        assert_eq!(path_distance(&grid, &[c(2, 2)], false), INITIAL_MOVE);
        assert_eq!(path_distance(&grid, &[], false), 0);
    }

    #[test]
    fn test_wide_row_run_costs_100_per_interior_cell() {
        let grid = Grid::build(1, 1, 6).unwrap();
        let path = shortest_path(&grid, c(0, 0), c(0, 5)).unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path_distance(&grid, &path, false), 100 + 4 * 100 + 200);
        assert_eq!(path_distance(&grid, &path[..5], false), 100 + 3 * 100 + 200);
    }

    #[test]
    fn test_narrow_column_run_costs_50_per_interior_cell() {
        let grid = Grid::build(1, 5, 1).unwrap();
        let path = shortest_path(&grid, c(0, 0), c(4, 0)).unwrap();
        assert_eq!(path_distance(&grid, &path, false), 100 + 3 * 50 + 200);
    }

    #[test]
    fn test_route_goes_through_first_column() {
        let grid = Grid::build(1, 3, 2).unwrap();
        let path = shortest_path(&grid, c(0, 1), c(2, 1)).unwrap();
        assert_eq!(path, vec![c(0, 1), c(0, 0), c(1, 0), c(2, 0), c(2, 1)]);
    }

    #[test]
    fn test_unknown_cells_have_no_path() {
        let grid = Grid::build(1, 3, 2).unwrap();
        assert!(shortest_path(&grid, c(1, 1), c(0, 0)).is_none());
        assert_eq!(
            measure(&grid, Endpoint::Cell(c(0, 0)), Endpoint::Cell(c(9, 9))),
            Err(RouteError::UnknownCell(c(9, 9)))
        );
    }

    #[test]
    fn test_special_endpoint_skips_terminal_allowance() {
        let grid = Grid::build(1, 3, 2).unwrap();
        let motor = grid.special_point(0, SpecialKind::Motor).unwrap();
        let to_cell = measure(&grid, Endpoint::Cell(c(0, 0)), Endpoint::Cell(motor.coord)).unwrap();
        let to_motor = measure(&grid, Endpoint::Cell(c(0, 0)), Endpoint::Special(motor)).unwrap();
        assert_eq!(to_cell.path, to_motor.path);
        assert_eq!(to_cell.distance - TERMINAL_ALLOWANCE + 500, to_motor.distance);
    }

    #[test]
    fn test_door_to_motor_adds_both_offsets_once() {
        let grid = Grid::build(1, 3, 2).unwrap();
        let door = grid.special_point(0, SpecialKind::Door).unwrap();
        let motor = grid.special_point(0, SpecialKind::Motor).unwrap();
        let m = measure(&grid, Endpoint::Special(door), Endpoint::Special(motor)).unwrap();
        // (0,0) -> (1,0) -> (2,0) -> (2,1): interior 50 + 100
        assert_eq!(m.distance, 100 + 150 + 1000 + 500);
    }

    #[test]
    fn test_two_doors_each_count_once() {
        let grid = Grid::build(2, 1, 2).unwrap();
        let d0 = grid.special_point(0, SpecialKind::Door).unwrap();
        let d1 = grid.special_point(1, SpecialKind::Door).unwrap();
        let m = measure(&grid, Endpoint::Special(d0), Endpoint::Special(d1)).unwrap();
        assert_eq!(m.distance, 100 + WIDE_CELL_WEIGHT + 2000);
    }
}
