//! Grid coordinate parsing and formatting.
//!
//! Coordinates are zero-indexed `(row, col)` pairs. Columns are global: the
//! columns of section `s` start at `s * cols`.
//!
//! # Examples
//!
//! ```ignore
//! let coord: Coord = "2,5".parse().unwrap();
//! assert_eq!(coord.row, 2);
//! assert_eq!(coord.col, 5);
//! assert_eq!(coord.to_string(), "2,5");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position in the cabinet grid (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    /// The four orthogonal neighbours that fit in `usize`, in up, down, left,
    /// right order. Whether they exist in a grid is the caller's concern.
    pub fn orthogonal(self) -> impl Iterator<Item = Coord> {
        let up = self.row.checked_sub(1).map(|r| Coord::new(r, self.col));
        let down = self.row.checked_add(1).map(|r| Coord::new(r, self.col));
        let left = self.col.checked_sub(1).map(|c| Coord::new(self.row, c));
        let right = self.col.checked_add(1).map(|c| Coord::new(self.row, c));
        [up, down, left, right].into_iter().flatten()
    }

    fn parse_pair(s: &str) -> Option<Coord> {
        let (row, col) = s.split_once(',')?;
        let row = row.trim().parse::<usize>().ok()?;
        let col = col.trim().parse::<usize>().ok()?;
        Some(Coord::new(row, col))
    }
}

impl std::str::FromStr for Coord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_pair(s).ok_or_else(|| format!("Invalid grid coordinate: {}", s))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}
