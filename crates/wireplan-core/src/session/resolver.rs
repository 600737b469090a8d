use thiserror::Error;
use tracing::debug;
use wireplan_engine::engine::{
    ConnectionPoint, Coord, Distance, RouteError, extract_reference, path_distance, shortest_path,
};

use super::Session;

/// Why a pair of texts did not produce a length. Expected in normal use;
/// the row is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    #[error("no component reference in {0:?}")]
    NoReference(String),

    #[error("no mapping for {0}")]
    Unmapped(String),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// A resolved and routed connection between two referenced components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub from: ConnectionPoint,
    pub to: ConnectionPoint,
    pub path: Vec<Coord>,
    pub distance: Distance,
}

impl Session {
    /// Grid cell for a referenced component. Tries the reference with its
    /// side marker first, then the bare reference.
    pub fn resolve_endpoint(&self, point: &ConnectionPoint) -> Option<Coord> {
        self.mappings
            .resolve(&point.marked_reference())
            .or_else(|| self.mappings.resolve(&point.reference))
            .map(|resolved| resolved.coord())
    }

    /// Extract, resolve and route the references in two texts.
    pub fn resolve_connection(&self, text_a: &str, text_b: &str) -> Result<Connection, Unresolved> {
        let from = extract_reference(text_a)
            .ok_or_else(|| Unresolved::NoReference(text_a.to_string()))?;
        let to = extract_reference(text_b)
            .ok_or_else(|| Unresolved::NoReference(text_b.to_string()))?;

        let start = self
            .resolve_endpoint(&from)
            .ok_or_else(|| Unresolved::Unmapped(from.reference.clone()))?;
        let end = self
            .resolve_endpoint(&to)
            .ok_or_else(|| Unresolved::Unmapped(to.reference.clone()))?;

        for coord in [start, end] {
            if !self.grid.contains(coord) {
                return Err(RouteError::UnknownCell(coord).into());
            }
        }
        let path = shortest_path(&self.grid, start, end)
            .ok_or(RouteError::NoPath { from: start, to: end })?;

        let distance = path_distance(&self.grid, &path, false)
            + from.connection_offset()
            + to.connection_offset();
        debug!(from = %from.reference, to = %to.reference, distance, "connection resolved");

        Ok(Connection {
            from,
            to,
            path,
            distance,
        })
    }

    /// Length of the connection described by two texts, or `None` when it
    /// cannot be resolved.
    pub fn compute_distance(&self, text_a: &str, text_b: &str) -> Option<Distance> {
        self.resolve_connection(text_a, text_b)
            .ok()
            .map(|connection| connection.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingTable;
    use wireplan_engine::engine::Grid;

    fn session() -> Session {
        let mut mappings = MappingTable::new();
        mappings.add("F1", Coord::new(0, 0), "", false).unwrap();
        mappings.add("K3", Coord::new(2, 1), "", false).unwrap();
        mappings.add("X2:", Coord::new(0, 1), "", true).unwrap();
        mappings.add("A9", Coord::new(7, 7), "", false).unwrap();
        Session::new(Grid::build(1, 3, 2).unwrap(), mappings)
    }

    #[test]
    fn test_end_to_end_distance() {
        let session = session();
        // (0,0) -> (1,0) -> (2,0) -> (2,1): 100 + (50 + 100) + 200, then F 30 + K 60
        assert_eq!(session.compute_distance("F1", "K3"), Some(540));
        assert_eq!(session.compute_distance("K3", "F1"), Some(540));
    }

    #[test]
    fn test_back_side_marker_changes_offset() {
        let session = session();
        assert_eq!(session.compute_distance("F1*", "K3"), Some(560));
    }

    #[test]
    fn test_mapping_default_side_does_not_change_offset() {
        let session = session();
        // X2: defaults to bottom, but the offset follows the text.
        assert_eq!(session.compute_distance("X2:5", "F1"), Some(100 + 200 + 20 + 30));
        assert_eq!(session.compute_distance("X2:5*", "F1"), Some(100 + 200 + 40 + 30));
    }

    #[test]
    fn test_references_found_inside_text() {
        let session = session();
        let connection = session
            .resolve_connection("fuse F1* (top)", "coil K3 A1")
            .unwrap();
        assert!(connection.from.back_side);
        assert_eq!(connection.from.source, "fuse F1* (top)");
        assert_eq!(connection.to.reference, "K3");
    }

    #[test]
    fn test_unresolvable_pairs() {
        let session = session();
        assert_eq!(
            session.resolve_connection("F1", "Q7"),
            Err(Unresolved::Unmapped("Q7".to_string()))
        );
        assert_eq!(
            session.resolve_connection("", "K3"),
            Err(Unresolved::NoReference(String::new()))
        );
        assert_eq!(
            session.resolve_connection("F1", "A9"),
            Err(Unresolved::Route(RouteError::UnknownCell(Coord::new(7, 7))))
        );
        assert_eq!(session.compute_distance("F1", "Q7"), None);
    }

    #[test]
    fn test_same_component_both_ends() {
        let session = session();
        assert_eq!(session.compute_distance("F1", "F1*"), Some(100 + 30 + 50));
    }
}
