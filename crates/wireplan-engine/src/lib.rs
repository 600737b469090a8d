//! wireplan_engine - Cabinet grid routing and reference grammar.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use proptest::prelude::*;
    use proptest::sample::Index;

    fn shape() -> impl Strategy<Value = (usize, usize, usize)> {
        (1usize..=4, 1usize..=9, 1usize..=5)
    }

    #[test]
    fn test_default_config_matches_desktop_defaults() {
        let config = GridConfig::default();
        assert_eq!((config.sections, config.rows, config.cols), (5, 7, 4));
        let grid = Grid::from_config(config).unwrap();
        assert_eq!(grid.cell_count(), 5 * (4 * 4 + 3));
    }

    #[test]
    fn test_adjacent_sections_connect_along_wide_rows() {
        let grid = Grid::build(2, 3, 2).unwrap();
        let path = shortest_path(&grid, Coord::new(2, 0), Coord::new(2, 2)).unwrap();
        assert_eq!(
            path,
            vec![Coord::new(2, 0), Coord::new(2, 1), Coord::new(2, 2)]
        );
        assert_eq!(path_distance(&grid, &path, false), 100 + 100 + 200);
    }

    #[test]
    fn test_vertical_moves_use_first_column() {
        let grid = Grid::build(2, 3, 2).unwrap();
        let path = shortest_path(&grid, Coord::new(0, 3), Coord::new(2, 3)).unwrap();
        // Row 1 of section 1 only holds column 2.
        assert_eq!(
            path,
            vec![
                Coord::new(0, 3),
                Coord::new(0, 2),
                Coord::new(1, 2),
                Coord::new(2, 2),
                Coord::new(2, 3),
            ]
        );
        // interior: 100 + 50 + 100
        assert_eq!(path_distance(&grid, &path, false), 100 + 250 + 200);
    }

    #[test]
    fn test_resolved_connection_example() {
        let grid = Grid::build(1, 3, 2).unwrap();
        let from = extract_reference("F1").unwrap();
        let to = extract_reference("K3").unwrap();
        let path = shortest_path(&grid, Coord::new(0, 0), Coord::new(2, 1)).unwrap();
        let total =
            path_distance(&grid, &path, false) + from.connection_offset() + to.connection_offset();
        assert_eq!(total, 100 + 150 + 200 + 30 + 60);
    }

    proptest! {
        #[test]
        fn cell_count_matches_population_rule((sections, rows, cols) in shape()) {
            let grid = Grid::build(sections, rows, cols).unwrap();
            let expected = sections * (rows.div_ceil(2) * cols + rows / 2);
            prop_assert_eq!(grid.cell_count(), expected);
            prop_assert_eq!(grid.config().expected_cells(), expected);
            let mut seen = std::collections::HashSet::new();
            for cell in grid.cells() {
                prop_assert!(seen.insert(cell));
            }
        }

        #[test]
        fn special_points_sit_on_cells((sections, rows, cols) in shape()) {
            let grid = Grid::build(sections, rows, cols).unwrap();
            prop_assert_eq!(grid.special_points().len(), sections * 2);
            for point in grid.special_points() {
                prop_assert!(grid.contains(point.coord));
                prop_assert_eq!(grid.section_of(point.coord), Some(point.section));
            }
        }

        #[test]
        fn every_pair_is_connected_and_cost_is_symmetric(
            (sections, rows, cols) in shape(),
            a in any::<Index>(),
            b in any::<Index>(),
        ) {
            let grid = Grid::build(sections, rows, cols).unwrap();
            let cells: Vec<Coord> = grid.cells().collect();
            let from = cells[a.index(cells.len())];
            let to = cells[b.index(cells.len())];

            let forward = shortest_path(&grid, from, to);
            let backward = shortest_path(&grid, to, from);
            prop_assert!(forward.is_some());
            prop_assert!(backward.is_some());
            let forward = forward.unwrap();
            let backward = backward.unwrap();

            prop_assert_eq!(forward.first(), Some(&from));
            prop_assert_eq!(forward.last(), Some(&to));
            for pair in forward.windows(2) {
                prop_assert!(grid.neighbors(pair[0]).any(|n| n == pair[1]));
            }
            prop_assert_eq!(
                path_distance(&grid, &forward, false),
                path_distance(&grid, &backward, false)
            );
        }

        #[test]
        fn shortest_path_is_deterministic(
            (sections, rows, cols) in shape(),
            a in any::<Index>(),
            b in any::<Index>(),
        ) {
            let grid = Grid::build(sections, rows, cols).unwrap();
            let cells: Vec<Coord> = grid.cells().collect();
            let from = cells[a.index(cells.len())];
            let to = cells[b.index(cells.len())];
            prop_assert_eq!(shortest_path(&grid, from, to), shortest_path(&grid, from, to));
        }
    }
}
