//! Path reconstruction from search predecessor links.

use organ_growth_core::{Cell, Direction};

use super::SearchResult;

/// Walks predecessor links from `target` back to the start.
///
/// The returned cells run from the start to `target` inclusive, so a target
/// equal to the start yields a single-cell path. Cells the search never
/// discovered yield an empty path.
#[must_use]
pub fn reconstruct(result: &SearchResult, target: Cell) -> Vec<Cell> {
    if !result.visited(target) {
        return Vec::new();
    }

    let mut path = vec![target];
    let mut current = target;
    while let Some(previous) = result.predecessor(current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Compass direction of every step along a path.
#[must_use]
pub fn path_directions(path: &[Cell]) -> Vec<Direction> {
    path.windows(2)
        .filter_map(|pair| Direction::between(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use organ_growth_core::Dimensions;

    use super::*;
    use crate::find_nearest_with;

    #[test]
    fn unreached_target_yields_empty_path() {
        let result = find_nearest_with(Dimensions::new(2, 2), Cell::new(0, 0), |_| true, |_| false);

        assert!(reconstruct(&result, Cell::new(1, 1)).is_empty());
    }

    #[test]
    fn directions_follow_each_step() {
        let path = [
            Cell::new(0, 1),
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
        ];

        assert_eq!(
            path_directions(&path),
            vec![
                Direction::North,
                Direction::East,
                Direction::South,
                Direction::West
            ]
        );
    }
}
