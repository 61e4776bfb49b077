#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first reachability search over the per-turn board.
//!
//! A search explores 4-connected neighbours in compass order (north, east,
//! south, west) and stops at the first dequeued cell that satisfies the target
//! predicate, which is therefore at minimum hop distance from the start. The
//! returned [`SearchResult`] keeps the predecessor links needed by
//! [`reconstruct`].

mod path;

use std::collections::VecDeque;

use organ_growth_board::Board;
use organ_growth_core::{Cell, Dimensions, Direction};
use tracing::trace;

pub use path::{path_directions, reconstruct};

/// How the search first reached a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Link {
    Unvisited,
    Start,
    From(Cell),
}

/// Outcome of a single breadth-first search.
///
/// Owns its visited set and predecessor links; nothing is shared between
/// searches.
#[derive(Clone, Debug)]
pub struct SearchResult {
    dimensions: Dimensions,
    start: Cell,
    target: Option<Cell>,
    links: Vec<Link>,
}

impl SearchResult {
    /// Cell the search started from.
    #[must_use]
    pub const fn start(&self) -> Cell {
        self.start
    }

    /// Nearest cell that satisfied the target predicate, if any was reachable.
    #[must_use]
    pub const fn target(&self) -> Option<Cell> {
        self.target
    }

    /// Reports whether the search discovered the cell.
    #[must_use]
    pub fn visited(&self, cell: Cell) -> bool {
        self.link(cell) != Link::Unvisited
    }

    /// Cell from which the search discovered `cell`.
    ///
    /// Returns `None` for the start cell and for cells never discovered.
    #[must_use]
    pub fn predecessor(&self, cell: Cell) -> Option<Cell> {
        match self.link(cell) {
            Link::From(previous) => Some(previous),
            Link::Start | Link::Unvisited => None,
        }
    }

    /// Path from the start to the found target, empty when nothing was found.
    #[must_use]
    pub fn path(&self) -> Vec<Cell> {
        self.target
            .map(|target| reconstruct(self, target))
            .unwrap_or_default()
    }

    fn link(&self, cell: Cell) -> Link {
        self.dimensions
            .index(cell)
            .and_then(|index| self.links.get(index).copied())
            .unwrap_or(Link::Unvisited)
    }
}

/// Finds the nearest cell satisfying `is_target`, treating walls as blocked.
pub fn find_nearest<T>(board: &Board, start: Cell, is_target: T) -> SearchResult
where
    T: FnMut(Cell) -> bool,
{
    find_nearest_with(board.dimensions(), start, |cell| board.is_wall(cell), is_target)
}

/// Finds the nearest cell satisfying `is_target` on a grid of the provided
/// dimensions, never entering cells for which `is_blocked` holds.
///
/// The start cell is always visited and tested first, even when blocked. A
/// start outside the grid yields an empty result.
pub fn find_nearest_with<B, T>(
    dimensions: Dimensions,
    start: Cell,
    mut is_blocked: B,
    mut is_target: T,
) -> SearchResult
where
    B: FnMut(Cell) -> bool,
    T: FnMut(Cell) -> bool,
{
    let Some(start_index) = dimensions.index(start) else {
        return SearchResult {
            dimensions,
            start,
            target: None,
            links: Vec::new(),
        };
    };

    let mut links = vec![Link::Unvisited; dimensions.cell_count()];
    links[start_index] = Link::Start;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    let mut target = None;
    let mut expanded = 0_usize;

    while let Some(cell) = queue.pop_front() {
        if is_target(cell) {
            target = Some(cell);
            break;
        }
        expanded += 1;

        for direction in Direction::ALL {
            let Some(neighbor) = cell.step(direction) else {
                continue;
            };
            let Some(index) = dimensions.index(neighbor) else {
                continue;
            };

            if links[index] != Link::Unvisited {
                continue;
            }

            if is_blocked(neighbor) {
                continue;
            }

            links[index] = Link::From(cell);
            queue.push_back(neighbor);
        }
    }

    trace!(%start, ?target, expanded, "reachability search finished");

    SearchResult {
        dimensions,
        start,
        target,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_matching_target_is_returned_without_expansion() {
        let start = Cell::new(1, 1);
        let mut probes = 0;

        let result = find_nearest_with(
            Dimensions::new(3, 3),
            start,
            |_| false,
            |cell| {
                probes += 1;
                cell == start
            },
        );

        assert_eq!(result.target(), Some(start));
        assert_eq!(probes, 1);
        assert_eq!(result.predecessor(start), None);
        assert!(!result.visited(Cell::new(0, 0)));
    }

    #[test]
    fn neighbors_enqueue_in_compass_order() {
        let start = Cell::new(1, 1);
        let mut order = Vec::new();

        let _ = find_nearest_with(
            Dimensions::new(3, 3),
            start,
            |_| false,
            |cell| {
                order.push(cell);
                false
            },
        );

        assert_eq!(
            &order[..5],
            &[
                start,
                Cell::new(1, 0),
                Cell::new(2, 1),
                Cell::new(1, 2),
                Cell::new(0, 1),
            ]
        );
        assert_eq!(order.len(), 9);
    }

    #[test]
    fn start_outside_grid_finds_nothing() {
        let result = find_nearest_with(Dimensions::new(2, 2), Cell::new(5, 5), |_| false, |_| true);

        assert_eq!(result.target(), None);
        assert!(!result.visited(Cell::new(0, 0)));
        assert!(result.path().is_empty());
    }

    #[test]
    fn blocked_cells_are_never_visited() {
        let wall = Cell::new(1, 0);
        let result = find_nearest_with(
            Dimensions::new(3, 1),
            Cell::new(0, 0),
            |cell| cell == wall,
            |cell| cell == Cell::new(2, 0),
        );

        assert_eq!(result.target(), None);
        assert!(!result.visited(wall));
        assert!(!result.visited(Cell::new(2, 0)));
    }
}
