//! A* search from a start cell to any cell of a goal ring

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::trace;

use super::grid::{GridMap, SearchContext};
use super::types::GridPoint;

/// An ordered run of adjacent cells, both ends inclusive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutedPath {
    points: Vec<GridPoint>,
}

impl RoutedPath {
    pub fn new(points: Vec<GridPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Number of cells on the path
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of moves between cells
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<GridPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<GridPoint> {
        self.points.last().copied()
    }

    pub fn contains(&self, point: GridPoint) -> bool {
        self.points.contains(&point)
    }
}

/// The open set emptied without reaching the goal ring with a long enough path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no path from {start} to the goal ring ({expanded} cells expanded, {rejected} too-short arrivals)")]
pub struct NoPath {
    pub start: GridPoint,
    pub expanded: usize,
    pub rejected: usize,
}

/// Parameters of a single search
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub start: GridPoint,
    /// Nominal end point the heuristic aims at
    pub end: GridPoint,
    /// Any of these cells ends the search
    pub goal_ring: &'a [GridPoint],
    /// Minimum number of cells an accepted path must have
    pub min_length: usize,
}

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    g_score: f64,
    f_score: f64,
    parent: Option<GridPoint>,
}

/// Open set entry, reverse-ordered so the heap pops the lowest f-score
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_score: f64,
    g_score: f64,
    point: GridPoint,
    counter: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.counter.cmp(&self.counter))
    }
}

fn heuristic(a: GridPoint, b: GridPoint) -> f64 {
    f64::from(a.taxi_distance(b))
}

/// Reusable A* state; scratch maps are cleared at the start of every search
#[derive(Debug, Default)]
pub struct PathFinder {
    nodes: FxHashMap<GridPoint, SearchNode>,
    open: BinaryHeap<OpenEntry>,
    counter: u64,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.counter = 0;
    }

    fn push(&mut self, point: GridPoint, node: SearchNode) {
        self.nodes.insert(point, node);
        self.open.push(OpenEntry {
            f_score: node.f_score,
            g_score: node.g_score,
            point,
            counter: self.counter,
        });
        self.counter += 1;
    }

    /// Find a path from `request.start` to any goal-ring cell
    ///
    /// Arrivals shorter than `min_length` are discarded without closing the
    /// ring cell, so a longer route can still reach it later.
    pub fn search(&mut self, grid: &GridMap, request: &SearchRequest<'_>) -> Result<RoutedPath, NoPath> {
        self.reset();
        let goal_ring: FxHashSet<GridPoint> = request.goal_ring.iter().copied().collect();
        let mut expanded = 0;
        let mut rejected = 0;

        self.push(
            request.start,
            SearchNode {
                g_score: 0.0,
                f_score: heuristic(request.start, request.end),
                parent: None,
            },
        );

        while let Some(entry) = self.open.pop() {
            let cursor = entry.point;
            let Some(&node) = self.nodes.get(&cursor) else {
                continue;
            };
            // a cheaper route was pushed after this entry
            if entry.g_score > node.g_score {
                continue;
            }

            if goal_ring.contains(&cursor) {
                let path = self.reconstruct(cursor);
                if path.len() >= request.min_length {
                    trace!(start = %request.start, end = %cursor, cells = path.len(), expanded, "path found");
                    return Ok(path);
                }
                trace!(at = %cursor, cells = path.len(), min = request.min_length, "arrival too short");
                rejected += 1;
                continue;
            }

            expanded += 1;
            let ctx = SearchContext {
                goal_ring: &goal_ring,
                incoming: node.parent.map(|p| p.step_to(cursor)),
            };

            for next in grid.neighbors(cursor) {
                let Some(cost) = grid.step_cost(cursor, next, &ctx) else {
                    continue;
                };
                let tentative = node.g_score + cost;
                let known = self.nodes.get(&next).map_or(f64::INFINITY, |n| n.g_score);
                if tentative < known {
                    self.push(
                        next,
                        SearchNode {
                            g_score: tentative,
                            f_score: tentative + heuristic(next, request.end),
                            parent: Some(cursor),
                        },
                    );
                }
            }
        }

        Err(NoPath {
            start: request.start,
            expanded,
            rejected,
        })
    }

    fn reconstruct(&self, end: GridPoint) -> RoutedPath {
        let mut points = vec![end];
        let mut cursor = self.nodes.get(&end).and_then(|n| n.parent);
        while let Some(p) = cursor {
            points.push(p);
            cursor = self.nodes.get(&p).and_then(|n| n.parent);
        }
        points.reverse();
        RoutedPath::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::CellState;

    fn request(start: (i32, i32), ring: &[GridPoint], end: (i32, i32), min_length: usize) -> SearchRequest<'_> {
        SearchRequest {
            start: start.into(),
            end: end.into(),
            goal_ring: ring,
            min_length,
        }
    }

    fn assert_adjacent_steps(path: &RoutedPath) {
        for pair in path.points().windows(2) {
            assert_eq!(pair[0].chebyshev_distance(pair[1]), 1, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_straight_horizontal_path() {
        let grid = GridMap::new(10, 10);
        let ring = [GridPoint::new(7, 2)];
        let path = PathFinder::new()
            .search(&grid, &request((2, 2), &ring, (7, 2), 0))
            .expect("open grid has a path");

        assert_eq!(path.steps(), 5);
        assert_eq!(path.steps() as i32, GridPoint::new(2, 2).taxi_distance(GridPoint::new(7, 2)));
        assert!(path.points().iter().all(|p| p.y == 2));
        assert_eq!(path.first(), Some(GridPoint::new(2, 2)));
        assert_eq!(path.last(), Some(GridPoint::new(7, 2)));
    }

    #[test]
    fn test_straight_vertical_path() {
        let grid = GridMap::new(10, 10);
        let ring = [GridPoint::new(3, 8)];
        let path = PathFinder::new()
            .search(&grid, &request((3, 1), &ring, (3, 8), 0))
            .unwrap();
        assert_eq!(path.steps(), 7);
        assert_adjacent_steps(&path);
    }

    #[test]
    fn test_diagonal_target_path_is_adjacent() {
        let grid = GridMap::new(12, 12);
        let ring = [GridPoint::new(9, 8)];
        let path = PathFinder::new()
            .search(&grid, &request((1, 2), &ring, (9, 8), 0))
            .unwrap();
        assert_adjacent_steps(&path);
        assert_eq!(path.last(), Some(GridPoint::new(9, 8)));
    }

    #[test]
    fn test_start_in_ring() {
        let grid = GridMap::new(5, 5);
        let ring = [GridPoint::new(2, 2)];
        let path = PathFinder::new()
            .search(&grid, &request((2, 2), &ring, (2, 2), 0))
            .unwrap();
        assert_eq!(path.points(), &[GridPoint::new(2, 2)]);
    }

    #[test]
    fn test_first_ring_member_reached_wins() {
        let grid = GridMap::new(10, 10);
        let ring = [GridPoint::new(6, 2), GridPoint::new(7, 2), GridPoint::new(8, 2)];
        let path = PathFinder::new()
            .search(&grid, &request((2, 2), &ring, (7, 2), 0))
            .unwrap();
        assert_eq!(path.last(), Some(GridPoint::new(6, 2)));
    }

    #[test]
    fn test_walled_off_target_fails() {
        let mut grid = GridMap::new(10, 10);
        for y in 0..10 {
            grid.mark(GridPoint::new(4, y), CellState::Blocked);
        }
        let ring = [GridPoint::new(7, 2)];
        let err = PathFinder::new()
            .search(&grid, &request((2, 2), &ring, (7, 2), 0))
            .unwrap_err();
        assert_eq!(err.start, GridPoint::new(2, 2));
        assert!(err.expanded > 0);
    }

    #[test]
    fn test_detour_through_gap() {
        let mut grid = GridMap::new(10, 10);
        for y in 0..10 {
            if y != 5 {
                grid.mark(GridPoint::new(4, y), CellState::Blocked);
            }
        }
        let ring = [GridPoint::new(7, 2)];
        let path = PathFinder::new()
            .search(&grid, &request((2, 2), &ring, (7, 2), 0))
            .unwrap();
        assert!(path.contains(GridPoint::new(4, 5)));
        assert_adjacent_steps(&path);
        assert!(path.points().iter().all(|&p| !grid.is_blocked(p)));
    }

    #[test]
    fn test_min_length_is_never_violated() {
        let grid = GridMap::new(10, 10);
        let ring = [GridPoint::new(6, 2), GridPoint::new(3, 8)];
        // (6, 2) is 5 cells away, (3, 8) needs at least 7 cells
        let path = PathFinder::new()
            .search(&grid, &request((2, 2), &ring, (6, 2), 7))
            .unwrap();
        assert!(path.len() >= 7);
        assert_eq!(path.last(), Some(GridPoint::new(3, 8)));
    }

    #[test]
    fn test_min_length_unreachable_fails() {
        let grid = GridMap::new(10, 10);
        let ring = [GridPoint::new(7, 2)];
        let err = PathFinder::new()
            .search(&grid, &request((2, 2), &ring, (7, 2), 40))
            .unwrap_err();
        assert!(err.rejected >= 1);
    }

    #[test]
    fn test_slow_zone_is_avoided() {
        let mut grid = GridMap::new(10, 5);
        // A slow band across the direct line, with a way around at y = 4
        for y in 0..4 {
            grid.mark(GridPoint::new(5, y), CellState::SlowZone);
        }
        let ring = [GridPoint::new(8, 1)];
        let path = PathFinder::new()
            .search(&grid, &request((1, 1), &ring, (8, 1), 0))
            .unwrap();
        assert!(path.contains(GridPoint::new(5, 4)));
    }

    #[test]
    fn test_finder_is_reusable() {
        let grid = GridMap::new(10, 10);
        let mut finder = PathFinder::new();
        let ring_a = [GridPoint::new(7, 2)];
        let ring_b = [GridPoint::new(2, 7)];
        let a = finder.search(&grid, &request((2, 2), &ring_a, (7, 2), 0)).unwrap();
        let b = finder.search(&grid, &request((2, 2), &ring_b, (2, 7), 0)).unwrap();
        assert_eq!(a.last(), Some(GridPoint::new(7, 2)));
        assert_eq!(b.last(), Some(GridPoint::new(2, 7)));
    }
}
