//! Nodes and their candidate edge points

use super::pathfinder::RoutedPath;
use super::types::{Circle, GridPoint, WorldPoint};

/// Candidate trace endpoints around a node, consumed front to back
///
/// The cursor only moves forward until [`EdgeRing::reset`]; re-sorting the
/// ring keeps the cursor where it is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeRing {
    points: Vec<GridPoint>,
    cursor: usize,
}

impl EdgeRing {
    pub fn new(points: Vec<GridPoint>) -> Self {
        Self { points, cursor: 0 }
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Order candidates by taxicab distance to `dest`, ties kept in place
    pub fn sort_towards(&mut self, dest: GridPoint) {
        self.points.sort_by_key(|p| p.taxi_distance(dest));
    }

    /// Take the next unconsumed candidate
    pub fn next_candidate(&mut self) -> Option<GridPoint> {
        let point = self.points.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(point)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.points.len()
    }

    /// Number of candidates consumed so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Smallest taxicab distance from `anchor` to any candidate
    pub fn closest_distance(&self, anchor: GridPoint) -> Option<i32> {
        self.points.iter().map(|p| p.taxi_distance(anchor)).min()
    }
}

/// A glyph node: one keypad key visited by one or more consecutive letters
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Keypad key (1-9), 0 when the node was built by hand
    pub key: u8,
    /// Anchor cell on the routing grid
    pub anchor: GridPoint,
    /// Node outline on the canvas
    pub circle: Circle,
    pub subnode_radius: i32,
    pub edge_ring: EdgeRing,
    /// 1-based letter indices within the key, drawn as dots along the trace
    pub markers: Vec<u8>,
    /// Committed trace leaving this node
    pub route: Option<RoutedPath>,
    /// Outline of the node the trace ends on
    pub target: Option<Circle>,
}

impl Node {
    pub fn new(anchor: GridPoint, edge_points: Vec<GridPoint>) -> Self {
        Self {
            key: 0,
            anchor,
            circle: Circle::new(WorldPoint::new(0, 0), 0),
            subnode_radius: 5,
            edge_ring: EdgeRing::new(edge_points),
            markers: Vec::new(),
            route: None,
            target: None,
        }
    }

    pub fn with_key(mut self, key: u8) -> Self {
        self.key = key;
        self
    }

    pub fn with_circle(mut self, circle: Circle) -> Self {
        self.circle = circle;
        self
    }

    pub fn with_subnode_radius(mut self, radius: i32) -> Self {
        self.subnode_radius = radius;
        self
    }

    pub fn with_markers(mut self, markers: Vec<u8>) -> Self {
        self.markers = markers;
        self
    }

    /// Cells a trace needs to carry this node's markers
    ///
    /// Each marker takes its index in cells plus one separating cell.
    pub fn min_trace_length(&self) -> usize {
        self.markers.iter().map(|&m| usize::from(m)).sum::<usize>() + self.markers.len()
    }

    pub fn is_routed(&self) -> bool {
        self.route.as_ref().is_some_and(|r| !r.is_empty())
    }
}
