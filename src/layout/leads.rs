//! Charge and ground leads: the fixed traces entering the first node and
//! leaving the last one
//!
//! Both are placed before link routing and their cells are Blocked, so the
//! routed links steer around them.

use tracing::debug;

use super::grid::GridMap;
use super::node::Node;
use super::pathfinder::RoutedPath;
use super::transform::{circle_intersection, GridTransform};
use super::types::{CellState, Direction, GridPoint, WorldPoint};

/// Cells between the charge symbol's start and the node's edge ring
const CHARGE_LENGTH: i32 = 3;
/// Number of full up/down strokes in the zig-zag
const CHARGE_STROKES: usize = 3;

/// Zig-zag symbol drawn to the left of the first node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeLead {
    /// Polyline on the canvas, ending on the node outline
    pub points: Vec<WorldPoint>,
    /// Grid cells the symbol occupies
    pub footprint: Vec<GridPoint>,
}

/// Distance from the anchor to the node's nearest edge candidate
fn lead_offset(node: &Node) -> Option<i32> {
    node.edge_ring.closest_distance(node.anchor)
}

/// Append a point offset from the last one
fn advance(points: &mut Vec<WorldPoint>, dx: i32, dy: i32) {
    if let Some(&last) = points.last() {
        points.push(WorldPoint::new(last.x + dx, last.y + dy));
    }
}

/// Place the charge lead of `node`, blocking its footprint on the grid
///
/// Returns `None` for a node without edge candidates.
pub fn place_charge_lead(node: &Node, grid: &mut GridMap, transform: &GridTransform) -> Option<ChargeLead> {
    let step = lead_offset(node)?;
    let start = node.anchor.offset(Direction::Left, step + CHARGE_LENGTH);
    let end = node.anchor.offset(Direction::Left, step);

    let cell = transform.cell_size();
    let half = transform.center_offset();
    let quarter = cell / 4;

    let mut points = vec![transform.cell_center(start)];
    advance(&mut points, half, 0);
    advance(&mut points, quarter, -cell);
    for _ in 0..CHARGE_STROKES {
        advance(&mut points, quarter, 2 * cell);
        advance(&mut points, quarter, -2 * cell);
    }
    advance(&mut points, quarter, cell);
    advance(&mut points, half, 0);
    if let Some(&last) = points.last() {
        points.push(circle_intersection(node.circle, last));
    }

    let mut footprint = vec![start, end];
    for dy in -1..=1 {
        for dx in 1..=2 {
            footprint.push(GridPoint::new(start.x + dx, start.y + dy));
        }
    }
    for &p in &footprint {
        grid.mark(p, CellState::Blocked);
    }

    debug!(key = node.key, start = %start, end = %end, "placed charge lead");
    Some(ChargeLead { points, footprint })
}

/// Place the ground lead of `node`: a straight run to the right, long
/// enough to carry the node's markers
///
/// The run becomes the node's route, with no target circle. Returns false
/// for a node without edge candidates.
pub fn place_ground_lead(node: &mut Node, grid: &mut GridMap) -> bool {
    let Some(step) = lead_offset(node) else {
        return false;
    };
    let cells = node.min_trace_length() as i32 + 1;
    let points: Vec<GridPoint> = (0..cells)
        .map(|i| node.anchor.offset(Direction::Right, step + i))
        .collect();

    grid.block_path(&points);
    debug!(key = node.key, cells = points.len(), "placed ground lead");
    node.route = Some(RoutedPath::new(points));
    node.target = None;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Circle;

    fn keypad_node(anchor: GridPoint) -> Node {
        Node::new(anchor, anchor.ring_at_radius(2))
            .with_circle(Circle::new(WorldPoint::new(127, 127), 20))
    }

    #[test]
    fn test_charge_lead_blocks_footprint() {
        let mut grid = GridMap::new(35, 35);
        let node = keypad_node(GridPoint::new(8, 8));
        let lead = place_charge_lead(&node, &mut grid, &GridTransform::new(15)).unwrap();

        // start three cells beyond the ring, end on the ring itself
        assert_eq!(lead.footprint[0], GridPoint::new(3, 8));
        assert_eq!(lead.footprint[1], GridPoint::new(6, 8));
        assert_eq!(lead.footprint.len(), 8);
        for p in &lead.footprint {
            assert!(grid.is_blocked(*p), "{p}");
        }
        assert!(grid.is_blocked(GridPoint::new(5, 7)));
        assert!(!grid.is_blocked(GridPoint::new(7, 8)));
    }

    #[test]
    fn test_charge_lead_polyline_shape() {
        let mut grid = GridMap::new(35, 35);
        let node = keypad_node(GridPoint::new(8, 8));
        let lead = place_charge_lead(&node, &mut grid, &GridTransform::new(15)).unwrap();

        assert_eq!(lead.points.len(), 12);
        assert_eq!(lead.points[0], WorldPoint::new(52, 127));
        assert_eq!(lead.points[1], WorldPoint::new(59, 127));
        assert_eq!(lead.points[2], WorldPoint::new(62, 112));
        assert_eq!(lead.points[3], WorldPoint::new(65, 142));
        assert_eq!(lead.points[10], WorldPoint::new(90, 127));
        // last point sits on the node outline, facing the symbol
        assert_eq!(lead.points[11], WorldPoint::new(107, 127));
    }

    #[test]
    fn test_ground_lead_length_follows_markers() {
        let mut grid = GridMap::new(35, 35);
        let mut node = keypad_node(GridPoint::new(8, 8)).with_markers(vec![1, 2]);
        assert!(place_ground_lead(&mut node, &mut grid));

        let route = node.route.as_ref().unwrap();
        assert_eq!(route.len(), 6);
        assert_eq!(route.first(), Some(GridPoint::new(10, 8)));
        assert_eq!(route.last(), Some(GridPoint::new(15, 8)));
        assert!(route.points().iter().all(|&p| grid.is_blocked(p)));
        assert!(node.target.is_none());
    }

    #[test]
    fn test_leads_need_edge_candidates() {
        let mut grid = GridMap::new(10, 10);
        let mut node = Node::new(GridPoint::new(5, 5), vec![]);
        assert!(place_charge_lead(&node, &mut grid, &GridTransform::new(15)).is_none());
        assert!(!place_ground_lead(&mut node, &mut grid));
        assert_eq!(grid.occupied_cells().count(), 0);
    }
}
