//! One word's routing session: nodes on the keypad, obstacles, leads and
//! link routing over a private grid

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::grid::GridMap;
use super::leads::{place_charge_lead, place_ground_lead, ChargeLead};
use super::node::{EdgeRing, Node};
use super::router::{chain_links, Link, LinkRouter, RoutingError, RoutingOutcome};
use super::transform::{circle_intersection, GridTransform};
use super::types::{CellState, Circle, WorldPoint};
use crate::error::ParseError;
use crate::parser::ast::{NodeSpec, Word};

/// Everything needed to draw one word
#[derive(Debug, Clone)]
pub struct WordLayout {
    pub word: Word,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    /// Grid state after routing
    pub grid: GridMap,
    pub transform: GridTransform,
    pub charge: Option<ChargeLead>,
    pub outcome: RoutingOutcome,
}

impl WordLayout {
    pub fn is_complete(&self) -> bool {
        self.outcome.is_complete()
    }

    pub fn routing_error(&self) -> Option<&RoutingError> {
        self.outcome.error()
    }

    /// Canvas polyline of a node's trace, empty when the node has no route
    ///
    /// Runs from the node outline through the centres of the routed cells,
    /// ending on the target outline when there is one.
    pub fn trace(&self, index: usize) -> Vec<WorldPoint> {
        let Some(node) = self.nodes.get(index) else {
            return Vec::new();
        };
        let Some(route) = node.route.as_ref().filter(|r| !r.is_empty()) else {
            return Vec::new();
        };

        let cells: Vec<WorldPoint> = route
            .points()
            .iter()
            .map(|&p| self.transform.cell_center(p))
            .collect();
        let mut points = Vec::with_capacity(cells.len() + 2);
        points.push(circle_intersection(node.circle, cells[0]));
        points.extend_from_slice(&cells);
        if let Some(target) = node.target {
            points.push(circle_intersection(target, cells[cells.len() - 1]));
        }
        points
    }

    /// Canvas positions of a node's marker dots along its trace
    ///
    /// Dots start on the second routed cell, one per marker unit, with a
    /// single empty cell between groups. `None` when the trace is too short
    /// to carry them all.
    pub fn marker_positions(&self, index: usize) -> Option<Vec<WorldPoint>> {
        let node = self.nodes.get(index)?;
        if node.markers.is_empty() {
            return Some(Vec::new());
        }
        // the last dot lands on trace[min_trace_length]
        let trace = self.trace(index);
        if node.min_trace_length() >= trace.len() {
            return None;
        }

        let mut positions = Vec::new();
        let mut cursor = 2;
        for (group, &marker) in node.markers.iter().enumerate() {
            for _ in 0..marker {
                positions.push(trace[cursor]);
                cursor += 1;
            }
            if group + 1 < node.markers.len() {
                cursor += 1;
            }
        }
        Some(positions)
    }
}

/// Build a word's nodes on the keypad and mark their bodies on the grid
fn place_nodes(specs: &[NodeSpec], config: &LayoutConfig, transform: &GridTransform, grid: &mut GridMap) -> Vec<Node> {
    let mut largest: FxHashMap<u8, i32> = FxHashMap::default();
    let mut keys = Vec::new();
    let mut nodes: Vec<Node> = specs
        .iter()
        .map(|spec| {
            let radius = match largest.get(&spec.key) {
                Some(r) => r + config.radius_increase,
                None => {
                    keys.push(spec.key);
                    config.default_radius
                }
            };
            largest.insert(spec.key, radius);

            let center = config.key_position(spec.key);
            Node::new(transform.world_to_grid(center), Vec::new())
                .with_key(spec.key)
                .with_circle(Circle::new(center, radius))
                .with_subnode_radius(config.subnode_radius)
                .with_markers(spec.markers.clone())
        })
        .collect();

    for key in keys {
        let max_radius = largest.get(&key).copied().unwrap_or(config.default_radius);
        let body = config.body_radius(max_radius);
        let Some(anchor) = nodes.iter().find(|n| n.key == key).map(|n| n.anchor) else {
            continue;
        };

        grid.mark(anchor, CellState::Blocked);
        for p in anchor.neighbors_within(body) {
            grid.mark(p, CellState::Blocked);
        }
        let ring = anchor.ring_at_radius(body + 1);
        for &p in &ring {
            grid.mark(p, CellState::SlowZone);
        }
        debug!(key, %anchor, body, ring = ring.len(), "placed node body");

        for node in nodes.iter_mut().filter(|n| n.key == key) {
            node.edge_ring = EdgeRing::new(ring.clone());
        }
    }
    nodes
}

/// Lay out and route a word
///
/// A routing abort is not an error here: the partial result is returned and
/// the abort is recorded in [`WordLayout::outcome`].
pub fn layout_word(word: &Word, config: &LayoutConfig) -> Result<WordLayout, LayoutError> {
    config.validate()?;
    let specs = word.node_specs().map_err(|e| match e {
        ParseError::InvalidCharacter { found, .. } => LayoutError::UnknownLetter { letter: found },
        ParseError::Empty => LayoutError::EmptyWord,
    })?;
    if specs.is_empty() {
        return Err(LayoutError::EmptyWord);
    }

    info!(%word, nodes = specs.len(), "laying out word");
    let transform = GridTransform::new(config.grid_size);
    let mut grid = GridMap::new(config.map_size, config.map_size);
    let mut nodes = place_nodes(&specs, config, &transform, &mut grid);

    let links = chain_links(&nodes);
    for link in &links {
        let target = nodes[link.to].anchor;
        nodes[link.from].edge_ring.sort_towards(target);
        debug!(from = nodes[link.from].key, to = nodes[link.to].key, distance = link.distance, "added link");
    }

    let charge = if config.charge_lead {
        place_charge_lead(&nodes[0], &mut grid, &transform)
    } else {
        None
    };
    if config.ground_lead {
        let last = nodes.len() - 1;
        place_ground_lead(&mut nodes[last], &mut grid);
    }

    let outcome = LinkRouter::new(&mut grid).route(&mut nodes, &links);
    if let Some(error) = outcome.error() {
        warn!(%word, %error, "routing incomplete");
    }

    Ok(WordLayout {
        word: word.clone(),
        nodes,
        links,
        grid,
        transform,
        charge,
        outcome,
    })
}
