//! Sequential multi-link routing with backtracking
//!
//! Links are attempted shortest first. Each routed path is committed to the
//! grid as an obstacle for the links after it. When a link cannot be routed
//! from any of its start candidates, the router steps back to the previous
//! link in processing order and reroutes it from its next untried
//! candidate, since the grid has changed underneath it. Stepping back from
//! the first link aborts routing for the word; paths committed so far stay
//! on the grid.

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::grid::GridMap;
use super::node::Node;
use super::pathfinder::{PathFinder, SearchRequest};

/// A requested trace from one node to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Index of the source node, which owns the routed path
    pub from: usize,
    /// Index of the target node
    pub to: usize,
    /// Taxicab distance between the two anchors, used for ordering only
    pub distance: i32,
}

impl Link {
    pub fn new(nodes: &[Node], from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            distance: nodes[from].anchor.taxi_distance(nodes[to].anchor),
        }
    }
}

/// Links between consecutive nodes, in chain order
pub fn chain_links(nodes: &[Node]) -> Vec<Link> {
    (1..nodes.len()).map(|to| Link::new(nodes, to - 1, to)).collect()
}

/// Routing progress of a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Pending,
    Routed,
    Failed,
}

/// Every start candidate of a link was tried without success
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("link {link} exhausted its start candidates ({searched} searched, {skipped} blocked)")]
pub struct LinkFailure {
    pub link: usize,
    pub searched: usize,
    pub skipped: usize,
}

/// Word-level routing failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The first link in processing order failed, there is nothing to step back to
    #[error("cannot backtrack past link {link} (node {from} to node {to})")]
    BacktrackUnderflow { link: usize, from: usize, to: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingStatus {
    Complete,
    Aborted(RoutingError),
}

/// One link attempt, in the order the router made them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub link: usize,
    pub routed: bool,
}

/// Result of routing a word's links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingOutcome {
    pub status: RoutingStatus,
    /// Link indices in processing order
    pub order: Vec<usize>,
    /// Final state per link, indexed like the input links
    pub states: Vec<LinkState>,
    pub attempts: Vec<Attempt>,
}

impl RoutingOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == RoutingStatus::Complete
    }

    pub fn error(&self) -> Option<&RoutingError> {
        match &self.status {
            RoutingStatus::Complete => None,
            RoutingStatus::Aborted(e) => Some(e),
        }
    }
}

/// Next step of the routing state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Advance(usize),
    Retreat(usize),
    Abort,
}

fn transition(index: usize, routed: bool) -> Transition {
    if routed {
        Transition::Advance(index + 1)
    } else {
        match index.checked_sub(1) {
            Some(previous) => Transition::Retreat(previous),
            None => Transition::Abort,
        }
    }
}

/// Link indices sorted by ascending anchor distance, ties in chain order
pub fn processing_order(links: &[Link]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..links.len()).collect();
    order.sort_by_key(|&i| links[i].distance);
    order
}

/// Routes links one at a time over a shared grid
pub struct LinkRouter<'g> {
    grid: &'g mut GridMap,
    finder: PathFinder,
}

impl<'g> LinkRouter<'g> {
    pub fn new(grid: &'g mut GridMap) -> Self {
        Self {
            grid,
            finder: PathFinder::new(),
        }
    }

    /// Route every link, committing paths to the grid and the source nodes
    pub fn route(&mut self, nodes: &mut [Node], links: &[Link]) -> RoutingOutcome {
        let order = processing_order(links);
        let mut states = vec![LinkState::Pending; links.len()];
        let mut attempts = Vec::new();
        let mut status = RoutingStatus::Complete;
        let mut index = 0;

        debug!(links = links.len(), ?order, "routing links shortest first");

        while let Some(&link_index) = order.get(index) {
            let link = links[link_index];
            debug!(link = link_index, from = link.from, to = link.to, "attempting link");

            let routed = match self.route_link(nodes, link_index, &link) {
                Ok(()) => {
                    states[link_index] = LinkState::Routed;
                    true
                }
                Err(failure) => {
                    info!(%failure, "link failed");
                    states[link_index] = LinkState::Failed;
                    false
                }
            };
            attempts.push(Attempt {
                link: link_index,
                routed,
            });

            match transition(index, routed) {
                Transition::Advance(next) => index = next,
                Transition::Retreat(previous) => {
                    debug!(retry = order[previous], "backtracking");
                    index = previous;
                }
                Transition::Abort => {
                    let error = RoutingError::BacktrackUnderflow {
                        link: link_index,
                        from: link.from,
                        to: link.to,
                    };
                    warn!(%error, "routing aborted, keeping partial result");
                    status = RoutingStatus::Aborted(error);
                    break;
                }
            }
        }

        RoutingOutcome {
            status,
            order,
            states,
            attempts,
        }
    }

    /// Route a single link from the source node's next untried candidates
    pub fn route_link(&mut self, nodes: &mut [Node], link_index: usize, link: &Link) -> Result<(), LinkFailure> {
        if let Some(previous) = nodes[link.from].route.take() {
            debug!(link = link_index, cells = previous.len(), "unblocking previous path");
            self.grid.unblock_path(previous.points());
        }

        let target = &nodes[link.to];
        let goal_ring = target.edge_ring.points().to_vec();
        let end = target.anchor;
        let target_circle = target.circle;

        let source = &mut nodes[link.from];
        let min_length = source.min_trace_length();
        source.edge_ring.sort_towards(end);

        let mut searched = 0;
        let mut skipped = 0;
        while let Some(start) = source.edge_ring.next_candidate() {
            if !self.grid.contains(start) || self.grid.is_blocked(start) {
                skipped += 1;
                continue;
            }
            searched += 1;

            let request = SearchRequest {
                start,
                end,
                goal_ring: &goal_ring,
                min_length,
            };
            match self.finder.search(self.grid, &request) {
                Ok(path) => {
                    debug!(
                        link = link_index,
                        start = %start,
                        end = ?path.last(),
                        cells = path.len(),
                        "path found"
                    );
                    self.grid.block_path(path.points());
                    source.route = Some(path);
                    source.target = Some(target_circle);
                    return Ok(());
                }
                Err(no_path) => trace!(link = link_index, %no_path, "candidate failed"),
            }
        }

        source.edge_ring.reset();
        if let Some(previous) = source.route.take() {
            self.grid.unblock_path(previous.points());
        }
        Err(LinkFailure {
            link: link_index,
            searched,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{CellState, GridPoint};

    fn endpoint(x: i32, y: i32) -> Node {
        let anchor = GridPoint::new(x, y);
        Node::new(anchor, vec![anchor])
    }

    #[test]
    fn test_transition_function() {
        assert_eq!(transition(0, true), Transition::Advance(1));
        assert_eq!(transition(3, false), Transition::Retreat(2));
        assert_eq!(transition(0, false), Transition::Abort);
    }

    #[test]
    fn test_chain_links_and_order() {
        let nodes = vec![endpoint(0, 0), endpoint(9, 0), endpoint(9, 2), endpoint(5, 2)];
        let links = chain_links(&nodes);
        let distances: Vec<i32> = links.iter().map(|l| l.distance).collect();
        assert_eq!(distances, vec![9, 2, 4]);
        assert_eq!(processing_order(&links), vec![1, 2, 0]);
    }

    #[test]
    fn test_processing_order_ties_keep_chain_order() {
        let nodes = vec![endpoint(0, 0), endpoint(3, 0), endpoint(6, 0)];
        let links = chain_links(&nodes);
        assert_eq!(processing_order(&links), vec![0, 1]);
    }

    #[test]
    fn test_routes_single_link_and_commits() {
        let mut grid = GridMap::new(10, 10);
        let mut nodes = vec![endpoint(2, 2), endpoint(7, 2)];
        let links = chain_links(&nodes);

        let outcome = LinkRouter::new(&mut grid).route(&mut nodes, &links);

        assert!(outcome.is_complete());
        assert_eq!(outcome.states, vec![LinkState::Routed]);
        let path = nodes[0].route.as_ref().expect("source owns the path");
        assert_eq!(path.steps(), 5);
        assert!(path.points().iter().all(|&p| grid.is_blocked(p)));
    }

    #[test]
    fn test_blocked_candidates_are_skipped() {
        let mut grid = GridMap::new(10, 10);
        let anchor = GridPoint::new(2, 2);
        let blocked = GridPoint::new(3, 2);
        grid.mark(blocked, CellState::Blocked);
        let mut nodes = vec![
            Node::new(anchor, vec![blocked, GridPoint::new(2, 3)]),
            endpoint(7, 2),
        ];
        let links = chain_links(&nodes);

        let result = LinkRouter::new(&mut grid).route_link(&mut nodes, 0, &links[0]);

        assert!(result.is_ok());
        assert_eq!(nodes[0].route.as_ref().unwrap().first(), Some(GridPoint::new(2, 3)));
    }

    #[test]
    fn test_off_map_candidates_are_skipped() {
        let mut grid = GridMap::new(10, 10);
        let mut nodes = vec![
            Node::new(GridPoint::new(0, 2), vec![GridPoint::new(-1, 2), GridPoint::new(0, 3)]),
            endpoint(7, 2),
        ];
        let links = chain_links(&nodes);
        let mut router = LinkRouter::new(&mut grid);

        router.route_link(&mut nodes, 0, &links[0]).unwrap();
        assert_eq!(nodes[0].route.as_ref().unwrap().first(), Some(GridPoint::new(0, 3)));

        let mut stranded = vec![
            Node::new(GridPoint::new(0, 8), vec![GridPoint::new(-1, 8), GridPoint::new(0, 10)]),
            endpoint(7, 8),
        ];
        let links = chain_links(&stranded);
        let failure = router.route_link(&mut stranded, 0, &links[0]).unwrap_err();
        assert_eq!((failure.searched, failure.skipped), (0, 2));
    }

    #[test]
    fn test_failed_link_resets_cursor() {
        let mut grid = GridMap::new(10, 10);
        for y in 0..10 {
            grid.mark(GridPoint::new(5, y), CellState::Blocked);
        }
        let mut nodes = vec![
            Node::new(GridPoint::new(2, 2), vec![GridPoint::new(2, 2), GridPoint::new(2, 3)]),
            endpoint(8, 2),
        ];
        let links = chain_links(&nodes);

        let failure = LinkRouter::new(&mut grid)
            .route_link(&mut nodes, 0, &links[0])
            .unwrap_err();

        assert_eq!(failure.searched, 2);
        assert_eq!(nodes[0].edge_ring.position(), 0);
        assert!(nodes[0].route.is_none());
    }

    #[test]
    fn test_rerouting_unblocks_previous_path() {
        let mut grid = GridMap::new(10, 10);
        let mut nodes = vec![
            Node::new(GridPoint::new(2, 2), vec![GridPoint::new(2, 2), GridPoint::new(2, 4)]),
            Node::new(GridPoint::new(7, 2), vec![GridPoint::new(7, 2), GridPoint::new(7, 4)]),
        ];
        let links = chain_links(&nodes);
        let mut router = LinkRouter::new(&mut grid);

        router.route_link(&mut nodes, 0, &links[0]).unwrap();
        let first = nodes[0].route.clone().unwrap();
        router.route_link(&mut nodes, 0, &links[0]).unwrap();
        let second = nodes[0].route.clone().unwrap();

        assert_eq!(first.first(), Some(GridPoint::new(2, 2)));
        assert_eq!(second.first(), Some(GridPoint::new(2, 4)));
        drop(router);
        // The old endpoints stay preferred entry points, its interior reopens
        assert_eq!(grid.value_at(GridPoint::new(2, 2)), Some(CellState::SlowZone));
        for p in &first.points()[1..first.len() - 1] {
            if !second.contains(*p) {
                assert_eq!(grid.value_at(*p), Some(CellState::Open), "{p}");
            }
        }
    }
}
