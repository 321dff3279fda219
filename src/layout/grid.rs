//! Weighted obstacle grid the router searches over

use rustc_hash::FxHashSet;

use super::types::{CellState, GridPoint, Step};

/// Cost of an orthogonal move into an open cell
pub const ORTHOGONAL_COST: f64 = 1.0;
/// Cost of a diagonal move into an open cell
pub const DIAGONAL_COST: f64 = 1.5;
/// Discount for continuing in the direction of the incoming move
pub const STRAIGHT_DISCOUNT: f64 = 0.1;
/// Discount for stepping next to an existing obstacle (traces hug each other)
pub const DRIFT_DISCOUNT: f64 = 0.1;
/// Cost of crossing a slow zone that is not part of the goal ring
pub const SLOW_ZONE_PENALTY: f64 = 50.0;
/// Cost of turning into a goal-ring slow zone
pub const GOAL_TURN_COST: f64 = 0.5;

/// Per-search inputs to the step-cost function
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    /// Cells that terminate the search
    pub goal_ring: &'a FxHashSet<GridPoint>,
    /// The move that brought the search to the cursor, if any
    pub incoming: Option<Step>,
}

/// A bounded rectangle of cell states
///
/// Every cell in `[0, width) x [0, height)` holds a [`CellState`]; anything
/// outside is off-map and reads back as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
}

impl GridMap {
    /// Create a grid with every cell Open
    pub fn new(width: i32, height: i32) -> Self {
        let mut grid = Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        };
        grid.initialize(width, height);
        grid
    }

    /// Reset the grid to `width x height` Open cells
    pub fn initialize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.cells = vec![CellState::Open; self.width as usize * self.height as usize];
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether a point lies inside the initialized rectangle
    pub fn contains(&self, point: GridPoint) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    fn index(&self, point: GridPoint) -> Option<usize> {
        self.contains(point)
            .then(|| point.y as usize * self.width as usize + point.x as usize)
    }

    /// Set the state of a cell, overwriting whatever was there
    ///
    /// Returns false (and changes nothing) for off-map points.
    pub fn mark(&mut self, point: GridPoint, state: CellState) -> bool {
        match self.index(point) {
            Some(i) => {
                self.cells[i] = state;
                true
            }
            None => false,
        }
    }

    /// State of a cell, or `None` when the point is off-map
    pub fn value_at(&self, point: GridPoint) -> Option<CellState> {
        self.index(point).map(|i| self.cells[i])
    }

    /// True only for on-map Blocked cells
    pub fn is_blocked(&self, point: GridPoint) -> bool {
        self.value_at(point) == Some(CellState::Blocked)
    }

    /// The 8 grid-adjacent points; passability is decided by [`Self::step_cost`]
    pub fn neighbors(&self, point: GridPoint) -> impl Iterator<Item = GridPoint> {
        point.neighbors()
    }

    /// Cost of moving from `cursor` to the adjacent `next`, `None` if impassable
    pub fn step_cost(&self, cursor: GridPoint, next: GridPoint, ctx: &SearchContext<'_>) -> Option<f64> {
        let next_state = match self.value_at(next) {
            None | Some(CellState::Blocked) => return None,
            Some(state) => state,
        };

        let step = cursor.step_to(next);
        if step.is_diagonal() {
            let corner_a = GridPoint::new(next.x, cursor.y);
            let corner_b = GridPoint::new(cursor.x, next.y);
            if self.is_blocked(corner_a) && self.is_blocked(corner_b) {
                return None;
            }
        }

        let straight = ctx.incoming == Some(step);

        if next_state == CellState::SlowZone {
            if !ctx.goal_ring.contains(&next) {
                return Some(SLOW_ZONE_PENALTY);
            }
            return Some(if straight { 0.0 } else { GOAL_TURN_COST });
        }

        let mut cost = if step.is_diagonal() {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        };
        if straight {
            cost -= STRAIGHT_DISCOUNT;
        }
        if next.orthogonal_neighbors().any(|n| self.is_blocked(n)) {
            cost -= DRIFT_DISCOUNT;
        }
        Some(cost.max(0.0))
    }

    /// Mark every cell of a path Blocked
    pub fn block_path(&mut self, path: &[GridPoint]) {
        for &p in path {
            self.mark(p, CellState::Blocked);
        }
    }

    /// Reopen a path, keeping its two endpoints as SlowZone entry points
    pub fn unblock_path(&mut self, path: &[GridPoint]) {
        let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
            return;
        };
        for &p in path {
            self.mark(p, CellState::Open);
        }
        self.mark(first, CellState::SlowZone);
        self.mark(last, CellState::SlowZone);
    }

    /// All cells that are not Open, row by row
    pub fn occupied_cells(&self) -> impl Iterator<Item = (GridPoint, CellState)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, &state)| {
            let i = i as i32;
            (state != CellState::Open)
                .then(|| (GridPoint::new(i % self.width, i / self.width), state))
        })
    }

    /// Text dump: `.` open, `#` blocked, `~` slow zone, one row per line
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for state in row {
                out.push(match state {
                    CellState::Open => '.',
                    CellState::Blocked => '#',
                    CellState::SlowZone => '~',
                });
            }
            out.push('\n');
        }
        out
    }
}
