//! Core types for the grid router

use std::fmt;

/// A cell coordinate on the routing grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

/// Offsets of the 8 grid-adjacent cells, orthogonal first
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (0, -1),
    (-1, 0),
    (0, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (1, 1),
];

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Taxicab distance between two cells
    pub fn taxi_distance(self, other: GridPoint) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chessboard distance between two cells
    pub fn chebyshev_distance(self, other: GridPoint) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// True when both cells share a row or a column
    pub fn is_on_grid_line(self, other: GridPoint) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// The 8 grid-adjacent cells, unfiltered
    pub fn neighbors(self) -> impl Iterator<Item = GridPoint> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .map(move |(dx, dy)| GridPoint::new(self.x + dx, self.y + dy))
    }

    /// The 4 orthogonally adjacent cells
    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = GridPoint> {
        NEIGHBOR_OFFSETS[..4]
            .iter()
            .map(move |&(dx, dy)| GridPoint::new(self.x + dx, self.y + dy))
    }

    /// All cells within chessboard distance `radius`, excluding this one
    pub fn neighbors_within(self, radius: i32) -> Vec<GridPoint> {
        let mut cells = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx != 0 || dy != 0 {
                    cells.push(GridPoint::new(self.x + dx, self.y + dy));
                }
            }
        }
        cells
    }

    /// The square ring of cells at exactly chessboard distance `radius`
    ///
    /// Ordered column by column from the left edge, top to bottom.
    pub fn ring_at_radius(self, radius: i32) -> Vec<GridPoint> {
        if radius <= 0 {
            return vec![self];
        }
        let mut cells = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() == radius || dy.abs() == radius {
                    cells.push(GridPoint::new(self.x + dx, self.y + dy));
                }
            }
        }
        cells
    }

    /// Step `distance` cells in an orthogonal direction
    pub fn offset(self, direction: Direction, distance: i32) -> GridPoint {
        let (dx, dy) = direction.delta();
        GridPoint::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// The unit move from this cell to an adjacent one
    pub fn step_to(self, next: GridPoint) -> Step {
        Step {
            dx: (next.x - self.x).signum(),
            dy: (next.y - self.y).signum(),
        }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A single move between adjacent cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    pub dx: i32,
    pub dy: i32,
}

impl Step {
    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }
}

/// Orthogonal direction on the grid (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Obstacle state of a single on-map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Open,
    Blocked,
    /// Punitive to cross; marks node buffers and preferred link endpoints
    SlowZone,
}

/// A pixel coordinate on the output canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
}

impl WorldPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for WorldPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A circle on the canvas, used for node outlines and trace targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub center: WorldPoint,
    pub radius: i32,
}

impl Circle {
    pub fn new(center: WorldPoint, radius: i32) -> Self {
        Self { center, radius }
    }
}
