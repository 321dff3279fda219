//! Grid <-> canvas coordinate conversion and circle geometry
//!
//! The routing grid is an integer lattice laid over the canvas with a fixed
//! cell size. A grid cell `(gx, gy)` covers the canvas square starting at
//! `(gx * cell, gy * cell)`; drawing at cell centres uses an offset of
//! `cell / 2`.

use super::types::{Circle, GridPoint, WorldPoint};

/// Affine mapping between grid cells and canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTransform {
    cell_size: i32,
}

impl GridTransform {
    pub fn new(cell_size: i32) -> Self {
        Self { cell_size }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Offset that moves a cell's origin to its centre
    pub fn center_offset(&self) -> i32 {
        self.cell_size / 2
    }

    /// Canvas position of a cell, shifted by `offset` on both axes
    pub fn grid_to_world(&self, point: GridPoint, offset: i32) -> WorldPoint {
        WorldPoint::new(
            point.x * self.cell_size + offset,
            point.y * self.cell_size + offset,
        )
    }

    /// Canvas position of a cell's centre
    pub fn cell_center(&self, point: GridPoint) -> WorldPoint {
        self.grid_to_world(point, self.center_offset())
    }

    /// The cell whose centre is nearest below-left of a canvas point
    ///
    /// Inverse of [`Self::cell_center`] for any point produced by it.
    pub fn world_to_grid(&self, world: WorldPoint) -> GridPoint {
        let half = self.center_offset();
        GridPoint::new(
            (world.x - half).div_euclid(self.cell_size),
            (world.y - half).div_euclid(self.cell_size),
        )
    }
}

/// Where the ray from a circle's centre towards `target` leaves the circle
///
/// A target at the centre itself yields the centre.
pub fn circle_intersection(circle: Circle, target: WorldPoint) -> WorldPoint {
    let dx = f64::from(target.x - circle.center.x);
    let dy = f64::from(target.y - circle.center.y);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return circle.center;
    }
    let radius = f64::from(circle.radius);
    WorldPoint::new(
        (f64::from(circle.center.x) + dx / length * radius) as i32,
        (f64::from(circle.center.y) + dy / length * radius) as i32,
    )
}
