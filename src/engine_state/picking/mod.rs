//! # Picking Module
//!
//! Finds edit targets by walking a view ray through the voxel grid.
//!
//! Two traversals produce the same `PickResult`:
//!
//! * `dda` - exact grid traversal that visits every cell the ray crosses, in order.
//!   This is the default.
//! * `marching` - fixed-step sampling of the ray. Its precision depends on the step
//!   count, and it is kept as the reference implementation.
//!
//! Both stop at the first occupied cell. The cell visited just before it becomes the
//! "add" target, unless that cell is the one the ray started in: a ray that starts
//! right against solid geometry must not place a voxel on top of its own origin.

use cgmath::{InnerSpace, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::{Result, VoxelError};
use crate::engine_state::voxels::{block::Coordinate, world::OccupancyGrid};

pub mod dda;
pub mod marching;

pub use dda::pick_dda;
pub use marching::pick;

/// Longest ray a pick may walk, in world units.
pub const MAX_PICK_DISTANCE: f32 = 65_536.0;

/// Outcome of a pick. All fields are `None` when the ray hit nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PickResult {
    /// The empty cell the ray passed through right before the hit
    pub empty_cell_before_hit: Option<Coordinate>,
    /// The first occupied cell along the ray
    pub hit_cell: Option<Coordinate>,
    /// Where along the ray the hit was registered
    pub hit_point: Option<Point3<f32>>,
}

impl PickResult {
    /// A result for a ray that hit nothing.
    pub fn miss() -> Self {
        Self::default()
    }

    /// Whether the ray hit an occupied cell.
    pub fn is_hit(&self) -> bool {
        self.hit_cell.is_some()
    }

    pub(crate) fn hit(
        cell: Coordinate,
        previous: Option<Coordinate>,
        start: Coordinate,
        point: Point3<f32>,
    ) -> Self {
        PickResult {
            empty_cell_before_hit: previous.filter(|previous| *previous != start),
            hit_cell: Some(cell),
            hit_point: Some(point),
        }
    }
}

/// Which traversal to use for picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickMethod {
    /// Exact grid traversal
    Dda,
    /// Fixed-step ray marching
    Marching,
}

/// Parameters shared by every pick the editor issues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickSettings {
    /// Traversal algorithm
    pub method: PickMethod,
    /// How far along the ray to search, in world units
    pub max_distance: f32,
    /// Number of samples for marching; ignored by DDA
    pub step_count: u32,
}

impl Default for PickSettings {
    fn default() -> Self {
        PickSettings {
            method: PickMethod::Dda,
            max_distance: 100.0,
            step_count: 1_000_000,
        }
    }
}

impl PickSettings {
    /// Picks with the configured traversal.
    pub fn pick<G: OccupancyGrid + ?Sized>(
        &self,
        grid: &G,
        origin: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Result<PickResult> {
        match self.method {
            PickMethod::Dda => pick_dda(grid, origin, direction, self.max_distance),
            PickMethod::Marching => {
                pick(grid, origin, direction, self.max_distance, self.step_count)
            }
        }
    }

    /// Rejects settings no pick could succeed with.
    pub fn validate(&self) -> Result<()> {
        validate_max_distance(self.max_distance)?;
        if self.method == PickMethod::Marching {
            validate_step_count(self.step_count)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_ray(origin: Point3<f32>, direction: Vector3<f32>) -> Result<Vector3<f32>> {
    if !(origin.x.is_finite() && origin.y.is_finite() && origin.z.is_finite()) {
        return Err(VoxelError::InvalidArgument(format!(
            "ray origin {origin:?} is not finite"
        )));
    }
    let length = direction.magnitude();
    if !length.is_finite() || length <= f32::EPSILON {
        return Err(VoxelError::InvalidArgument(format!(
            "ray direction {direction:?} has no usable length"
        )));
    }
    Ok(direction / length)
}

pub(crate) fn validate_max_distance(max_distance: f32) -> Result<()> {
    if !max_distance.is_finite() || max_distance <= 0.0 {
        return Err(VoxelError::InvalidArgument(format!(
            "max distance must be positive, got {max_distance}"
        )));
    }
    if max_distance > MAX_PICK_DISTANCE {
        return Err(VoxelError::InvalidArgument(format!(
            "max distance {max_distance} exceeds {MAX_PICK_DISTANCE}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_step_count(step_count: u32) -> Result<()> {
    if step_count == 0 {
        return Err(VoxelError::InvalidArgument(
            "step count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_grid {
    use std::collections::HashSet;

    use crate::engine_state::voxels::{block::Coordinate, world::OccupancyGrid};

    /// Minimal occupancy grid for picker tests.
    pub struct CellSet(pub HashSet<Coordinate>);

    impl CellSet {
        pub fn new(cells: &[Coordinate]) -> Self {
            CellSet(cells.iter().copied().collect())
        }
    }

    impl OccupancyGrid for CellSet {
        fn is_occupied(&self, coordinate: Coordinate) -> bool {
            self.0.contains(&coordinate)
        }
    }
}
