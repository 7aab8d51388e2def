//! # Layer Module
//!
//! Builds the flat patch of voxels the scene starts with.

use cgmath::Point3;

use crate::core::{Result, VoxelError};
use crate::engine_state::voxels::block::{validate_material, Coordinate, MaterialId, Voxel};

/// Widest initial layer, in voxels per side.
pub const MAX_LAYER_DELTA: u32 = 4096;

/// Generates a `delta x delta` patch of voxels in the plane `y = start.y`.
///
/// The patch is centred on `start` in x and z: cell `(i, j)` of the patch lands at
/// `(start.x + i - delta / 2, start.y, start.z + j - delta / 2)`. Visibility flags are
/// left fully visible; seeding the store recomputes them.
///
/// # Errors
/// `InvalidArgument` if `delta` is zero or above [`MAX_LAYER_DELTA`], or `material` is
/// not a solid atlas cell.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_editor::engine_state::voxels::layer::generate_block_layer;
///
/// let layer = generate_block_layer(Point3::new(0, -2, 0), 5, 0).unwrap();
/// assert_eq!(layer.len(), 25);
/// assert!(layer.iter().any(|v| v.coordinate == Point3::new(-2, -2, 2)));
/// ```
pub fn generate_block_layer(
    start: Coordinate,
    delta: u32,
    material: MaterialId,
) -> Result<Vec<Voxel>> {
    validate_layer_delta(delta)?;
    validate_material(material)?;

    let delta = delta as i32;
    let half = delta / 2;
    let mut layer = Vec::with_capacity((delta * delta) as usize);
    for z in 0..delta {
        for x in 0..delta {
            layer.push(Voxel::new(
                Point3::new(start.x + x - half, start.y, start.z + z - half),
                material,
            ));
        }
    }
    Ok(layer)
}

/// Checks that a `delta x delta` layer can be generated.
pub fn validate_layer_delta(delta: u32) -> Result<()> {
    if delta == 0 {
        return Err(VoxelError::InvalidArgument(
            "layer size must be at least 1".to_string(),
        ));
    }
    if delta > MAX_LAYER_DELTA {
        return Err(VoxelError::InvalidArgument(format!(
            "layer size {delta} exceeds {MAX_LAYER_DELTA}"
        )));
    }
    Ok(())
}
