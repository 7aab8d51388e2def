//! # Block Module
//!
//! This module provides the voxel data model: integer grid coordinates, material ids
//! and the per-face visibility flags the store keeps up to date.

use cgmath::Point3;

use crate::core::{Result, VoxelError};
use block_side::BlockSide;

pub mod block_side;

/// Integer grid coordinate of a voxel. This is the store key.
pub type Coordinate = Point3<i32>;

/// The integer type used to identify a voxel's material (its atlas cell).
pub type MaterialId = i32;

/// The reserved "empty" material. It is never stored; use `remove` instead.
pub const AIR: MaterialId = -1;

/// Number of materials addressable in the 16x16 texture atlas.
pub const MATERIAL_COUNT: MaterialId = 256;

/// Checks that `material` names a solid atlas cell.
///
/// # Errors
/// `InvalidArgument` for `AIR` and for ids outside `0..MATERIAL_COUNT`.
pub fn validate_material(material: MaterialId) -> Result<()> {
    if material == AIR {
        return Err(VoxelError::InvalidArgument(
            "material is the air marker; remove the voxel instead".to_string(),
        ));
    }
    if !(0..MATERIAL_COUNT).contains(&material) {
        return Err(VoxelError::InvalidArgument(format!(
            "material {material} is outside the atlas range 0..{MATERIAL_COUNT}"
        )));
    }
    Ok(())
}

/// The neighbor of `coordinate` across `side`.
pub fn neighbor(coordinate: Coordinate, side: BlockSide) -> Coordinate {
    coordinate + side.offset()
}

/// Converts a world-space point into the coordinate of the cell that contains it.
///
/// Every axis is floored toward negative infinity, so `-0.5` lands in cell `-1`
/// rather than being truncated to `0`.
pub fn containing_cell(point: Point3<f32>) -> Coordinate {
    Point3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

/// World-space position of a coordinate's minimum corner.
pub fn cell_origin(coordinate: Coordinate) -> Point3<f32> {
    Point3::new(
        coordinate.x as f32,
        coordinate.y as f32,
        coordinate.z as f32,
    )
}

/// Represents a single solid voxel in the scene.
///
/// A voxel occupies the unit cube `[x, x+1] x [y, y+1] x [z, z+1]`. Its visibility
/// flags are indexed by `BlockSide` and are owned by the voxel store: only inserts and
/// removes change them.
///
/// Faces are textured with `material` unless `side_materials` gives each side its own
/// atlas cell, e.g. a grass block with a different top.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Voxel {
    /// Grid coordinate of this voxel
    pub coordinate: Coordinate,
    /// Material id, always a valid atlas cell
    pub material: MaterialId,
    /// Whether each face borders empty space, indexed by `BlockSide`
    pub face_visible: [bool; 6],
    /// Per-face atlas cells indexed by `BlockSide`, overriding `material`
    pub side_materials: Option<[MaterialId; 6]>,
}

impl Voxel {
    /// Creates a voxel with all six faces visible.
    pub fn new(coordinate: Coordinate, material: MaterialId) -> Self {
        Voxel {
            coordinate,
            material,
            face_visible: [true; 6],
            side_materials: None,
        }
    }

    /// Textures each face with its own atlas cell, indexed by `BlockSide`.
    pub fn with_side_materials(mut self, side_materials: [MaterialId; 6]) -> Self {
        self.side_materials = Some(side_materials);
        self
    }

    /// The atlas cell the given face is textured with.
    pub fn side_material(&self, side: BlockSide) -> MaterialId {
        match self.side_materials {
            Some(materials) => materials[side.index()],
            None => self.material,
        }
    }

    /// Checks the voxel's material and any per-face overrides.
    ///
    /// # Errors
    /// `InvalidArgument` if any of them is not a solid atlas cell.
    pub fn validate_materials(&self) -> Result<()> {
        validate_material(self.material)?;
        if let Some(materials) = self.side_materials {
            for material in materials {
                validate_material(material)?;
            }
        }
        Ok(())
    }

    /// Whether the given face borders empty space.
    pub fn is_face_visible(&self, side: BlockSide) -> bool {
        self.face_visible[side.index()]
    }

    /// Number of faces that will be emitted into the mesh.
    pub fn visible_face_count(&self) -> usize {
        self.face_visible.iter().filter(|visible| **visible).count()
    }

    /// Iterates the faces that border empty space.
    pub fn visible_sides(&self) -> impl Iterator<Item = BlockSide> + '_ {
        BlockSide::all()
            .into_iter()
            .filter(move |side| self.is_face_visible(*side))
    }

    pub(crate) fn set_face_visible(&mut self, side: BlockSide, visible: bool) {
        self.face_visible[side.index()] = visible;
    }

    /// The neighbor coordinate across `side`.
    pub fn neighbor(&self, side: BlockSide) -> Coordinate {
        neighbor(self.coordinate, side)
    }
}
