//! # Block Side Module
//!
//! This module defines the six faces of a voxel and the fixed index convention used by
//! the per-face visibility flags. Opposite faces are paired so that the visibility of a
//! shared face can be updated on both voxels at once.

use cgmath::Vector3;
use num_derive::FromPrimitive;

/// Represents the six possible faces of a voxel.
///
/// Each variant's discriminant is the index of that face in `Voxel::face_visible`.
/// The pairing of opposites is FRONT/BACK, TOP/BOTTOM and LEFT/RIGHT.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The top face (facing positive Y)
    TOP = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The back face (facing negative Z)
    BACK = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns all six faces in index order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Looks up a face by its visibility index.
    ///
    /// # Returns
    /// `None` if `index` is not in `0..6`.
    pub fn from_index(index: usize) -> Option<BlockSide> {
        num::FromPrimitive::from_usize(index)
    }

    /// The index of this face in a voxel's visibility flags.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Integer offset from a voxel to the neighbor this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
        }
    }

    /// The face on the neighbor that touches this one.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
        }
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }
}
