use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, cell_origin, Coordinate, MaterialId};

/// A single quad face of a voxel.
///
/// The four corners run counter-clockwise as seen from outside the voxel:
/// lower-left, lower-right, upper-right, upper-left. With that order the cross product
/// of the first two edges points out of the voxel, and the triangles
/// `(ll, lr, ur)` and `(ll, ur, ul)` are front-facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner in world space
    pub ll: Point3<f32>,
    /// Lower-right corner in world space
    pub lr: Point3<f32>,
    /// Upper-right corner in world space
    pub ur: Point3<f32>,
    /// Upper-left corner in world space
    pub ul: Point3<f32>,
    /// Material used for the face's atlas cell
    pub material: MaterialId,
    /// Which side of the voxel this face covers
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face of the unit cube at `coordinate` on `block_side`.
    pub fn new(coordinate: Coordinate, material: MaterialId, block_side: BlockSide) -> Self {
        let o = cell_origin(coordinate);
        let (x0, y0, z0) = (o.x, o.y, o.z);
        let (x1, y1, z1) = (o.x + 1.0, o.y + 1.0, o.z + 1.0);

        let [ll, lr, ur, ul] = match block_side {
            BlockSide::FRONT => [
                Point3::new(x0, y0, z1),
                Point3::new(x1, y0, z1),
                Point3::new(x1, y1, z1),
                Point3::new(x0, y1, z1),
            ],
            BlockSide::BACK => [
                Point3::new(x1, y0, z0),
                Point3::new(x0, y0, z0),
                Point3::new(x0, y1, z0),
                Point3::new(x1, y1, z0),
            ],
            BlockSide::TOP => [
                Point3::new(x0, y1, z1),
                Point3::new(x1, y1, z1),
                Point3::new(x1, y1, z0),
                Point3::new(x0, y1, z0),
            ],
            BlockSide::BOTTOM => [
                Point3::new(x0, y0, z0),
                Point3::new(x1, y0, z0),
                Point3::new(x1, y0, z1),
                Point3::new(x0, y0, z1),
            ],
            BlockSide::LEFT => [
                Point3::new(x0, y0, z0),
                Point3::new(x0, y0, z1),
                Point3::new(x0, y1, z1),
                Point3::new(x0, y1, z0),
            ],
            BlockSide::RIGHT => [
                Point3::new(x1, y0, z1),
                Point3::new(x1, y0, z0),
                Point3::new(x1, y1, z0),
                Point3::new(x1, y1, z1),
            ],
        };

        Face {
            ll,
            lr,
            ur,
            ul,
            material,
            block_side,
        }
    }

    /// Corners in emission order.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        [self.ll, self.lr, self.ur, self.ul]
    }
}
