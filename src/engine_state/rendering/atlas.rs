//! Texture atlas addressing.
//!
//! Every material id names one cell of a single 16x16 atlas texture. Cells are laid out
//! row-major: id 0 is the top-left cell, id 15 the top-right, id 16 starts the second row.

use crate::engine_state::voxels::block::MaterialId;

/// Number of atlas cells along each side of the texture.
pub const ATLAS_DIMENSION: i32 = 16;

/// Width and height of one atlas cell in UV space.
pub const ATLAS_CELL_SIZE: f32 = 1.0 / ATLAS_DIMENSION as f32;

/// The UV rectangle of one material's atlas cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasCell {
    /// Left edge
    pub u: f32,
    /// Top edge
    pub v: f32,
}

impl AtlasCell {
    /// Locates `material` in the atlas: `u = (id mod 16) / 16`, `v = (id div 16) / 16`.
    pub fn for_material(material: MaterialId) -> Self {
        AtlasCell {
            u: material.rem_euclid(ATLAS_DIMENSION) as f32 * ATLAS_CELL_SIZE,
            v: material.div_euclid(ATLAS_DIMENSION) as f32 * ATLAS_CELL_SIZE,
        }
    }

    /// UVs for the four quad corners in emission order.
    ///
    /// Corners run counter-clockwise from the lower-left as seen from the front of the
    /// quad, so the first corner samples the cell's bottom-left texel.
    pub fn corner_uvs(&self) -> [[f32; 2]; 4] {
        let (u0, v0) = (self.u, self.v);
        let (u1, v1) = (self.u + ATLAS_CELL_SIZE, self.v + ATLAS_CELL_SIZE);
        [[u0, v1], [u1, v1], [u1, v0], [u0, v0]]
    }
}
