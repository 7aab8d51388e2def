//! Mesh data structures and the quad emission primitive.
//!
//! Everything the editor draws, voxel faces and overlays alike, reaches the vertex and
//! index buffers through [`Mesh::transfer_quad`].

use cgmath::{InnerSpace, Point3, Vector3};

use super::face::Face;
use crate::core::{Result, VoxelError};
use crate::engine_state::rendering::{atlas::AtlasCell, Vertex};

/// Most vertices one mesh may hold, bounded by its `u32` indices.
pub const MAX_VERTICES: usize = u32::MAX as usize;

/// Flat vertex and index buffers for one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mesh {
    /// Four vertices per quad
    pub vertices: Vec<Vertex>,
    /// Six indices (two triangles) per quad
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties both buffers, keeping their allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Number of quads emitted.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The vertex buffer as raw bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Appends one quad as two triangles.
    ///
    /// The normal is computed once from the first three corners,
    /// `(b - a) x (c - a)`, and shared by all four vertices. Corners must run
    /// counter-clockwise as seen from the side the quad faces.
    ///
    /// # Errors
    /// `CapacityExceeded` if the quad's vertices would not be addressable by `u32`
    /// indices. Nothing is appended in that case.
    pub fn transfer_quad(&mut self, corners: [Point3<f32>; 4], uvs: [[f32; 2]; 4]) -> Result<()> {
        let base = quad_base(self.vertices.len())?;
        let normal = quad_normal(&corners);

        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(corner, uv, normal));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        Ok(())
    }

    /// Appends a voxel face textured with its material's atlas cell.
    pub fn transfer_face(&mut self, face: &Face) -> Result<()> {
        let uvs = AtlasCell::for_material(face.material).corner_uvs();
        self.transfer_quad(face.corners(), uvs)
    }
}

/// Index of the first vertex of a quad appended after `vertex_count` vertices.
///
/// # Errors
/// `CapacityExceeded` if the quad would push the mesh past [`MAX_VERTICES`].
pub fn quad_base(vertex_count: usize) -> Result<u32> {
    let required = vertex_count.saturating_add(4);
    match u32::try_from(vertex_count) {
        Ok(base) if required <= MAX_VERTICES => Ok(base),
        _ => Err(VoxelError::CapacityExceeded {
            required,
            capacity: MAX_VERTICES,
        }),
    }
}

/// Unit normal of the plane through the first three corners.
///
/// Degenerate quads (collinear corners) get a zero normal rather than NaNs.
pub fn quad_normal(corners: &[Point3<f32>; 4]) -> Vector3<f32> {
    let normal = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
    if normal.magnitude2() > 0.0 {
        normal.normalize()
    } else {
        Vector3::new(0.0, 0.0, 0.0)
    }
}
