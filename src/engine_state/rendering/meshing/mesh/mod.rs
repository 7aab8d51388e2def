//! Mesh generation primitives for voxel rendering.
//!
//! # Architecture
//! - [`Mesh`]: flat vertex and index buffers, and the `transfer_quad` primitive
//! - [`Face`]: the four corners of one voxel face, wound counter-clockwise from outside

mod face;
#[allow(clippy::module_inception)]
mod mesh;

pub use face::Face;
pub use mesh::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_side::BlockSide;
    use cgmath::{InnerSpace, Point3, Vector3};

    #[test]
    fn every_face_normal_points_outward() {
        for side in BlockSide::all() {
            let face = Face::new(Point3::new(2, -3, 7), 0, side);
            let normal = quad_normal(&face.corners());
            assert!(
                (normal - side.normal()).magnitude() < 1e-6,
                "{:?} normal was {:?}",
                side,
                normal
            );
        }
    }

    #[test]
    fn face_lies_on_the_cube_surface() {
        let face = Face::new(Point3::new(1, 1, 1), 0, BlockSide::TOP);
        assert!(face.corners().iter().all(|c| c.y == 2.0));
        let face = Face::new(Point3::new(1, 1, 1), 0, BlockSide::LEFT);
        assert!(face.corners().iter().all(|c| c.x == 1.0));
    }

    #[test]
    fn transfer_quad_emits_two_consistent_triangles() {
        let mut mesh = Mesh::new();
        mesh.transfer_face(&Face::new(Point3::new(0, 0, 0), 5, BlockSide::RIGHT)).unwrap();
        mesh.transfer_face(&Face::new(Point3::new(0, 0, 0), 5, BlockSide::TOP)).unwrap();

        assert_eq!(mesh.quad_count(), 2);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);

        for triangle in mesh.indices.chunks(3) {
            let a = Point3::from(mesh.vertices[triangle[0] as usize].position);
            let b = Point3::from(mesh.vertices[triangle[1] as usize].position);
            let c = Point3::from(mesh.vertices[triangle[2] as usize].position);
            let winding = (b - a).cross(c - a).normalize();
            let stored = Vector3::from(mesh.vertices[triangle[0] as usize].normal);
            assert!((winding - stored).magnitude() < 1e-6);
        }
    }

    #[test]
    fn byte_views_cover_the_buffers() {
        let mut mesh = Mesh::new();
        mesh.transfer_face(&Face::new(Point3::new(0, 0, 0), 0, BlockSide::FRONT)).unwrap();
        assert_eq!(mesh.vertex_bytes().len(), 4 * 32);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn quad_indices_must_fit_in_u32() {
        assert_eq!(quad_base(0).unwrap(), 0);
        assert_eq!(quad_base(MAX_VERTICES - 4).unwrap(), u32::MAX - 4);
        for vertex_count in [MAX_VERTICES - 3, MAX_VERTICES, usize::MAX] {
            assert!(matches!(
                quad_base(vertex_count),
                Err(crate::core::VoxelError::CapacityExceeded { capacity: MAX_VERTICES, .. })
            ));
        }
    }
}
