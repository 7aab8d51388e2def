//! Non-voxel geometry emitted through the same quad primitive as voxel faces.
//!
//! Debug lines become two thin quads, one per winding, so they show from either side.
//! Mirror quads sample the frame seen by a reflected camera, so their UVs are the
//! corners' projected screen positions instead of an atlas cell.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use super::mesh::{quad_normal, Mesh};
use crate::core::Result;
use crate::engine_state::{rendering::atlas::AtlasCell, voxels::block::MaterialId};

/// Atlas cell used for debug lines unless another is given.
pub const LINE_MATERIAL: MaterialId = 17;

/// Half the thickness of a debug line quad.
pub const LINE_HALF_WIDTH: f32 = 0.001;

/// Squared sine below which a line counts as parallel to its thickening axis.
const PARALLEL_TOLERANCE: f32 = 1e-6;

/// A debug line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// First endpoint
    pub start: Point3<f32>,
    /// Second endpoint
    pub end: Point3<f32>,
    /// Atlas cell the line is textured with
    pub material: MaterialId,
}

impl Line {
    /// A line textured with [`LINE_MATERIAL`].
    pub fn new(start: Point3<f32>, end: Point3<f32>) -> Self {
        Line {
            start,
            end,
            material: LINE_MATERIAL,
        }
    }

    /// Emits the line as a quad thickened along `up`, once per winding.
    ///
    /// A zero `up`, or one parallel to the line, falls back to the y axis, then z.
    pub fn transfer(&self, mesh: &mut Mesh, up: Vector3<f32>) -> Result<()> {
        let offset = self.thickening_axis(up).normalize_to(LINE_HALF_WIDTH);
        let corners = [
            self.start - offset,
            self.end - offset,
            self.end + offset,
            self.start + offset,
        ];
        let uvs = AtlasCell::for_material(self.material).corner_uvs();

        mesh.transfer_quad(corners, uvs)?;
        mesh.transfer_quad(
            [corners[0], corners[3], corners[2], corners[1]],
            [uvs[0], uvs[3], uvs[2], uvs[1]],
        )
    }

    fn thickening_axis(&self, up: Vector3<f32>) -> Vector3<f32> {
        let direction = self.end - self.start;
        [up, Vector3::unit_y(), Vector3::unit_z()]
            .into_iter()
            .find(|axis| {
                let length2 = axis.magnitude2();
                length2 > f32::EPSILON
                    && direction.cross(*axis).magnitude2()
                        >= PARALLEL_TOLERANCE * direction.magnitude2() * length2
            })
            .unwrap_or(Vector3::unit_y())
    }
}

/// A planar reflective quad.
///
/// `view_projection` is the reflected camera's combined projection and view matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorQuad {
    /// Corners, counter-clockwise as seen from the reflective side
    pub corners: [Point3<f32>; 4],
    /// Reflected camera transform
    pub view_projection: Matrix4<f32>,
}

impl MirrorQuad {
    /// A mirror whose camera is `eye` reflected through the quad's plane.
    ///
    /// # Arguments
    /// * `corners` - Quad corners, counter-clockwise as seen from the reflective side
    /// * `eye` - Position of the viewer's camera
    /// * `projection` - Projection matrix of the mirror camera
    pub fn reflecting(corners: [Point3<f32>; 4], eye: Point3<f32>, projection: Matrix4<f32>) -> Self {
        let center = Point3::centroid(&corners);
        let (mirror_eye, look) = reflected_camera(center, quad_normal(&corners), eye);
        let up = if look.cross(Vector3::unit_y()).magnitude2() > f32::EPSILON {
            Vector3::unit_y()
        } else {
            Vector3::unit_z()
        };
        MirrorQuad {
            corners,
            view_projection: projection * Matrix4::look_to_rh(mirror_eye, look, up),
        }
    }

    /// Projects every corner into the reflected camera's normalized device coordinates.
    ///
    /// # Returns
    /// The per-corner UVs, or `None` when a corner is behind the camera or
    /// outside the unit clip square.
    pub fn projected_uvs(&self) -> Option<[[f32; 2]; 4]> {
        let mut uvs = [[0.0; 2]; 4];
        for (uv, corner) in uvs.iter_mut().zip(self.corners) {
            let clip = self.view_projection * corner.to_homogeneous();
            if clip.w <= 0.0 {
                return None;
            }
            let (x, y) = (clip.x / clip.w, clip.y / clip.w);
            if x.abs() > 1.0 || y.abs() > 1.0 {
                return None;
            }
            *uv = [x * 0.5 + 0.5, y * 0.5 + 0.5];
        }
        Some(uvs)
    }

    /// Emits the quad if it is fully in view of the mirror camera.
    ///
    /// # Returns
    /// Whether the quad was emitted
    pub fn transfer(&self, mesh: &mut Mesh) -> Result<bool> {
        match self.projected_uvs() {
            Some(uvs) => {
                mesh.transfer_quad(self.corners, uvs)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Places the mirror camera for a viewer at `eye`.
///
/// The vector from the eye to the mirror centre is reflected about `normal`. The mirror
/// camera sits that far behind the centre and looks along the reflected vector.
///
/// # Returns
/// The mirror camera's position and view direction
pub fn reflected_camera(
    center: Point3<f32>,
    normal: Vector3<f32>,
    eye: Point3<f32>,
) -> (Point3<f32>, Vector3<f32>) {
    let to_mirror = center - eye;
    let reflected = to_mirror - normal * (2.0 * to_mirror.dot(normal));
    (center - reflected, reflected)
}

/// Extra geometry appended after the voxel faces each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlays {
    /// Debug line segments
    pub lines: Vec<Line>,
    /// Mirror surfaces
    pub mirrors: Vec<MirrorQuad>,
    /// Axis debug lines are thickened along
    pub line_up: Vector3<f32>,
}

impl Default for Overlays {
    fn default() -> Self {
        Overlays {
            lines: Vec::new(),
            mirrors: Vec::new(),
            line_up: Vector3::unit_y(),
        }
    }
}

impl Overlays {
    /// Whether there is nothing to emit.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.mirrors.is_empty()
    }

    /// Drops all overlays.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.mirrors.clear();
    }

    /// Appends every overlay to `mesh`.
    pub fn transfer(&self, mesh: &mut Mesh) -> Result<()> {
        for line in &self.lines {
            line.transfer(mesh, self.line_up)?;
        }
        for mirror in &self.mirrors {
            if !mirror.transfer(mesh)? {
                log::trace!("Mirror quad out of view, skipped");
            }
        }
        Ok(())
    }
}
