//! Mesh generation for voxel rendering.
//!
//! This module turns the sparse voxel set into flat vertex and index buffers, once per
//! frame, from scratch. There is no incremental update path: the frame's snapshot is
//! the only input, which keeps the builder free of shared state with the edit actor.
//!
//! # Architecture
//! - `MeshBuilder`: owns the current and scratch meshes and enforces the capacity contract
//! - `mesh/`: the quad primitive and per-face corner tables
//! - `overlay`: debug lines and mirror quads emitted through the same primitive
//!
//! # Double Buffering
//! Each rebuild writes into the scratch mesh and swaps it with the current one only when
//! the frame completes. A rejected frame leaves the last good buffers untouched, so the
//! rasterizer always has something valid to draw.

use log::{debug, warn};

mod mesh;
pub mod overlay;

pub use mesh::*;
pub use overlay::{Line, MirrorQuad, Overlays};

use crate::{
    core::{Result, VoxelError},
    engine_state::voxels::block::Voxel,
};

/// Voxel count a builder is sized for when no configuration says otherwise.
pub const DEFAULT_MAX_VOXELS: usize = 65_536;

/// Rebuilds the scene mesh every frame.
///
/// The builder is owned by the render actor. Its buffers grow on demand up to the
/// configured capacity and are reused across frames.
#[derive(Debug)]
pub struct MeshBuilder {
    /// Largest voxel count a single frame may hold
    max_voxels: usize,
    /// Last successfully built mesh
    current: Mesh,
    /// Buffers the next frame is written into
    scratch: Mesh,
    /// Number of completed rebuilds
    frames_built: u64,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VOXELS)
    }
}

impl MeshBuilder {
    /// Creates a builder that accepts up to `max_voxels` voxels per frame.
    pub fn new(max_voxels: usize) -> Self {
        Self {
            max_voxels,
            current: Mesh::new(),
            scratch: Mesh::new(),
            frames_built: 0,
        }
    }

    /// Current capacity in voxels.
    pub fn capacity(&self) -> usize {
        self.max_voxels
    }

    /// Resizes the capacity.
    ///
    /// This is the recovery path after a `CapacityExceeded` frame. Shrinking releases
    /// the scratch allocation so the next frame starts fresh.
    pub fn set_capacity(&mut self, max_voxels: usize) {
        if max_voxels < self.max_voxels {
            self.scratch = Mesh::new();
        }
        debug!(
            "Mesh capacity changed from {} to {} voxels",
            self.max_voxels, max_voxels
        );
        self.max_voxels = max_voxels;
    }

    /// The last successfully built mesh.
    pub fn current(&self) -> &Mesh {
        &self.current
    }

    /// Number of frames built since creation.
    pub fn frames_built(&self) -> u64 {
        self.frames_built
    }

    /// Rebuilds the mesh from the given voxels.
    ///
    /// # Arguments
    /// * `voxels` - Point-in-time copy of the store, in any order
    ///
    /// # Returns
    /// The freshly built mesh, or `CapacityExceeded` with the previous mesh retained
    pub fn rebuild(&mut self, voxels: &[Voxel]) -> Result<&Mesh> {
        self.rebuild_with(voxels, &Overlays::default())
    }

    /// Rebuilds the mesh from the given voxels, then appends `overlays`.
    ///
    /// Every visible face becomes one quad. Hidden faces emit nothing, so a single
    /// isolated voxel yields six quads and two touching voxels yield ten.
    ///
    /// # Errors
    /// `CapacityExceeded` when there are more voxels than the capacity, or the frame
    /// needs more vertices than `u32` indices can address. The previous mesh is kept.
    pub fn rebuild_with(&mut self, voxels: &[Voxel], overlays: &Overlays) -> Result<&Mesh> {
        if voxels.len() > self.max_voxels {
            warn!(
                "Frame needs {} voxels but the mesh holds {}, keeping the previous mesh",
                voxels.len(),
                self.max_voxels
            );
            return Err(VoxelError::CapacityExceeded {
                required: voxels.len(),
                capacity: self.max_voxels,
            });
        }

        self.scratch.clear();
        if let Err(e) = fill(&mut self.scratch, voxels, overlays) {
            warn!("Frame rejected, keeping the previous mesh: {}", e);
            self.scratch.clear();
            return Err(e);
        }

        std::mem::swap(&mut self.current, &mut self.scratch);
        self.frames_built += 1;

        debug!(
            "Built mesh {}: {} voxels, {} quads",
            self.frames_built,
            voxels.len(),
            self.current.quad_count()
        );
        Ok(&self.current)
    }
}

fn fill(mesh: &mut Mesh, voxels: &[Voxel], overlays: &Overlays) -> Result<()> {
    for voxel in voxels {
        transfer_block(mesh, voxel)?;
    }
    overlays.transfer(mesh)
}

/// Appends one quad per visible face of `voxel`, each textured with that side's
/// material.
pub fn transfer_block(mesh: &mut Mesh, voxel: &Voxel) -> Result<()> {
    for side in voxel.visible_sides() {
        mesh.transfer_face(&Face::new(voxel.coordinate, voxel.side_material(side), side))?;
    }
    Ok(())
}
