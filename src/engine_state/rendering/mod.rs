//! Rendering data for the voxel editor.
//!
//! This module produces everything a rasterizer needs to draw the scene: the per-frame
//! mesh, the vertex format with its `wgpu` buffer layout, and the texture atlas
//! addressing shared by voxel faces and debug lines. Device, surface and pipeline
//! management belong to the embedding application.

pub mod atlas;
pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use meshing::{Mesh, MeshBuilder};
pub use vertex::Vertex;
