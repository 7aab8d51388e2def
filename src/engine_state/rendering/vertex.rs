//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format the mesh builder emits and the buffer layout
//! an external rasterizer uses to bind it.

use cgmath::{Point3, Vector3};

/// A vertex of the scene mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Atlas UV coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Outward face normal, shared by the four corners of a quad
    pub normal: [f32; 3],
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: Point3<f32>, tex_coords: [f32; 2], normal: Vector3<f32>) -> Self {
        Vertex {
            position: position.into(),
            tex_coords,
            normal: normal.into(),
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}
