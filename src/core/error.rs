//! Error types for the voxel editor

use thiserror::Error;

use crate::engine_state::voxels::block::Coordinate;

/// Main error type for the editor core.
///
/// Store and picker operations fail fast with `InvalidArgument`. Mesh
/// rebuilds fail with `CapacityExceeded` and leave the previous frame's
/// buffers in place. `NotFound` is informational: edit commands treat it as a
/// no-op so they stay idempotent.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// Malformed input, such as inserting the air marker or a zero-length ray.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The mesh scratch buffers cannot hold the current frame.
    ///
    /// Counts are voxels for the builder's configured capacity, and vertices when the
    /// mesh runs out of `u32` indices.
    #[error("mesh capacity exceeded: {required} requested, capacity is {capacity}")]
    CapacityExceeded {
        /// Amount the frame needed
        required: usize,
        /// Amount the mesh is sized for
        capacity: usize,
    },

    /// No voxel exists at the coordinate.
    #[error("no voxel at ({}, {}, {})", .0.x, .0.y, .0.z)]
    NotFound(Coordinate),

    /// Reading the configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `EditorConfig`.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VoxelError>;
