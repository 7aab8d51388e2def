//! # Core Module
//!
//! Fundamental types shared by every part of the editor: the thread-safe resource
//! container that backs the voxel store, and the crate error type.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `VoxelError`: The error taxonomy for store, picker and mesh operations
//!
//! ## Usage
//! ```rust
//! use voxel_editor::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod error;
pub mod mt_resource;

pub use error::{Result, VoxelError};
pub use mt_resource::MtResource;
