//! # Voxel Module
//!
//! This module contains the voxel data model and the store that owns it.
//!
//! ## Architecture
//!
//! * **Block**: coordinates, materials, the `Voxel` record and the `BlockSide` face convention
//! * **World**: the shared `VoxelStore` that keeps face visibility consistent on every edit
//! * **Layer**: the initial flat patch the scene is seeded with
//!
//! ## Data Flow
//!
//! 1. The edit actor inserts or removes a voxel through the store
//! 2. The store updates the six neighbors' facing sides under the same lock
//! 3. The render actor copies a snapshot and rebuilds the mesh from it

pub mod block;
pub mod layer;
pub mod world;
