//! Editor configuration management
//!
//! Handles loading the editor configuration from a JSON file:
//! - The initial floor layer
//! - Picking parameters
//! - Mesh capacity
//! - The headless demo loop
//!
//! Every field has a default, so a config file only needs the values it changes.

use cgmath::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    core::{Result, VoxelError},
    engine_state::{
        picking::PickSettings,
        rendering::meshing::DEFAULT_MAX_VOXELS,
        voxels::{
            block::{validate_material, Coordinate, MaterialId},
            layer::validate_layer_delta,
        },
    },
};

/// The floor generated at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Centre of the layer, `[x, y, z]`
    pub base: [i32; 3],
    /// Side length in voxels
    pub delta: u32,
    /// Material of every layer voxel
    pub material: MaterialId,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            base: [0, -2, 0],
            delta: 25,
            material: 0,
        }
    }
}

impl LayerConfig {
    /// The layer centre as a grid coordinate.
    pub fn base_coordinate(&self) -> Coordinate {
        Point3::from(self.base)
    }
}

/// Mesh builder sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Largest voxel count a frame may hold
    pub max_voxels: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            max_voxels: DEFAULT_MAX_VOXELS,
        }
    }
}

/// Headless frame loop driven by `run()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames to render before exiting
    pub frames: u32,
    /// Issue a random edit every this many frames
    pub edit_every: u32,
    /// Target frame time in milliseconds
    pub frame_interval_ms: u64,
    /// Seed for the random edit rays
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            edit_every: 4,
            frame_interval_ms: 16,
            seed: 0x5eed,
        }
    }
}

/// Editor configuration stored in a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial floor
    pub layer: LayerConfig,
    /// Pick traversal
    pub picking: PickSettings,
    /// Mesh capacity
    pub mesh: MeshConfig,
    /// Material selected at startup
    pub edit_material: MaterialId,
    /// Headless loop parameters
    pub demo: DemoConfig,
}

impl EditorConfig {
    /// Loads and validates the config at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path` if one is given, else the defaults.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Writes the config to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Rejects values the editor cannot start with.
    pub fn validate(&self) -> Result<()> {
        validate_layer_delta(self.layer.delta)?;
        validate_material(self.layer.material)?;
        validate_material(self.edit_material)?;
        self.picking.validate()?;

        let layer_size = self.layer.delta as usize * self.layer.delta as usize;
        if layer_size > self.mesh.max_voxels {
            return Err(VoxelError::InvalidArgument(format!(
                "mesh.max_voxels ({}) cannot hold the initial layer ({} voxels)",
                self.mesh.max_voxels, layer_size
            )));
        }
        if self.demo.edit_every == 0 {
            return Err(VoxelError::InvalidArgument(
                "demo.edit_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
