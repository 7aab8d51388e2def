#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Editor
//!
//! An interactive editor core for a sparse voxel scene: unit cubes on an integer grid,
//! added and removed by casting a ray from the camera.
//!
//! ## Key Modules
//!
//! * `application_state` - Input tracking and frame pacing
//! * `config` - Editor configuration loaded from JSON
//! * `core` - Error type and thread-shared resources
//! * `engine_state` - The voxel store, picking, editing, the edit worker and meshing
//!
//! ## Architecture
//!
//! The editor runs two actors over one shared store:
//! * The edit actor, a worker thread that picks along rays and mutates the store
//! * The render actor, which snapshots the store and rebuilds the mesh each frame
//!
//! The mesh is plain vertex and index data with a `wgpu` vertex layout; drawing it is
//! left to the embedding application.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_editor::run();
//! }
//! ```

use std::time::Duration;

use cgmath::{Point3, Vector3};
use log::{error, info};
use winit::event::MouseButton;

use application_state::ApplicationState;
use config::EditorConfig;
use engine_state::FrameStatus;

pub mod application_state;
pub mod config;
pub mod core;
pub mod engine_state;

/// Initializes logging, loads the config named by the first argument and runs the
/// headless editing demo.
///
/// Exits the process with status 1 if the configuration is unusable.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config_path = std::env::args().nth(1);
    let config = match EditorConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut state = match ApplicationState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to build the scene: {}", e);
            std::process::exit(1);
        }
    };

    run_demo(&mut state, &config);
}

/// Drives `state` for `config.demo.frames` frames, clicking along random rays.
///
/// Each edit frame aims a ray from above the initial layer, presses a random mouse
/// button, and sometimes a material key. Inputs are released the frame after.
pub fn run_demo(state: &mut ApplicationState, config: &EditorConfig) {
    let mut rng = fastrand::Rng::with_seed(config.demo.seed);
    let frame_interval = Duration::from_millis(config.demo.frame_interval_ms);
    let reach = (config.layer.delta / 2) as f32 + 0.5;
    let base = config.layer.base;

    let mut rebuilt = 0u32;
    let mut retained = 0u32;
    let started = web_time::Instant::now();

    for frame in 0..config.demo.frames {
        let frame_start = web_time::Instant::now();
        state.input_manager.release_all();

        if frame % config.demo.edit_every == 0 {
            let origin = Point3::new(
                base[0] as f32 + (rng.f32() * 2.0 - 1.0) * reach,
                base[1] as f32 + 8.0,
                base[2] as f32 + (rng.f32() * 2.0 - 1.0) * reach,
            );
            let direction = Vector3::new(rng.f32() - 0.5, -4.0, rng.f32() - 0.5);
            state.engine_state.set_view_ray(origin, direction);

            let button = if rng.bool() {
                MouseButton::Right
            } else {
                MouseButton::Left
            };
            state.input_manager.set_mouse_button(button, true);
            if rng.u8(0..4) == 0 {
                let keys = engine_state::MATERIAL_KEYS;
                state.input_manager.set_key(keys[rng.usize(0..keys.len())], true);
            }
        }

        let (status, _) = state.frame();
        match status {
            FrameStatus::Rebuilt => rebuilt += 1,
            FrameStatus::Retained => retained += 1,
            FrameStatus::Unchanged => {}
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            std::thread::sleep(frame_interval - elapsed);
        }
    }

    state.engine_state.flush_edits();
    state.engine_state.render();

    let journal = state.engine_state.journal();
    info!(
        "Ran {} frames in {:?}: {} rebuilds, {} retained, {} voxels, {} quads",
        config.demo.frames,
        started.elapsed(),
        rebuilt,
        retained,
        state.engine_state.store().len(),
        state.engine_state.mesh().quad_count()
    );
    info!(
        "Edits: {} added, {} removed, {} without target, {} rejected",
        journal.added(),
        journal.removed(),
        journal.no_target(),
        journal.rejected()
    );
}
