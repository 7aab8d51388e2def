//! # Application State Management
//!
//! This module connects input to the engine and paces frames:
//! - Input tracking and edge detection
//! - Per-frame input translation, edit processing and mesh rebuilds
//!
//! The application is headless: whatever rasterizes `EngineState::mesh()` lives outside
//! this crate, and the frame loop is driven by `run()`.

pub mod input_manager;
pub mod input_state;

use input_manager::InputManager;
use winit::event::WindowEvent;

use crate::{
    config::EditorConfig,
    core::Result,
    engine_state::{EngineState, FrameStatus},
};

/// The running application.
pub struct ApplicationState {
    /// The scene and its actors
    pub engine_state: EngineState,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,

    /// Frames run so far
    pub frame_count: u64,
}

impl ApplicationState {
    /// Builds the engine from `config`.
    pub fn new(config: &EditorConfig) -> Result<Self> {
        Ok(Self {
            engine_state: EngineState::new(config)?,
            input_manager: InputManager::new(),
            last_wait_time: web_time::Instant::now(),
            frame_count: 0,
        })
    }

    /// Feeds a window event into input tracking.
    ///
    /// Losing focus releases every input so nothing stays stuck down.
    pub fn window_event(&mut self, event: &WindowEvent) {
        self.input_manager.intake_input(event);
        if let WindowEvent::Focused(false) = event {
            self.input_manager.release_all();
        }
    }

    /// Runs one frame: applies input, services the edit actor and rebuilds the mesh.
    ///
    /// # Returns
    /// What happened to the mesh, and the time since the previous frame
    pub fn frame(&mut self) -> (FrameStatus, web_time::Duration) {
        let now = web_time::Instant::now();
        let wait_dt = now - self.last_wait_time;
        self.last_wait_time = now;

        let processed_input = self.input_manager.get_and_reset_processed_input();
        self.engine_state.set_input_commands(&processed_input);
        self.engine_state.process_tasks();

        let status = self.engine_state.render();
        self.frame_count += 1;
        (status, wait_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayerConfig;
    use cgmath::{Point3, Vector3};
    use winit::event::MouseButton;

    #[test]
    fn frame_applies_clicks_and_rebuilds() {
        let config = EditorConfig {
            layer: LayerConfig {
                delta: 3,
                ..LayerConfig::default()
            },
            ..EditorConfig::default()
        };
        let mut app = ApplicationState::new(&config).unwrap();
        app.engine_state
            .set_view_ray(Point3::new(0.5, 5.0, 0.5), Vector3::new(0.0, -1.0, 0.0));

        let (status, _) = app.frame();
        assert_eq!(status, FrameStatus::Rebuilt);

        app.input_manager.set_mouse_button(MouseButton::Left, true);
        app.frame();
        app.engine_state.flush_edits();
        app.frame();

        assert_eq!(app.engine_state.store().len(), 8);
        assert_eq!(app.engine_state.journal().removed(), 1);
        // 3x3 floor with its centre punched out
        assert_eq!(app.engine_state.mesh().quad_count(), 8 * 2 + 12 + 4);
        assert_eq!(app.frame_count, 3);
    }
}
