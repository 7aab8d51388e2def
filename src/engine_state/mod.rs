//! # Engine State Module
//!
//! The scene context of the editor: it owns the voxel store, the edit actor, the mesh
//! builder and the overlays, and drives them once per frame.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the editor
//! * `voxels` - Voxel data, the shared store and the initial layer
//! * `picking` - Ray traversal that finds edit targets
//! * `editing` - Edit commands and the task that applies them
//! * `task_management` - The worker thread edits run on
//! * `rendering` - Mesh building, vertex format and atlas addressing
//!
//! ## Threading
//!
//! Two actors share the store. Edits run on the task manager's single worker, which is
//! the store's only writer. The thread that owns `EngineState` is the render actor: it
//! snapshots the store and rebuilds the mesh. Every mutation and every snapshot takes
//! the store lock once, so a frame never sees half an edit.

use cgmath::{Point3, Vector3};
use log::{debug, info, warn};
use winit::{event::MouseButton, keyboard::KeyCode};

use editing::{EditCommand, EditJournal, EditKind, EditTask};
use picking::PickSettings;
use rendering::meshing::{Mesh, MeshBuilder, Overlays};
use task_management::TaskManager;
use voxels::{
    block::{validate_material, MaterialId},
    layer::generate_block_layer,
    world::VoxelStore,
};

use crate::{
    application_state::input_state::ProcessedInputState,
    config::EditorConfig,
    core::{Result, VoxelError},
};

pub mod editing;
pub mod picking;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Material selection keys, in material order.
pub const MATERIAL_KEYS: [KeyCode; 4] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
];

/// What happened to the mesh in a call to `EngineState::render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The mesh was rebuilt from a fresh snapshot
    Rebuilt,
    /// Nothing changed since the last build; the mesh was reused
    Unchanged,
    /// The rebuild failed and the previous mesh was kept
    Retained,
}

/// The main state container for the editor
///
/// # Examples
///
/// ```
/// use voxel_editor::{config::EditorConfig, engine_state::EngineState};
/// use voxel_editor::engine_state::editing::EditKind;
///
/// let mut engine_state = EngineState::new(&EditorConfig::default()).unwrap();
/// engine_state.set_view_ray((0.5, 10.0, 0.5).into(), (0.0, -1.0, 0.0).into());
/// engine_state.submit_edit(EditKind::Add);
/// engine_state.flush_edits();
/// engine_state.render();
///
/// assert_eq!(engine_state.journal().added(), 1);
/// // a 25x25 floor plus one voxel on top of it
/// assert_eq!(engine_state.mesh().quad_count(), 25 * 25 * 2 + 4 * 25 + 4);
/// ```
pub struct EngineState {
    /// Shared voxel store
    store: VoxelStore,
    /// Worker thread edits run on
    task_manager: TaskManager,
    /// Outcomes of handled edits
    journal: EditJournal,
    /// Per-frame mesh builder
    mesh_builder: MeshBuilder,
    /// Debug lines and mirrors appended to the mesh
    overlays: Overlays,
    /// Pick traversal for edits
    pick_settings: PickSettings,
    /// Material placed by `Add`
    selected_material: MaterialId,
    /// Ray edits are issued along
    view_ray: (Point3<f32>, Vector3<f32>),
    /// Store generation the current mesh was built from
    built_generation: Option<u64>,
}

impl EngineState {
    /// Creates the scene from a configuration.
    ///
    /// Generates and seeds the initial layer, starts the edit worker and sizes the
    /// mesh builder.
    ///
    /// # Returns
    /// `InvalidArgument` if the configuration or the initial layer is malformed
    pub fn new(config: &EditorConfig) -> Result<Self> {
        config.validate()?;

        let store = VoxelStore::new();
        let layer = generate_block_layer(
            config.layer.base_coordinate(),
            config.layer.delta,
            config.layer.material,
        )?;
        store.seed(&layer)?;
        info!(
            "Seeded {} voxels around ({}, {}, {})",
            store.len(),
            config.layer.base[0],
            config.layer.base[1],
            config.layer.base[2]
        );

        Ok(Self {
            store,
            task_manager: TaskManager::new(1),
            journal: EditJournal::default(),
            mesh_builder: MeshBuilder::new(config.mesh.max_voxels),
            overlays: Overlays::default(),
            pick_settings: config.picking,
            selected_material: config.edit_material,
            view_ray: (Point3::new(0.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0)),
            built_generation: None,
        })
    }

    /// A handle to the scene's voxel store.
    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    /// Outcomes of all handled edits.
    pub fn journal(&self) -> &EditJournal {
        &self.journal
    }

    /// The mesh to draw this frame.
    pub fn mesh(&self) -> &Mesh {
        self.mesh_builder.current()
    }

    /// Material `Add` currently places.
    pub fn selected_material(&self) -> MaterialId {
        self.selected_material
    }

    /// Selects the material for subsequent `Add`s.
    pub fn select_material(&mut self, material: MaterialId) -> Result<()> {
        validate_material(material)?;
        debug!("Selected material {}", material);
        self.selected_material = material;
        Ok(())
    }

    /// Sets the ray edits are issued along, usually the camera's eye and look direction.
    pub fn set_view_ray(&mut self, origin: Point3<f32>, direction: Vector3<f32>) {
        self.view_ray = (origin, direction);
    }

    /// Mutable access to the overlays. The next `render` rebuilds the mesh.
    pub fn overlays_mut(&mut self) -> &mut Overlays {
        self.built_generation = None;
        &mut self.overlays
    }

    /// Resizes the mesh capacity and forces a rebuild on the next frame.
    pub fn set_mesh_capacity(&mut self, max_voxels: usize) {
        self.mesh_builder.set_capacity(max_voxels);
        self.built_generation = None;
    }

    /// Queues an edit along the current view ray.
    pub fn submit_edit(&mut self, kind: EditKind) {
        let (origin, direction) = self.view_ray;
        let command = match kind {
            EditKind::Add => EditCommand::add(origin, direction, self.selected_material),
            EditKind::Remove => EditCommand::remove(origin, direction),
        };
        self.submit_command(command);
    }

    /// Queues an arbitrary edit command on the edit worker.
    pub fn submit_command(&mut self, command: EditCommand) {
        debug!("Submitting {:?} edit", command.kind);
        self.task_manager.publish_task(Box::new(EditTask::new(
            self.store.clone(),
            command,
            self.pick_settings,
        )));
    }

    /// Applies this frame's input.
    ///
    /// A fresh left click removes, a fresh right click adds, and `Digit0`-`Digit3`
    /// select materials 0-3. Held buttons do not repeat.
    pub fn set_input_commands(&mut self, input: &ProcessedInputState) {
        let actions = PlayerAction::from_input(input);

        if let Some(material) = actions.select_material {
            if let Err(e) = self.select_material(material) {
                warn!("Ignoring material selection: {}", e);
            }
        }
        if actions.remove {
            self.submit_edit(EditKind::Remove);
        }
        if actions.add {
            self.submit_edit(EditKind::Add);
        }
    }

    /// Handles finished edits and feeds queued ones to the worker. Never blocks.
    pub fn process_tasks(&mut self) {
        self.task_manager.process_completed_tasks(&mut self.journal);
        self.task_manager.process_queued_tasks();
    }

    /// Blocks until every submitted edit has been applied and recorded.
    pub fn flush_edits(&mut self) {
        self.task_manager.flush(&mut self.journal);
    }

    /// Whether edits are still queued or running.
    pub fn has_pending_edits(&self) -> bool {
        !self.task_manager.is_idle()
    }

    /// Rebuilds the mesh if the store or the overlays changed since the last build.
    ///
    /// A capacity failure keeps the previous mesh and is retried on the next frame.
    pub fn render(&mut self) -> FrameStatus {
        if self.built_generation == Some(self.store.generation()) {
            return FrameStatus::Unchanged;
        }

        let snapshot = self.store.snapshot();
        match self
            .mesh_builder
            .rebuild_with(&snapshot.voxels, &self.overlays)
        {
            Ok(_) => {
                self.built_generation = Some(snapshot.generation);
                FrameStatus::Rebuilt
            }
            Err(VoxelError::CapacityExceeded { required, capacity }) => {
                warn!(
                    "Presenting previous mesh, {} voxels exceed capacity {}",
                    required, capacity
                );
                FrameStatus::Retained
            }
            Err(e) => {
                warn!("Mesh rebuild failed: {}", e);
                FrameStatus::Retained
            }
        }
    }
}

/// Editor actions derived from one frame of input
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAction {
    /// Place a voxel along the view ray
    pub add: bool,
    /// Remove the voxel hit by the view ray
    pub remove: bool,
    /// Newly selected material, if a selection key was pressed
    pub select_material: Option<MaterialId>,
}

impl PlayerAction {
    /// Translates the processed input state into actions. Only fresh presses count.
    pub fn from_input(input: &ProcessedInputState) -> Self {
        let select_material = MATERIAL_KEYS
            .iter()
            .position(|key| input.get_key_state(*key).is_just_pressed())
            .map(|index| index as MaterialId);

        PlayerAction {
            add: input
                .get_mouse_button_state(MouseButton::Right)
                .is_just_pressed(),
            remove: input
                .get_mouse_button_state(MouseButton::Left)
                .is_just_pressed(),
            select_material,
        }
    }
}
