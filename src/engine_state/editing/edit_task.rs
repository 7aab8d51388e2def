//! # Edit Task
//!
//! Runs one `EditCommand` on the edit actor's worker thread.

use log::warn;

use super::{apply_edit, EditCommand, EditJournal, EditOutcome};
use crate::engine_state::{
    picking::PickSettings,
    task_management::task::{Task, TaskResult},
    voxels::world::VoxelStore,
};

/// A task that picks along a ray and mutates the store.
pub struct EditTask {
    /// Handle to the shared store
    store: VoxelStore,
    /// The edit to apply
    command: EditCommand,
    /// Traversal parameters
    settings: PickSettings,
}

impl EditTask {
    /// Creates a new edit task.
    ///
    /// # Arguments
    /// * `store` - Handle to the scene's voxel store
    /// * `command` - The edit to apply
    /// * `settings` - Pick traversal parameters
    pub fn new(store: VoxelStore, command: EditCommand, settings: PickSettings) -> Self {
        EditTask {
            store,
            command,
            settings,
        }
    }
}

impl Task for EditTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let outcome = match apply_edit(&self.store, &self.command, &self.settings) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Edit {:?} rejected: {}", self.command.kind, e);
                EditOutcome::Rejected(e.to_string())
            }
        };

        Box::new(EditTaskResult {
            command: self.command,
            outcome,
        })
    }
}

/// The outcome of an `EditTask`.
#[derive(Debug)]
pub struct EditTaskResult {
    /// The command that was applied
    pub command: EditCommand,
    /// What it did
    pub outcome: EditOutcome,
}

impl TaskResult for EditTaskResult {
    fn handle_result(self: Box<Self>, journal: &mut EditJournal) -> Vec<Box<dyn Task + Send>> {
        log::trace!("{:?} -> {:?}", self.command.kind, self.outcome);
        journal.record(self.outcome);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::task_management::TaskManager;
    use cgmath::{Point3, Vector3};

    #[test]
    fn edits_run_on_worker_and_land_in_journal() {
        let store = VoxelStore::new();
        store.insert(Point3::new(0, 0, 0), 0).unwrap();

        let mut manager = TaskManager::new(1);
        let mut journal = EditJournal::default();
        let down = Vector3::new(0.0, -1.0, 0.0);
        let settings = PickSettings::default();

        for _ in 0..3 {
            let command = EditCommand::add(Point3::new(0.5, 20.0, 0.5), down, 1);
            manager.publish_task(Box::new(EditTask::new(store.clone(), command, settings)));
        }
        let bad = EditCommand::add(Point3::new(0.5, 20.0, 0.5), down, -1);
        manager.publish_task(Box::new(EditTask::new(store.clone(), bad, settings)));
        manager.flush(&mut journal);

        // three stacked adds, applied in order
        assert_eq!(journal.added(), 3);
        assert_eq!(journal.rejected(), 1);
        for y in 0..4 {
            assert!(store.get(Point3::new(0, y, 0)).is_some());
        }
        assert_eq!(store.len(), 4);
    }
}
