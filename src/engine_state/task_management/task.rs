//! # Task System Core Traits
//!
//! This module defines the building blocks of the edit actor: a unit of work that runs
//! on the worker thread, and the result it sends back to the thread that owns the
//! `TaskManager`.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the owning thread
//! 5. The result is recorded in the edit journal and may spawn follow-up tasks

use crate::engine_state::editing::EditJournal;

/// A unit of work executed on a worker thread.
///
/// Tasks own everything they need. Shared state such as the voxel store is reached
/// through cloned handles that synchronize internally.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Runs on the worker thread. Errors are reported through the result rather than
    /// by panicking, so one bad command never takes the worker down.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The outcome of a processed `Task`, handled on the thread that owns the manager.
pub trait TaskResult: Send {
    /// Records the outcome.
    ///
    /// # Arguments
    /// * `journal` - Running log of applied edits
    ///
    /// # Returns
    /// Follow-up tasks to schedule (usually none)
    fn handle_result(self: Box<Self>, journal: &mut EditJournal) -> Vec<Box<dyn Task + Send>>;
}
