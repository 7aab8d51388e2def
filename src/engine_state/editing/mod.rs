//! # Editing Module
//!
//! Turns a view ray and an edit intent into a store mutation.
//!
//! An `Add` places a voxel in the empty cell the ray crossed right before its first hit.
//! A `Remove` deletes the hit voxel. Both are no-ops when the pick gives them no target,
//! which keeps repeated commands idempotent.

use std::collections::VecDeque;

use cgmath::{Point3, Vector3};
use log::{debug, info};

use crate::{
    core::{Result, VoxelError},
    engine_state::{
        picking::PickSettings,
        voxels::{
            block::{Coordinate, MaterialId},
            world::VoxelStore,
        },
    },
};

pub mod edit_task;

pub use edit_task::{EditTask, EditTaskResult};

/// What an edit command does to the picked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Place a voxel in front of the hit
    Add,
    /// Delete the hit voxel
    Remove,
}

/// A single user edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditCommand {
    /// Add or remove
    pub kind: EditKind,
    /// Ray origin, usually the camera position
    pub origin: Point3<f32>,
    /// Ray direction, any non-zero length
    pub direction: Vector3<f32>,
    /// Material placed by `Add`; ignored by `Remove`
    pub material: MaterialId,
}

impl EditCommand {
    /// An `Add` of `material` along the ray.
    pub fn add(origin: Point3<f32>, direction: Vector3<f32>, material: MaterialId) -> Self {
        EditCommand {
            kind: EditKind::Add,
            origin,
            direction,
            material,
        }
    }

    /// A `Remove` along the ray.
    pub fn remove(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        EditCommand {
            kind: EditKind::Remove,
            origin,
            direction,
            material: 0,
        }
    }
}

/// What an applied edit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// A voxel was placed at the coordinate
    Added(Coordinate),
    /// The voxel at the coordinate was deleted
    Removed(Coordinate),
    /// The ray gave the command nothing to act on
    NoTarget,
    /// The command was malformed; carries the error message
    Rejected(String),
}

/// Picks along the command's ray and applies the edit to `store`.
///
/// The pick runs under one read lock. The lock is released before the mutation, which
/// is safe because the edit actor is the store's only writer.
///
/// # Returns
/// The outcome, or `InvalidArgument` for a degenerate ray or an invalid material
pub fn apply_edit(
    store: &VoxelStore,
    command: &EditCommand,
    settings: &PickSettings,
) -> Result<EditOutcome> {
    let pick = {
        let map = store.read();
        settings.pick(&*map, command.origin, command.direction)?
    };

    match command.kind {
        EditKind::Add => match pick.empty_cell_before_hit {
            Some(cell) => {
                store.insert(cell, command.material)?;
                info!(
                    "Added material {} at ({}, {}, {})",
                    command.material, cell.x, cell.y, cell.z
                );
                Ok(EditOutcome::Added(cell))
            }
            None => {
                debug!("Add has no empty cell before a hit, ignoring");
                Ok(EditOutcome::NoTarget)
            }
        },
        EditKind::Remove => match pick.hit_cell {
            Some(cell) => match store.remove_existing(cell) {
                Ok(_) => {
                    info!("Removed voxel at ({}, {}, {})", cell.x, cell.y, cell.z);
                    Ok(EditOutcome::Removed(cell))
                }
                Err(VoxelError::NotFound(cell)) => {
                    debug!("Remove target ({}, {}, {}) already empty", cell.x, cell.y, cell.z);
                    Ok(EditOutcome::NoTarget)
                }
                Err(e) => Err(e),
            },
            None => {
                debug!("Remove ray hit nothing, ignoring");
                Ok(EditOutcome::NoTarget)
            }
        },
    }
}

/// Number of recent outcomes an `EditJournal` keeps.
pub const JOURNAL_DEPTH: usize = 64;

/// Running tally of applied edits, kept on the thread that owns the edit actor.
#[derive(Debug, Default, Clone)]
pub struct EditJournal {
    added: u64,
    removed: u64,
    no_target: u64,
    rejected: u64,
    recent: VecDeque<EditOutcome>,
}

impl EditJournal {
    /// Records one outcome.
    pub fn record(&mut self, outcome: EditOutcome) {
        match &outcome {
            EditOutcome::Added(_) => self.added += 1,
            EditOutcome::Removed(_) => self.removed += 1,
            EditOutcome::NoTarget => self.no_target += 1,
            EditOutcome::Rejected(_) => self.rejected += 1,
        }
        if self.recent.len() == JOURNAL_DEPTH {
            self.recent.pop_front();
        }
        self.recent.push_back(outcome);
    }

    /// Voxels placed so far.
    pub fn added(&self) -> u64 {
        self.added
    }

    /// Voxels deleted so far.
    pub fn removed(&self) -> u64 {
        self.removed
    }

    /// Commands that had nothing to act on.
    pub fn no_target(&self) -> u64 {
        self.no_target
    }

    /// Commands refused as malformed.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Every command recorded.
    pub fn total(&self) -> u64 {
        self.added + self.removed + self.no_target + self.rejected
    }

    /// The most recent outcome.
    pub fn last(&self) -> Option<&EditOutcome> {
        self.recent.back()
    }

    /// Up to `JOURNAL_DEPTH` outcomes, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &EditOutcome> {
        self.recent.iter()
    }
}
