//! # World Module
//!
//! This module provides the `VoxelStore`, the single source of truth for the scene's
//! voxels, and the `VoxelMap` it guards.
//!
//! ## Face visibility
//!
//! Every stored voxel keeps one visibility flag per face. A face is hidden exactly when
//! a solid voxel sits directly across it, and the two touching faces of a pair of
//! neighbors always change together. Inserts and removes only ever touch the six
//! axis-neighbors of the edited cell, so every mutation costs six lookups.
//!
//! ## Empty cells
//!
//! Empty is represented by absence from the map. The air marker can never be inserted,
//! so "present" and "solid" are the same question.
//!
//! ## Thread Safety
//!
//! The map lives in an `MtResource`. Each insert or remove, including its neighbor
//! updates, runs under one write lock, and snapshots are copied under one read lock,
//! so a reader never observes a torn voxel or half of a face pair.

use std::collections::HashMap;
use std::sync::RwLockReadGuard;

use log::debug;

use crate::core::{MtResource, Result, VoxelError};
use crate::engine_state::voxels::block::{
    block_side::BlockSide, neighbor, Coordinate, MaterialId, Voxel,
};

/// Read access to cell occupancy. The picker samples the grid through this trait.
pub trait OccupancyGrid {
    /// Whether a solid voxel exists at `coordinate`.
    fn is_occupied(&self, coordinate: Coordinate) -> bool;
}

/// The unsynchronized voxel map and its mutation logic.
///
/// `VoxelStore` wraps this in a lock; the map itself is also usable directly where a
/// single owner is enough.
#[derive(Debug, Default, Clone)]
pub struct VoxelMap {
    voxels: HashMap<Coordinate, Voxel>,
    generation: u64,
}

impl VoxelMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a solid voxel and updates visibility on it and its six neighbors.
    ///
    /// The new voxel starts with all faces visible. For each side, if a neighbor is
    /// present, both the new face and the neighbor's opposing face are hidden. Absent
    /// neighbors are never written. Inserting over an existing voxel replaces its
    /// material and recomputes its faces.
    ///
    /// # Errors
    /// `InvalidArgument` if `material` is the air marker or outside the atlas range.
    pub fn insert(&mut self, coordinate: Coordinate, material: MaterialId) -> Result<()> {
        self.insert_voxel(Voxel::new(coordinate, material))
    }

    /// Inserts `voxel` with its materials, including any per-face overrides.
    ///
    /// Its visibility flags are recomputed the same way as in [`VoxelMap::insert`].
    ///
    /// # Errors
    /// `InvalidArgument` if the material or any per-face material is not a solid
    /// atlas cell.
    pub fn insert_voxel(&mut self, mut voxel: Voxel) -> Result<()> {
        voxel.validate_materials()?;

        let coordinate = voxel.coordinate;
        for side in BlockSide::all() {
            match self.voxels.get_mut(&neighbor(coordinate, side)) {
                Some(adjacent) => {
                    adjacent.set_face_visible(side.opposite(), false);
                    voxel.set_face_visible(side, false);
                }
                None => voxel.set_face_visible(side, true),
            }
        }

        self.voxels.insert(coordinate, voxel);
        self.generation += 1;
        debug!(
            "Inserted voxel at {:?} with material {} ({} faces visible)",
            coordinate,
            voxel.material,
            voxel.visible_face_count()
        );
        Ok(())
    }

    /// Removes the voxel at `coordinate` and re-exposes its neighbors' facing sides.
    ///
    /// # Returns
    /// The removed voxel, or `None` when the cell was already empty (a no-op).
    pub fn remove(&mut self, coordinate: Coordinate) -> Option<Voxel> {
        let removed = self.voxels.remove(&coordinate)?;

        for side in BlockSide::all() {
            if let Some(adjacent) = self.voxels.get_mut(&neighbor(coordinate, side)) {
                adjacent.set_face_visible(side.opposite(), true);
            }
        }

        self.generation += 1;
        debug!("Removed voxel at {:?}", coordinate);
        Some(removed)
    }

    /// Like `remove`, but reports an empty cell as `NotFound`.
    pub fn remove_existing(&mut self, coordinate: Coordinate) -> Result<Voxel> {
        self.remove(coordinate)
            .ok_or(VoxelError::NotFound(coordinate))
    }

    /// Returns a copy of the voxel at `coordinate`, if any.
    pub fn get(&self, coordinate: Coordinate) -> Option<Voxel> {
        self.voxels.get(&coordinate).copied()
    }

    /// Number of stored voxels.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether the map holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Counter bumped by every insert and every effective remove.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Iterates the stored voxels in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.values()
    }
}

impl OccupancyGrid for VoxelMap {
    fn is_occupied(&self, coordinate: Coordinate) -> bool {
        self.voxels.contains_key(&coordinate)
    }
}

/// A point-in-time copy of the store's contents.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Store generation the copy was taken at
    pub generation: u64,
    /// The voxels, in no particular order
    pub voxels: Vec<Voxel>,
}

/// The scene's shared voxel store.
///
/// Cloning a `VoxelStore` yields another handle to the same voxels. The edit actor
/// mutates through one handle while the render actor snapshots through another.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_editor::engine_state::voxels::world::VoxelStore;
///
/// let store = VoxelStore::new();
/// store.insert(Point3::new(0, 0, 0), 1).unwrap();
/// store.insert(Point3::new(0, 1, 0), 1).unwrap();
///
/// let below = store.get(Point3::new(0, 0, 0)).unwrap();
/// assert_eq!(below.visible_face_count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct VoxelStore {
    map: MtResource<VoxelMap>,
}

impl Default for VoxelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        VoxelStore {
            map: MtResource::new(VoxelMap::new()),
        }
    }

    /// Inserts every voxel through the normal insert path.
    ///
    /// Coordinates and materials are kept; visibility is recomputed. Stops at the first
    /// invalid voxel.
    pub fn seed(&self, voxels: &[Voxel]) -> Result<()> {
        let mut map = self.map.get_mut();
        for voxel in voxels {
            map.insert_voxel(*voxel)?;
        }
        debug!("Seeded store with {} voxels", voxels.len());
        Ok(())
    }

    /// See [`VoxelMap::insert`].
    pub fn insert(&self, coordinate: Coordinate, material: MaterialId) -> Result<()> {
        self.map.get_mut().insert(coordinate, material)
    }

    /// See [`VoxelMap::insert_voxel`].
    pub fn insert_voxel(&self, voxel: Voxel) -> Result<()> {
        self.map.get_mut().insert_voxel(voxel)
    }

    /// See [`VoxelMap::remove`].
    pub fn remove(&self, coordinate: Coordinate) -> Option<Voxel> {
        self.map.get_mut().remove(coordinate)
    }

    /// See [`VoxelMap::remove_existing`].
    pub fn remove_existing(&self, coordinate: Coordinate) -> Result<Voxel> {
        self.map.get_mut().remove_existing(coordinate)
    }

    /// Returns a copy of the voxel at `coordinate`, if any.
    pub fn get(&self, coordinate: Coordinate) -> Option<Voxel> {
        self.map.get().get(coordinate)
    }

    /// Number of stored voxels.
    pub fn len(&self) -> usize {
        self.map.get().len()
    }

    /// Whether the store holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.map.get().is_empty()
    }

    /// Current mutation generation.
    pub fn generation(&self) -> u64 {
        self.map.get().generation()
    }

    /// Copies every voxel out under a single read lock.
    pub fn snapshot_values(&self) -> Vec<Voxel> {
        self.map.get().values().copied().collect()
    }

    /// Copies every voxel out together with the generation they belong to.
    pub fn snapshot(&self) -> Snapshot {
        let map = self.map.get();
        Snapshot {
            generation: map.generation(),
            voxels: map.values().copied().collect(),
        }
    }

    /// Holds the read lock for a batch of queries, such as a whole pick.
    ///
    /// Writers block until the guard is dropped, so keep it short.
    pub fn read(&self) -> RwLockReadGuard<'_, VoxelMap> {
        self.map.get()
    }
}

impl OccupancyGrid for VoxelStore {
    fn is_occupied(&self, coordinate: Coordinate) -> bool {
        self.map.get().is_occupied(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    /// Checks both invariants over the whole map: a face is hidden exactly when a
    /// neighbor sits across it, which also makes facing pairs agree.
    fn assert_visibility_invariants(map: &VoxelMap) {
        for voxel in map.values() {
            for side in BlockSide::all() {
                let occupied = map.is_occupied(voxel.neighbor(side));
                assert_eq!(
                    voxel.is_face_visible(side),
                    !occupied,
                    "face {:?} of {:?} disagrees with its neighbor",
                    side,
                    voxel.coordinate
                );
                if let Some(adjacent) = map.get(voxel.neighbor(side)) {
                    assert!(!adjacent.is_face_visible(side.opposite()));
                }
            }
        }
    }

    #[test]
    fn insert_hides_both_faces_of_a_pair() {
        let mut map = VoxelMap::new();
        map.insert(Point3::new(0, 0, 0), 0).unwrap();
        map.insert(Point3::new(1, 0, 0), 0).unwrap();

        let left = map.get(Point3::new(0, 0, 0)).unwrap();
        let right = map.get(Point3::new(1, 0, 0)).unwrap();
        assert!(!left.is_face_visible(BlockSide::RIGHT));
        assert!(!right.is_face_visible(BlockSide::LEFT));
        assert_eq!(left.visible_face_count(), 5);
        assert_eq!(right.visible_face_count(), 5);
    }

    #[test]
    fn remove_reexposes_neighbors() {
        let mut map = VoxelMap::new();
        map.insert(Point3::new(0, 0, 0), 0).unwrap();
        map.insert(Point3::new(0, 1, 0), 0).unwrap();
        map.remove(Point3::new(0, 1, 0));

        let remaining = map.get(Point3::new(0, 0, 0)).unwrap();
        assert!(remaining.is_face_visible(BlockSide::TOP));
        assert_eq!(remaining.visible_face_count(), 6);
    }

    #[test]
    fn air_insert_is_rejected_without_side_effects() {
        let mut map = VoxelMap::new();
        map.insert(Point3::new(0, 0, 0), 3).unwrap();
        let before = map.generation();

        let result = map.insert(Point3::new(1, 0, 0), crate::engine_state::voxels::block::AIR);
        assert!(matches!(result, Err(VoxelError::InvalidArgument(_))));
        assert_eq!(map.len(), 1);
        assert_eq!(map.generation(), before);
        assert!(map.get(Point3::new(0, 0, 0)).unwrap().is_face_visible(BlockSide::RIGHT));
    }

    #[test]
    fn removing_absent_cell_twice_matches_once() {
        let mut map = VoxelMap::new();
        map.insert(Point3::new(0, 0, 0), 1).unwrap();

        let mut once = map.clone();
        assert!(once.remove(Point3::new(5, 5, 5)).is_none());

        let mut twice = map.clone();
        twice.remove(Point3::new(5, 5, 5));
        twice.remove(Point3::new(5, 5, 5));

        assert_eq!(once.get(Point3::new(0, 0, 0)), twice.get(Point3::new(0, 0, 0)));
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.generation(), twice.generation());
    }

    #[test]
    fn remove_existing_reports_not_found() {
        let mut map = VoxelMap::new();
        let result = map.remove_existing(Point3::new(2, 0, 0));
        assert!(matches!(result, Err(VoxelError::NotFound(c)) if c == Point3::new(2, 0, 0)));
    }

    #[test]
    fn insert_then_remove_restores_neighbor_flags() {
        let mut map = VoxelMap::new();
        for (x, y, z) in [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, 0, -1), (1, 1, 0), (0, 1, -1)] {
            map.insert(Point3::new(x, y, z), 2).unwrap();
        }
        let before: Vec<Voxel> = {
            let mut values: Vec<Voxel> = map.values().copied().collect();
            values.sort_by_key(|v| (v.coordinate.x, v.coordinate.y, v.coordinate.z));
            values
        };

        map.insert(Point3::new(0, 0, 0), 2).unwrap();
        map.remove(Point3::new(0, 0, 0));

        let mut after: Vec<Voxel> = map.values().copied().collect();
        after.sort_by_key(|v| (v.coordinate.x, v.coordinate.y, v.coordinate.z));
        assert_eq!(before, after);
    }

    #[test]
    fn random_edit_sequences_keep_invariants() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut map = VoxelMap::new();

        for _ in 0..2_000 {
            let coordinate = Point3::new(rng.i32(-3..=3), rng.i32(-3..=3), rng.i32(-3..=3));
            if rng.bool() {
                map.insert(coordinate, rng.i32(0..16)).unwrap();
            } else {
                map.remove(coordinate);
            }
            assert_visibility_invariants(&map);
        }
    }

    #[test]
    fn seeding_keeps_side_materials() {
        let store = VoxelStore::new();
        let grass = Voxel::new(Point3::new(0, 0, 0), 2).with_side_materials([2, 2, 0, 1, 2, 2]);
        store
            .seed(&[grass, Voxel::new(Point3::new(0, 1, 0), 2)])
            .unwrap();

        let stored = store.get(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(stored.side_materials, grass.side_materials);
        assert!(!stored.is_face_visible(BlockSide::TOP));
        assert!(store
            .insert_voxel(Voxel::new(Point3::new(5, 0, 0), 2).with_side_materials([2, 2, 2, 2, 2, 256]))
            .is_err());
        assert!(store.get(Point3::new(5, 0, 0)).is_none());
    }

    #[test]
    fn store_handles_share_voxels() {
        let store = VoxelStore::new();
        let other = store.clone();
        other.insert(Point3::new(0, 0, 0), 0).unwrap();

        assert!(store.is_occupied(Point3::new(0, 0, 0)));
        assert_eq!(store.snapshot_values().len(), 1);
        assert_eq!(store.snapshot().generation, 1);
    }
}
