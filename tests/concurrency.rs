use std::thread;

use cgmath::{Point3, Vector3};
use voxel_editor::engine_state::{
    editing::{EditCommand, EditJournal, EditTask},
    picking::PickSettings,
    rendering::MeshBuilder,
    task_management::TaskManager,
    voxels::{
        block::{block_side::BlockSide, Voxel},
        layer::generate_block_layer,
        world::VoxelStore,
    },
};

/// Every snapshot must satisfy face visibility on its own.
fn assert_snapshot_consistent(voxels: &[Voxel]) {
    let cells: std::collections::HashSet<_> = voxels.iter().map(|v| v.coordinate).collect();
    for voxel in voxels {
        for side in BlockSide::all() {
            let occupied = cells.contains(&voxel.neighbor(side));
            assert_eq!(
                voxel.is_face_visible(side),
                !occupied,
                "{:?} face {:?} disagrees with its neighbor",
                voxel.coordinate,
                side
            );
        }
    }
}

#[test]
fn snapshots_never_observe_half_applied_edits() {
    let store = VoxelStore::new();
    store
        .seed(&generate_block_layer(Point3::new(0, 0, 0), 9, 0).unwrap())
        .unwrap();

    let writer_store = store.clone();
    let writer = thread::spawn(move || {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..2_000 {
            let cell = Point3::new(rng.i32(-4..=4), rng.i32(1..4), rng.i32(-4..=4));
            if rng.bool() {
                writer_store.insert(cell, rng.i32(0..4)).unwrap();
            } else {
                writer_store.remove(cell);
            }
        }
    });

    let mut builder = MeshBuilder::new(1024);
    let mut last_generation = 0;
    while !writer.is_finished() {
        let snapshot = store.snapshot();
        assert!(snapshot.generation >= last_generation);
        last_generation = snapshot.generation;

        assert_snapshot_consistent(&snapshot.voxels);
        let mesh = builder.rebuild(&snapshot.voxels).unwrap();
        let expected: usize = snapshot.voxels.iter().map(|v| v.visible_face_count()).sum();
        assert_eq!(mesh.quad_count(), expected);
    }
    writer.join().unwrap();
    assert_snapshot_consistent(&store.snapshot_values());
}

#[test]
fn edit_worker_and_render_loop_share_the_store() {
    let store = VoxelStore::new();
    store
        .seed(&generate_block_layer(Point3::new(0, -2, 0), 5, 0).unwrap())
        .unwrap();

    let mut manager = TaskManager::new(1);
    let mut journal = EditJournal::default();
    let settings = PickSettings::default();
    let down = Vector3::new(0.0, -1.0, 0.0);

    // build a column of ten voxels on the centre of the floor
    for _ in 0..10 {
        let command = EditCommand::add(Point3::new(0.5, 50.0, 0.5), down, 1);
        manager.publish_task(Box::new(EditTask::new(store.clone(), command, settings)));
    }

    let mut builder = MeshBuilder::new(64);
    while !manager.is_idle() {
        manager.process_completed_tasks(&mut journal);
        manager.process_queued_tasks();
        let snapshot = store.snapshot_values();
        assert_snapshot_consistent(&snapshot);
        builder.rebuild(&snapshot).unwrap();
        thread::yield_now();
    }

    assert_eq!(journal.added(), 10);
    assert_eq!(store.len(), 35);
    for y in -1..9 {
        assert_eq!(store.get(Point3::new(0, y, 0)).unwrap().material, 1);
    }
    let mesh = builder.rebuild(&store.snapshot_values()).unwrap();
    // floor 25*2 + 20 rim - 1 covered top, column 10*4 sides + 1 cap
    assert_eq!(mesh.quad_count(), 50 + 20 - 1 + 40 + 1);
}
