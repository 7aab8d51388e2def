use cgmath::{Point3, Vector3};
use voxel_editor::core::VoxelError;
use voxel_editor::engine_state::{
    editing::{apply_edit, EditCommand, EditOutcome},
    picking::{PickMethod, PickSettings},
    rendering::MeshBuilder,
    voxels::{block::block_side::BlockSide, layer::generate_block_layer, world::VoxelStore},
};

fn seeded_floor() -> VoxelStore {
    let store = VoxelStore::new();
    let layer = generate_block_layer(Point3::new(0, -2, 0), 5, 0).unwrap();
    store.seed(&layer).unwrap();
    store
}

fn quads_on_plane(builder: &MeshBuilder, axis: usize, value: f32, normal: [f32; 3]) -> usize {
    builder
        .current()
        .vertices
        .chunks(4)
        .filter(|quad| quad[0].normal == normal && quad.iter().all(|v| v.position[axis] == value))
        .count()
}

#[test]
fn pick_add_then_rebuild_hides_shared_faces() {
    for method in [PickMethod::Dda, PickMethod::Marching] {
        let store = seeded_floor();
        assert_eq!(store.len(), 25);

        let settings = PickSettings {
            method,
            ..PickSettings::default()
        };
        let origin = Point3::new(0.0, 10.0, 0.0);
        let down = Vector3::new(0.0, -1.0, 0.0);

        let pick = settings.pick(&store, origin, down).unwrap();
        assert_eq!(pick.hit_cell, Some(Point3::new(0, -2, 0)), "{:?}", method);
        assert_eq!(pick.empty_cell_before_hit, Some(Point3::new(0, -1, 0)));

        let outcome = apply_edit(&store, &EditCommand::add(origin, down, 0), &settings).unwrap();
        assert_eq!(outcome, EditOutcome::Added(Point3::new(0, -1, 0)));

        let floor = store.get(Point3::new(0, -2, 0)).unwrap();
        let added = store.get(Point3::new(0, -1, 0)).unwrap();
        assert!(!floor.is_face_visible(BlockSide::TOP));
        assert!(!added.is_face_visible(BlockSide::BOTTOM));
        assert_eq!(added.visible_face_count(), 5);

        let mut builder = MeshBuilder::new(64);
        let mesh = builder.rebuild(&store.snapshot_values()).unwrap();
        // 25 tops - 1 hidden + 25 bottoms + 20 rim sides + 5 for the new voxel
        assert_eq!(mesh.quad_count(), 24 + 25 + 20 + 5);

        // no quad sits on the shared plane y = -1 facing either way
        assert_eq!(quads_on_plane(&builder, 1, -1.0, [0.0, 1.0, 0.0]), 24);
        assert_eq!(quads_on_plane(&builder, 1, -1.0, [0.0, -1.0, 0.0]), 0);
    }
}

#[test]
fn removing_twice_is_a_single_removal() {
    let store = seeded_floor();
    let settings = PickSettings::default();
    let origin = Point3::new(2.5, 10.0, 2.5);
    let down = Vector3::new(0.0, -1.0, 0.0);
    let before = store.get(Point3::new(1, -2, 2)).unwrap();

    let first = apply_edit(&store, &EditCommand::remove(origin, down), &settings).unwrap();
    assert_eq!(first, EditOutcome::Removed(Point3::new(2, -2, 2)));
    let generation = store.generation();

    assert!(store.remove(Point3::new(2, -2, 2)).is_none());
    assert!(matches!(
        store.remove_existing(Point3::new(2, -2, 2)),
        Err(VoxelError::NotFound(_))
    ));
    assert_eq!(store.generation(), generation);
    assert_eq!(store.len(), 24);

    let neighbor = store.get(Point3::new(1, -2, 2)).unwrap();
    assert!(!before.is_face_visible(BlockSide::RIGHT));
    assert!(neighbor.is_face_visible(BlockSide::RIGHT));
}

#[test]
fn capacity_error_keeps_last_frame() {
    let store = seeded_floor();
    let mut builder = MeshBuilder::new(25);
    let first = builder.rebuild(&store.snapshot_values()).unwrap().clone();

    store.insert(Point3::new(0, 5, 0), 1).unwrap();
    let err = builder.rebuild(&store.snapshot_values()).unwrap_err();
    assert!(matches!(
        err,
        VoxelError::CapacityExceeded {
            required: 26,
            capacity: 25
        }
    ));
    assert_eq!(builder.current(), &first);

    builder.set_capacity(26);
    assert_eq!(
        builder.rebuild(&store.snapshot_values()).unwrap().quad_count(),
        first.quad_count() + 6
    );
}
