//! Fixed-step ray marching.

use cgmath::{Point3, Vector3};

use super::{validate_max_distance, validate_ray, validate_step_count, PickResult};
use crate::core::Result;
use crate::engine_state::voxels::{block::containing_cell, world::OccupancyGrid};

/// Samples the ray `step_count` times, `max_distance / step_count` apart, and stops at
/// the first sample that lands in an occupied cell.
///
/// The origin itself is not sampled: the first sample is one step along the ray.
/// Steps that are long compared to a cell can skip thin geometry or report an add
/// target that only touches the hit cell along an edge; `pick_dda` has neither issue.
///
/// # Errors
/// `InvalidArgument` for a zero-length or non-finite direction, a non-positive
/// `max_distance` or a zero `step_count`.
pub fn pick<G: OccupancyGrid + ?Sized>(
    grid: &G,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
    step_count: u32,
) -> Result<PickResult> {
    let direction = validate_ray(origin, direction)?;
    validate_max_distance(max_distance)?;
    validate_step_count(step_count)?;

    let delta = direction * (max_distance / step_count as f32);
    let start = containing_cell(origin);

    let mut cursor = origin;
    let mut previous = None;
    for _ in 0..step_count {
        cursor += delta;
        let cell = containing_cell(cursor);
        if grid.is_occupied(cell) {
            return Ok(PickResult::hit(cell, previous, start, cursor));
        }
        previous = Some(cell);
    }

    Ok(PickResult::miss())
}

#[cfg(test)]
mod tests {
    use super::super::test_grid::CellSet;
    use super::*;

    #[test]
    fn stops_on_first_occupied_cell() {
        let grid = CellSet::new(&[Point3::new(0, -2, 0), Point3::new(0, -5, 0)]);
        let result = pick(
            &grid,
            Point3::new(0.5, 10.0, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            100.0,
            100_000,
        )
        .unwrap();

        assert_eq!(result.hit_cell, Some(Point3::new(0, -2, 0)));
        assert_eq!(result.empty_cell_before_hit, Some(Point3::new(0, -1, 0)));
        let hit_point = result.hit_point.unwrap();
        assert!(hit_point.y < -1.0 && hit_point.y > -1.01);
    }

    #[test]
    fn miss_leaves_every_field_empty() {
        let grid = CellSet::new(&[Point3::new(0, -2, 0)]);
        let result = pick(
            &grid,
            Point3::new(0.5, 10.0, 0.5),
            Vector3::new(0.0, 1.0, 0.0),
            50.0,
            5_000,
        )
        .unwrap();
        assert_eq!(result, PickResult::miss());
    }

    #[test]
    fn target_out_of_reach_is_a_miss() {
        let grid = CellSet::new(&[Point3::new(0, -20, 0)]);
        let result = pick(
            &grid,
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            5.0,
            500,
        )
        .unwrap();
        assert!(!result.is_hit());
    }

    #[test]
    fn negative_coordinates_floor_correctly() {
        let grid = CellSet::new(&[Point3::new(-1, 0, -1)]);
        let result = pick(
            &grid,
            Point3::new(-0.5, 5.5, -0.5),
            Vector3::new(0.0, -1.0, 0.0),
            20.0,
            20_000,
        )
        .unwrap();
        assert_eq!(result.hit_cell, Some(Point3::new(-1, 0, -1)));
        assert_eq!(result.empty_cell_before_hit, Some(Point3::new(-1, 1, -1)));
    }

    #[test]
    fn ray_from_adjacent_cell_has_no_add_target() {
        let grid = CellSet::new(&[Point3::new(0, 0, 0)]);
        let result = pick(
            &grid,
            Point3::new(0.5, 1.5, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            10.0,
            10_000,
        )
        .unwrap();
        assert_eq!(result.hit_cell, Some(Point3::new(0, 0, 0)));
        assert_eq!(result.empty_cell_before_hit, None);
    }

    #[test]
    fn repeated_picks_are_identical() {
        let grid = CellSet::new(&[Point3::new(4, 1, 2), Point3::new(6, 2, 3)]);
        let origin = Point3::new(0.25, 0.75, 0.1);
        let direction = Vector3::new(1.0, 0.3, 0.45);
        let first = pick(&grid, origin, direction, 30.0, 30_000).unwrap();
        for _ in 0..5 {
            assert_eq!(pick(&grid, origin, direction, 30.0, 30_000).unwrap(), first);
        }
    }
}
