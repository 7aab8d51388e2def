//! Amanatides & Woo grid traversal.

use cgmath::{Point3, Vector3};

use super::{validate_max_distance, validate_ray, PickResult};
use crate::core::Result;
use crate::engine_state::voxels::{block::containing_cell, world::OccupancyGrid};

/// Per-axis traversal state.
struct Axis {
    step: i32,
    t_max: f32,
    t_delta: f32,
}

impl Axis {
    fn new(origin: f32, direction: f32) -> Self {
        if direction == 0.0 {
            return Axis {
                step: 0,
                t_max: f32::INFINITY,
                t_delta: f32::INFINITY,
            };
        }
        let fraction = origin - origin.floor();
        let (step, to_boundary) = if direction > 0.0 {
            (1, 1.0 - fraction)
        } else {
            (-1, fraction)
        };
        Axis {
            step,
            t_max: to_boundary / direction.abs(),
            t_delta: 1.0 / direction.abs(),
        }
    }
}

/// Walks every cell the ray passes through, in order, until an occupied one is found
/// or the ray has travelled `max_distance`.
///
/// If the origin cell is itself occupied it is reported as the hit, with no add target.
/// The hit point is where the ray enters the hit cell.
///
/// # Errors
/// `InvalidArgument` for a zero-length or non-finite direction, or a `max_distance`
/// that is not in `(0, MAX_PICK_DISTANCE]`.
pub fn pick_dda<G: OccupancyGrid + ?Sized>(
    grid: &G,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Result<PickResult> {
    let direction = validate_ray(origin, direction)?;
    validate_max_distance(max_distance)?;

    let start = containing_cell(origin);
    if grid.is_occupied(start) {
        return Ok(PickResult::hit(start, None, start, origin));
    }

    let mut axes = [
        Axis::new(origin.x, direction.x),
        Axis::new(origin.y, direction.y),
        Axis::new(origin.z, direction.z),
    ];
    let mut cell = start;

    // A ray of length d crosses at most d + 1 boundaries per axis.
    let max_steps = (max_distance.ceil() as usize).saturating_add(1).saturating_mul(3);
    for _ in 0..max_steps {
        let previous = cell;

        let axis = if axes[0].t_max <= axes[1].t_max && axes[0].t_max <= axes[2].t_max {
            0
        } else if axes[1].t_max <= axes[2].t_max {
            1
        } else {
            2
        };

        let t = axes[axis].t_max;
        if t > max_distance {
            break;
        }
        axes[axis].t_max += axes[axis].t_delta;
        cell[axis] = match cell[axis].checked_add(axes[axis].step) {
            Some(next) => next,
            None => break,
        };

        if grid.is_occupied(cell) {
            return Ok(PickResult::hit(
                cell,
                Some(previous),
                start,
                origin + direction * t,
            ));
        }
    }

    Ok(PickResult::miss())
}
