//! Pre-offset input coarsening.
//!
//! Vertices forming shallow concavities relative to the offset side add
//! cost and noding hazards but cannot affect the result, since the buffer
//! curve passes at the full buffer distance. They are removed before
//! offsetting, with a tolerance proportional to the buffer distance.

use crate::geometry::Coordinate;
use crate::math::distance_2d::point_to_segment;
use crate::math::orientation::{orientation_index, CLOCKWISE, COUNTERCLOCKWISE};

/// Sample stride bound for the concavity depth check.
const NUM_PTS_TO_CHECK: usize = 10;

/// Simplifies an input line for offsetting on one side.
///
/// A positive tolerance simplifies for the left-side offset, negative for
/// the right side: only vertices curving away from that side (shallow
/// inside turns) are dropped. Endpoints are always kept.
#[must_use]
pub fn simplify(input: &[Coordinate], distance_tol: f64) -> Vec<Coordinate> {
    if input.len() <= 2 {
        return input.to_vec();
    }

    let tol = distance_tol.abs();
    let concave_orientation = if distance_tol < 0.0 {
        CLOCKWISE
    } else {
        COUNTERCLOCKWISE
    };

    let mut deleted = vec![false; input.len()];
    while delete_shallow_concavities(input, tol, concave_orientation, &mut deleted) {}

    input
        .iter()
        .enumerate()
        .filter(|(i, _)| !deleted[*i])
        .map(|(_, c)| *c)
        .collect()
}

fn delete_shallow_concavities(
    input: &[Coordinate],
    tol: f64,
    concave_orientation: i32,
    deleted: &mut [bool],
) -> bool {
    let mut changed = false;
    let mut index = 0;
    let mut mid = next_non_deleted(deleted, index);
    let mut last = next_non_deleted(deleted, mid);

    while last < input.len() {
        if is_deletable(input, index, mid, last, tol, concave_orientation) {
            deleted[mid] = true;
            changed = true;
            index = last;
        } else {
            index = mid;
        }
        mid = next_non_deleted(deleted, index);
        last = next_non_deleted(deleted, mid);
    }
    changed
}

fn next_non_deleted(deleted: &[bool], index: usize) -> usize {
    let mut next = index + 1;
    while next < deleted.len() && deleted[next] {
        next += 1;
    }
    next
}

fn is_deletable(
    input: &[Coordinate],
    i0: usize,
    i1: usize,
    i2: usize,
    tol: f64,
    concave_orientation: i32,
) -> bool {
    let p0 = input[i0];
    let p1 = input[i1];
    let p2 = input[i2];

    let orientation = orientation_index(p0.x, p0.y, p1.x, p1.y, p2.x, p2.y);
    if orientation != concave_orientation {
        return false;
    }
    if !is_shallow(&p0, &p1, &p2, tol) {
        return false;
    }
    is_shallow_sampled(input, i0, i2, tol)
}

/// True if the middle point deviates from the chord by less than the
/// tolerance.
fn is_shallow(chord0: &Coordinate, mid: &Coordinate, chord1: &Coordinate, tol: f64) -> bool {
    point_to_segment(mid, chord0, chord1) < tol
}

/// Samples the vertices between the chord endpoints to confirm the whole
/// concavity is shallow, not just its apex.
fn is_shallow_sampled(input: &[Coordinate], i0: usize, i2: usize, tol: f64) -> bool {
    let mut inc = (i2 - i0) / NUM_PTS_TO_CHECK;
    if inc == 0 {
        inc = 1;
    }
    let (p0, p2) = (input[i0], input[i2]);
    let mut i = i0;
    while i < i2 {
        if !is_shallow(&p0, &input[i], &p2, tol) {
            return false;
        }
        i += inc;
    }
    true
}
