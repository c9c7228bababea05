use crate::geometry::{Coordinate, Envelope, PrecisionModel};

use super::distance_2d::point_to_segment;
use super::orientation::orientation_index;

/// Robust segment/segment intersector.
///
/// Classification (crossing, endpoint touch, collinear overlap, disjoint)
/// is driven entirely by the robust orientation predicate; coordinates of
/// computed intersection points are snapped through the precision model.
/// One instance is shared across a whole pipeline run to amortise state.
#[derive(Debug)]
pub struct LineIntersector {
    precision: PrecisionModel,
    num: usize,
    pts: [Coordinate; 2],
    proper: bool,
}

impl LineIntersector {
    /// Creates an intersector bound to a precision model.
    #[must_use]
    pub fn new(precision: PrecisionModel) -> Self {
        Self {
            precision,
            num: 0,
            pts: [Coordinate::new(0.0, 0.0); 2],
            proper: false,
        }
    }

    /// Rebinds the intersector to a different precision model.
    pub fn set_precision_model(&mut self, precision: PrecisionModel) {
        self.precision = precision;
    }

    /// True if the last computed segment pair intersects.
    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.num > 0
    }

    /// Number of intersection points found (0, 1, or 2 for a collinear
    /// overlap).
    #[must_use]
    pub fn intersection_count(&self) -> usize {
        self.num
    }

    /// The `i`-th intersection point of the last computation.
    #[must_use]
    pub fn intersection(&self, i: usize) -> Coordinate {
        self.pts[i]
    }

    /// True if the last intersection is proper (interior to both segments).
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.proper
    }

    /// Computes the intersection of segments `p1-p2` and `q1-q2`.
    pub fn compute_intersection(
        &mut self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) {
        self.proper = false;
        self.num = 0;

        if !Envelope::from_segment(p1, p2).intersects(&Envelope::from_segment(q1, q2)) {
            return;
        }

        let pq1 = orientation_index(p1.x, p1.y, p2.x, p2.y, q1.x, q1.y);
        let pq2 = orientation_index(p1.x, p1.y, p2.x, p2.y, q2.x, q2.y);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return;
        }

        let qp1 = orientation_index(q1.x, q1.y, q2.x, q2.y, p1.x, p1.y);
        let qp2 = orientation_index(q1.x, q1.y, q2.x, q2.y, p2.x, p2.y);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return;
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            self.compute_collinear(p1, p2, q1, q2);
            return;
        }

        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // An endpoint of one segment lies on the other. Prefer exact
            // shared endpoints so no new coordinate is fabricated.
            let pt = if p1 == q1 || p1 == q2 {
                *p1
            } else if p2 == q1 || p2 == q2 {
                *p2
            } else if pq1 == 0 {
                *q1
            } else if pq2 == 0 {
                *q2
            } else if qp1 == 0 {
                *p1
            } else {
                *p2
            };
            self.pts[0] = pt;
            self.num = 1;
        } else {
            self.proper = true;
            self.pts[0] = self.proper_intersection(p1, p2, q1, q2);
            self.num = 1;
        }
    }

    fn compute_collinear(
        &mut self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) {
        let env_p = Envelope::from_segment(p1, p2);
        let env_q = Envelope::from_segment(q1, q2);
        let q1_in_p = env_p.contains(q1);
        let q2_in_p = env_p.contains(q2);
        let p1_in_q = env_q.contains(p1);
        let p2_in_q = env_q.contains(p2);

        if q1_in_p && q2_in_p {
            self.pts = [*q1, *q2];
            self.num = 2;
        } else if p1_in_q && p2_in_q {
            self.pts = [*p1, *p2];
            self.num = 2;
        } else if q1_in_p && p1_in_q {
            self.pts = [*q1, *p1];
            self.num = if q1 == p1 && !q2_in_p && !p2_in_q { 1 } else { 2 };
        } else if q1_in_p && p2_in_q {
            self.pts = [*q1, *p2];
            self.num = if q1 == p2 && !q2_in_p && !p1_in_q { 1 } else { 2 };
        } else if q2_in_p && p1_in_q {
            self.pts = [*q2, *p1];
            self.num = if q2 == p1 && !q1_in_p && !p2_in_q { 1 } else { 2 };
        } else if q2_in_p && p2_in_q {
            self.pts = [*q2, *p2];
            self.num = if q2 == p2 && !q1_in_p && !p1_in_q { 1 } else { 2 };
        }
    }

    /// Computes a proper intersection point, translating the segments to
    /// their common centroid first to limit rounding error.
    fn proper_intersection(
        &self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> Coordinate {
        let nx = (p1.x + p2.x + q1.x + q2.x) / 4.0;
        let ny = (p1.y + p2.y + q1.y + q2.y) / 4.0;

        let px = p1.x - nx;
        let py = p1.y - ny;
        let dx_p = p2.x - p1.x;
        let dy_p = p2.y - p1.y;
        let qx = q1.x - nx;
        let qy = q1.y - ny;
        let dx_q = q2.x - q1.x;
        let dy_q = q2.y - q1.y;

        let w = dx_p * dy_q - dy_p * dx_q;
        let t = ((qx - px) * dy_q - (qy - py) * dx_q) / w;
        let mut pt = Coordinate::new(px + t * dx_p + nx, py + t * dy_p + ny);

        // A badly conditioned computation can land outside both segments;
        // fall back to the endpoint nearest the other segment.
        if !(Envelope::from_segment(p1, p2).contains(&pt)
            && Envelope::from_segment(q1, q2).contains(&pt))
        {
            pt = nearest_endpoint(p1, p2, q1, q2);
        }

        self.precision.make_precise(pt)
    }
}

/// The endpoint of either segment closest to the opposite segment.
fn nearest_endpoint(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> Coordinate {
    let mut nearest = *p1;
    let mut min_dist = point_to_segment(p1, q1, q2);

    let d = point_to_segment(p2, q1, q2);
    if d < min_dist {
        min_dist = d;
        nearest = *p2;
    }
    let d = point_to_segment(q1, p1, p2);
    if d < min_dist {
        min_dist = d;
        nearest = *q1;
    }
    let d = point_to_segment(q2, p1, p2);
    if d < min_dist {
        nearest = *q2;
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn li() -> LineIntersector {
        LineIntersector::new(PrecisionModel::Floating)
    }

    #[test]
    fn proper_crossing() {
        let mut li = li();
        li.compute_intersection(&c(0.0, 0.0), &c(2.0, 2.0), &c(0.0, 2.0), &c(2.0, 0.0));
        assert!(li.has_intersection());
        assert!(li.is_proper());
        assert_eq!(li.intersection_count(), 1);
        let pt = li.intersection(0);
        assert!((pt.x - 1.0).abs() < 1e-12);
        assert!((pt.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_segments() {
        let mut li = li();
        li.compute_intersection(&c(0.0, 0.0), &c(1.0, 0.0), &c(0.0, 1.0), &c(1.0, 1.0));
        assert!(!li.has_intersection());
    }

    #[test]
    fn endpoint_touch_is_not_proper() {
        let mut li = li();
        li.compute_intersection(&c(0.0, 0.0), &c(1.0, 1.0), &c(1.0, 1.0), &c(2.0, 0.0));
        assert!(li.has_intersection());
        assert!(!li.is_proper());
        assert_eq!(li.intersection(0), c(1.0, 1.0));
    }

    #[test]
    fn vertex_on_interior_is_not_proper() {
        let mut li = li();
        li.compute_intersection(&c(0.0, 0.0), &c(4.0, 0.0), &c(2.0, 0.0), &c(2.0, 3.0));
        assert!(li.has_intersection());
        assert!(!li.is_proper());
        assert_eq!(li.intersection(0), c(2.0, 0.0));
    }

    #[test]
    fn collinear_overlap_yields_two_points() {
        let mut li = li();
        li.compute_intersection(&c(0.0, 0.0), &c(4.0, 0.0), &c(2.0, 0.0), &c(6.0, 0.0));
        assert_eq!(li.intersection_count(), 2);
        assert!(!li.is_proper());
    }

    #[test]
    fn collinear_endpoint_touch_yields_one_point() {
        let mut li = li();
        li.compute_intersection(&c(0.0, 0.0), &c(2.0, 0.0), &c(2.0, 0.0), &c(4.0, 0.0));
        assert_eq!(li.intersection_count(), 1);
        assert_eq!(li.intersection(0), c(2.0, 0.0));
    }

    #[test]
    fn fixed_precision_snaps_intersection() {
        let mut li = LineIntersector::new(PrecisionModel::Fixed { scale: 10.0 });
        li.compute_intersection(&c(0.0, 0.0), &c(3.0, 1.0), &c(0.0, 1.0), &c(3.0, 0.0));
        assert!(li.has_intersection());
        let pt = li.intersection(0);
        assert!((pt.x * 10.0).fract().abs() < 1e-9);
        assert!((pt.y * 10.0).fract().abs() < 1e-9);
    }
}
