use std::f64::consts::PI;

use crate::geometry::{Coordinate, PrecisionModel};
use crate::math::intersect_2d::LineIntersector;
use crate::math::orientation::{orientation_index, CLOCKWISE, COUNTERCLOCKWISE};
use crate::math::{Vector2, TOLERANCE};
use crate::topology::Position;

use super::params::{BufferParameters, EndCapStyle, JoinStyle};
use super::simplify;

/// Below this separation (relative to the distance) two offset segment
/// endpoints at an outside turn collapse to one curve vertex.
const OFFSET_SEGMENT_SEPARATION_FACTOR: f64 = 1.0e-3;

/// Below this separation (relative to the distance) a narrow inside turn
/// collapses to one curve vertex instead of closing segments.
const INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-3;

/// Curve vertices closer than this (relative to the distance) are dropped.
const CURVE_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-6;

/// Interpolation factor pulling inside-turn closing segments toward the
/// input vertex. Large values keep the closing segments short, which high
/// quadrant counts can afford.
const MAX_CLOSING_SEG_LEN_FACTOR: i32 = 80;

/// Generates the raw offset curves for line strings, rings, and points,
/// parameterised by cap style, join style, mitre limit, and quadrant
/// segment count. Curves are emitted through the precision model.
#[derive(Debug)]
pub struct OffsetCurveBuilder {
    precision: PrecisionModel,
    params: BufferParameters,
}

impl OffsetCurveBuilder {
    /// Creates a builder for the given precision model and parameters.
    #[must_use]
    pub fn new(precision: PrecisionModel, params: BufferParameters) -> Self {
        Self { precision, params }
    }

    #[must_use]
    pub fn params(&self) -> &BufferParameters {
        &self.params
    }

    /// True if the offset of a line at this distance is empty: zero
    /// distance, or a negative (interior) distance without single-sided
    /// mode.
    #[must_use]
    pub fn is_line_offset_empty(&self, distance: f64) -> bool {
        if distance == 0.0 {
            return true;
        }
        distance < 0.0 && !self.params.single_sided
    }

    /// The closed raw offset curve around a line or point input, or `None`
    /// if the offset is empty.
    #[must_use]
    pub fn line_curve(&self, pts: &[Coordinate], distance: f64) -> Option<Vec<Coordinate>> {
        if self.is_line_offset_empty(distance) || pts.is_empty() {
            return None;
        }

        let mut gen = OffsetSegmentGenerator::new(self.precision, &self.params, distance.abs());
        if pts.len() == 1 {
            self.compute_point_curve(pts[0], &mut gen);
        } else if self.params.single_sided {
            let is_right_side = distance < 0.0;
            self.compute_single_sided_curve(pts, distance, is_right_side, &mut gen);
        } else {
            self.compute_line_curve(pts, distance, &mut gen);
        }

        let curve = gen.into_coordinates();
        (curve.len() >= 2).then_some(curve)
    }

    /// The raw offset curve on one side of a ring, or `None` if it is
    /// empty. The distance must be non-negative; the side selects interior
    /// or exterior.
    #[must_use]
    pub fn ring_curve(
        &self,
        pts: &[Coordinate],
        side: Position,
        distance: f64,
    ) -> Option<Vec<Coordinate>> {
        if pts.len() <= 2 {
            return self.line_curve(pts, distance);
        }
        if distance == 0.0 {
            return Some(pts.to_vec());
        }

        let mut gen = OffsetSegmentGenerator::new(self.precision, &self.params, distance);
        self.compute_ring_curve(pts, side, distance, &mut gen);
        let curve = gen.into_coordinates();
        (curve.len() >= 2).then_some(curve)
    }

    /// The raw (unnoded, uncapped) offset polyline on one side of an open
    /// line, used by the single-sided clean-up.
    #[must_use]
    pub fn single_sided_line_curve(
        &self,
        pts: &[Coordinate],
        distance: f64,
        left_side: bool,
    ) -> Option<Vec<Coordinate>> {
        if distance == 0.0 || pts.len() < 2 {
            return None;
        }

        let dist_tol = self.simplify_tolerance(distance.abs());
        let mut gen = OffsetSegmentGenerator::new(self.precision, &self.params, distance.abs());

        if left_side {
            let simp = simplify::simplify(pts, dist_tol);
            let n = simp.len() - 1;
            gen.init_side_segments(simp[0], simp[1], Position::Left);
            gen.add_first_segment();
            for p in simp.iter().take(n + 1).skip(2) {
                gen.add_next_segment(*p, true);
            }
        } else {
            let simp = simplify::simplify(pts, -dist_tol);
            let n = simp.len() - 1;
            gen.init_side_segments(simp[n], simp[n - 1], Position::Left);
            gen.add_first_segment();
            if n >= 2 {
                for i in (0..=n - 2).rev() {
                    gen.add_next_segment(simp[i], true);
                }
            }
        }
        gen.add_last_segment();

        let curve = gen.into_coordinates();
        (curve.len() >= 2).then_some(curve)
    }

    fn simplify_tolerance(&self, distance: f64) -> f64 {
        distance * self.params.simplify_factor
    }

    fn compute_point_curve(&self, pt: Coordinate, gen: &mut OffsetSegmentGenerator) {
        match self.params.end_cap_style {
            EndCapStyle::Round => gen.create_circle(pt),
            EndCapStyle::Square => gen.create_square(pt),
            EndCapStyle::Flat => {}
        }
    }

    fn compute_line_curve(
        &self,
        pts: &[Coordinate],
        distance: f64,
        gen: &mut OffsetSegmentGenerator,
    ) {
        let dist_tol = self.simplify_tolerance(distance);

        // forward pass along the left side
        let simp1 = simplify::simplify(pts, dist_tol);
        let n1 = simp1.len() - 1;
        gen.init_side_segments(simp1[0], simp1[1], Position::Left);
        for p in simp1.iter().take(n1 + 1).skip(2) {
            gen.add_next_segment(*p, true);
        }
        gen.add_last_segment();
        gen.add_line_end_cap(simp1[n1 - 1], simp1[n1]);

        // backward pass along the other side
        let simp2 = simplify::simplify(pts, -dist_tol);
        let n2 = simp2.len() - 1;
        gen.init_side_segments(simp2[n2], simp2[n2 - 1], Position::Left);
        if n2 >= 2 {
            for i in (0..=n2 - 2).rev() {
                gen.add_next_segment(simp2[i], true);
            }
        }
        gen.add_last_segment();
        gen.add_line_end_cap(simp2[1], simp2[0]);

        gen.close_ring();
    }

    fn compute_single_sided_curve(
        &self,
        pts: &[Coordinate],
        distance: f64,
        is_right_side: bool,
        gen: &mut OffsetSegmentGenerator,
    ) {
        let dist_tol = self.simplify_tolerance(distance.abs());

        // The strip boundary: the input line itself, traversed so that the
        // offset curve closes into a ring around the requested side.
        if is_right_side {
            gen.add_segments(pts, true);

            let simp2 = simplify::simplify(pts, -dist_tol);
            let n2 = simp2.len() - 1;
            gen.init_side_segments(simp2[n2], simp2[n2 - 1], Position::Left);
            gen.add_first_segment();
            if n2 >= 2 {
                for i in (0..=n2 - 2).rev() {
                    gen.add_next_segment(simp2[i], true);
                }
            }
        } else {
            gen.add_segments(pts, false);

            let simp1 = simplify::simplify(pts, dist_tol);
            let n1 = simp1.len() - 1;
            gen.init_side_segments(simp1[0], simp1[1], Position::Left);
            gen.add_first_segment();
            for p in simp1.iter().take(n1 + 1).skip(2) {
                gen.add_next_segment(*p, true);
            }
        }
        gen.add_last_segment();
        gen.close_ring();
    }

    fn compute_ring_curve(
        &self,
        pts: &[Coordinate],
        side: Position,
        distance: f64,
        gen: &mut OffsetSegmentGenerator,
    ) {
        let mut dist_tol = self.simplify_tolerance(distance);
        if side == Position::Right {
            dist_tol = -dist_tol;
        }
        let simp = simplify::simplify(pts, dist_tol);
        let n = simp.len() - 1;

        gen.init_side_segments(simp[n - 1], simp[0], side);
        for i in 1..=n {
            gen.add_next_segment(simp[i], i != 1);
        }
        gen.close_ring();
    }
}

/// Stateful generator for one offset curve: tracks the last two input
/// segments and their offsets, and appends join, cap, and fillet vertices
/// to the output list.
#[derive(Debug)]
struct OffsetSegmentGenerator<'a> {
    params: &'a BufferParameters,
    li: LineIntersector,
    distance: f64,
    /// Maximum angle subtended by one fillet chord.
    fillet_angle_quantum: f64,
    closing_seg_length_factor: i32,
    seg_list: OffsetSegmentString,
    side: Position,
    s0: Coordinate,
    s1: Coordinate,
    s2: Coordinate,
    offset0: (Coordinate, Coordinate),
    offset1: (Coordinate, Coordinate),
}

impl<'a> OffsetSegmentGenerator<'a> {
    fn new(precision: PrecisionModel, params: &'a BufferParameters, distance: f64) -> Self {
        let fillet_angle_quantum = PI / 2.0 / f64::from(params.quadrant_segments);

        // Short closing segments keep inside turns tight, but produce
        // visible chord error at low arc resolution.
        let closing_seg_length_factor =
            if params.quadrant_segments >= 8 && params.join_style == JoinStyle::Round {
                MAX_CLOSING_SEG_LEN_FACTOR
            } else {
                1
            };

        let origin = Coordinate::new(0.0, 0.0);
        Self {
            params,
            li: LineIntersector::new(precision),
            distance,
            fillet_angle_quantum,
            closing_seg_length_factor,
            seg_list: OffsetSegmentString::new(
                precision,
                distance * CURVE_VERTEX_SNAP_DISTANCE_FACTOR,
            ),
            side: Position::Left,
            s0: origin,
            s1: origin,
            s2: origin,
            offset0: (origin, origin),
            offset1: (origin, origin),
        }
    }

    fn into_coordinates(self) -> Vec<Coordinate> {
        self.seg_list.into_coordinates()
    }

    fn init_side_segments(&mut self, s1: Coordinate, s2: Coordinate, side: Position) {
        self.s1 = s1;
        self.s2 = s2;
        self.side = side;
        self.offset1 = compute_offset_segment(&s1, &s2, side, self.distance);
    }

    fn add_first_segment(&mut self) {
        self.seg_list.add_pt(self.offset1.0);
    }

    fn add_last_segment(&mut self) {
        self.seg_list.add_pt(self.offset1.1);
    }

    fn add_segments(&mut self, pts: &[Coordinate], forward: bool) {
        if forward {
            for p in pts {
                self.seg_list.add_pt(*p);
            }
        } else {
            for p in pts.iter().rev() {
                self.seg_list.add_pt(*p);
            }
        }
    }

    fn add_next_segment(&mut self, p: Coordinate, add_start_point: bool) {
        self.s0 = self.s1;
        self.s1 = self.s2;
        self.s2 = p;
        self.offset0 = compute_offset_segment(&self.s0, &self.s1, self.side, self.distance);
        self.offset1 = compute_offset_segment(&self.s1, &self.s2, self.side, self.distance);

        if self.s1 == self.s2 {
            return;
        }

        let orientation = orientation_index(
            self.s0.x, self.s0.y, self.s1.x, self.s1.y, self.s2.x, self.s2.y,
        );
        let outside_turn = (orientation == CLOCKWISE && self.side == Position::Left)
            || (orientation == COUNTERCLOCKWISE && self.side == Position::Right);

        if orientation == 0 {
            self.add_collinear(add_start_point);
        } else if outside_turn {
            self.add_outside_turn(orientation, add_start_point);
        } else {
            self.add_inside_turn();
        }
    }

    fn add_collinear(&mut self, add_start_point: bool) {
        let (s0, s1, s2) = (self.s0, self.s1, self.s2);
        self.li.compute_intersection(&s0, &s1, &s1, &s2);

        // Two intersection points means the segments reverse direction; the
        // offsets lie on opposite sides and must be connected around the
        // reversal point.
        if self.li.intersection_count() >= 2 {
            if matches!(self.params.join_style, JoinStyle::Bevel | JoinStyle::Mitre) {
                if add_start_point {
                    self.seg_list.add_pt(self.offset0.1);
                }
                self.seg_list.add_pt(self.offset1.0);
            } else {
                self.add_corner_fillet(self.s1, self.offset0.1, self.offset1.0, CLOCKWISE);
            }
        }
    }

    fn add_outside_turn(&mut self, orientation: i32, add_start_point: bool) {
        // If the offset endpoints nearly coincide, one vertex suffices.
        if self.offset0.1.distance(&self.offset1.0)
            < self.distance * OFFSET_SEGMENT_SEPARATION_FACTOR
        {
            self.seg_list.add_pt(self.offset0.1);
            return;
        }

        match self.params.join_style {
            JoinStyle::Mitre => self.add_mitre_join(self.s1),
            JoinStyle::Bevel => self.add_bevel_join(),
            JoinStyle::Round => {
                if add_start_point {
                    self.seg_list.add_pt(self.offset0.1);
                }
                self.add_corner_fillet(self.s1, self.offset0.1, self.offset1.0, orientation);
                self.seg_list.add_pt(self.offset1.0);
            }
        }
    }

    fn add_inside_turn(&mut self) {
        let (o0, o1) = (self.offset0, self.offset1);
        self.li.compute_intersection(&o0.0, &o0.1, &o1.0, &o1.1);

        if self.li.has_intersection() {
            self.seg_list.add_pt(self.li.intersection(0));
            return;
        }

        // The offset segments do not meet: the turn is narrow relative to
        // the offset distance. Bridge the gap with closing segments pulled
        // toward the input vertex so the curve stays continuous. The extra
        // excursion is removed later as interior linework.
        if self.offset0.1.distance(&self.offset1.0)
            < self.distance * INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR
        {
            self.seg_list.add_pt(self.offset0.1);
            return;
        }

        self.seg_list.add_pt(self.offset0.1);
        if self.closing_seg_length_factor > 0 {
            let f = f64::from(self.closing_seg_length_factor);
            let mid0 = Coordinate::new(
                (f * self.offset0.1.x + self.s1.x) / (f + 1.0),
                (f * self.offset0.1.y + self.s1.y) / (f + 1.0),
            );
            self.seg_list.add_pt(mid0);
            let mid1 = Coordinate::new(
                (f * self.offset1.0.x + self.s1.x) / (f + 1.0),
                (f * self.offset1.0.y + self.s1.y) / (f + 1.0),
            );
            self.seg_list.add_pt(mid1);
        } else {
            self.seg_list.add_pt(self.s1);
        }
        self.seg_list.add_pt(self.offset1.0);
    }

    fn add_mitre_join(&mut self, corner: Coordinate) {
        if let Some(int_pt) = line_line_intersection(&self.offset0, &self.offset1) {
            let mitre_ratio = if self.distance <= 0.0 {
                1.0
            } else {
                int_pt.distance(&corner) / self.distance.abs()
            };
            if mitre_ratio <= self.params.mitre_limit {
                self.seg_list.add_pt(int_pt);
                return;
            }
        }
        // mitre limit exceeded, or the offset lines are near-parallel
        self.add_bevel_join();
    }

    fn add_bevel_join(&mut self) {
        self.seg_list.add_pt(self.offset0.1);
        self.seg_list.add_pt(self.offset1.0);
    }

    /// Adds a fillet between two points around a corner, including both
    /// endpoints.
    fn add_corner_fillet(&mut self, p: Coordinate, p0: Coordinate, p1: Coordinate, direction: i32) {
        let mut start_angle = (p0.y - p.y).atan2(p0.x - p.x);
        let end_angle = (p1.y - p.y).atan2(p1.x - p.x);

        if direction == CLOCKWISE {
            if start_angle <= end_angle {
                start_angle += 2.0 * PI;
            }
        } else if start_angle >= end_angle {
            start_angle -= 2.0 * PI;
        }

        self.seg_list.add_pt(p0);
        self.add_directed_fillet(p, start_angle, end_angle, direction);
        self.seg_list.add_pt(p1);
    }

    /// Adds fillet chord vertices between two angles, exclusive of the
    /// endpoints.
    fn add_directed_fillet(
        &mut self,
        p: Coordinate,
        start_angle: f64,
        end_angle: f64,
        direction: i32,
    ) {
        let direction_factor = if direction == CLOCKWISE { -1.0 } else { 1.0 };
        let total_angle = (start_angle - end_angle).abs();
        #[allow(clippy::cast_possible_truncation)]
        let n_segs = (total_angle / self.fillet_angle_quantum + 0.5) as i32;
        if n_segs < 1 {
            return;
        }

        let angle_inc = total_angle / f64::from(n_segs);
        for i in 0..n_segs {
            let angle = start_angle + direction_factor * f64::from(i) * angle_inc;
            self.seg_list.add_pt(Coordinate::new(
                p.x + self.distance * angle.cos(),
                p.y + self.distance * angle.sin(),
            ));
        }
    }

    fn add_line_end_cap(&mut self, p0: Coordinate, p1: Coordinate) {
        let offset_l = compute_offset_segment(&p0, &p1, Position::Left, self.distance);
        let offset_r = compute_offset_segment(&p0, &p1, Position::Right, self.distance);
        let angle = (p1.y - p0.y).atan2(p1.x - p0.x);

        match self.params.end_cap_style {
            EndCapStyle::Round => {
                self.seg_list.add_pt(offset_l.1);
                self.add_directed_fillet(p1, angle + PI / 2.0, angle - PI / 2.0, CLOCKWISE);
                self.seg_list.add_pt(offset_r.1);
            }
            EndCapStyle::Flat => {
                self.seg_list.add_pt(offset_l.1);
                self.seg_list.add_pt(offset_r.1);
            }
            EndCapStyle::Square => {
                let sx = self.distance.abs() * angle.cos();
                let sy = self.distance.abs() * angle.sin();
                self.seg_list
                    .add_pt(Coordinate::new(offset_l.1.x + sx, offset_l.1.y + sy));
                self.seg_list
                    .add_pt(Coordinate::new(offset_r.1.x + sx, offset_r.1.y + sy));
            }
        }
    }

    /// Full circle around a point, clockwise from the +x axis.
    fn create_circle(&mut self, p: Coordinate) {
        self.seg_list
            .add_pt(Coordinate::new(p.x + self.distance, p.y));
        self.add_directed_fillet(p, 0.0, 2.0 * PI, CLOCKWISE);
        self.seg_list.close_ring();
    }

    /// Axis-aligned square around a point, clockwise.
    fn create_square(&mut self, p: Coordinate) {
        let d = self.distance;
        self.seg_list.add_pt(Coordinate::new(p.x + d, p.y + d));
        self.seg_list.add_pt(Coordinate::new(p.x + d, p.y - d));
        self.seg_list.add_pt(Coordinate::new(p.x - d, p.y - d));
        self.seg_list.add_pt(Coordinate::new(p.x - d, p.y + d));
        self.seg_list.close_ring();
    }

    fn close_ring(&mut self) {
        self.seg_list.close_ring();
    }
}

/// Offsets a segment perpendicular to the given side.
fn compute_offset_segment(
    p0: &Coordinate,
    p1: &Coordinate,
    side: Position,
    distance: f64,
) -> (Coordinate, Coordinate) {
    let side_sign = if side == Position::Left { 1.0 } else { -1.0 };
    let d = Vector2::new(p1.x - p0.x, p1.y - p0.y);
    let len = d.norm();
    let ux = side_sign * distance * d.x / len;
    let uy = side_sign * distance * d.y / len;
    (
        Coordinate::new(p0.x - uy, p0.y + ux),
        Coordinate::new(p1.x - uy, p1.y + ux),
    )
}

/// Intersection of two infinite lines given by segments, or `None` if they
/// are (near-)parallel.
fn line_line_intersection(
    a: &(Coordinate, Coordinate),
    b: &(Coordinate, Coordinate),
) -> Option<Coordinate> {
    let d1 = Vector2::new(a.1.x - a.0.x, a.1.y - a.0.y);
    let d2 = Vector2::new(b.1.x - b.0.x, b.1.y - b.0.y);
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() <= TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let dx = b.0.x - a.0.x;
    let dy = b.0.y - a.0.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    Some(Coordinate::new(a.0.x + t * d1.x, a.0.y + t * d1.y))
}

/// Accumulator for offset curve vertices: snaps through the precision
/// model and drops near-coincident consecutive vertices.
#[derive(Debug)]
struct OffsetSegmentString {
    precision: PrecisionModel,
    min_vertex_distance: f64,
    pts: Vec<Coordinate>,
}

impl OffsetSegmentString {
    fn new(precision: PrecisionModel, min_vertex_distance: f64) -> Self {
        Self {
            precision,
            min_vertex_distance,
            pts: Vec::new(),
        }
    }

    fn add_pt(&mut self, c: Coordinate) {
        let p = self.precision.make_precise(c);
        if !self.is_redundant(&p) {
            self.pts.push(p);
        }
    }

    fn is_redundant(&self, p: &Coordinate) -> bool {
        match self.pts.last() {
            None => false,
            Some(last) => last.distance(p) < self.min_vertex_distance,
        }
    }

    fn close_ring(&mut self) {
        if self.pts.is_empty() {
            return;
        }
        let start = self.pts[0];
        if self.pts.last() != Some(&start) {
            self.pts.push(start);
        }
    }

    fn into_coordinates(self) -> Vec<Coordinate> {
        self.pts
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::coordinate::{is_ccw, is_closed_ring, signed_area};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn builder(params: BufferParameters) -> OffsetCurveBuilder {
        OffsetCurveBuilder::new(PrecisionModel::Floating, params)
    }

    #[test]
    fn point_round_curve_is_a_32gon() {
        let b = builder(BufferParameters::default());
        let curve = b.line_curve(&[c(0.0, 0.0)], 1.0).unwrap();
        assert!(is_closed_ring(&curve));
        // 4 * quadrant_segments distinct vertices plus the closing point
        assert_eq!(curve.len(), 33);
        // clockwise ring: interior of the disc lies on the right
        assert!(!is_ccw(&curve));
        // the inscribed 32-gon is about 0.64% below the disc area
        let area = signed_area(&curve).abs();
        assert!((area - PI).abs() / PI < 0.01, "area={area}");
    }

    #[test]
    fn point_square_curve() {
        let params = BufferParameters {
            end_cap_style: EndCapStyle::Square,
            ..Default::default()
        };
        let curve = builder(params).line_curve(&[c(1.0, 1.0)], 2.0).unwrap();
        assert!(is_closed_ring(&curve));
        assert_eq!(curve.len(), 5);
        assert!((signed_area(&curve).abs() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn point_flat_curve_is_empty() {
        let params = BufferParameters {
            end_cap_style: EndCapStyle::Flat,
            ..Default::default()
        };
        assert!(builder(params).line_curve(&[c(0.0, 0.0)], 1.0).is_none());
    }

    #[test]
    fn zero_and_negative_line_offsets_are_empty() {
        let b = builder(BufferParameters::default());
        let line = [c(0.0, 0.0), c(10.0, 0.0)];
        assert!(b.line_curve(&line, 0.0).is_none());
        assert!(b.line_curve(&line, -1.0).is_none());
    }

    #[test]
    fn line_curve_is_a_clockwise_capsule() {
        let b = builder(BufferParameters::default());
        let curve = b.line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0).unwrap();
        assert!(is_closed_ring(&curve));
        assert!(!is_ccw(&curve));
        // capsule area: 10x2 rectangle plus a unit disc
        let area = signed_area(&curve).abs();
        let expected = 20.0 + PI;
        assert!((area - expected).abs() / expected < 0.005, "area={area}");
        // curve stays within the capsule bounds
        for p in &curve {
            assert!(p.x >= -1.0 - 1e-9 && p.x <= 11.0 + 1e-9);
            assert!(p.y >= -1.0 - 1e-9 && p.y <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn flat_cap_line_curve_is_a_rectangle() {
        let params = BufferParameters {
            end_cap_style: EndCapStyle::Flat,
            ..Default::default()
        };
        let curve = builder(params)
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0)
            .unwrap();
        assert!((signed_area(&curve).abs() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn square_cap_line_curve_extends_by_distance() {
        let params = BufferParameters {
            end_cap_style: EndCapStyle::Square,
            ..Default::default()
        };
        let curve = builder(params)
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0)
            .unwrap();
        // 12x2 rectangle
        assert!((signed_area(&curve).abs() - 24.0).abs() < 1e-9);
        let min_x = curve.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = curve.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert!((min_x + 1.0).abs() < 1e-9);
        assert!((max_x - 11.0).abs() < 1e-9);
    }

    #[test]
    fn mitre_join_square_ring_has_sharp_corners() {
        let params = BufferParameters {
            join_style: JoinStyle::Mitre,
            ..Default::default()
        };
        // CW square ring: exterior offset is on the left side
        let ring = [
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(0.0, 0.0),
        ];
        let curve = builder(params)
            .ring_curve(&ring, Position::Left, 1.0)
            .unwrap();
        let env_min_x = curve.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let env_max_x = curve.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert!((env_min_x + 1.0).abs() < 1e-9, "min_x={env_min_x}");
        assert!((env_max_x - 11.0).abs() < 1e-9, "max_x={env_max_x}");
        assert!((signed_area(&curve).abs() - 144.0).abs() < 1e-9);
    }

    #[test]
    fn mitre_limit_falls_back_to_bevel() {
        let params = BufferParameters {
            join_style: JoinStyle::Mitre,
            mitre_limit: 1.0,
            ..Default::default()
        };
        // a sharp spike whose mitre would extend far beyond the limit
        let line = [c(0.0, 0.0), c(10.0, 1.0), c(20.0, 0.0)];
        let curve = builder(params).line_curve(&line, 1.0).unwrap();
        let max_y = curve.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        // an unlimited mitre would reach y ≈ 2.005; the bevel stays below
        // the corner offset height of ≈ 1.995
        assert!(max_y < 2.0, "max_y={max_y}");
    }

    #[test]
    fn ring_curve_zero_distance_copies_input() {
        let ring = [
            c(0.0, 0.0),
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(0.0, 10.0),
            c(0.0, 0.0),
        ];
        let curve = builder(BufferParameters::default())
            .ring_curve(&ring, Position::Left, 0.0)
            .unwrap();
        assert_eq!(curve, ring.to_vec());
    }

    #[test]
    fn single_sided_line_curve_left_is_offset_up() {
        let params = BufferParameters {
            end_cap_style: EndCapStyle::Flat,
            ..Default::default()
        };
        let curve = builder(params)
            .single_sided_line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0, true)
            .unwrap();
        assert_eq!(curve.len(), 2);
        for p in &curve {
            assert!((p.y - 1.0).abs() < 1e-9, "y={}", p.y);
        }
    }

    #[test]
    fn single_sided_line_curve_right_is_offset_down() {
        let params = BufferParameters {
            end_cap_style: EndCapStyle::Flat,
            ..Default::default()
        };
        let curve = builder(params)
            .single_sided_line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0, false)
            .unwrap();
        assert_eq!(curve.len(), 2);
        for p in &curve {
            assert!((p.y + 1.0).abs() < 1e-9, "y={}", p.y);
        }
    }

    #[test]
    fn single_sided_areal_curve_closes_around_the_strip() {
        let params = BufferParameters {
            single_sided: true,
            end_cap_style: EndCapStyle::Flat,
            ..Default::default()
        };
        let curve = builder(params)
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0)
            .unwrap();
        assert!(is_closed_ring(&curve));
        assert!((signed_area(&curve).abs() - 10.0).abs() < 1e-9);
        // left-side strip lies in 0 ≤ y ≤ 1
        for p in &curve {
            assert!(p.y >= -1e-9 && p.y <= 1.0 + 1e-9);
        }
    }
}
