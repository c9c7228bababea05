use crate::geometry::coordinate::{is_ccw, is_closed_ring, remove_repeated_points};
use crate::geometry::{Coordinate, Envelope, Geometry, Polygon, PrecisionModel};
use crate::math::distance_2d::{point_to_line, point_to_segment};
use crate::noding::NodedSegmentString;
use crate::topology::{Label, Location, Position};

use super::offset_curve::OffsetCurveBuilder;
use super::params::BufferParameters;

/// Minimum coordinate count of a valid closed ring (3 vertices plus the
/// closing point).
const MIN_RING_SIZE: usize = 4;

/// An offset ring that inverted completely has no more vertices than this.
const MAX_INVERTED_RING_SIZE: usize = 9;

/// An inverted ring lies closer to the input than this fraction of the
/// offset distance.
const NEARNESS_FACTOR: f64 = 0.99;

/// Walks an input geometry's primitives, generates their raw offset
/// curves, and attaches to each curve the label recording on which side
/// the buffer interior lies. Degenerate and fully eroded rings emit no
/// curves.
#[derive(Debug)]
pub struct CurveSetBuilder<'a> {
    input: &'a Geometry,
    distance: f64,
    curve_builder: OffsetCurveBuilder,
    curves: Vec<NodedSegmentString>,
}

impl<'a> CurveSetBuilder<'a> {
    /// Creates a curve-set builder for one input geometry.
    #[must_use]
    pub fn new(
        input: &'a Geometry,
        distance: f64,
        precision: PrecisionModel,
        params: BufferParameters,
    ) -> Self {
        Self {
            input,
            distance,
            curve_builder: OffsetCurveBuilder::new(precision, params),
            curves: Vec::new(),
        }
    }

    /// Generates and returns the labelled curves for the input geometry.
    #[must_use]
    pub fn curves(mut self) -> Vec<NodedSegmentString> {
        let input = self.input;
        self.add_geometry(input);
        self.curves
    }

    fn add_geometry(&mut self, g: &Geometry) {
        if g.is_empty() {
            return;
        }
        match g {
            Geometry::Point(p) => self.add_point(*p),
            Geometry::LineString(pts) => self.add_line_string(pts),
            Geometry::Polygon(poly) => self.add_polygon(poly),
            Geometry::MultiPoint(pts) => {
                for p in pts {
                    self.add_point(*p);
                }
            }
            Geometry::MultiLineString(lines) => {
                for l in lines {
                    self.add_line_string(l);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for p in polys {
                    self.add_polygon(p);
                }
            }
            Geometry::GeometryCollection(geoms) => {
                for sub in geoms {
                    self.add_geometry(sub);
                }
            }
        }
    }

    fn add_point(&mut self, p: Coordinate) {
        // a zero or negative width buffer of a point is empty
        if self.distance <= 0.0 {
            return;
        }
        if let Some(curve) = self.curve_builder.line_curve(&[p], self.distance) {
            self.add_curve(curve, Location::Exterior, Location::Interior);
        }
    }

    fn add_line_string(&mut self, pts: &[Coordinate]) {
        if self.curve_builder.is_line_offset_empty(self.distance) {
            return;
        }
        let coord = remove_repeated_points(pts);
        if coord.len() <= 1 {
            if let Some(p) = coord.first() {
                self.add_point(*p);
            }
            return;
        }

        // Closed lines are offset as continuous rings: end caps at the
        // closing vertex would produce poorer linework and noding hazards.
        if is_closed_ring(&coord) && !self.curve_builder.params().single_sided {
            self.add_ring_both_sides(&coord);
        } else if let Some(curve) = self.curve_builder.line_curve(&coord, self.distance) {
            self.add_curve(curve, Location::Exterior, Location::Interior);
        }
    }

    fn add_ring_both_sides(&mut self, coord: &[Coordinate]) {
        self.add_ring_side(
            coord,
            self.distance,
            Position::Left,
            Location::Exterior,
            Location::Interior,
        );
        self.add_ring_side(
            coord,
            self.distance,
            Position::Right,
            Location::Interior,
            Location::Exterior,
        );
    }

    fn add_polygon(&mut self, poly: &Polygon) {
        let (offset_distance, offset_side) = if self.distance < 0.0 {
            (-self.distance, Position::Right)
        } else {
            (self.distance, Position::Left)
        };

        let shell = remove_repeated_points(&poly.shell);
        if self.distance <= 0.0 && shell.len() < MIN_RING_SIZE {
            return;
        }
        // an inward buffer that consumes the whole shell produces nothing
        if self.distance < 0.0 && is_eroded_completely(&shell, self.distance) {
            return;
        }
        self.add_ring_side(
            &shell,
            offset_distance,
            offset_side,
            Location::Exterior,
            Location::Interior,
        );

        for hole_raw in &poly.holes {
            let hole = remove_repeated_points(hole_raw);
            // an outward buffer may close a hole completely
            if self.distance > 0.0 && is_eroded_completely(&hole, -self.distance) {
                continue;
            }
            // the polygon interior lies outside the hole ring, so holes are
            // labelled with the opposite sides to the shell
            self.add_ring_side(
                &hole,
                offset_distance,
                offset_side.opposite(),
                Location::Interior,
                Location::Exterior,
            );
        }
    }

    /// Adds the offset curve of one ring side. The location arguments give
    /// the topology for a clockwise ring; counter-clockwise rings get the
    /// side and locations flipped.
    fn add_ring_side(
        &mut self,
        coord: &[Coordinate],
        offset_distance: f64,
        side: Position,
        cw_left_loc: Location,
        cw_right_loc: Location,
    ) {
        if offset_distance == 0.0 && coord.len() < MIN_RING_SIZE {
            return;
        }

        let mut left_loc = cw_left_loc;
        let mut right_loc = cw_right_loc;
        let mut side = side;
        if coord.len() >= MIN_RING_SIZE && is_ccw(coord) {
            left_loc = cw_right_loc;
            right_loc = cw_left_loc;
            side = side.opposite();
        }

        let Some(curve) = self.curve_builder.ring_curve(coord, side, offset_distance) else {
            return;
        };
        // a fully inverted curve would appear as an artifact ring inside
        // the result
        if is_ring_curve_inverted(coord, offset_distance, &curve) {
            return;
        }
        self.add_curve(curve, left_loc, right_loc);
    }

    fn add_curve(&mut self, curve: Vec<Coordinate>, left: Location, right: Location) {
        if curve.len() < 2 {
            return;
        }
        self.curves
            .push(NodedSegmentString::new(curve, Label::for_curve(left, right)));
    }
}

/// True if an inward buffer at this (negative) distance consumes the ring
/// entirely.
fn is_eroded_completely(ring: &[Coordinate], buffer_distance: f64) -> bool {
    if ring.len() < MIN_RING_SIZE {
        return buffer_distance < 0.0;
    }
    if ring.len() == MIN_RING_SIZE {
        return is_triangle_eroded_completely(ring, buffer_distance);
    }
    // The inward buffer is empty whenever the distance exceeds half the
    // envelope's smaller dimension.
    let env = Envelope::from_coords(ring);
    let env_min_dimension = env.width().min(env.height());
    buffer_distance < 0.0 && 2.0 * buffer_distance.abs() > env_min_dimension
}

fn is_triangle_eroded_completely(tri: &[Coordinate], buffer_distance: f64) -> bool {
    let incentre = triangle_incentre(&tri[0], &tri[1], &tri[2]);
    point_to_segment(&incentre, &tri[0], &tri[1]) < buffer_distance.abs()
}

/// The incentre of a triangle: the centre of the largest inscribed circle.
fn triangle_incentre(a: &Coordinate, b: &Coordinate, c: &Coordinate) -> Coordinate {
    let la = b.distance(c);
    let lb = a.distance(c);
    let lc = a.distance(b);
    let sum = la + lb + lc;
    if sum == 0.0 {
        return *a;
    }
    Coordinate::new(
        (la * a.x + lb * b.x + lc * c.x) / sum,
        (la * a.y + lb * b.y + lc * c.y) / sum,
    )
}

/// Detects an offset ring that inverted completely: a small curve lying
/// closer to the input linework than the offset distance everywhere.
fn is_ring_curve_inverted(input: &[Coordinate], distance: f64, curve: &[Coordinate]) -> bool {
    if distance == 0.0 {
        return false;
    }
    // only proper rings can invert
    if input.len() <= 3 {
        return false;
    }
    if curve.len() > MAX_INVERTED_RING_SIZE {
        return false;
    }
    let dist_max = curve
        .iter()
        .map(|p| point_to_line(p, input))
        .fold(0.0_f64, f64::max);
    dist_max < distance * NEARNESS_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Position as Pos;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn ccw_square(size: f64) -> Vec<Coordinate> {
        vec![
            c(0.0, 0.0),
            c(size, 0.0),
            c(size, size),
            c(0.0, size),
            c(0.0, 0.0),
        ]
    }

    fn curves_for(g: &Geometry, distance: f64) -> Vec<NodedSegmentString> {
        CurveSetBuilder::new(
            g,
            distance,
            PrecisionModel::Floating,
            BufferParameters::default(),
        )
        .curves()
    }

    #[test]
    fn polygon_emits_one_labelled_shell_curve() {
        let g = Geometry::Polygon(Polygon::new(ccw_square(10.0), Vec::new()));
        let curves = curves_for(&g, 1.0);
        assert_eq!(curves.len(), 1);
        // CCW shell: the buffer interior lies on the left of the curve
        let label = curves[0].label();
        assert_eq!(label.location(0, Pos::Left), Some(Location::Interior));
        assert_eq!(label.location(0, Pos::Right), Some(Location::Exterior));
    }

    #[test]
    fn fully_eroded_shell_emits_nothing() {
        let g = Geometry::Polygon(Polygon::new(ccw_square(10.0), Vec::new()));
        assert!(curves_for(&g, -6.0).is_empty());
    }

    #[test]
    fn negative_distance_keeps_viable_shell() {
        let g = Geometry::Polygon(Polygon::new(ccw_square(10.0), Vec::new()));
        assert_eq!(curves_for(&g, -2.0).len(), 1);
    }

    #[test]
    fn closed_hole_is_skipped_on_outward_buffer() {
        let hole = vec![
            c(4.0, 4.0),
            c(4.0, 5.0),
            c(5.0, 5.0),
            c(5.0, 4.0),
            c(4.0, 4.0),
        ];
        let g = Geometry::Polygon(Polygon::new(ccw_square(10.0), vec![hole]));
        // buffering outward by 2 closes the 1x1 hole: only the shell curve
        assert_eq!(curves_for(&g, 2.0).len(), 1);
        // a small outward buffer keeps it
        assert_eq!(curves_for(&g, 0.2).len(), 2);
    }

    #[test]
    fn line_with_negative_distance_emits_nothing() {
        let g = Geometry::LineString(vec![c(0.0, 0.0), c(10.0, 0.0)]);
        assert!(curves_for(&g, -1.0).is_empty());
        assert!(curves_for(&g, 0.0).is_empty());
    }

    #[test]
    fn point_emits_circle_curve() {
        let g = Geometry::Point(c(0.0, 0.0));
        let curves = curves_for(&g, 1.0);
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].coords().len(), 33);
        assert!(curves_for(&g, 0.0).is_empty());
    }

    #[test]
    fn closed_line_is_offset_on_both_sides() {
        let g = Geometry::LineString(ccw_square(10.0));
        let curves = curves_for(&g, 1.0);
        assert_eq!(curves.len(), 2);
    }

    #[test]
    fn triangle_erosion_uses_incentre() {
        let tri = vec![c(0.0, 0.0), c(10.0, 0.0), c(5.0, 1.0), c(0.0, 0.0)];
        // the inscribed circle of this sliver is well under radius 1
        assert!(is_eroded_completely(&tri, -1.0));
        let fat = vec![c(0.0, 0.0), c(10.0, 0.0), c(5.0, 8.0), c(0.0, 0.0)];
        assert!(!is_eroded_completely(&fat, -1.0));
    }
}
