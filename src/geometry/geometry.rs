use super::coordinate::{length, signed_area, Coordinate};
use super::envelope::Envelope;

/// A polygon: one shell ring plus zero or more hole rings.
///
/// Rings are stored closed (first coordinate repeated at the end). Shells
/// are oriented counter-clockwise, holes clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub shell: Vec<Coordinate>,
    pub holes: Vec<Vec<Coordinate>>,
}

impl Polygon {
    /// Creates a polygon from a shell and holes.
    #[must_use]
    pub fn new(shell: Vec<Coordinate>, holes: Vec<Vec<Coordinate>>) -> Self {
        Self { shell, holes }
    }

    /// True if the polygon has no shell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    /// Area enclosed by the shell minus the holes.
    #[must_use]
    pub fn area(&self) -> f64 {
        let mut area = signed_area(&self.shell).abs();
        for hole in &self.holes {
            area -= signed_area(hole).abs();
        }
        area
    }
}

/// A planar vector geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    Polygon(Polygon),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// An empty polygon (the empty areal result).
    #[must_use]
    pub fn empty_polygon() -> Self {
        Self::Polygon(Polygon::new(Vec::new(), Vec::new()))
    }

    /// An empty line string (the empty linear result).
    #[must_use]
    pub fn empty_line_string() -> Self {
        Self::LineString(Vec::new())
    }

    /// True if the geometry contains no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::LineString(pts) | Self::MultiPoint(pts) => pts.is_empty(),
            Self::Polygon(p) => p.is_empty(),
            Self::MultiLineString(lines) => lines.iter().all(Vec::is_empty),
            Self::MultiPolygon(polys) => polys.iter().all(Polygon::is_empty),
            Self::GeometryCollection(geoms) => geoms.iter().all(Geometry::is_empty),
        }
    }

    /// Topological dimension: 0 for puntal, 1 for lineal, 2 for areal.
    /// Collections report the maximum over their parts.
    #[must_use]
    pub fn dimension(&self) -> i32 {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => 0,
            Self::LineString(_) | Self::MultiLineString(_) => 1,
            Self::Polygon(_) | Self::MultiPolygon(_) => 2,
            Self::GeometryCollection(geoms) => {
                geoms.iter().map(Geometry::dimension).max().unwrap_or(0)
            }
        }
    }

    /// Number of top-level components (1 for atomic geometries).
    #[must_use]
    pub fn component_count(&self) -> usize {
        match self {
            Self::MultiPoint(pts) => pts.len(),
            Self::MultiLineString(lines) => lines.len(),
            Self::MultiPolygon(polys) => polys.len(),
            Self::GeometryCollection(geoms) => geoms.len(),
            _ => 1,
        }
    }

    /// Top-level components as owned geometries (atomic geometries yield
    /// a single-element list).
    #[must_use]
    pub fn components(&self) -> Vec<Geometry> {
        match self {
            Self::MultiPoint(pts) => pts.iter().map(|p| Self::Point(*p)).collect(),
            Self::MultiLineString(lines) => {
                lines.iter().map(|l| Self::LineString(l.clone())).collect()
            }
            Self::MultiPolygon(polys) => polys.iter().map(|p| Self::Polygon(p.clone())).collect(),
            Self::GeometryCollection(geoms) => geoms.clone(),
            _ => vec![self.clone()],
        }
    }

    /// Total enclosed area of the polygonal parts.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Polygon(p) => p.area(),
            Self::MultiPolygon(polys) => polys.iter().map(Polygon::area).sum(),
            Self::GeometryCollection(geoms) => geoms.iter().map(Geometry::area).sum(),
            _ => 0.0,
        }
    }

    /// Total length of the lineal parts.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::LineString(pts) => length(pts),
            Self::MultiLineString(lines) => lines.iter().map(|l| length(l)).sum(),
            Self::GeometryCollection(geoms) => geoms.iter().map(Geometry::length).sum(),
            _ => 0.0,
        }
    }

    /// Envelope of all coordinates in the geometry.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        for line in self.linework() {
            env.expand_to_include_envelope(&Envelope::from_coords(&line));
        }
        match self {
            Self::Point(p) => env.expand_to_include(p),
            Self::MultiPoint(pts) => {
                for p in pts {
                    env.expand_to_include(p);
                }
            }
            _ => {}
        }
        env
    }

    /// The boundary rings of the polygonal parts, as closed coordinate
    /// chains.
    #[must_use]
    pub fn boundary_lines(&self) -> Vec<Vec<Coordinate>> {
        let mut lines = Vec::new();
        self.collect_boundary_lines(&mut lines);
        lines
    }

    fn collect_boundary_lines(&self, out: &mut Vec<Vec<Coordinate>>) {
        match self {
            Self::Polygon(p) => {
                if !p.shell.is_empty() {
                    out.push(p.shell.clone());
                }
                for hole in &p.holes {
                    out.push(hole.clone());
                }
            }
            Self::MultiPolygon(polys) => {
                for p in polys {
                    Self::Polygon(p.clone()).collect_boundary_lines(out);
                }
            }
            Self::GeometryCollection(geoms) => {
                for g in geoms {
                    g.collect_boundary_lines(out);
                }
            }
            _ => {}
        }
    }

    /// All lineal coordinate chains in the geometry: line strings plus
    /// polygon rings.
    #[must_use]
    pub fn linework(&self) -> Vec<Vec<Coordinate>> {
        let mut lines = Vec::new();
        self.collect_linework(&mut lines);
        lines
    }

    fn collect_linework(&self, out: &mut Vec<Vec<Coordinate>>) {
        match self {
            Self::LineString(pts) => {
                if pts.len() >= 2 {
                    out.push(pts.clone());
                }
            }
            Self::MultiLineString(lines) => {
                for l in lines {
                    if l.len() >= 2 {
                        out.push(l.clone());
                    }
                }
            }
            Self::Polygon(_) | Self::MultiPolygon(_) => {
                self.collect_boundary_lines(out);
            }
            Self::GeometryCollection(geoms) => {
                for g in geoms {
                    g.collect_linework(out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_ccw() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ]
    }

    #[test]
    fn polygon_area_subtracts_holes() {
        let hole = vec![
            Coordinate::new(0.25, 0.25),
            Coordinate::new(0.25, 0.75),
            Coordinate::new(0.75, 0.75),
            Coordinate::new(0.75, 0.25),
            Coordinate::new(0.25, 0.25),
        ];
        let poly = Polygon::new(unit_square_ccw(), vec![hole]);
        assert!((poly.area() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn empty_results_are_empty() {
        assert!(Geometry::empty_polygon().is_empty());
        assert!(Geometry::empty_line_string().is_empty());
        assert_eq!(Geometry::empty_polygon().dimension(), 2);
    }

    #[test]
    fn components_of_collection() {
        let g = Geometry::GeometryCollection(vec![
            Geometry::Point(Coordinate::new(0.0, 0.0)),
            Geometry::LineString(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)]),
        ]);
        assert_eq!(g.component_count(), 2);
        assert_eq!(g.dimension(), 1);
        assert_eq!(g.components().len(), 2);
    }

    #[test]
    fn boundary_lines_of_polygon() {
        let poly = Geometry::Polygon(Polygon::new(unit_square_ccw(), Vec::new()));
        let boundary = poly.boundary_lines();
        assert_eq!(boundary.len(), 1);
        assert_eq!(boundary[0].len(), 5);
        assert!((poly.length()).abs() < 1e-12);
        assert!((poly.area() - 1.0).abs() < 1e-12);
    }
}
