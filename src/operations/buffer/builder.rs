use crate::error::{OperationError, Result};
use crate::geometry::coordinate::{length as line_length, remove_repeated_points};
use crate::geometry::{Coordinate, Geometry, Polygon, PrecisionModel};
use crate::math::distance_2d::point_to_linework;
use crate::math::intersect_2d::LineIntersector;
use crate::noding::{McIndexNoder, NodedSegmentString, Noder};
use crate::operations::linemerge::merge_lines;
use crate::operations::polygonize::polygonize;
use crate::topology::{depth_delta, Edge, EdgeList, Label, NodeId, PlanarGraph};

use super::curve_set::CurveSetBuilder;
use super::depth_locater::SubgraphDepthLocater;
use super::offset_curve::OffsetCurveBuilder;
use super::params::{BufferParameters, EndCapStyle};
use super::polygon_builder::PolygonBuilder;
use super::subgraph::BufferSubgraph;

/// Relative snap tolerance for matching one-sided offset linework against
/// the buffer boundary. The divergence it absorbs is noding jitter on
/// curves built from the same arithmetic, far below this bound.
const SINGLE_SIDED_SNAP_FACTOR: f64 = 1.0e-6;

/// Cooperative cancellation predicate, polled between pipeline stages.
pub type InterruptFn = dyn Fn() -> bool;

/// Computes the buffer of a geometry with the given parameters.
///
/// Convenience entry point using default parameters and the floating
/// precision model.
///
/// # Errors
///
/// See [`BufferBuilder::buffer`].
pub fn buffer(g: &Geometry, distance: f64) -> Result<Geometry> {
    BufferBuilder::new(BufferParameters::default()).buffer(g, distance)
}

/// Top-level orchestrator of the buffering pipeline: curve set → noding →
/// edge unification → planar graph → subgraphs → depth assignment →
/// polygon assembly, plus the single-sided clean-ups.
///
/// A builder is single-use: `buffer` and `buffer_line_single_sided`
/// consume it. Distinct builders share nothing but their (read-only)
/// parameters and precision model.
pub struct BufferBuilder {
    params: BufferParameters,
    working_precision: Option<PrecisionModel>,
    noder: Option<Box<dyn Noder>>,
    interrupt: Option<Box<InterruptFn>>,
}

impl std::fmt::Debug for BufferBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferBuilder")
            .field("params", &self.params)
            .field("working_precision", &self.working_precision)
            .finish_non_exhaustive()
    }
}

impl BufferBuilder {
    /// Creates a builder with the given parameters.
    #[must_use]
    pub fn new(params: BufferParameters) -> Self {
        Self {
            params,
            working_precision: None,
            noder: None,
            interrupt: None,
        }
    }

    /// Overrides the precision model (default: floating).
    #[must_use]
    pub fn with_precision_model(mut self, precision: PrecisionModel) -> Self {
        self.working_precision = Some(precision);
        self
    }

    /// Injects a custom noder (e.g. a snap-rounding one) in place of the
    /// default monotone-chain index noder.
    #[must_use]
    pub fn with_noder(mut self, noder: Box<dyn Noder>) -> Self {
        self.noder = Some(noder);
        self
    }

    /// Installs a cooperative interrupt predicate; when it returns true
    /// between pipeline stages the operation aborts with a cancellation
    /// error.
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: Box<InterruptFn>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Computes the buffer of `g` at the signed distance.
    ///
    /// # Errors
    ///
    /// Returns parameter validation errors, `Cancelled` when interrupted,
    /// and `TopologyError` when noding leaves the graph inconsistent. No
    /// partial result is ever returned.
    pub fn buffer(self, g: &Geometry, distance: f64) -> Result<Geometry> {
        self.params.validate()?;

        // single-sided buffering is defined per component; buffer each
        // part with a fresh builder and union the results
        if self.params.single_sided && g.component_count() > 1 {
            let mut parts = Vec::new();
            for comp in g.components() {
                let mut sub = BufferBuilder::new(self.params);
                if let Some(pm) = self.working_precision {
                    sub = sub.with_precision_model(pm);
                }
                parts.push(sub.buffer(&comp, distance)?);
            }
            return union_geometries(parts, self.params, self.working_precision);
        }

        let precision = self.working_precision.unwrap_or_default();
        self.buffer_with(g, distance, precision)
    }

    /// Computes the one-sided offset line of a linestring: the portion of
    /// the raw offset curve lying on the boundary of the two-sided
    /// flat-capped buffer, merged and trimmed of cap artifacts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for non-linestring input; otherwise as
    /// [`BufferBuilder::buffer`].
    pub fn buffer_line_single_sided(
        self,
        g: &Geometry,
        distance: f64,
        left_side: bool,
    ) -> Result<Geometry> {
        let Geometry::LineString(line) = g else {
            return Err(OperationError::InvalidInput(
                "single-sided buffering accepts only line strings".into(),
            )
            .into());
        };
        if distance == 0.0 {
            return Ok(g.clone());
        }
        self.params.validate()?;

        let precision = self.working_precision.unwrap_or_default();
        let input = remove_repeated_points(line);
        if input.len() < 2 {
            return Ok(Geometry::empty_line_string());
        }

        // the two-sided flat-capped buffer provides the reference boundary
        let mut mod_params = self.params;
        mod_params.end_cap_style = EndCapStyle::Flat;
        mod_params.single_sided = false;
        let buf = BufferBuilder::new(mod_params)
            .with_precision_model(precision)
            .buffer(g, distance)?;
        let boundary = buf.boundary_lines();

        // the raw one-sided offset curve
        let curve_builder = OffsetCurveBuilder::new(precision, mod_params);
        let Some(raw) = curve_builder.single_sided_line_curve(&input, distance, left_side) else {
            return Ok(Geometry::empty_line_string());
        };

        // keep the offset linework lying on the buffer boundary
        let snap_tol = SINGLE_SIDED_SNAP_FACTOR * distance.abs();
        let kept = linework_intersection(vec![raw], &boundary, snap_tol, precision)?;
        let merged = merge_lines(kept);

        // strip cap arcs leaking past the line ends
        let input_length = line_length(&input);
        let start_pt = input[0];
        let end_pt = input[input.len() - 1];
        let mut result_lines: Vec<Vec<Coordinate>> = Vec::new();
        for line in merged {
            if let Some(trimmed) =
                trim_line_ends(&line, &start_pt, &end_pt, distance, input_length)
            {
                result_lines.push(trimmed);
            }
        }

        Ok(match result_lines.len() {
            0 => Geometry::empty_line_string(),
            1 => Geometry::LineString(result_lines.remove(0)),
            _ => Geometry::MultiLineString(result_lines),
        })
    }

    fn buffer_with(
        mut self,
        g: &Geometry,
        distance: f64,
        precision: PrecisionModel,
    ) -> Result<Geometry> {
        self.check_interrupt()?;
        let curves = CurveSetBuilder::new(g, distance, precision, self.params).curves();
        if curves.is_empty() {
            return Ok(empty_result(g));
        }

        self.check_interrupt()?;
        let edges = self.compute_noded_edges(curves, precision)?;

        self.check_interrupt()?;
        let mut graph = PlanarGraph::new(edges);
        let subgraphs = create_subgraphs(&mut graph);

        self.check_interrupt()?;
        let polys = build_subgraphs(&mut graph, subgraphs)?;
        if polys.is_empty() {
            return Ok(empty_result(g));
        }

        let mut result = if polys.len() == 1 {
            let mut polys = polys;
            Geometry::Polygon(polys.remove(0))
        } else {
            Geometry::MultiPolygon(polys)
        };

        if self.params.single_sided {
            result = single_sided_areal_cleanup(g, &result, precision)?;
        }
        Ok(result)
    }

    /// Nodes the curve set and folds the substrings into unique edges,
    /// merging labels and summing depth deltas of coincident arcs.
    fn compute_noded_edges(
        &mut self,
        mut curves: Vec<NodedSegmentString>,
        precision: PrecisionModel,
    ) -> Result<Vec<Edge>> {
        let mut fallback;
        let noder: &mut dyn Noder = match self.noder.as_mut() {
            Some(n) => n.as_mut(),
            None => {
                fallback = McIndexNoder::new(LineIntersector::new(precision));
                &mut fallback
            }
        };

        noder.compute_nodes(&mut curves)?;
        let noded = noder.noded_substrings(&curves);

        let mut edge_list = EdgeList::new();
        for s in noded {
            let coords = remove_repeated_points(s.coords());
            if coords.len() < 2 {
                // collapsed edge
                continue;
            }
            insert_unique_edge(&mut edge_list, Edge::new(coords, *s.label()));
        }
        Ok(edge_list.into_edges())
    }

    fn check_interrupt(&self) -> Result<()> {
        if let Some(interrupt) = &self.interrupt {
            if interrupt() {
                return Err(OperationError::Cancelled.into());
            }
        }
        Ok(())
    }
}

/// Inserts an edge, or merges it into a geometrically equal edge already
/// present: a reversed duplicate has its label flipped first, then labels
/// merge and depth deltas add.
fn insert_unique_edge(edge_list: &mut EdgeList, mut e: Edge) {
    if let Some(idx) = edge_list.find_equal_edge(&e) {
        let mut label_to_merge = e.label;
        if !edge_list.get(idx).is_pointwise_equal(&e) {
            label_to_merge.flip();
        }
        let existing = edge_list.get_mut(idx);
        existing.label.merge(&label_to_merge);
        existing.depth_delta += depth_delta(&label_to_merge);
    } else {
        e.depth_delta = depth_delta(&e.label);
        edge_list.add(e);
    }
}

/// Extracts the connected subgraphs, sorted in descending order of their
/// rightmost coordinate so shells are processed before the holes they
/// contain.
fn create_subgraphs(graph: &mut PlanarGraph) -> Vec<BufferSubgraph> {
    let starts: Vec<NodeId> = graph.node_ids().to_vec();
    let mut subgraphs = Vec::new();
    for n in starts {
        if !graph.nodes[n].visited {
            subgraphs.push(BufferSubgraph::create(graph, n));
        }
    }
    subgraphs.sort_by(|a, b| {
        let (ra, rb) = (a.rightmost_coordinate(), b.rightmost_coordinate());
        rb.x.total_cmp(&ra.x).then(rb.y.total_cmp(&ra.y))
    });
    subgraphs
}

/// Assigns depths per subgraph (querying only already-processed
/// subgraphs), marks result edges, and assembles the polygons.
fn build_subgraphs(graph: &mut PlanarGraph, subgraphs: Vec<BufferSubgraph>) -> Result<Vec<Polygon>> {
    let mut processed: Vec<BufferSubgraph> = Vec::new();
    for sg in subgraphs {
        let outside_depth =
            SubgraphDepthLocater::new(graph, &processed).depth(sg.rightmost_coordinate());
        sg.compute_depth(graph, outside_depth)?;
        sg.find_result_edges(graph);
        processed.push(sg);
    }

    let mut builder = PolygonBuilder::new();
    for sg in &processed {
        builder.add(graph, sg.dir_edges())?;
    }
    builder.polygons()
}

/// The empty result for an input that produced no curves: an empty
/// polygon for areal and puntal inputs, an empty line for lineal ones.
fn empty_result(g: &Geometry) -> Geometry {
    if g.dimension() == 1 {
        Geometry::empty_line_string()
    } else {
        Geometry::empty_polygon()
    }
}

/// Unary union of a set of polygonal geometries, computed as their
/// zero-distance buffer.
fn union_geometries(
    parts: Vec<Geometry>,
    params: BufferParameters,
    precision: Option<PrecisionModel>,
) -> Result<Geometry> {
    let union_params = BufferParameters {
        single_sided: false,
        ..params
    };
    let mut builder = BufferBuilder::new(union_params);
    if let Some(pm) = precision {
        builder = builder.with_precision_model(pm);
    }
    builder.buffer(&Geometry::GeometryCollection(parts), 0.0)
}

/// Clean-up for the single-sided areal buffer: re-polygonize the input
/// linework together with the result boundary, and when artifacts split
/// the strip into several polygons keep the largest.
fn single_sided_areal_cleanup(
    input: &Geometry,
    result: &Geometry,
    precision: PrecisionModel,
) -> Result<Geometry> {
    let mut linework = if input.dimension() > 1 {
        input.boundary_lines()
    } else {
        input.linework()
    };
    linework.extend(result.boundary_lines());

    let polys = polygonize(&linework, precision)?;
    if polys.len() > 1 {
        if let Some(biggest) = polys
            .into_iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
        {
            return Ok(Geometry::Polygon(biggest));
        }
    }
    Ok(result.clone())
}

/// Nodes the first line set against the second and keeps the substrings
/// of the first whose segments lie on the second set's linework.
fn linework_intersection(
    a: Vec<Vec<Coordinate>>,
    b: &[Vec<Coordinate>],
    tol: f64,
    precision: PrecisionModel,
) -> Result<Vec<Vec<Coordinate>>> {
    let a_count = a.len();
    let mut strings: Vec<NodedSegmentString> = a
        .into_iter()
        .map(|l| NodedSegmentString::new(l, Label::default()))
        .collect();
    for l in b {
        strings.push(NodedSegmentString::new(l.clone(), Label::default()));
    }

    let mut noder = McIndexNoder::new(LineIntersector::new(precision));
    noder.compute_nodes(&mut strings)?;

    let mut kept = Vec::new();
    for s in strings.iter().take(a_count) {
        for sub in s.noded_substrings() {
            let on_boundary = sub.coords().windows(2).all(|w| {
                let mid = Coordinate::new((w[0].x + w[1].x) / 2.0, (w[0].y + w[1].y) / 2.0);
                point_to_linework(&mid, b) <= tol
            });
            if on_boundary {
                kept.push(sub.coords().to_vec());
            }
        }
    }
    Ok(kept)
}

/// Shrinks a merged offset line from both ends while the end vertex lies
/// within the trim allowance of the input's endpoints and the adjacent
/// segment is no longer than the buffer width. This removes cap arcs that
/// leak into the result without clipping genuine short segments.
fn trim_line_ends(
    coords: &[Coordinate],
    start_pt: &Coordinate,
    end_pt: &Coordinate,
    distance: f64,
    input_length: f64,
) -> Option<Vec<Coordinate>> {
    if coords.len() < 2 {
        return None;
    }
    let distance = distance.abs();
    // Bound the allowance by 98% of the buffer width, tightened for long
    // inputs so artifacts cannot slip through at large distances.
    let pt_dist_allowance = (distance - input_length * 0.1).max(distance * 0.98);
    let seg_length_allowance = 1.02 * distance;

    let mut front = 0usize;
    let mut back = coords.len() - 1;
    let mut sz = back - front + 1;

    while sz > 1 && coords[front].distance(start_pt) < pt_dist_allowance {
        if coords[front].distance(&coords[front + 1]) > seg_length_allowance {
            break;
        }
        front += 1;
        sz -= 1;
    }
    while sz > 1 && coords[front].distance(end_pt) < pt_dist_allowance {
        if coords[front].distance(&coords[front + 1]) > seg_length_allowance {
            break;
        }
        front += 1;
        sz -= 1;
    }
    while sz > 1 && coords[back].distance(start_pt) < pt_dist_allowance {
        if coords[back].distance(&coords[back - 1]) > seg_length_allowance {
            break;
        }
        back -= 1;
        sz -= 1;
    }
    while sz > 1 && coords[back].distance(end_pt) < pt_dist_allowance {
        if coords[back].distance(&coords[back - 1]) > seg_length_allowance {
            break;
        }
        back -= 1;
        sz -= 1;
    }

    (sz > 1).then(|| coords[front..=back].to_vec())
}
