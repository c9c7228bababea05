use std::cmp::Ordering;

use crate::geometry::{Coordinate, OrderedCoordinate};
use crate::math::orientation::{orientation_index, CLOCKWISE};
use crate::topology::{DirEdgeId, PlanarGraph, Position};

use super::subgraph::BufferSubgraph;

/// Computes the topological depth at a query point by stabbing a ray in
/// the +x direction through the edges of already-processed subgraphs.
///
/// The processing order (subgraphs sorted by descending rightmost
/// coordinate) guarantees that every subgraph surrounding the query point
/// has already been processed, so its edge depths are final.
#[derive(Debug)]
pub struct SubgraphDepthLocater<'a> {
    graph: &'a PlanarGraph,
    subgraphs: &'a [BufferSubgraph],
}

impl<'a> SubgraphDepthLocater<'a> {
    /// Creates a locater over the processed subgraphs.
    #[must_use]
    pub fn new(graph: &'a PlanarGraph, subgraphs: &'a [BufferSubgraph]) -> Self {
        Self { graph, subgraphs }
    }

    /// The depth of the region containing `p`: 0 if no processed segment
    /// lies to its right, otherwise the depth on the facing side of the
    /// closest stabbed segment.
    #[must_use]
    pub fn depth(&self, p: Coordinate) -> i32 {
        let stabbed = self.find_stabbed_segments(p);
        stabbed
            .into_iter()
            .min_by(DepthSegment::compare)
            .map_or(0, |ds| ds.facing_depth)
    }

    fn find_stabbed_segments(&self, p: Coordinate) -> Vec<DepthSegment> {
        let mut stabbed = Vec::new();
        for sg in self.subgraphs {
            let env = sg.envelope();
            if p.y < env.min_y || p.y > env.max_y {
                continue;
            }
            for &de in sg.dir_edges() {
                if !self.graph.dir_edges[de].forward {
                    continue;
                }
                self.find_stabbed_on_edge(p, de, &mut stabbed);
            }
        }
        stabbed
    }

    fn find_stabbed_on_edge(&self, p: Coordinate, de: DirEdgeId, out: &mut Vec<DepthSegment>) {
        let d = &self.graph.dir_edges[de];
        let coords = self.graph.edges[d.edge].coords();

        for i in 0..coords.len() - 1 {
            let (mut p0, mut p1) = (coords[i], coords[i + 1]);
            // orient the segment upwards
            let flipped = p0.y > p1.y;
            if flipped {
                std::mem::swap(&mut p0, &mut p1);
            }

            // entirely left of the stabbing ray
            if p0.x.max(p1.x) < p.x {
                continue;
            }
            // horizontal segments cannot be stabbed meaningfully
            if p0.y == p1.y {
                continue;
            }
            if p.y < p0.y || p.y > p1.y {
                continue;
            }
            // the ray origin must not lie to the right of the segment
            if orientation_index(p0.x, p0.y, p1.x, p1.y, p.x, p.y) == CLOCKWISE {
                continue;
            }

            // depth on the side facing the ray origin: left of the upward
            // direction, which is the directed edge's left or right side
            // depending on whether the segment was flipped
            let facing_depth = if flipped {
                d.depth(Position::Right)
            } else {
                d.depth(Position::Left)
            };
            out.push(DepthSegment {
                p0,
                p1,
                facing_depth,
            });
        }
    }
}

/// An upward-oriented segment stabbed by the depth ray, with the depth on
/// its side facing the ray origin.
#[derive(Debug, Clone, Copy)]
struct DepthSegment {
    p0: Coordinate,
    p1: Coordinate,
    facing_depth: i32,
}

impl DepthSegment {
    fn min_x(&self) -> f64 {
        self.p0.x.min(self.p1.x)
    }

    fn max_x(&self) -> f64 {
        self.p0.x.max(self.p1.x)
    }

    /// Total order on stabbed segments by x along the ray: trivially
    /// ordered when the x-intervals are disjoint, otherwise by pairwise
    /// orientation, with a lexicographic fallback for overlapping
    /// collinear segments.
    fn compare(a: &DepthSegment, b: &DepthSegment) -> Ordering {
        if a.min_x() >= b.max_x() {
            return Ordering::Greater;
        }
        if a.max_x() <= b.min_x() {
            return Ordering::Less;
        }

        let orient = a.orientation_of(b);
        if orient != 0 {
            return int_order(orient);
        }
        let orient = -b.orientation_of(a);
        if orient != 0 {
            return int_order(orient);
        }

        // lexicographic fallback keeps the order total and deterministic
        OrderedPair(
            OrderedCoordinate(a.p0),
            OrderedCoordinate(a.p1),
        )
        .cmp(&OrderedPair(
            OrderedCoordinate(b.p0),
            OrderedCoordinate(b.p1),
        ))
    }

    /// Orientation of `other` relative to this upward segment: +1 when
    /// `other` lies to the left, -1 to the right, 0 when indeterminate.
    fn orientation_of(&self, other: &DepthSegment) -> i32 {
        let o0 = orientation_index(
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, other.p0.x, other.p0.y,
        );
        let o1 = orientation_index(
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, other.p1.x, other.p1.y,
        );
        if o0 >= 0 && o1 >= 0 {
            return o0.max(o1);
        }
        if o0 <= 0 && o1 <= 0 {
            return o0.min(o1);
        }
        0
    }
}

fn int_order(orient: i32) -> Ordering {
    if orient > 0 {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct OrderedPair(OrderedCoordinate, OrderedCoordinate);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{depth_delta, Edge, Label, Location};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    /// Builds a processed single-ring subgraph (CW square, interior on the
    /// right of the traversal) with final depths.
    fn processed_square(
        x0: f64,
        y0: f64,
        size: f64,
    ) -> (PlanarGraph, Vec<BufferSubgraph>) {
        let label = Label::for_curve(Location::Exterior, Location::Interior);
        let mut e = Edge::new(
            vec![
                c(x0, y0),
                c(x0, y0 + size),
                c(x0 + size, y0 + size),
                c(x0 + size, y0),
                c(x0, y0),
            ],
            label,
        );
        e.depth_delta = depth_delta(&e.label);

        let mut graph = PlanarGraph::new(vec![e]);
        let start = graph.node_ids()[0];
        let sg = BufferSubgraph::create(&mut graph, start);
        sg.compute_depth(&mut graph, 0).unwrap();
        sg.find_result_edges(&mut graph);
        (graph, vec![sg])
    }

    #[test]
    fn depth_outside_is_zero() {
        let (graph, sgs) = processed_square(0.0, 0.0, 10.0);
        let locater = SubgraphDepthLocater::new(&graph, &sgs);
        // left of the ring the ray stabs both walls; the closest faces
        // the exterior
        assert_eq!(locater.depth(c(-5.0, 5.0)), 0);
        assert_eq!(locater.depth(c(20.0, 5.0)), 0);
        assert_eq!(locater.depth(c(5.0, 20.0)), 0);
    }

    #[test]
    fn depth_inside_is_one() {
        let (graph, sgs) = processed_square(0.0, 0.0, 10.0);
        let locater = SubgraphDepthLocater::new(&graph, &sgs);
        assert_eq!(locater.depth(c(5.0, 5.0)), 1);
    }

    #[test]
    fn no_processed_subgraphs_means_depth_zero() {
        let graph = PlanarGraph::default();
        let locater = SubgraphDepthLocater::new(&graph, &[]);
        assert_eq!(locater.depth(c(0.0, 0.0)), 0);
    }
}
