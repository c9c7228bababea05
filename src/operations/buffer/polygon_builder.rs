use std::collections::{HashMap, HashSet};

use crate::error::{Result, TopologyError};
use crate::geometry::coordinate::{is_point_in_ring, signed_area};
use crate::geometry::{Coordinate, Envelope, Polygon};
use crate::topology::{DirEdgeId, PlanarGraph};

/// Assembles result polygons from the directed edges marked as buffer
/// boundary.
///
/// At each node the result edges are linked into rings: the successor of a
/// boundary edge is the next boundary edge clockwise from its reversal in
/// the destination star, which traces every face with its interior on the
/// left. Counter-clockwise rings become shells, clockwise rings holes;
/// each hole is then assigned to the smallest shell containing it.
#[derive(Debug, Default)]
pub struct PolygonBuilder {
    shells: Vec<EdgeRing>,
    holes: Vec<EdgeRing>,
}

#[derive(Debug)]
pub(crate) struct EdgeRing {
    pub(crate) coords: Vec<Coordinate>,
    pub(crate) area: f64,
    pub(crate) env: Envelope,
}

impl EdgeRing {
    /// Builds a ring record from closed coordinates.
    pub(crate) fn from_coords(coords: Vec<Coordinate>) -> Self {
        let area = signed_area(&coords);
        let env = Envelope::from_coords(&coords);
        Self { coords, area, env }
    }
}

impl PolygonBuilder {
    /// Creates an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks the result rings of one subgraph's directed edges.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoOutgoingEdge` when a boundary edge has no
    /// boundary successor, which indicates residual noding failures.
    pub fn add(&mut self, graph: &PlanarGraph, dir_edges: &[DirEdgeId]) -> Result<()> {
        let next_links = self.link_result_edges(graph, dir_edges)?;

        let mut used: HashSet<DirEdgeId> = HashSet::new();
        for &start in dir_edges {
            if !graph.dir_edges[start].in_result || used.contains(&start) {
                continue;
            }
            let ring = walk_ring(graph, &next_links, start, &mut used)?;
            if ring.coords.len() < 4 || ring.area == 0.0 {
                continue;
            }
            if ring.area > 0.0 {
                self.shells.push(ring);
            } else {
                self.holes.push(ring);
            }
        }
        Ok(())
    }

    /// The assembled polygons, shells with their nested holes.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnassignedHole` when a hole ring is
    /// contained in no shell.
    pub fn polygons(self) -> Result<Vec<Polygon>> {
        let shells = self.shells;
        let mut hole_lists: Vec<Vec<Vec<Coordinate>>> = shells.iter().map(|_| Vec::new()).collect();

        for hole in self.holes {
            let Some(shell_idx) = find_containing_shell(&shells, &hole) else {
                let c = hole.coords[0];
                return Err(TopologyError::UnassignedHole { x: c.x, y: c.y }.into());
            };
            hole_lists[shell_idx].push(hole.coords);
        }

        Ok(shells
            .into_iter()
            .zip(hole_lists)
            .map(|(shell, holes)| Polygon::new(shell.coords, holes))
            .collect())
    }

    /// For every boundary edge, finds its ring successor: the first
    /// boundary edge clockwise from the edge's reversal in the destination
    /// node's star.
    fn link_result_edges(
        &self,
        graph: &PlanarGraph,
        dir_edges: &[DirEdgeId],
    ) -> Result<HashMap<DirEdgeId, DirEdgeId>> {
        let mut links = HashMap::new();
        for &de in dir_edges {
            if !graph.dir_edges[de].in_result {
                continue;
            }
            let dest = graph.dest(de);
            let star = &graph.nodes[dest].star;
            let sym = graph.dir_edges[de].sym;
            let sym_idx = graph.star_index(dest, sym).unwrap_or(0);

            let mut next = None;
            for step in 1..star.len() {
                let k = (sym_idx + star.len() - step) % star.len();
                if graph.dir_edges[star[k]].in_result {
                    next = Some(star[k]);
                    break;
                }
            }
            let Some(next) = next else {
                let c = graph.nodes[dest].coord;
                return Err(TopologyError::NoOutgoingEdge { x: c.x, y: c.y }.into());
            };
            links.insert(de, next);
        }
        Ok(links)
    }
}

fn walk_ring(
    graph: &PlanarGraph,
    links: &HashMap<DirEdgeId, DirEdgeId>,
    start: DirEdgeId,
    used: &mut HashSet<DirEdgeId>,
) -> Result<EdgeRing> {
    let mut coords: Vec<Coordinate> = Vec::new();
    let mut de = start;
    let max_steps = links.len() + 1;

    for _ in 0..max_steps {
        used.insert(de);
        let chain = graph.dir_edge_coords(de);
        for p in chain {
            if coords.last() != Some(&p) {
                coords.push(p);
            }
        }
        let Some(&next) = links.get(&de) else {
            let c = graph.dir_edges[de].p0;
            return Err(TopologyError::NoOutgoingEdge { x: c.x, y: c.y }.into());
        };
        if next == start {
            break;
        }
        de = next;
    }

    // close the ring
    if coords.first() != coords.last() {
        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }
    }

    Ok(EdgeRing::from_coords(coords))
}

/// The smallest shell whose ring contains the hole, tested with a hole
/// vertex that is not a vertex of the shell (the rings may touch at
/// nodes).
pub(crate) fn find_containing_shell(shells: &[EdgeRing], hole: &EdgeRing) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, shell) in shells.iter().enumerate() {
        if !shell.env.contains_envelope(&hole.env) {
            continue;
        }
        let Some(test_pt) = hole
            .coords
            .iter()
            .copied()
            .find(|p| !shell.coords.contains(p))
        else {
            continue;
        };
        if !is_point_in_ring(&test_pt, &shell.coords) {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => shell.area.abs() < shells[b].area.abs(),
        };
        if better {
            best = Some(i);
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::buffer::subgraph::BufferSubgraph;
    use crate::topology::{depth_delta, Edge, Label, Location, NodeId};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn curve_edge(pts: Vec<Coordinate>) -> Edge {
        let label = Label::for_curve(Location::Exterior, Location::Interior);
        let mut e = Edge::new(pts, label);
        e.depth_delta = depth_delta(&e.label);
        e
    }

    fn build_polygons(edges: Vec<Edge>) -> Vec<Polygon> {
        let mut graph = PlanarGraph::new(edges);
        let starts: Vec<NodeId> = graph.node_ids().to_vec();
        let mut subgraphs = Vec::new();
        for n in starts {
            if !graph.nodes[n].visited {
                subgraphs.push(BufferSubgraph::create(&mut graph, n));
            }
        }
        subgraphs.sort_by(|a, b| {
            b.rightmost_coordinate()
                .x
                .total_cmp(&a.rightmost_coordinate().x)
        });

        let mut builder = PolygonBuilder::new();
        let mut processed: Vec<BufferSubgraph> = Vec::new();
        for sg in subgraphs {
            let outside_depth = super::super::depth_locater::SubgraphDepthLocater::new(
                &graph, &processed,
            )
            .depth(sg.rightmost_coordinate());
            sg.compute_depth(&mut graph, outside_depth).unwrap();
            sg.find_result_edges(&mut graph);
            processed.push(sg);
        }
        for sg in &processed {
            builder.add(&graph, sg.dir_edges()).unwrap();
        }
        builder.polygons().unwrap()
    }

    #[test]
    fn single_ring_yields_ccw_shell() {
        // CW input ring with the interior on its right
        let polys = build_polygons(vec![curve_edge(vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(0.0, 0.0),
        ])]);
        assert_eq!(polys.len(), 1);
        assert!(polys[0].holes.is_empty());
        assert!(signed_area(&polys[0].shell) > 0.0, "shell must be CCW");
        assert!((polys[0].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn nested_ring_becomes_hole() {
        // outer boundary (interior of the region on its inward side) and
        // an inner ring bounding a cavity: label sides accordingly.
        let outer = curve_edge(vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(0.0, 0.0),
        ]);
        // inner CW ring with interior of the region OUTSIDE it: the label
        // must put interior on the left of the CW traversal
        let mut inner = Edge::new(
            vec![
                c(3.0, 3.0),
                c(3.0, 7.0),
                c(7.0, 7.0),
                c(7.0, 3.0),
                c(3.0, 3.0),
            ],
            Label::for_curve(Location::Interior, Location::Exterior),
        );
        inner.depth_delta = depth_delta(&inner.label);

        let polys = build_polygons(vec![outer, inner]);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].holes.len(), 1);
        assert!((polys[0].area() - (100.0 - 16.0)).abs() < 1e-9);
        assert!(signed_area(&polys[0].holes[0]) < 0.0, "hole must be CW");
    }

    #[test]
    fn disjoint_rings_yield_two_polygons() {
        let a = curve_edge(vec![
            c(0.0, 0.0),
            c(0.0, 4.0),
            c(4.0, 4.0),
            c(4.0, 0.0),
            c(0.0, 0.0),
        ]);
        let b = curve_edge(vec![
            c(10.0, 0.0),
            c(10.0, 4.0),
            c(14.0, 4.0),
            c(14.0, 0.0),
            c(10.0, 0.0),
        ]);
        let polys = build_polygons(vec![a, b]);
        assert_eq!(polys.len(), 2);
    }
}
