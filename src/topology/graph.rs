use std::cmp::Ordering;
use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::geometry::{Coordinate, OrderedCoordinate};
use crate::math::orientation::{orientation_index, quadrant};

use super::edge::Edge;
use super::label::Position;

slotmap::new_key_type! {
    /// Unique identifier for a node in the planar graph.
    pub struct NodeId;
}

slotmap::new_key_type! {
    /// Unique identifier for a directed edge in the planar graph.
    pub struct DirEdgeId;
}

/// A node: a coordinate plus the star of outgoing directed edges, kept
/// sorted counter-clockwise from the positive x axis.
#[derive(Debug)]
pub struct NodeData {
    pub coord: Coordinate,
    pub star: Vec<DirEdgeId>,
    pub visited: bool,
}

/// One traversal direction of an edge.
#[derive(Debug)]
pub struct DirEdgeData {
    /// Index of the underlying edge in [`PlanarGraph::edges`].
    pub edge: usize,
    pub forward: bool,
    pub origin: NodeId,
    pub sym: DirEdgeId,
    /// Direction points for angular sorting: the origin coordinate and the
    /// next coordinate along the edge.
    pub p0: Coordinate,
    pub p1: Coordinate,
    pub depth_left: i32,
    pub depth_right: i32,
    pub visited: bool,
    pub in_result: bool,
}

impl DirEdgeData {
    /// Depth on the given side.
    #[must_use]
    pub fn depth(&self, pos: Position) -> i32 {
        match pos {
            Position::Left => self.depth_left,
            Position::Right => self.depth_right,
            Position::On => 0,
        }
    }

    pub fn set_depth(&mut self, pos: Position, depth: i32) {
        match pos {
            Position::Left => self.depth_left = depth,
            Position::Right => self.depth_right = depth,
            Position::On => {}
        }
    }

    #[must_use]
    pub fn dy(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    /// Quadrant of the direction vector, counter-clockwise from +x.
    #[must_use]
    pub fn quadrant(&self) -> i32 {
        quadrant(self.p1.x - self.p0.x, self.p1.y - self.p0.y)
    }
}

/// The planar graph of noded, deduplicated edges.
///
/// Nodes and directed edges live in arenas and reference each other by
/// typed keys, so the inherently cyclic structure (edge ↔ node ↔ star)
/// carries no ownership cycles. Each edge contributes two directed
/// edges, one per traversal direction, linked as `sym` pairs.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    pub edges: Vec<Edge>,
    pub nodes: SlotMap<NodeId, NodeData>,
    pub dir_edges: SlotMap<DirEdgeId, DirEdgeData>,
    node_map: BTreeMap<OrderedCoordinate, NodeId>,
    node_order: Vec<NodeId>,
}

impl PlanarGraph {
    /// Builds the graph from deduplicated edges. Every chain must have at
    /// least two points and no repeated consecutive points.
    #[must_use]
    pub fn new(edges: Vec<Edge>) -> Self {
        let mut graph = Self {
            edges,
            ..Self::default()
        };

        for i in 0..graph.edges.len() {
            let (first, second, last, penult) = {
                let cs = graph.edges[i].coords();
                (cs[0], cs[1], cs[cs.len() - 1], cs[cs.len() - 2])
            };
            let n0 = graph.ensure_node(first);
            let n1 = graph.ensure_node(last);

            let fwd = graph.dir_edges.insert(DirEdgeData {
                edge: i,
                forward: true,
                origin: n0,
                sym: DirEdgeId::default(),
                p0: first,
                p1: second,
                depth_left: 0,
                depth_right: 0,
                visited: false,
                in_result: false,
            });
            let bwd = graph.dir_edges.insert(DirEdgeData {
                edge: i,
                forward: false,
                origin: n1,
                sym: fwd,
                p0: last,
                p1: penult,
                depth_left: 0,
                depth_right: 0,
                visited: false,
                in_result: false,
            });
            graph.dir_edges[fwd].sym = bwd;

            graph.insert_into_star(n0, fwd);
            graph.insert_into_star(n1, bwd);
        }

        graph
    }

    /// Node identifiers in creation order (deterministic).
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_order
    }

    /// The destination node of a directed edge.
    #[must_use]
    pub fn dest(&self, de: DirEdgeId) -> NodeId {
        self.dir_edges[self.dir_edges[de].sym].origin
    }

    /// The edge's coordinate chain in the directed edge's traversal
    /// direction.
    #[must_use]
    pub fn dir_edge_coords(&self, de: DirEdgeId) -> Vec<Coordinate> {
        let d = &self.dir_edges[de];
        let coords = self.edges[d.edge].coords();
        if d.forward {
            coords.to_vec()
        } else {
            coords.iter().rev().copied().collect()
        }
    }

    /// Position of a directed edge within its origin node's star.
    #[must_use]
    pub fn star_index(&self, node: NodeId, de: DirEdgeId) -> Option<usize> {
        self.nodes[node].star.iter().position(|&d| d == de)
    }

    /// Assigns the depth on one side of a directed edge and derives the
    /// opposite side from the edge's depth delta (negated for the reverse
    /// traversal direction).
    pub fn set_edge_depths(&mut self, de: DirEdgeId, pos: Position, depth: i32) {
        let mut delta = self.edges[self.dir_edges[de].edge].depth_delta;
        if !self.dir_edges[de].forward {
            delta = -delta;
        }
        let factor = if pos == Position::Left { -1 } else { 1 };
        let opposite = depth + delta * factor;

        let d = &mut self.dir_edges[de];
        d.set_depth(pos, depth);
        d.set_depth(pos.opposite(), opposite);
    }

    /// Copies a directed edge's depths onto its sym, with sides exchanged.
    pub fn copy_sym_depths(&mut self, de: DirEdgeId) {
        let (left, right, sym) = {
            let d = &self.dir_edges[de];
            (d.depth_left, d.depth_right, d.sym)
        };
        let s = &mut self.dir_edges[sym];
        s.depth_left = right;
        s.depth_right = left;
    }

    fn ensure_node(&mut self, coord: Coordinate) -> NodeId {
        if let Some(&id) = self.node_map.get(&OrderedCoordinate(coord)) {
            return id;
        }
        let id = self.nodes.insert(NodeData {
            coord,
            star: Vec::new(),
            visited: false,
        });
        self.node_map.insert(OrderedCoordinate(coord), id);
        self.node_order.push(id);
        id
    }

    fn insert_into_star(&mut self, node: NodeId, de: DirEdgeId) {
        let node_coord = self.nodes[node].coord;
        let p1 = self.dir_edges[de].p1;

        let star: Vec<DirEdgeId> = self.nodes[node].star.clone();
        let mut pos = star.len();
        for (k, &other) in star.iter().enumerate() {
            let other_p1 = self.dir_edges[other].p1;
            if compare_direction(&node_coord, &p1, &other_p1) == Ordering::Less {
                pos = k;
                break;
            }
        }
        self.nodes[node].star.insert(pos, de);
    }
}

/// Angular order of two direction points around a shared origin:
/// counter-clockwise from the positive x axis, by quadrant first, then by
/// robust orientation within a quadrant.
#[must_use]
pub fn compare_direction(origin: &Coordinate, a: &Coordinate, b: &Coordinate) -> Ordering {
    let qa = quadrant(a.x - origin.x, a.y - origin.y);
    let qb = quadrant(b.x - origin.x, b.y - origin.y);
    match qa.cmp(&qb) {
        Ordering::Equal => {
            match orientation_index(origin.x, origin.y, b.x, b.y, a.x, a.y) {
                1 => Ordering::Greater,
                -1 => Ordering::Less,
                _ => Ordering::Equal,
            }
        }
        ord => ord,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::label::{Label, Location};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn edge(pts: Vec<Coordinate>) -> Edge {
        Edge::new(pts, Label::for_curve(Location::Exterior, Location::Interior))
    }

    #[test]
    fn builds_nodes_and_sym_pairs() {
        let graph = PlanarGraph::new(vec![
            edge(vec![c(0.0, 0.0), c(1.0, 0.0)]),
            edge(vec![c(1.0, 0.0), c(1.0, 1.0)]),
        ]);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.dir_edges.len(), 4);

        for (id, de) in &graph.dir_edges {
            assert_eq!(graph.dir_edges[de.sym].sym, id);
            assert_eq!(graph.dest(de.sym), de.origin);
        }
    }

    #[test]
    fn shared_endpoint_becomes_one_node() {
        let graph = PlanarGraph::new(vec![
            edge(vec![c(0.0, 0.0), c(1.0, 0.0)]),
            edge(vec![c(1.0, 0.0), c(2.0, 0.5)]),
            edge(vec![c(1.0, 0.0), c(1.0, -1.0)]),
        ]);
        let shared = graph
            .node_ids()
            .iter()
            .find(|&&n| graph.nodes[n].coord == c(1.0, 0.0))
            .copied()
            .unwrap();
        assert_eq!(graph.nodes[shared].star.len(), 3);
    }

    #[test]
    fn star_is_sorted_ccw_from_positive_x() {
        let graph = PlanarGraph::new(vec![
            edge(vec![c(0.0, 0.0), c(1.0, 0.1)]),
            edge(vec![c(0.0, 0.0), c(0.0, 1.0)]),
            edge(vec![c(0.0, 0.0), c(-1.0, 0.0)]),
            edge(vec![c(0.0, 0.0), c(0.0, -1.0)]),
        ]);
        let origin = graph
            .node_ids()
            .iter()
            .find(|&&n| graph.nodes[n].coord == c(0.0, 0.0))
            .copied()
            .unwrap();
        let star = &graph.nodes[origin].star;
        assert_eq!(star.len(), 4);
        let quads: Vec<i32> = star.iter().map(|&d| graph.dir_edges[d].quadrant()).collect();
        assert_eq!(quads, vec![0, 0, 1, 3]);

        // within the NE quadrant, the flatter direction sorts first
        let first = graph.dir_edges[star[0]].p1;
        assert_eq!(first, c(1.0, 0.1));
    }

    #[test]
    fn set_edge_depths_applies_delta() {
        let mut graph = PlanarGraph::new(vec![edge(vec![c(0.0, 0.0), c(1.0, 0.0)])]);
        graph.edges[0].depth_delta = 1;
        let (fwd_id, _) = graph
            .dir_edges
            .iter()
            .find(|(_, d)| d.forward)
            .map(|(id, d)| (id, d.sym))
            .unwrap();

        graph.set_edge_depths(fwd_id, Position::Right, 0);
        assert_eq!(graph.dir_edges[fwd_id].depth_right, 0);
        assert_eq!(graph.dir_edges[fwd_id].depth_left, 1);

        graph.copy_sym_depths(fwd_id);
        let sym = graph.dir_edges[fwd_id].sym;
        assert_eq!(graph.dir_edges[sym].depth_left, 0);
        assert_eq!(graph.dir_edges[sym].depth_right, 1);
    }
}
