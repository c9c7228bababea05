use std::collections::{BTreeSet, VecDeque};

use crate::error::{Result, TopologyError};
use crate::geometry::{Coordinate, Envelope};
use crate::math::orientation::{is_northern, orientation_index, CLOCKWISE, COUNTERCLOCKWISE};
use crate::topology::{DirEdgeId, NodeId, PlanarGraph, Position};

/// A connected component of the planar graph: its nodes, its directed
/// edges, the rightmost coordinate, and the directed edge whose right side
/// faces outward at that coordinate.
#[derive(Debug)]
pub struct BufferSubgraph {
    dir_edges: Vec<DirEdgeId>,
    nodes: Vec<NodeId>,
    rightmost: Coordinate,
    rightmost_edge: DirEdgeId,
    env: Envelope,
}

impl BufferSubgraph {
    /// Collects the connected subgraph reachable from `start`, marking its
    /// nodes visited in the graph.
    #[must_use]
    pub fn create(graph: &mut PlanarGraph, start: NodeId) -> Self {
        let mut nodes = Vec::new();
        let mut dir_edges = Vec::new();
        let mut queue = VecDeque::new();

        graph.nodes[start].visited = true;
        queue.push_back(start);
        while let Some(n) = queue.pop_front() {
            nodes.push(n);
            let star = graph.nodes[n].star.clone();
            for de in star {
                dir_edges.push(de);
                let adj = graph.dest(de);
                if !graph.nodes[adj].visited {
                    graph.nodes[adj].visited = true;
                    queue.push_back(adj);
                }
            }
        }

        let mut env = Envelope::empty();
        for &de in &dir_edges {
            let d = &graph.dir_edges[de];
            if d.forward {
                env.expand_to_include_envelope(&graph.edges[d.edge].envelope());
            }
        }

        let (rightmost_edge, rightmost) = find_rightmost_oriented_edge(graph, &dir_edges);

        Self {
            dir_edges,
            nodes,
            rightmost,
            rightmost_edge,
            env,
        }
    }

    /// The vertex with maximum x (ties: maximum y) over the subgraph.
    #[must_use]
    pub fn rightmost_coordinate(&self) -> Coordinate {
        self.rightmost
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.env
    }

    #[must_use]
    pub fn dir_edges(&self) -> &[DirEdgeId] {
        &self.dir_edges
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Propagates topological depths across the subgraph, seeding the
    /// right side of the rightmost directed edge with the given exterior
    /// depth.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DepthMismatch` when a node's star does not
    /// close consistently, which indicates residual noding failures.
    pub fn compute_depth(&self, graph: &mut PlanarGraph, outside_depth: i32) -> Result<()> {
        for &de in &self.dir_edges {
            graph.dir_edges[de].visited = false;
        }

        let start = self.rightmost_edge;
        graph.set_edge_depths(start, Position::Right, outside_depth);
        graph.copy_sym_depths(start);
        self.compute_depths_from(graph, start)
    }

    /// Breadth-first sweep over the subgraph's nodes, computing star
    /// depths at each from an edge with already-known depths.
    fn compute_depths_from(&self, graph: &mut PlanarGraph, start: DirEdgeId) -> Result<()> {
        let mut visited_nodes: BTreeSet<NodeId> = BTreeSet::new();
        let mut queue = VecDeque::new();

        let start_node = graph.dir_edges[start].origin;
        visited_nodes.insert(start_node);
        queue.push_back(start_node);
        graph.dir_edges[start].visited = true;

        while let Some(n) = queue.pop_front() {
            self.compute_node_depth(graph, n)?;
            let star = graph.nodes[n].star.clone();
            for de in star {
                let adj = graph.dest(de);
                if visited_nodes.insert(adj) {
                    queue.push_back(adj);
                }
            }
        }
        Ok(())
    }

    fn compute_node_depth(&self, graph: &mut PlanarGraph, n: NodeId) -> Result<()> {
        let star = graph.nodes[n].star.clone();

        // find an edge at this node whose depths are known
        let mut start_edge = None;
        for &de in &star {
            if graph.dir_edges[de].visited || graph.dir_edges[graph.dir_edges[de].sym].visited {
                start_edge = Some(de);
                break;
            }
        }
        let Some(start_edge) = start_edge else {
            let c = graph.nodes[n].coord;
            return Err(TopologyError::InvalidTopology(format!(
                "unable to find edge to compute depths at ({}, {})",
                c.x, c.y
            ))
            .into());
        };

        self.compute_star_depths(graph, n, &star, start_edge)?;

        for &de in &star {
            graph.dir_edges[de].visited = true;
            graph.copy_sym_depths(de);
        }
        Ok(())
    }

    /// Sweeps the star counter-clockwise from the known edge: each edge's
    /// right depth continues the previous edge's left depth, and the sweep
    /// must arrive back at the known edge's right depth.
    fn compute_star_depths(
        &self,
        graph: &mut PlanarGraph,
        node: NodeId,
        star: &[DirEdgeId],
        start: DirEdgeId,
    ) -> Result<()> {
        let start_idx = star.iter().position(|&d| d == start).unwrap_or(0);
        let start_depth = graph.dir_edges[start].depth(Position::Left);
        let target_last_depth = graph.dir_edges[start].depth(Position::Right);

        let mut curr = start_depth;
        let indices = (start_idx + 1..star.len()).chain(0..start_idx);
        for k in indices {
            let de = star[k];
            graph.set_edge_depths(de, Position::Right, curr);
            curr = graph.dir_edges[de].depth(Position::Left);
        }

        if curr != target_last_depth {
            let c = graph.nodes[node].coord;
            return Err(TopologyError::DepthMismatch { x: c.x, y: c.y }.into());
        }
        Ok(())
    }

    /// Marks the directed edges belonging to the buffer boundary: interior
    /// (depth ≥ 1) on the left, exterior (depth 0) on the right.
    pub fn find_result_edges(&self, graph: &mut PlanarGraph) {
        for &de in &self.dir_edges {
            let d = &graph.dir_edges[de];
            let in_result = d.depth_left >= 1 && d.depth_right == 0;
            graph.dir_edges[de].in_result = in_result;
        }
    }
}

/// Finds the directed edge at the subgraph's rightmost vertex oriented so
/// that its right side faces the exterior, along with that vertex.
fn find_rightmost_oriented_edge(
    graph: &PlanarGraph,
    dir_edges: &[DirEdgeId],
) -> (DirEdgeId, Coordinate) {
    let mut min_de = dir_edges[0];
    let mut min_index = 0usize;
    let mut min_coord: Option<Coordinate> = None;

    // scan the interior vertices of forward edges for the maximum x
    for &de in dir_edges {
        if !graph.dir_edges[de].forward {
            continue;
        }
        let coords = graph.edges[graph.dir_edges[de].edge].coords();
        for (i, c) in coords.iter().enumerate().take(coords.len() - 1) {
            let better = match min_coord {
                None => true,
                Some(m) => c.x > m.x || (c.x == m.x && c.y > m.y),
            };
            if better {
                min_de = de;
                min_index = i;
                min_coord = Some(*c);
            }
        }
    }
    let min_coord = min_coord.unwrap_or(graph.dir_edges[min_de].p0);

    let (min_de, min_index) = if min_index == 0 {
        rightmost_edge_at_node(graph, min_de)
    } else {
        (
            min_de,
            rightmost_index_at_vertex(graph, min_de, min_index, min_coord),
        )
    };

    let side = rightmost_side(graph, min_de, min_index);
    let oriented = if side == Position::Left {
        graph.dir_edges[min_de].sym
    } else {
        min_de
    };
    (oriented, min_coord)
}

/// The rightmost vertex is a node: pick the star edge bounding the
/// exterior wedge on the +x side.
fn rightmost_edge_at_node(graph: &PlanarGraph, de: DirEdgeId) -> (DirEdgeId, usize) {
    let node = graph.dir_edges[de].origin;
    let star = &graph.nodes[node].star;
    let de0 = star[0];
    if star.len() == 1 {
        return (de0, 0);
    }
    let de_last = star[star.len() - 1];
    let q0 = graph.dir_edges[de0].quadrant();
    let q1 = graph.dir_edges[de_last].quadrant();

    let best = if is_northern(q0) && is_northern(q1) {
        de0
    } else if !is_northern(q0) && !is_northern(q1) {
        de_last
    } else if graph.dir_edges[de0].dy() != 0.0 {
        // edges straddle the hemispheres: take a non-horizontal one
        de0
    } else {
        de_last
    };

    let d = &graph.dir_edges[best];
    if d.forward {
        (best, 0)
    } else {
        let sym = d.sym;
        let len = graph.edges[graph.dir_edges[sym].edge].coords().len();
        (sym, len - 1)
    }
}

/// The rightmost vertex is interior to an edge chain: decide whether the
/// preceding or following segment bounds the exterior.
fn rightmost_index_at_vertex(
    graph: &PlanarGraph,
    de: DirEdgeId,
    min_index: usize,
    min_coord: Coordinate,
) -> usize {
    let coords = graph.edges[graph.dir_edges[de].edge].coords();
    let p_prev = coords[min_index - 1];
    let p_next = coords[min_index + 1];
    let orientation = orientation_index(
        min_coord.x,
        min_coord.y,
        p_next.x,
        p_next.y,
        p_prev.x,
        p_prev.y,
    );

    let mut use_prev = false;
    if p_prev.y < min_coord.y && p_next.y < min_coord.y && orientation == COUNTERCLOCKWISE {
        use_prev = true;
    } else if p_prev.y > min_coord.y && p_next.y > min_coord.y && orientation == CLOCKWISE {
        use_prev = true;
    }

    if use_prev {
        min_index - 1
    } else {
        min_index
    }
}

/// Which side of the directed edge faces +x at the segment around the
/// rightmost vertex. Horizontal segments defer to the preceding one.
fn rightmost_side(graph: &PlanarGraph, de: DirEdgeId, index: usize) -> Position {
    if let Some(side) = rightmost_side_of_segment(graph, de, index as i64) {
        return side;
    }
    if let Some(side) = rightmost_side_of_segment(graph, de, index as i64 - 1) {
        return side;
    }
    // both neighbouring segments horizontal; the edge lies flat at the
    // extreme and either orientation yields a consistent seed
    Position::Left
}

fn rightmost_side_of_segment(graph: &PlanarGraph, de: DirEdgeId, i: i64) -> Option<Position> {
    let coords = graph.edges[graph.dir_edges[de].edge].coords();
    if i < 0 || (i + 1) as usize >= coords.len() {
        return None;
    }
    #[allow(clippy::cast_sign_loss)]
    let i = i as usize;
    if coords[i].y == coords[i + 1].y {
        return None;
    }
    Some(if coords[i].y < coords[i + 1].y {
        Position::Right
    } else {
        Position::Left
    })
}
