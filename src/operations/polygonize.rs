use std::collections::HashSet;

use crate::error::Result;
use crate::geometry::coordinate::remove_repeated_points;
use crate::geometry::{Coordinate, Polygon, PrecisionModel};
use crate::math::intersect_2d::LineIntersector;
use crate::noding::{noded_substrings, McIndexNoder, NodedSegmentString, Noder};
use crate::topology::{DirEdgeId, Edge, EdgeList, Label, PlanarGraph};

use super::buffer::polygon_builder::{find_containing_shell, EdgeRing};

/// Forms polygons from arbitrary linework: nodes it, removes dangling
/// edges, and walks the minimal rings of the remaining planar graph.
/// Counter-clockwise rings become shells, clockwise rings holes nested by
/// containment; the outer face and leftover dangles are discarded.
pub fn polygonize(lines: &[Vec<Coordinate>], precision: PrecisionModel) -> Result<Vec<Polygon>> {
    let mut strings: Vec<NodedSegmentString> = lines
        .iter()
        .map(|l| remove_repeated_points(l))
        .filter(|l| l.len() >= 2)
        .map(|l| NodedSegmentString::new(l, Label::default()))
        .collect();
    if strings.is_empty() {
        return Ok(Vec::new());
    }

    let mut noder = McIndexNoder::new(LineIntersector::new(precision));
    noder.compute_nodes(&mut strings)?;

    let mut edge_list = EdgeList::new();
    for s in noded_substrings(&strings) {
        let coords = remove_repeated_points(s.coords());
        if coords.len() < 2 {
            continue;
        }
        let e = Edge::new(coords, Label::default());
        if edge_list.find_equal_edge(&e).is_none() {
            edge_list.add(e);
        }
    }

    let graph = PlanarGraph::new(edge_list.into_edges());
    let excluded = excluded_dangles(&graph);

    let mut shells: Vec<EdgeRing> = Vec::new();
    let mut holes: Vec<EdgeRing> = Vec::new();
    let mut used: HashSet<DirEdgeId> = HashSet::new();

    for (start, d) in &graph.dir_edges {
        if excluded.contains(&d.edge) || used.contains(&start) {
            continue;
        }
        let Some(ring) = walk_face(&graph, &excluded, start, &mut used) else {
            continue;
        };
        if ring.coords.len() < 4 || ring.area == 0.0 {
            continue;
        }
        if ring.area > 0.0 {
            shells.push(ring);
        } else {
            holes.push(ring);
        }
    }

    let mut hole_lists: Vec<Vec<Vec<Coordinate>>> = shells.iter().map(|_| Vec::new()).collect();
    for hole in holes {
        // the outer face has no containing shell and is dropped here
        if let Some(idx) = find_containing_shell(&shells, &hole) {
            hole_lists[idx].push(hole.coords);
        }
    }

    Ok(shells
        .into_iter()
        .zip(hole_lists)
        .map(|(shell, holes)| Polygon::new(shell.coords, holes))
        .collect())
}

/// Edge indices unreachable from any ring: iteratively strips edges with a
/// free end (a node of live degree 1).
fn excluded_dangles(graph: &PlanarGraph) -> HashSet<usize> {
    let mut excluded: HashSet<usize> = HashSet::new();
    loop {
        let mut changed = false;
        for &n in graph.node_ids() {
            let live: Vec<usize> = graph.nodes[n]
                .star
                .iter()
                .map(|&de| graph.dir_edges[de].edge)
                .filter(|e| !excluded.contains(e))
                .collect();
            if live.len() == 1 && excluded.insert(live[0]) {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    excluded
}

/// Traces one face ring: the successor of a directed edge is the next live
/// edge clockwise from its reversal in the destination star.
fn walk_face(
    graph: &PlanarGraph,
    excluded: &HashSet<usize>,
    start: DirEdgeId,
    used: &mut HashSet<DirEdgeId>,
) -> Option<EdgeRing> {
    let mut coords: Vec<Coordinate> = Vec::new();
    let mut de = start;
    let max_steps = graph.dir_edges.len() + 1;

    for _ in 0..max_steps {
        used.insert(de);
        for p in graph.dir_edge_coords(de) {
            if coords.last() != Some(&p) {
                coords.push(p);
            }
        }

        let dest = graph.dest(de);
        let star = &graph.nodes[dest].star;
        let sym = graph.dir_edges[de].sym;
        let sym_idx = graph.star_index(dest, sym)?;

        let mut next = None;
        for step in 1..star.len() {
            let k = (sym_idx + star.len() - step) % star.len();
            if !excluded.contains(&graph.dir_edges[star[k]].edge) {
                next = Some(star[k]);
                break;
            }
        }
        let next = next?;
        if next == start {
            break;
        }
        de = next;
    }

    if coords.first() != coords.last() {
        let first = *coords.first()?;
        coords.push(first);
    }
    Some(EdgeRing::from_coords(coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn square_ring(x0: f64, y0: f64, size: f64) -> Vec<Coordinate> {
        vec![
            c(x0, y0),
            c(x0 + size, y0),
            c(x0 + size, y0 + size),
            c(x0, y0 + size),
            c(x0, y0),
        ]
    }

    #[test]
    fn single_ring_polygonizes() {
        let polys = polygonize(&[square_ring(0.0, 0.0, 10.0)], PrecisionModel::Floating).unwrap();
        assert_eq!(polys.len(), 1);
        assert!((polys[0].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn nested_rings_become_shell_and_hole() {
        let polys = polygonize(
            &[square_ring(0.0, 0.0, 10.0), square_ring(3.0, 3.0, 4.0)],
            PrecisionModel::Floating,
        )
        .unwrap();
        // the inner ring forms both a hole of the outer polygon and its
        // own polygon
        assert_eq!(polys.len(), 2);
        let total_area: f64 = polys.iter().map(Polygon::area).sum();
        assert!((total_area - 100.0).abs() < 1e-9, "area={total_area}");
    }

    #[test]
    fn dangles_are_ignored() {
        let polys = polygonize(
            &[
                square_ring(0.0, 0.0, 10.0),
                vec![c(10.0, 5.0), c(15.0, 5.0)],
            ],
            PrecisionModel::Floating,
        )
        .unwrap();
        assert_eq!(polys.len(), 1);
        assert!((polys[0].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn crossing_lines_split_into_faces() {
        // a ring cut by a chord: two faces
        let polys = polygonize(
            &[
                square_ring(0.0, 0.0, 10.0),
                vec![c(0.0, 5.0), c(10.0, 5.0)],
            ],
            PrecisionModel::Floating,
        )
        .unwrap();
        assert_eq!(polys.len(), 2);
        for p in &polys {
            assert!((p.area() - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn no_ring_means_no_polygons() {
        let polys = polygonize(
            &[vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 1.0)]],
            PrecisionModel::Floating,
        )
        .unwrap();
        assert!(polys.is_empty());
    }
}
