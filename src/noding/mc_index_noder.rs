use static_aabb2d_index::StaticAABB2DIndexBuilder;

use crate::error::{OperationError, Result};
use crate::geometry::Envelope;
use crate::math::intersect_2d::LineIntersector;
use crate::math::orientation::quadrant;

use super::segment_string::NodedSegmentString;
use super::Noder;

/// A maximal run of segments whose direction vectors stay in one quadrant.
/// Monotonicity means the chain's envelope is spanned by its two end
/// vertices, and two chains can cross at most where their envelopes
/// overlap.
#[derive(Debug, Clone)]
struct MonotoneChain {
    string: usize,
    /// First vertex of the chain.
    start: usize,
    /// Last vertex of the chain.
    end: usize,
    env: Envelope,
}

/// The default noder: monotone chains indexed in a static AABB tree, with
/// a shared robust [`LineIntersector`] computing the split points.
///
/// Fast but not snap-robust; a snap-rounding noder can be injected into
/// the orchestrator instead when inputs demand it.
#[derive(Debug)]
pub struct McIndexNoder {
    li: LineIntersector,
}

impl McIndexNoder {
    /// Creates a noder around a precision-bound intersector.
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self { li }
    }

    fn overlap_ranges(
        &mut self,
        strings: &mut [NodedSegmentString],
        s0: usize,
        a_start: usize,
        a_end: usize,
        s1: usize,
        b_start: usize,
        b_end: usize,
    ) {
        if a_end - a_start == 1 && b_end - b_start == 1 {
            self.process_segment_pair(strings, s0, a_start, s1, b_start);
            return;
        }

        let env_a =
            Envelope::from_segment(&strings[s0].coords()[a_start], &strings[s0].coords()[a_end]);
        let env_b =
            Envelope::from_segment(&strings[s1].coords()[b_start], &strings[s1].coords()[b_end]);
        if !env_a.intersects(&env_b) {
            return;
        }

        let a_mid = (a_start + a_end) / 2;
        let b_mid = (b_start + b_end) / 2;
        if a_end - a_start > 1 && b_end - b_start > 1 {
            self.overlap_ranges(strings, s0, a_start, a_mid, s1, b_start, b_mid);
            self.overlap_ranges(strings, s0, a_start, a_mid, s1, b_mid, b_end);
            self.overlap_ranges(strings, s0, a_mid, a_end, s1, b_start, b_mid);
            self.overlap_ranges(strings, s0, a_mid, a_end, s1, b_mid, b_end);
        } else if a_end - a_start > 1 {
            self.overlap_ranges(strings, s0, a_start, a_mid, s1, b_start, b_end);
            self.overlap_ranges(strings, s0, a_mid, a_end, s1, b_start, b_end);
        } else {
            self.overlap_ranges(strings, s0, a_start, a_end, s1, b_start, b_mid);
            self.overlap_ranges(strings, s0, a_start, a_end, s1, b_mid, b_end);
        }
    }

    fn process_segment_pair(
        &mut self,
        strings: &mut [NodedSegmentString],
        s0: usize,
        i0: usize,
        s1: usize,
        i1: usize,
    ) {
        if s0 == s1 && i0 == i1 {
            return;
        }

        let (p00, p01) = {
            let cs = strings[s0].coords();
            (cs[i0], cs[i0 + 1])
        };
        let (p10, p11) = {
            let cs = strings[s1].coords();
            (cs[i1], cs[i1 + 1])
        };

        self.li.compute_intersection(&p00, &p01, &p10, &p11);
        if !self.li.has_intersection() {
            return;
        }
        if self.is_trivial_intersection(strings, s0, i0, s1, i1) {
            return;
        }

        strings[s0].add_intersections(&self.li, i0);
        strings[s1].add_intersections(&self.li, i1);
    }

    /// A single-point intersection between adjacent segments of one string
    /// (including the closing segment pair of a ring) is just their shared
    /// vertex, not a node.
    fn is_trivial_intersection(
        &self,
        strings: &[NodedSegmentString],
        s0: usize,
        i0: usize,
        s1: usize,
        i1: usize,
    ) -> bool {
        if s0 != s1 || self.li.intersection_count() != 1 {
            return false;
        }
        if i0.abs_diff(i1) == 1 {
            return true;
        }
        if strings[s0].is_closed() {
            let last_seg = strings[s0].coords().len() - 2;
            if (i0 == 0 && i1 == last_seg) || (i1 == 0 && i0 == last_seg) {
                return true;
            }
        }
        false
    }
}

impl Noder for McIndexNoder {
    fn compute_nodes(&mut self, strings: &mut [NodedSegmentString]) -> Result<()> {
        let chains = build_chains(strings);
        if chains.is_empty() {
            return Ok(());
        }

        let mut builder = StaticAABB2DIndexBuilder::new(chains.len());
        for ch in &chains {
            builder.add(ch.env.min_x, ch.env.min_y, ch.env.max_x, ch.env.max_y);
        }
        let index = builder
            .build()
            .map_err(|e| OperationError::Failed(format!("chain index build failed: {e}")))?;

        for (i, a) in chains.iter().enumerate() {
            for j in index.query(a.env.min_x, a.env.min_y, a.env.max_x, a.env.max_y) {
                // process each unordered chain pair once
                if j <= i {
                    continue;
                }
                let b = &chains[j];
                self.overlap_ranges(strings, a.string, a.start, a.end, b.string, b.start, b.end);
            }
        }
        Ok(())
    }
}

/// Decomposes every string into monotone chains.
fn build_chains(strings: &[NodedSegmentString]) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    for (si, s) in strings.iter().enumerate() {
        let coords = s.coords();
        if coords.len() < 2 {
            continue;
        }
        let mut start = 0;
        while start < coords.len() - 1 {
            let end = find_chain_end(coords, start);
            chains.push(MonotoneChain {
                string: si,
                start,
                end,
                env: Envelope::from_segment(&coords[start], &coords[end]),
            });
            start = end;
        }
    }
    chains
}

fn find_chain_end(coords: &[crate::geometry::Coordinate], start: usize) -> usize {
    let chain_quad = quadrant(
        coords[start + 1].x - coords[start].x,
        coords[start + 1].y - coords[start].y,
    );
    let mut last = start + 1;
    while last < coords.len() - 1 {
        let q = quadrant(
            coords[last + 1].x - coords[last].x,
            coords[last + 1].y - coords[last].y,
        );
        if q != chain_quad {
            break;
        }
        last += 1;
    }
    last
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Coordinate, PrecisionModel};
    use crate::noding::segment_string::noded_substrings;
    use crate::topology::{Label, Location};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn string(pts: Vec<Coordinate>) -> NodedSegmentString {
        NodedSegmentString::new(pts, Label::for_curve(Location::Exterior, Location::Interior))
    }

    fn noder() -> McIndexNoder {
        McIndexNoder::new(LineIntersector::new(PrecisionModel::Floating))
    }

    #[test]
    fn crossing_strings_are_split() {
        let mut strings = vec![
            string(vec![c(0.0, 0.0), c(4.0, 4.0)]),
            string(vec![c(0.0, 4.0), c(4.0, 0.0)]),
        ];
        noder().compute_nodes(&mut strings).unwrap();
        let subs = noded_substrings(&strings);
        assert_eq!(subs.len(), 4);
        for sub in &subs {
            assert!(sub
                .coords()
                .iter()
                .any(|p| (p.x - 2.0).abs() < 1e-9 && (p.y - 2.0).abs() < 1e-9));
        }
    }

    #[test]
    fn self_intersecting_string_is_split() {
        // a bowtie: one string crossing itself at (2, 2)
        let mut strings = vec![string(vec![
            c(0.0, 0.0),
            c(4.0, 4.0),
            c(4.0, 0.0),
            c(0.0, 4.0),
        ])];
        noder().compute_nodes(&mut strings).unwrap();
        let subs = noded_substrings(&strings);
        assert_eq!(subs.len(), 4);
    }

    #[test]
    fn adjacent_segments_do_not_node() {
        let mut strings = vec![string(vec![c(0.0, 0.0), c(1.0, 1.0), c(2.0, 0.0)])];
        noder().compute_nodes(&mut strings).unwrap();
        let subs = noded_substrings(&strings);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].coords().len(), 3);
    }

    #[test]
    fn ring_closing_segments_do_not_node() {
        let mut strings = vec![string(vec![
            c(0.0, 0.0),
            c(4.0, 0.0),
            c(4.0, 4.0),
            c(0.0, 4.0),
            c(0.0, 0.0),
        ])];
        noder().compute_nodes(&mut strings).unwrap();
        let subs = noded_substrings(&strings);
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn disjoint_strings_are_untouched() {
        let mut strings = vec![
            string(vec![c(0.0, 0.0), c(1.0, 0.0)]),
            string(vec![c(0.0, 5.0), c(1.0, 5.0)]),
        ];
        noder().compute_nodes(&mut strings).unwrap();
        let subs = noded_substrings(&strings);
        assert_eq!(subs.len(), 2);
    }
}
