use crate::geometry::Coordinate;
use crate::math::intersect_2d::LineIntersector;
use crate::topology::Label;

/// An intersection point recorded on a segment string during noding.
#[derive(Debug, Clone, Copy)]
struct SegmentNode {
    coord: Coordinate,
    segment_index: usize,
    /// Distance from the segment's start vertex, ordering nodes that share
    /// a segment.
    dist: f64,
}

/// An ordered coordinate chain with a topological label, accumulating the
/// intersection points found during noding. Querying splits the chain into
/// substrings at those points.
#[derive(Debug, Clone)]
pub struct NodedSegmentString {
    coords: Vec<Coordinate>,
    label: Label,
    nodes: Vec<SegmentNode>,
}

impl NodedSegmentString {
    /// Creates a segment string over a coordinate chain.
    #[must_use]
    pub fn new(coords: Vec<Coordinate>, label: Label) -> Self {
        Self {
            coords,
            label,
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// True if the chain starts and ends at the same coordinate.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.coords.len() > 2 && self.coords.first() == self.coords.last()
    }

    /// Records an intersection point lying on the segment at
    /// `segment_index`. A point coinciding with the segment's end vertex is
    /// normalized onto the following segment.
    pub fn add_intersection(&mut self, pt: Coordinate, segment_index: usize) {
        let mut seg = segment_index;
        if seg + 1 < self.coords.len() && pt == self.coords[seg + 1] {
            seg += 1;
        }
        let dist = pt.distance(&self.coords[seg]);
        self.nodes.push(SegmentNode {
            coord: pt,
            segment_index: seg,
            dist,
        });
    }

    /// Records all intersection points of the intersector's last
    /// computation against the segment at `segment_index`.
    pub fn add_intersections(&mut self, li: &LineIntersector, segment_index: usize) {
        for i in 0..li.intersection_count() {
            self.add_intersection(li.intersection(i), segment_index);
        }
    }

    /// Splits this string at its recorded nodes, yielding the fully noded
    /// substrings. Each substring carries a copy of the label.
    #[must_use]
    pub fn noded_substrings(&self) -> Vec<NodedSegmentString> {
        if self.coords.len() < 2 {
            return Vec::new();
        }

        let mut nodes = self.nodes.clone();
        nodes.push(SegmentNode {
            coord: self.coords[0],
            segment_index: 0,
            dist: 0.0,
        });
        nodes.push(SegmentNode {
            coord: self.coords[self.coords.len() - 1],
            segment_index: self.coords.len() - 1,
            dist: 0.0,
        });
        nodes.sort_by(|a, b| {
            a.segment_index
                .cmp(&b.segment_index)
                .then(a.dist.total_cmp(&b.dist))
        });
        nodes.dedup_by(|a, b| a.segment_index == b.segment_index && a.coord == b.coord);

        let mut result = Vec::with_capacity(nodes.len() - 1);
        for w in nodes.windows(2) {
            let (n0, n1) = (&w[0], &w[1]);
            let mut pts = vec![n0.coord];
            for v in (n0.segment_index + 1)..=n1.segment_index.min(self.coords.len() - 1) {
                if pts.last() != Some(&self.coords[v]) {
                    pts.push(self.coords[v]);
                }
            }
            if pts.last() != Some(&n1.coord) {
                pts.push(n1.coord);
            }
            if pts.len() >= 2 {
                result.push(NodedSegmentString::new(pts, self.label));
            }
        }
        result
    }
}

/// Splits every string in a collection at its recorded nodes.
#[must_use]
pub fn noded_substrings(strings: &[NodedSegmentString]) -> Vec<NodedSegmentString> {
    strings
        .iter()
        .flat_map(NodedSegmentString::noded_substrings)
        .collect()
}
