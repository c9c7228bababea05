pub mod mc_index_noder;
pub mod segment_string;

pub use mc_index_noder::McIndexNoder;
pub use segment_string::{noded_substrings, NodedSegmentString};

use crate::error::Result;

/// Capability interface for noding a collection of segment strings.
///
/// After `compute_nodes`, no two segments of the collection cross
/// interior-to-interior without both carrying a split point at the
/// crossing. The concrete implementation is chosen at orchestrator
/// construction; [`McIndexNoder`] is the default.
pub trait Noder {
    /// Computes all intersections among the strings, recording split
    /// points on each string.
    fn compute_nodes(&mut self, strings: &mut [NodedSegmentString]) -> Result<()>;

    /// The fully noded substrings of the input strings.
    fn noded_substrings(&self, strings: &[NodedSegmentString]) -> Vec<NodedSegmentString> {
        segment_string::noded_substrings(strings)
    }
}
