use std::collections::BTreeMap;

use crate::geometry::OrderedCoordinate;

use super::edge::Edge;

/// De-duplicating store for noded edges.
///
/// Edges are keyed by the canonical form of their coordinate chain (the
/// lexicographically smaller of the forward and reversed chains), so a
/// lookup finds a previously inserted edge that is equal in either
/// direction. A `BTreeMap` keeps the lookup order deterministic.
#[derive(Debug, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
    index: BTreeMap<Vec<OrderedCoordinate>, usize>,
}

impl EdgeList {
    /// Creates an empty edge list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of a previously inserted edge equal to `e`
    /// (forward or reversed), if any.
    #[must_use]
    pub fn find_equal_edge(&self, e: &Edge) -> Option<usize> {
        self.index.get(&canonical_key(e)).copied()
    }

    /// Inserts an edge, assuming no equal edge is present, and returns its
    /// index.
    pub fn add(&mut self, e: Edge) -> usize {
        let key = canonical_key(&e);
        let idx = self.edges.len();
        self.edges.push(e);
        self.index.insert(key, idx);
        idx
    }

    /// Returns the edge at `idx`.
    #[must_use]
    pub fn get(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    /// Returns the edge at `idx` mutably.
    pub fn get_mut(&mut self, idx: usize) -> &mut Edge {
        &mut self.edges[idx]
    }

    /// Consumes the list, yielding the stored edges in insertion order.
    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Canonical chain key: the smaller of the forward and reversed chains
/// under the coordinate total order.
fn canonical_key(e: &Edge) -> Vec<OrderedCoordinate> {
    let forward: Vec<OrderedCoordinate> =
        e.coords().iter().map(|c| OrderedCoordinate(*c)).collect();
    let mut reversed = forward.clone();
    reversed.reverse();
    if reversed < forward {
        reversed
    } else {
        forward
    }
}
