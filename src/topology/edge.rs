use crate::geometry::{Coordinate, Envelope};

use super::label::{Label, Location, Position};

/// A labelled edge of the noded linework: an immutable coordinate chain,
/// a topological label, and a mutable depth delta.
///
/// Two edges are equal when their chains are identical either pointwise or
/// reversed.
#[derive(Debug, Clone)]
pub struct Edge {
    coords: Vec<Coordinate>,
    pub label: Label,
    pub depth_delta: i32,
}

impl Edge {
    /// Creates an edge with a zero depth delta.
    #[must_use]
    pub fn new(coords: Vec<Coordinate>, label: Label) -> Self {
        Self {
            coords,
            label,
            depth_delta: 0,
        }
    }

    /// The edge's coordinate chain.
    #[must_use]
    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    /// Envelope of the chain.
    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_coords(&self.coords)
    }

    /// True if the chains are identical in the same direction.
    #[must_use]
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.coords == other.coords
    }

    /// True if the chains are identical in the same or reversed direction.
    #[must_use]
    pub fn is_equal(&self, other: &Edge) -> bool {
        if self.coords.len() != other.coords.len() {
            return false;
        }
        self.is_pointwise_equal(other)
            || self
                .coords
                .iter()
                .rev()
                .zip(other.coords.iter())
                .all(|(a, b)| a == b)
    }
}

/// The change in topological depth crossing an edge from its right side to
/// its left side, as implied by the label.
#[must_use]
pub fn depth_delta(label: &Label) -> i32 {
    let left = label.location(0, Position::Left);
    let right = label.location(0, Position::Right);
    if left == Some(Location::Interior) && right == Some(Location::Exterior) {
        1
    } else if left == Some(Location::Exterior) && right == Some(Location::Interior) {
        -1
    } else {
        0
    }
}
