/// Topological location of a point relative to a source geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// A side position relative to a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    On,
    Left,
    Right,
}

impl Position {
    /// The opposite side (`On` is its own opposite).
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::On,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// The per-side locations of one source geometry along an edge.
///
/// Unset slots mean "no information yet"; `merge` fills them from another
/// location without overwriting known values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TopologyLocation {
    pub on: Option<Location>,
    pub left: Option<Location>,
    pub right: Option<Location>,
}

impl TopologyLocation {
    /// Creates a fully specified area location.
    #[must_use]
    pub fn area(on: Location, left: Location, right: Location) -> Self {
        Self {
            on: Some(on),
            left: Some(left),
            right: Some(right),
        }
    }

    /// Returns the location for a side.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Location> {
        match pos {
            Position::On => self.on,
            Position::Left => self.left,
            Position::Right => self.right,
        }
    }

    /// Exchanges the left and right locations.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }

    /// Fills unset slots from another location (pointwise
    /// maximum-information combination).
    pub fn merge(&mut self, other: &TopologyLocation) {
        if self.on.is_none() {
            self.on = other.on;
        }
        if self.left.is_none() {
            self.left = other.left;
        }
        if self.right.is_none() {
            self.right = other.right;
        }
    }
}

/// Topological label of an edge: side locations for up to two source
/// geometries. The buffer pipeline labels everything under source 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Label {
    geoms: [TopologyLocation; 2],
}

impl Label {
    /// Label for a buffer curve: the curve is boundary linework of source
    /// 0, with the given interior/exterior sides.
    #[must_use]
    pub fn for_curve(left: Location, right: Location) -> Self {
        Self {
            geoms: [
                TopologyLocation::area(Location::Boundary, left, right),
                TopologyLocation::default(),
            ],
        }
    }

    /// Returns the location of a source geometry on a side.
    #[must_use]
    pub fn location(&self, geom: usize, pos: Position) -> Option<Location> {
        self.geoms[geom].get(pos)
    }

    /// Exchanges left and right locations for all sources.
    pub fn flip(&mut self) {
        for g in &mut self.geoms {
            g.flip();
        }
    }

    /// Merges another label into this one, filling unset slots.
    pub fn merge(&mut self, other: &Label) {
        for (g, o) in self.geoms.iter_mut().zip(other.geoms.iter()) {
            g.merge(o);
        }
    }
}
