use super::coordinate::Coordinate;

/// Numeric precision model for coordinate snapping.
///
/// All coordinates produced inside the buffering pipeline (offset curve
/// vertices, intersection points) are passed through the active model, so
/// downstream exact-equality structures see a consistent grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full double-precision coordinates, no snapping.
    #[default]
    Floating,
    /// Coordinates snapped to a grid of spacing `1 / scale`.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Snaps a single ordinate to the model's grid.
    #[must_use]
    pub fn make_precise_value(&self, v: f64) -> f64 {
        match self {
            Self::Floating => v,
            Self::Fixed { scale } => (v * scale).round() / scale,
        }
    }

    /// Snaps a coordinate to the model's grid.
    #[must_use]
    pub fn make_precise(&self, c: Coordinate) -> Coordinate {
        match self {
            Self::Floating => c,
            Self::Fixed { .. } => Coordinate::new(
                self.make_precise_value(c.x),
                self.make_precise_value(c.y),
            ),
        }
    }
}
