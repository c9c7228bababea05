use crate::error::{GeometryError, Result};

/// Style for closing the ends of buffered open lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCapStyle {
    /// Half-circle approximated by chords.
    #[default]
    Round,
    /// Straight connection between the offset endpoints.
    Flat,
    /// Extension by the buffer distance, closed perpendicularly.
    Square,
}

/// Style for joining offset segments at input vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStyle {
    /// Circular-arc fillet.
    #[default]
    Round,
    /// Straight extension to the offset line intersection, limited by the
    /// mitre ratio.
    Mitre,
    /// Straight connection between the offset segment endpoints.
    Bevel,
}

/// Default chord count per quadrant of arc.
pub const DEFAULT_QUADRANT_SEGMENTS: i32 = 8;

/// Default mitre ratio limit.
pub const DEFAULT_MITRE_LIMIT: f64 = 5.0;

/// Default input-simplification factor, as a fraction of the buffer
/// distance.
pub const DEFAULT_SIMPLIFY_FACTOR: f64 = 0.01;

/// Configuration for a buffer operation. All fields are fixed before the
/// pipeline starts and treated as read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferParameters {
    pub end_cap_style: EndCapStyle,
    pub join_style: JoinStyle,
    /// Number of chords approximating 90° of arc; at least 1.
    pub quadrant_segments: i32,
    /// Maximum ratio of mitre length to buffer distance before a mitre
    /// join falls back to a bevel.
    pub mitre_limit: f64,
    /// Generate the buffer on only one side of line inputs.
    pub single_sided: bool,
    /// Input coarsening tolerance, as a fraction of the buffer distance.
    pub simplify_factor: f64,
}

impl Default for BufferParameters {
    fn default() -> Self {
        Self {
            end_cap_style: EndCapStyle::default(),
            join_style: JoinStyle::default(),
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
            mitre_limit: DEFAULT_MITRE_LIMIT,
            single_sided: false,
            simplify_factor: DEFAULT_SIMPLIFY_FACTOR,
        }
    }
}

impl BufferParameters {
    /// Checks the parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` for a non-positive
    /// quadrant segment count or mitre limit, or a negative simplify
    /// factor.
    pub fn validate(&self) -> Result<()> {
        if self.quadrant_segments < 1 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "quadrant_segments",
                value: f64::from(self.quadrant_segments),
            }
            .into());
        }
        if !(self.mitre_limit > 0.0) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "mitre_limit",
                value: self.mitre_limit,
            }
            .into());
        }
        if !(self.simplify_factor >= 0.0) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "simplify_factor",
                value: self.simplify_factor,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(BufferParameters::default().validate().is_ok());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut p = BufferParameters::default();
        p.quadrant_segments = 0;
        assert!(p.validate().is_err());

        let mut p = BufferParameters::default();
        p.mitre_limit = 0.0;
        assert!(p.validate().is_err());

        let mut p = BufferParameters::default();
        p.simplify_factor = -0.5;
        assert!(p.validate().is_err());

        let mut p = BufferParameters::default();
        p.mitre_limit = f64::NAN;
        assert!(p.validate().is_err());
    }
}
