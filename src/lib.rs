//! Planar buffering engine.
//!
//! Given a vector geometry and a signed distance, [`buffer`] produces the
//! Minkowski sum of the input with a disc of that radius (erosion for
//! negative distances). The pipeline generates raw offset curves, nodes
//! them, fuses coincident arcs under a topological labelling algebra,
//! decomposes the resulting planar graph into subgraphs, assigns depths by
//! a rightmost-coordinate sweep, and assembles shells and holes.
//! [`BufferBuilder::buffer_line_single_sided`] returns the offset curve on
//! one chosen side of a line instead.

pub mod error;
pub mod geometry;
pub mod math;
pub mod noding;
pub mod operations;
pub mod topology;

pub use error::{ArealisError, Result};
pub use geometry::{Coordinate, Geometry, Polygon, PrecisionModel};
pub use operations::buffer::{buffer, BufferBuilder, BufferParameters, EndCapStyle, JoinStyle};
