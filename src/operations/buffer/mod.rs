pub mod builder;
pub mod curve_set;
pub mod depth_locater;
pub mod offset_curve;
pub mod params;
pub mod polygon_builder;
pub mod simplify;
pub mod subgraph;

pub use builder::{buffer, BufferBuilder, InterruptFn};
pub use curve_set::CurveSetBuilder;
pub use depth_locater::SubgraphDepthLocater;
pub use offset_curve::OffsetCurveBuilder;
pub use params::{BufferParameters, EndCapStyle, JoinStyle};
pub use polygon_builder::PolygonBuilder;
pub use subgraph::BufferSubgraph;
