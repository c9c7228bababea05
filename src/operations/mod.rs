pub mod buffer;
pub mod linemerge;
pub mod polygonize;

pub use linemerge::merge_lines;
pub use polygonize::polygonize;
