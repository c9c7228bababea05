pub mod edge;
pub mod edge_list;
pub mod graph;
pub mod label;

pub use edge::{depth_delta, Edge};
pub use edge_list::EdgeList;
pub use graph::{compare_direction, DirEdgeId, NodeId, PlanarGraph};
pub use label::{Label, Location, Position, TopologyLocation};
