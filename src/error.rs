use thiserror::Error;

/// Top-level error type for the arealis buffering engine.
#[derive(Debug, Error)]
pub enum ArealisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range")]
    ParameterOutOfRange { parameter: &'static str, value: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised when the noded edge graph is self-inconsistent.
///
/// These carry the offending coordinate so callers can diagnose which part
/// of the input produced an unresolvable graph.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("depth mismatch at ({x}, {y})")]
    DepthMismatch { x: f64, y: f64 },

    #[error("no outgoing result edge at ({x}, {y})")]
    NoOutgoingEdge { x: f64, y: f64 },

    #[error("unable to assign hole to a shell near ({x}, {y})")]
    UnassignedHole { x: f64, y: f64 },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to buffer operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`ArealisError`].
pub type Result<T> = std::result::Result<T, ArealisError>;
