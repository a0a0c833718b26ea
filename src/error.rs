use thiserror::Error;

use crate::topology::{EdgeId, FaceId, VertexId};

/// Top-level error type for the Boolis interference kernel.
#[derive(Debug, Error)]
pub enum BoolisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Regularize(#[from] RegularizeError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological queries.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors raised by the classification primitives.
///
/// These are recoverable: the filler absorbs them as an Unknown transition
/// rather than aborting the pass.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("indeterminate tangent: magnitude {magnitude} below tolerance")]
    IndeterminateTangent { magnitude: f64 },
}

/// Hard failures of the face regularizer.
///
/// A malformed face would corrupt every downstream consumer, so these are
/// surfaced to the caller naming the offending entity instead of being
/// absorbed.
#[derive(Debug, Error)]
pub enum RegularizeError {
    #[error("non-manifold vertex {vertex:?} on face {face:?} could not be resolved")]
    NonManifoldVertex { face: FaceId, vertex: VertexId },

    #[error("edge {edge:?} on face {face:?} cannot be confined to one periodic tile")]
    PeriodicOverflow { face: FaceId, edge: EdgeId },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Convenience type alias for results using [`BoolisError`].
pub type Result<T> = std::result::Result<T, BoolisError>;
