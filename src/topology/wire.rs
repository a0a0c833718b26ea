use super::edge::EdgeId;
use super::orientation::Orientation;

slotmap::new_key_type! {
    /// Unique identifier for a wire in the topology store.
    pub struct WireId;
}

/// An edge with orientation information within a wire.
#[derive(Debug, Clone, Copy)]
pub struct OrientedEdge {
    /// The edge identifier.
    pub edge: EdgeId,
    /// Forward: the edge is traversed start to end; Reversed: end to start.
    pub orientation: Orientation,
}

impl OrientedEdge {
    /// Creates a new oriented edge.
    #[must_use]
    pub fn new(edge: EdgeId, orientation: Orientation) -> Self {
        Self { edge, orientation }
    }

    /// Creates a forward-oriented edge.
    #[must_use]
    pub fn forward(edge: EdgeId) -> Self {
        Self::new(edge, Orientation::Forward)
    }
}

/// Data associated with a topological wire.
///
/// A wire is an ordered sequence of oriented edges forming a connected path.
/// It may be open or closed.
#[derive(Debug, Clone)]
pub struct WireData {
    /// The ordered sequence of oriented edges.
    pub edges: Vec<OrientedEdge>,
    /// Whether this wire forms a closed loop.
    pub is_closed: bool,
}
