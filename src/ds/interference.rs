use crate::topology::{EdgeId, FaceId, VertexId};

use super::transition::Transition;
use super::{CurveIndex, PointIndex};

/// Reference to a topological shape annotated by an interference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRef {
    Vertex(VertexId),
    Edge(EdgeId),
    Face(FaceId),
}

/// What an interference actually refers to: a raw numeric point or curve
/// not yet promoted to topology, or an existing topological vertex or edge
/// it was found to coincide with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    /// A point in the DS point table.
    Point(PointIndex),
    /// A curve in the DS curve table.
    Curve(CurveIndex),
    /// An existing topological vertex.
    Vertex(VertexId),
    /// An existing topological edge.
    Edge(EdgeId),
}

impl Geometry {
    /// Returns `true` if the geometry is still a raw point or curve, not
    /// yet identified with existing topology.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Point(_) | Self::Curve(_))
    }
}

/// A record asserting that some geometry relates to a shape, with
/// directional transition information.
///
/// Interferences are intrinsically directional: the same physical crossing
/// is stored once per support shape, each copy describing the transition
/// along that support. Multiple interferences may point at the same
/// geometry (many discoveries of one physical point); the filler folds
/// duplicates at insertion time so kept interferences at the same
/// (support, parameter) never disagree on geometry.
///
/// Fields are private: the filler and the merge are the only writers.
#[derive(Debug, Clone)]
pub struct Interference {
    geometry: Geometry,
    support: ShapeRef,
    other: ShapeRef,
    parameter: f64,
    transition: Transition,
    from_merge: bool,
}

impl Interference {
    /// Creates a new interference record.
    #[must_use]
    pub fn new(
        geometry: Geometry,
        support: ShapeRef,
        other: ShapeRef,
        parameter: f64,
        transition: Transition,
    ) -> Self {
        Self {
            geometry,
            support,
            other,
            parameter,
            transition,
            from_merge: false,
        }
    }

    /// The geometry this interference refers to.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The shape whose transition this interference describes.
    #[must_use]
    pub fn support(&self) -> ShapeRef {
        self.support
    }

    /// The other operand's shape involved in the crossing.
    #[must_use]
    pub fn other(&self) -> ShapeRef {
        self.other
    }

    /// The parameter of the crossing on the support.
    #[must_use]
    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    /// The material transition along the support.
    #[must_use]
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Whether the geometry was rewritten by the topology merge.
    #[must_use]
    pub fn is_from_merge(&self) -> bool {
        self.from_merge
    }

    pub(crate) fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub(crate) fn mark_from_merge(&mut self) {
        self.from_merge = true;
    }
}
