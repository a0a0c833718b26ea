use crate::geometry::surface::{Cylinder, Plane, Surface, Torus};

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// The geometric surface associated with a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    /// A planar surface.
    Plane(Plane),
    /// A cylindrical surface (periodic in U).
    Cylinder(Cylinder),
    /// A toroidal surface (periodic in U and V).
    Torus(Torus),
}

impl FaceSurface {
    /// Returns the surface as a trait object.
    #[must_use]
    pub fn as_surface(&self) -> &dyn Surface {
        match self {
            Self::Plane(plane) => plane,
            Self::Cylinder(cylinder) => cylinder,
            Self::Torus(torus) => torus,
        }
    }
}

/// Data associated with a topological face.
///
/// A face is a bounded region on a surface, defined by an outer wire
/// and optionally inner wires (holes).
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The geometric surface on which this face lies.
    pub surface: FaceSurface,
    /// The outer boundary wire.
    pub outer_wire: WireId,
    /// Inner boundary wires (holes).
    pub inner_wires: Vec<WireId>,
    /// If `true`, the face normal agrees with the surface normal.
    pub same_sense: bool,
}

impl FaceData {
    /// Returns all wires of the face, outer wire first.
    #[must_use]
    pub fn wires(&self) -> Vec<WireId> {
        let mut wires = Vec::with_capacity(1 + self.inner_wires.len());
        wires.push(self.outer_wire);
        wires.extend(self.inner_wires.iter().copied());
        wires
    }
}
