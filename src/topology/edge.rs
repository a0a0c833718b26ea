use crate::error::Result;
use crate::geometry::curve::{Arc, Curve, Line};
use crate::math::{Point3, Vector3};

use super::face::FaceId;
use super::pcurve::Pcurve;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// The geometric curve associated with an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A line segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
}

impl EdgeCurve {
    /// Evaluates the curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    pub fn evaluate(&self, t: f64) -> Result<Point3> {
        match self {
            Self::Line(line) => line.evaluate(t),
            Self::Arc(arc) => arc.evaluate(t),
        }
    }

    /// Computes the unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    pub fn tangent(&self, t: f64) -> Result<Vector3> {
        match self {
            Self::Line(line) => line.tangent(t),
            Self::Arc(arc) => arc.tangent(t),
        }
    }

    /// Converts a 3D tolerance into a parameter-space tolerance.
    ///
    /// Lines are parametrized by arc length; arcs by angle, so the 3D
    /// tolerance shrinks by the radius.
    #[must_use]
    pub fn parametric_tolerance(&self, tolerance: f64) -> f64 {
        match self {
            Self::Line(_) => tolerance,
            Self::Arc(arc) => tolerance / arc.radius(),
        }
    }
}

/// The pcurve of an edge on one of its supporting faces.
#[derive(Debug, Clone)]
pub struct FacePcurve {
    /// The supporting face.
    pub face: FaceId,
    /// The UV image of the edge on that face.
    pub pcurve: Pcurve,
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a geometric curve
/// that defines the shape of the edge between them, plus the UV images
/// of the edge on the faces it bounds.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
    /// Geometric tolerance of the edge.
    pub tolerance: f64,
    /// Pcurves on the faces this edge bounds.
    pub pcurves: Vec<FacePcurve>,
}

impl EdgeData {
    /// Creates a new edge without pcurves.
    #[must_use]
    pub fn new(
        start: VertexId,
        end: VertexId,
        curve: EdgeCurve,
        t_start: f64,
        t_end: f64,
        tolerance: f64,
    ) -> Self {
        Self {
            start,
            end,
            curve,
            t_start,
            t_end,
            tolerance,
            pcurves: Vec::new(),
        }
    }

    /// Returns the pcurve of this edge on `face`, if one is stored.
    #[must_use]
    pub fn pcurve_on(&self, face: FaceId) -> Option<&Pcurve> {
        self.pcurves
            .iter()
            .find(|fp| fp.face == face)
            .map(|fp| &fp.pcurve)
    }

    /// Stores (or replaces) the pcurve of this edge on `face`.
    pub fn set_pcurve(&mut self, face: FaceId, pcurve: Pcurve) {
        if let Some(fp) = self.pcurves.iter_mut().find(|fp| fp.face == face) {
            fp.pcurve = pcurve;
        } else {
            self.pcurves.push(FacePcurve { face, pcurve });
        }
    }

    /// Returns the curve parameter at which `vertex` bounds this edge,
    /// or `None` if the vertex is not an endpoint.
    #[must_use]
    pub fn vertex_parameter(&self, vertex: VertexId) -> Option<f64> {
        if vertex == self.start {
            Some(self.t_start)
        } else if vertex == self.end {
            Some(self.t_end)
        } else {
            None
        }
    }
}
