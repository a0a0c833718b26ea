//! Classification primitives.
//!
//! Given a point on an edge lying on a face, these primitives answer the
//! question every Boolean stage depends on: which side of the edge holds
//! the face's solid material, and is a crossing between two edges a true
//! transversal crossing or a tangential artifact.

use crate::error::ClassifyError;
use crate::geometry::surface::Surface;
use crate::math::{Vector3, ANGULAR_TOLERANCE, TOLERANCE};
use crate::topology::{EdgeData, FaceData, Orientation};

/// Computes the material direction of an edge on a face.
///
/// The result is a unit vector tangent to the face, normal to the edge,
/// pointing into the face's solid interior: `face_normal x tangent`,
/// negated when the edge is Reversed in the face. By the boundary
/// convention, a Forward edge has material to its left when walking the
/// tangent.
///
/// # Errors
///
/// Returns [`ClassifyError::IndeterminateTangent`] when the tangent (or
/// the cross product) has near-zero magnitude, e.g. at a cusp or a
/// degenerate edge. Callers must skip or special-case such points rather
/// than guess a direction.
pub fn material_direction(
    tangent: &Vector3,
    face_normal: &Vector3,
    orientation: Orientation,
) -> Result<Vector3, ClassifyError> {
    let len = tangent.norm();
    if len < TOLERANCE {
        return Err(ClassifyError::IndeterminateTangent { magnitude: len });
    }
    let direction = face_normal.cross(&(tangent / len));
    let dir_len = direction.norm();
    if dir_len < TOLERANCE {
        return Err(ClassifyError::IndeterminateTangent { magnitude: dir_len });
    }
    let direction = direction / dir_len;
    if orientation.is_reversed() {
        Ok(-direction)
    } else {
        Ok(direction)
    }
}

/// Computes the material direction of `edge` on `face` at parameter `t`,
/// evaluating the edge tangent and the local surface normal.
///
/// `orientation` is the orientation with which the edge occurs in the
/// face's wires.
///
/// # Errors
///
/// Returns [`ClassifyError::IndeterminateTangent`] when the tangent or the
/// local normal cannot be evaluated.
pub fn material_direction_on(
    face: &FaceData,
    edge: &EdgeData,
    orientation: Orientation,
    t: f64,
) -> Result<Vector3, ClassifyError> {
    let point = edge
        .curve
        .evaluate(t)
        .map_err(|_| ClassifyError::IndeterminateTangent { magnitude: 0.0 })?;
    let tangent = edge
        .curve
        .tangent(t)
        .map_err(|_| ClassifyError::IndeterminateTangent { magnitude: 0.0 })?;

    let surface = face.surface.as_surface();
    let (u, v) = surface.inverse(&point);
    let mut normal = surface
        .normal(u, v)
        .map_err(|_| ClassifyError::IndeterminateTangent { magnitude: 0.0 })?;
    if !face.same_sense {
        normal = -normal;
    }

    material_direction(&tangent, &normal, orientation)
}

/// Decides whether a crossing between two edges is a true transversal
/// crossing.
///
/// `ref_tangent` is the tangent of the edge being walked, `edge_tangent`
/// and `face_normal` describe the crossed edge on its supporting face.
/// The crossing is tangential — and must not generate a Transition — when
/// the tangents are parallel, or when the reference tangent has no
/// component along the crossed edge's in-surface conormal
/// (`face_normal x edge_tangent`).
#[must_use]
pub fn is_significant_crossing(
    ref_tangent: &Vector3,
    edge_tangent: &Vector3,
    face_normal: &Vector3,
    angular_tol: f64,
) -> bool {
    let ref_len = ref_tangent.norm();
    let edge_len = edge_tangent.norm();
    if ref_len < TOLERANCE || edge_len < TOLERANCE {
        return false;
    }
    let t_ref = ref_tangent / ref_len;
    let t_edge = edge_tangent / edge_len;

    if t_ref.dot(&t_edge).abs() > 1.0 - angular_tol {
        return false;
    }

    let conormal = face_normal.cross(&t_edge);
    let conormal_len = conormal.norm();
    if conormal_len < TOLERANCE {
        return false;
    }
    (t_ref.dot(&conormal) / conormal_len).abs() > angular_tol
}

/// Computes the matter angle swept from `d1` to `d2.reversed()` around
/// `reference`, in `[0, 2*pi)`.
///
/// Exactly-parallel and exactly-opposite configurations snap to 0 and pi
/// inside the angular tolerance. The regularizer's nearest-edge tie-break
/// minimizes this angle around the local face normal to select the
/// locally tightest loop.
#[must_use]
pub fn matter_angle(d1: &Vector3, d2: &Vector3, reference: &Vector3) -> f64 {
    let rev = -d2;

    let ang = d1.angle(&rev);
    if ang < ANGULAR_TOLERANCE {
        return 0.0;
    }
    if (std::f64::consts::PI - ang) < ANGULAR_TOLERANCE {
        return std::f64::consts::PI;
    }

    let signed = d1.cross(&rev).dot(reference).atan2(d1.dot(&rev));
    if signed < 0.0 {
        signed + std::f64::consts::TAU
    } else {
        signed
    }
}
