use crate::math::Point3;
use crate::topology::{EdgeCurve, FaceId, Pcurve};

use super::interference::ShapeRef;
use super::{CurveIndex, InterferenceIndex, PointIndex};

/// An isolated intersection point discovered during a Boolean pass.
///
/// Records are never physically deleted: a superseded record is retired
/// (`keep = false`) and chained to its authoritative successor through
/// `mother`. Consumers must treat retired records as absent.
#[derive(Debug, Clone)]
pub struct PointRecord {
    point: Point3,
    tolerance: f64,
    source_a: ShapeRef,
    source_b: ShapeRef,
    keep: bool,
    mother: Option<PointIndex>,
}

impl PointRecord {
    /// Creates a new, kept point record.
    #[must_use]
    pub fn new(point: Point3, tolerance: f64, source_a: ShapeRef, source_b: ShapeRef) -> Self {
        Self {
            point,
            tolerance,
            source_a,
            source_b,
            keep: true,
            mother: None,
        }
    }

    /// The 3D intersection point.
    #[must_use]
    pub fn point(&self) -> &Point3 {
        &self.point
    }

    /// The coincidence tolerance of the point.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The two shapes whose intersection produced the point.
    #[must_use]
    pub fn sources(&self) -> (ShapeRef, ShapeRef) {
        (self.source_a, self.source_b)
    }

    /// Whether the record should survive into the final result.
    #[must_use]
    pub fn keep(&self) -> bool {
        self.keep
    }

    /// The authoritative successor of a superseded record, if any.
    #[must_use]
    pub fn mother(&self) -> Option<PointIndex> {
        self.mother
    }

    /// Retires the record in favor of `mother` (or of existing topology
    /// when `mother` is `None`).
    pub(crate) fn retire(&mut self, mother: Option<PointIndex>) {
        self.keep = false;
        self.mother = mother;
    }
}

/// An intersection curve bridging two faces.
///
/// Carries the 3D curve, its UV images on both faces, and the same
/// keep/mother bookkeeping as [`PointRecord`]. Point interferences sampled
/// along the curve are attached by index.
#[derive(Debug, Clone)]
pub struct CurveRecord {
    curve: EdgeCurve,
    tolerance: f64,
    range: Option<(f64, f64)>,
    face_a: FaceId,
    face_b: FaceId,
    pcurve_a: Option<Pcurve>,
    pcurve_b: Option<Pcurve>,
    is_walk: bool,
    keep: bool,
    mother: Option<CurveIndex>,
    interferences: Vec<InterferenceIndex>,
}

impl CurveRecord {
    /// Creates a new, kept curve record bridging two faces.
    #[must_use]
    pub fn new(curve: EdgeCurve, tolerance: f64, face_a: FaceId, face_b: FaceId) -> Self {
        Self {
            curve,
            tolerance,
            range: None,
            face_a,
            face_b,
            pcurve_a: None,
            pcurve_b: None,
            is_walk: false,
            keep: true,
            mother: None,
            interferences: Vec::new(),
        }
    }

    /// The 3D intersection curve.
    #[must_use]
    pub fn curve(&self) -> &EdgeCurve {
        &self.curve
    }

    /// The tolerance of the curve.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The trimmed parameter range, if the curve is a sub-segment.
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Sets the trimmed parameter range.
    pub fn set_range(&mut self, first: f64, last: f64) {
        self.range = Some((first, last));
    }

    /// The two faces the curve bridges.
    #[must_use]
    pub fn faces(&self) -> (FaceId, FaceId) {
        (self.face_a, self.face_b)
    }

    /// Returns `true` if the curve bridges the given pair of faces, in
    /// either order.
    #[must_use]
    pub fn bridges(&self, face_a: FaceId, face_b: FaceId) -> bool {
        (self.face_a == face_a && self.face_b == face_b)
            || (self.face_a == face_b && self.face_b == face_a)
    }

    /// The UV images of the curve on its two faces.
    #[must_use]
    pub fn pcurves(&self) -> (Option<&Pcurve>, Option<&Pcurve>) {
        (self.pcurve_a.as_ref(), self.pcurve_b.as_ref())
    }

    /// Sets the UV images of the curve on its two faces.
    pub fn set_pcurves(&mut self, on_a: Pcurve, on_b: Pcurve) {
        self.pcurve_a = Some(on_a);
        self.pcurve_b = Some(on_b);
    }

    /// Whether the curve was discovered by numeric marching rather than an
    /// exact analytic solve.
    #[must_use]
    pub fn is_walk(&self) -> bool {
        self.is_walk
    }

    /// Marks the curve as walk-derived.
    pub fn mark_walk(&mut self) {
        self.is_walk = true;
    }

    /// Whether the record should survive into the final result.
    #[must_use]
    pub fn keep(&self) -> bool {
        self.keep
    }

    /// The parent curve if this is a trimmed sub-segment, or the
    /// authoritative successor of a superseded record.
    #[must_use]
    pub fn mother(&self) -> Option<CurveIndex> {
        self.mother
    }

    /// Point interferences sampled along the curve.
    #[must_use]
    pub fn interferences(&self) -> &[InterferenceIndex] {
        &self.interferences
    }

    pub(crate) fn retire(&mut self, mother: Option<CurveIndex>) {
        self.keep = false;
        self.mother = mother;
    }

    pub(crate) fn push_interference(&mut self, interference: InterferenceIndex) {
        self.interferences.push(interference);
    }
}
