use crate::math::{Point2, Vector2};

/// The 2D image of an edge in the UV space of a face it lies on.
///
/// Stored as a UV segment between the images of the edge's endpoints, in
/// the edge's natural parameter direction (start to end). On a periodic
/// surface the coordinates are NOT reduced modulo the period: a pcurve may
/// legitimately live outside the canonical tile, and the regularizer
/// translates it by whole periods to keep a wire's image connected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pcurve {
    /// UV image of the edge start.
    pub start: Point2,
    /// UV image of the edge end.
    pub end: Point2,
}

impl Pcurve {
    /// Creates a new pcurve segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Returns the UV direction from start to end (not normalized).
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }

    /// Translates the segment by a UV vector.
    pub fn translate(&mut self, by: &Vector2) {
        self.start += *by;
        self.end += *by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn translate_moves_both_ends() {
        let mut pc = Pcurve::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        pc.translate(&Vector2::new(2.0, -1.0));
        assert!((pc.start - Point2::new(2.0, -1.0)).norm() < TOLERANCE);
        assert!((pc.end - Point2::new(3.0, -1.0)).norm() < TOLERANCE);
    }

    #[test]
    fn direction_is_translation_invariant() {
        let mut pc = Pcurve::new(Point2::new(0.5, 0.5), Point2::new(1.5, 2.5));
        let d0 = pc.direction();
        pc.translate(&Vector2::new(-7.0, 3.0));
        assert!((pc.direction() - d0).norm() < TOLERANCE);
    }
}
