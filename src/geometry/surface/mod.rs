mod cylinder;
mod plane;
mod torus;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use torus::Torus;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Parameter domain for a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDomain {
    /// Start of the U parameter range.
    pub u_min: f64,
    /// End of the U parameter range.
    pub u_max: f64,
    /// Start of the V parameter range.
    pub v_min: f64,
    /// End of the V parameter range.
    pub v_max: f64,
}

impl SurfaceDomain {
    /// Creates a new surface domain.
    #[must_use]
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }
}

/// Trait for parametric surfaces in 3D space.
///
/// The periodicity accessors are what the face regularizer consumes when
/// reasoning about seam crossings: a `Some(period)` means the surface is
/// closed in that parametric direction and UV coordinates are only
/// meaningful modulo the period.
pub trait Surface {
    /// Evaluates the surface at parameters `(u, v)`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are out of range or evaluation fails.
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3>;

    /// Computes the surface normal at parameters `(u, v)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are out of range or the normal is degenerate.
    fn normal(&self, u: f64, v: f64) -> Result<Vector3>;

    /// Computes the `(u, v)` parameters for a point assumed to lie on the
    /// surface. For periodic directions the result is canonical, in
    /// `(-pi, pi]`.
    fn inverse(&self, point: &Point3) -> (f64, f64);

    /// Returns the parameter domain of the surface.
    fn domain(&self) -> SurfaceDomain;

    /// Returns the period of the U direction, if the surface closes in U.
    fn u_period(&self) -> Option<f64> {
        None
    }

    /// Returns the period of the V direction, if the surface closes in V.
    fn v_period(&self) -> Option<f64> {
        None
    }
}
