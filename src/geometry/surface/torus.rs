use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A toroidal surface in 3D space.
///
/// Defined by a center, major radius (center to tube center), minor radius
/// (tube radius), axis of symmetry, and a reference direction for u=0.
///
/// `P(u, v) = center + (R + r*cos(v)) * (cos(u)*ref_dir + sin(u)*binormal) + r*sin(v)*axis`
/// where `binormal = axis x ref_dir`.
///
/// Periodic in both directions with period 2*pi.
#[derive(Debug, Clone)]
pub struct Torus {
    center: Point3,
    major_radius: f64,
    minor_radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Torus {
    /// Creates a new torus.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is non-positive, minor >= major,
    /// axis is zero-length, or the reference direction is not perpendicular
    /// to the axis.
    pub fn new(
        center: Point3,
        major_radius: f64,
        minor_radius: f64,
        axis: Vector3,
        ref_dir: Vector3,
    ) -> Result<Self> {
        if major_radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("torus major radius must be positive".into()).into(),
            );
        }
        if minor_radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("torus minor radius must be positive".into()).into(),
            );
        }
        if minor_radius >= major_radius {
            return Err(GeometryError::Degenerate(
                "torus minor radius must be less than major radius".into(),
            )
            .into());
        }

        let axis_len = axis.norm();
        if axis_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if axis.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            major_radius,
            minor_radius,
            axis,
            ref_dir,
        })
    }

    /// Returns the major radius (center to tube center).
    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    /// Returns the minor radius (tube radius).
    #[must_use]
    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
    }

    /// Computes the binormal direction (`axis x ref_dir`).
    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }
}

impl Surface for Torus {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let binormal = self.binormal();
        let radial = self.ref_dir * u.cos() + binormal * u.sin();
        let r = self.major_radius + self.minor_radius * v.cos();
        Ok(self.center + radial * r + self.axis * (self.minor_radius * v.sin()))
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        let binormal = self.binormal();
        let radial = self.ref_dir * u.cos() + binormal * u.sin();
        let n = radial * v.cos() + self.axis * v.sin();
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(n / len)
    }

    fn inverse(&self, point: &Point3) -> (f64, f64) {
        let dp = point - self.center;
        let binormal = self.binormal();
        let u = dp.dot(&binormal).atan2(dp.dot(&self.ref_dir));
        let radial = self.ref_dir * u.cos() + binormal * u.sin();
        let tube_center = self.center + radial * self.major_radius;
        let to_tube = point - tube_center;
        let v = to_tube.dot(&self.axis).atan2(to_tube.dot(&radial));
        (u, v)
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, std::f64::consts::TAU, 0.0, std::f64::consts::TAU)
    }

    fn u_period(&self) -> Option<f64> {
        Some(std::f64::consts::TAU)
    }

    fn v_period(&self) -> Option<f64> {
        Some(std::f64::consts::TAU)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn xy_torus() -> Torus {
        Torus::new(Point3::origin(), 3.0, 1.0, Vector3::z(), Vector3::x()).unwrap()
    }

    #[test]
    fn evaluate_outer_equator() {
        let t = xy_torus();
        let p = t.evaluate(0.0, 0.0).unwrap();
        assert!((p - Point3::new(4.0, 0.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn normal_outward_at_outer() {
        let t = xy_torus();
        let n = t.normal(0.0, 0.0).unwrap();
        assert!((n - Vector3::x()).norm() < TOLERANCE);
    }

    #[test]
    fn periodic_in_both_directions() {
        let t = xy_torus();
        assert!((t.u_period().unwrap() - TAU).abs() < TOLERANCE);
        assert!((t.v_period().unwrap() - TAU).abs() < TOLERANCE);
    }

    #[test]
    fn inverse_roundtrip() {
        let t = xy_torus();
        for &(u, v) in &[
            (0.0, 0.0),
            (FRAC_PI_2, 0.0),
            (1.0, 0.5),
            (0.0, FRAC_PI_2),
            (TAU * 0.75, TAU * 0.25),
        ] {
            let p = t.evaluate(u, v).unwrap();
            let (u2, v2) = t.inverse(&p);
            let p2 = t.evaluate(u2, v2).unwrap();
            assert!((p - p2).norm() < 1e-9, "roundtrip failed for u={u}, v={v}");
        }
    }

    #[test]
    fn minor_exceeds_major() {
        let r = Torus::new(Point3::origin(), 1.0, 2.0, Vector3::z(), Vector3::x());
        assert!(r.is_err());
    }
}
