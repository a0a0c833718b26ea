/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for deciding that two 3D points are the same physical point.
///
/// Looser than [`TOLERANCE`]: intersection samples arrive with the combined
/// error of two evaluators, and vertex welding must absorb it.
pub const CONFUSION: f64 = 1e-7;

/// Tolerance for comparing unit directions (dot products, angles).
pub const ANGULAR_TOLERANCE: f64 = 1e-8;
