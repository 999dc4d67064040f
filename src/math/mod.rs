pub mod distance_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// "Exact" containment queries still allow this much slack so that points
/// produced by proportional re-homing stay on their segment.
pub const TOLERANCE: f64 = 1e-9;

/// Returns `true` if both points coincide within [`TOLERANCE`].
#[must_use]
pub fn points_coincide(a: &Point2, b: &Point2) -> bool {
    (a - b).norm() <= TOLERANCE
}

/// Returns `true` if the vector has no significant component.
#[must_use]
pub fn is_null_vector(v: &Vector2) -> bool {
    v.x.abs() <= TOLERANCE && v.y.abs() <= TOLERANCE
}
