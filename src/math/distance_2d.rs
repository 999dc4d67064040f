use super::{Point2, TOLERANCE};

/// Returns the parameter `t ∈ [0, 1]` of the projection of `p` onto the
/// segment `a → b`.
///
/// A zero-length segment projects everything onto `t = 0`.
#[must_use]
pub fn segment_param(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0)
}

/// Returns the point of the segment `a → b` closest to `p`.
#[must_use]
pub fn closest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let t = segment_param(p, a, b);
    a + (b - a) * t
}

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    (p - closest_point_on_segment(p, a, b)).norm()
}
