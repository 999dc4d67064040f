use crate::error::GeometryError;
use crate::math::distance_2d::{closest_point_on_segment, point_to_segment_dist, segment_param};
use crate::math::{points_coincide, Point2, Vector2, TOLERANCE};

/// A straight segment between two points.
///
/// Segments are never stored by a wire; they are derived from consecutive
/// wire points on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    p1: Point2,
    p2: Point2,
}

impl LineSegment {
    /// Creates a new segment from `p1` to `p2`.
    #[must_use]
    pub fn new(p1: Point2, p2: Point2) -> Self {
        Self { p1, p2 }
    }

    /// Returns the start point.
    #[must_use]
    pub fn p1(&self) -> Point2 {
        self.p1
    }

    /// Returns the end point.
    #[must_use]
    pub fn p2(&self) -> Point2 {
        self.p2
    }

    /// Returns `true` if both endpoints coincide.
    #[must_use]
    pub fn is_null(&self) -> bool {
        points_coincide(&self.p1, &self.p2)
    }

    /// Returns `true` if the segment is horizontal.
    ///
    /// A null segment is both horizontal and vertical.
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        (self.p1.y - self.p2.y).abs() <= TOLERANCE
    }

    /// Returns `true` if the segment is vertical.
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        (self.p1.x - self.p2.x).abs() <= TOLERANCE
    }

    /// Returns the segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }

    /// Returns the unit direction from `p1` to `p2`.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment has zero length.
    pub fn direction(&self) -> Result<Vector2, GeometryError> {
        let d = self.p2 - self.p1;
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroLengthSegment);
        }
        Ok(d / len)
    }

    /// Returns `true` if `point` is one of the two endpoints.
    #[must_use]
    pub fn has_endpoint(&self, point: &Point2) -> bool {
        points_coincide(&self.p1, point) || points_coincide(&self.p2, point)
    }

    /// Returns `true` if `point` lies on the segment within `tolerance`.
    ///
    /// A tolerance of `0.0` is the exact containment test; the global
    /// [`TOLERANCE`] is always added to absorb floating-point noise.
    #[must_use]
    pub fn contains_point(&self, point: &Point2, tolerance: f64) -> bool {
        point_to_segment_dist(point, &self.p1, &self.p2) <= tolerance + TOLERANCE
    }

    /// Returns `true` if `point` lies on the segment but is not an endpoint.
    #[must_use]
    pub fn contains_point_strictly(&self, point: &Point2) -> bool {
        self.contains_point(point, 0.0) && !self.has_endpoint(point)
    }

    /// Returns the point of the segment closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: &Point2) -> Point2 {
        closest_point_on_segment(point, &self.p1, &self.p2)
    }

    /// Returns the projection parameter `t ∈ [0, 1]` of `point`.
    #[must_use]
    pub fn param_of(&self, point: &Point2) -> f64 {
        segment_param(point, &self.p1, &self.p2)
    }

    /// Returns the point at parameter `t` (`0` is `p1`, `1` is `p2`).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.p1 + (self.p2 - self.p1) * t
    }

    /// Maps a point on this segment onto `target`, keeping its relative position.
    #[must_use]
    pub fn map_onto(&self, point: &Point2, target: &LineSegment) -> Point2 {
        target.point_at(self.param_of(point))
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    /// Returns the smallest rectangle enclosing all `points`, or `None` if empty.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |rect, p| Self {
            min: Point2::new(rect.min.x.min(p.x), rect.min.y.min(p.y)),
            max: Point2::new(rect.max.x.max(p.x), rect.max.y.max(p.y)),
        }))
    }

    /// Returns the rectangle width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the rectangle height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn exact_containment() {
        let s = seg(0.0, 0.0, 100.0, 0.0);
        assert!(s.contains_point(&Point2::new(50.0, 0.0), 0.0));
        assert!(s.contains_point(&Point2::new(100.0, 0.0), 0.0));
        assert!(!s.contains_point(&Point2::new(50.0, 0.5), 0.0));
        assert!(!s.contains_point(&Point2::new(101.0, 0.0), 0.0));
    }

    #[test]
    fn tolerant_containment() {
        let s = seg(0.0, 0.0, 100.0, 0.0);
        assert!(s.contains_point(&Point2::new(50.0, 0.5), 1.0));
        assert!(!s.contains_point(&Point2::new(50.0, 2.0), 1.0));
    }

    #[test]
    fn strict_containment_excludes_endpoints() {
        let s = seg(0.0, 0.0, 0.0, 10.0);
        assert!(s.contains_point_strictly(&Point2::new(0.0, 4.0)));
        assert!(!s.contains_point_strictly(&Point2::new(0.0, 0.0)));
        assert!(!s.contains_point_strictly(&Point2::new(0.0, 10.0)));
    }

    #[test]
    fn orientation() {
        assert!(seg(0.0, 5.0, 10.0, 5.0).is_horizontal());
        assert!(seg(3.0, 0.0, 3.0, 10.0).is_vertical());
        let diagonal = seg(0.0, 0.0, 10.0, 10.0);
        assert!(!diagonal.is_horizontal() && !diagonal.is_vertical());
        assert!(seg(1.0, 1.0, 1.0, 1.0).is_null());
    }

    #[test]
    fn direction_of_null_segment_fails() {
        assert!(seg(1.0, 1.0, 1.0, 1.0).direction().is_err());
        let d = seg(0.0, 0.0, 0.0, 4.0).direction().unwrap();
        assert_relative_eq!(d, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn map_onto_keeps_relative_position() {
        let old = seg(0.0, 0.0, 100.0, 0.0);
        let new = seg(0.0, 0.0, 100.0, 100.0);
        let mapped = old.map_onto(&Point2::new(25.0, 0.0), &new);
        assert_relative_eq!(mapped, Point2::new(25.0, 25.0));
    }

    #[test]
    fn enclosing_rect() {
        let rect = Rect::enclosing([
            Point2::new(10.0, -5.0),
            Point2::new(-3.0, 7.0),
            Point2::new(4.0, 4.0),
        ])
        .unwrap();
        assert_relative_eq!(rect.width(), 13.0);
        assert_relative_eq!(rect.height(), 12.0);
        assert!(Rect::enclosing(std::iter::empty()).is_none());
    }
}
