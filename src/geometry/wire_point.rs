use crate::math::{points_coincide, Point2};

/// A wire vertex with its junction flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WirePoint {
    pub position: Point2,
    pub is_junction: bool,
}

impl WirePoint {
    /// Creates a plain (non-junction) point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self::at(Point2::new(x, y))
    }

    /// Creates a plain (non-junction) point at `position`.
    #[must_use]
    pub fn at(position: Point2) -> Self {
        Self {
            position,
            is_junction: false,
        }
    }

    /// Creates a point flagged as a junction.
    #[must_use]
    pub fn junction(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
            is_junction: true,
        }
    }

    /// Returns `true` if both points share a position, ignoring the flag.
    #[must_use]
    pub fn coincides_with(&self, other: &WirePoint) -> bool {
        points_coincide(&self.position, &other.position)
    }
}

impl From<Point2> for WirePoint {
    fn from(position: Point2) -> Self {
        Self::at(position)
    }
}
