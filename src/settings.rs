use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};

/// Editing behaviour shared by every wire of a [`WireSystem`](crate::WireSystem).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keep horizontal and vertical segments axis-aligned while points move.
    pub preserve_straight_angles: bool,
    /// Spacing of the host's grid.
    pub grid_size: f64,
    /// Snap inserted points and segment displacements onto the grid.
    pub snap_to_grid: bool,
    /// Pick radius used by pointer hit queries.
    pub hit_tolerance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preserve_straight_angles: true,
            grid_size: 20.0,
            snap_to_grid: false,
            hit_tolerance: 1.0,
        }
    }
}

impl Settings {
    /// Snaps a point onto the grid when snapping is enabled.
    #[must_use]
    pub fn snap_point(&self, point: Point2) -> Point2 {
        if !self.snaps() {
            return point;
        }
        Point2::new(self.snap_scalar(point.x), self.snap_scalar(point.y))
    }

    /// Snaps a displacement onto the grid when snapping is enabled.
    #[must_use]
    pub fn snap_vector(&self, delta: Vector2) -> Vector2 {
        if !self.snaps() {
            return delta;
        }
        Vector2::new(self.snap_scalar(delta.x), self.snap_scalar(delta.y))
    }

    fn snaps(&self) -> bool {
        self.snap_to_grid && self.grid_size > 0.0
    }

    fn snap_scalar(&self, value: f64) -> f64 {
        (value / self.grid_size).round() * self.grid_size
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn snapping_disabled_is_identity() {
        let settings = Settings::default();
        let p = Point2::new(13.0, 27.0);
        assert_relative_eq!(settings.snap_point(p), p);
    }

    #[test]
    fn snapping_rounds_to_grid() {
        let settings = Settings {
            snap_to_grid: true,
            ..Settings::default()
        };
        assert_relative_eq!(settings.snap_point(Point2::new(13.0, 27.0)), Point2::new(20.0, 20.0));
        assert_relative_eq!(settings.snap_vector(Vector2::new(-9.0, 31.0)), Vector2::new(0.0, 40.0));
    }

    #[test]
    fn partial_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"snap_to_grid": true}"#).unwrap();
        assert!(settings.snap_to_grid);
        assert!(settings.preserve_straight_angles);
        assert_relative_eq!(settings.grid_size, 20.0);
    }
}
