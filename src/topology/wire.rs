use crate::error::TopologyError;
use crate::geometry::{LineSegment, Rect, WirePoint};
use crate::math::{points_coincide, Point2};

use super::net::NetId;

slotmap::new_key_type! {
    /// Unique identifier for a wire in the wire store.
    pub struct WireId;
}

/// A polyline of [`WirePoint`]s.
///
/// Segment `i` joins point `i` and point `i + 1`. The wire only owns its
/// point sequence; join edges to other wires live in the store so that the
/// relation stays symmetric.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    points: Vec<WirePoint>,
    net: NetId,
}

impl Wire {
    /// Creates a wire from a sequence of points.
    #[must_use]
    pub fn new(points: Vec<WirePoint>) -> Self {
        Self {
            points,
            net: NetId::default(),
        }
    }

    /// Creates a wire from plain positions, none of them junctions.
    #[must_use]
    pub fn from_positions(positions: impl IntoIterator<Item = Point2>) -> Self {
        Self::new(positions.into_iter().map(WirePoint::at).collect())
    }

    /// Returns the net owning this wire.
    ///
    /// The key is null until the wire has been added to a store.
    #[must_use]
    pub fn net(&self) -> NetId {
        self.net
    }

    pub(crate) fn set_net(&mut self, net: NetId) {
        self.net = net;
    }

    /// Returns the points of the wire.
    #[must_use]
    pub fn points(&self) -> &[WirePoint] {
        &self.points
    }

    /// Returns the positions of the wire's points.
    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Returns the number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the point at `index`, if any.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&WirePoint> {
        self.points.get(index)
    }

    /// Returns the position of the point at `index`, if any.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point2> {
        self.points.get(index).map(|p| p.position)
    }

    /// Returns the index of the last point, if the wire has any.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    /// Returns `true` if `index` is the first or the last point.
    #[must_use]
    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || Some(index) == self.last_index()
    }

    /// Returns the indices of every point flagged as a junction.
    #[must_use]
    pub fn junctions(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_junction)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Returns segment `index`, if any.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<LineSegment> {
        let a = self.points.get(index)?;
        let b = self.points.get(index + 1)?;
        Some(LineSegment::new(a.position, b.position))
    }

    /// Returns all segments in order.
    #[must_use]
    pub fn line_segments(&self) -> Vec<LineSegment> {
        self.points
            .windows(2)
            .map(|w| LineSegment::new(w[0].position, w[1].position))
            .collect()
    }

    /// Returns `true` if `point` lies exactly on one of the segments.
    #[must_use]
    pub fn point_is_on_wire(&self, point: &Point2) -> bool {
        self.point_is_near_wire(point, 0.0)
    }

    /// Returns `true` if `point` lies within `tolerance` of one of the segments.
    #[must_use]
    pub fn point_is_near_wire(&self, point: &Point2, tolerance: f64) -> bool {
        self.line_segments()
            .iter()
            .any(|segment| segment.contains_point(point, tolerance))
    }

    /// Returns the index of the first point located at `point`.
    #[must_use]
    pub fn index_of_point_at(&self, point: &Point2) -> Option<usize> {
        self.points
            .iter()
            .position(|p| points_coincide(&p.position, point))
    }

    /// Returns the index of the first segment within `tolerance` of `point`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SegmentNotFound`] if no segment qualifies.
    pub fn segment_at(&self, point: &Point2, tolerance: f64) -> Result<usize, TopologyError> {
        self.line_segments()
            .iter()
            .position(|segment| segment.contains_point(point, tolerance))
            .ok_or(TopologyError::SegmentNotFound {
                x: point.x,
                y: point.y,
            })
    }

    /// Returns the bounding rectangle, or `None` for an empty wire.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::enclosing(self.points.iter().map(|p| p.position))
    }

    // --- Raw point-list edits, without any cascade ---

    pub(crate) fn set_junction_flag(&mut self, index: usize, is_junction: bool) -> bool {
        match self.points.get_mut(index) {
            Some(point) => {
                point.is_junction = is_junction;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_position(&mut self, index: usize, position: Point2) {
        if let Some(point) = self.points.get_mut(index) {
            point.position = position;
        }
    }

    pub(crate) fn insert_raw(&mut self, index: usize, point: WirePoint) {
        self.points.insert(index, point);
    }

    pub(crate) fn remove_raw(&mut self, index: usize) -> Option<WirePoint> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }
}
