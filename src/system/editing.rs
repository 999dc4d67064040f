use tracing::{error, trace};

use crate::error::Result;
use crate::geometry::{LineSegment, WirePoint};
use crate::math::{is_null_vector, points_coincide, Point2, Vector2, TOLERANCE};
use crate::topology::{Wire, WireId};

use super::{WireEvent, WireSystem};

/// A junction of a connected wire together with its planned destination.
type JunctionMove = (WireId, usize, Point2);

/// Closest two consecutive points of a wire may get while a point is dragged.
const MIN_POINT_SPACING: f64 = 2.0;

impl WireSystem {
    /// Adds a point in front of the first one.
    ///
    /// The junction flag of the old first point moves to the new one.
    pub fn prepend_point(&mut self, wire: WireId, position: Point2) -> bool {
        let Ok(w) = self.store.wire_mut(wire) else {
            return false;
        };
        w.insert_raw(0, WirePoint::at(position));
        if w.point_count() >= 2 {
            let inherited = w.points()[1].is_junction;
            w.set_junction_flag(0, inherited);
            w.set_junction_flag(1, false);
        }
        self.emit(WireEvent::PointInserted { wire, index: 0 });
        self.emit_point_moved(wire, 0);
        true
    }

    /// Adds a point after the last one.
    ///
    /// The junction flag of the old last point moves to the new one.
    pub fn append_point(&mut self, wire: WireId, position: Point2) -> bool {
        let Ok(w) = self.store.wire_mut(wire) else {
            return false;
        };
        let index = w.point_count();
        w.insert_raw(index, WirePoint::at(position));
        if index >= 1 {
            let inherited = w.points()[index - 1].is_junction;
            w.set_junction_flag(index, inherited);
            w.set_junction_flag(index - 1, false);
        }
        self.emit(WireEvent::PointInserted { wire, index });
        self.emit_point_moved(wire, index);
        true
    }

    /// Inserts a point inside the wire, splitting segment `index - 1`.
    ///
    /// Valid indices are `1..point_count`. The position is snapped to the
    /// grid when snapping is enabled. Junctions of connected wires lying on
    /// the split segment follow it if the new point bends the wire.
    pub fn insert_point(&mut self, wire: WireId, index: usize, position: Point2) -> bool {
        let position = self.settings.snap_point(position);
        self.insert_point_exact(wire, index, position)
    }

    /// Splits the segment under `position` with a new point and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire does not exist or no segment lies within
    /// the hit tolerance of `position`.
    pub fn insert_point_at(&mut self, wire: WireId, position: Point2) -> Result<usize> {
        let segment = match self
            .store
            .wire(wire)
            .and_then(|w| w.segment_at(&position, self.settings.hit_tolerance))
        {
            Ok(segment) => segment,
            Err(err) => {
                error!(?wire, %err, "could not identify the segment to split");
                return Err(err.into());
            }
        };
        let index = segment + 1;
        self.insert_point(wire, index, position);
        Ok(index)
    }

    fn insert_point_exact(&mut self, wire: WireId, index: usize, position: Point2) -> bool {
        let Ok(w) = self.store.wire(wire) else {
            return false;
        };
        if index == 0 || index >= w.point_count() {
            return false;
        }
        let Some(segment) = w.segment(index - 1) else {
            return false;
        };

        let mut moves = Vec::new();
        if !segment.contains_point(&position, 0.0) {
            let closest = segment.closest_point(&position);
            let halves = [
                (
                    LineSegment::new(segment.p1(), closest),
                    LineSegment::new(segment.p1(), position),
                ),
                (
                    LineSegment::new(closest, segment.p2()),
                    LineSegment::new(position, segment.p2()),
                ),
            ];
            for (old, new) in halves {
                for (other, j, at) in self.junctions_on_segment(wire, &old, false) {
                    push_unique(&mut moves, (other, j, old.map_onto(&at, &new)));
                }
            }
        }

        if let Ok(w) = self.store.wire_mut(wire) {
            w.insert_raw(index, WirePoint::at(position));
        }
        self.emit(WireEvent::PointInserted { wire, index });
        self.emit_point_moved(wire, index);
        self.apply_junction_moves(moves);
        true
    }

    /// Removes the point at `index`.
    ///
    /// Removing an interior point merges its two segments and re-homes the
    /// junctions that were on them. Removing an endpoint pulls junctions on
    /// the vanished terminal segment onto the new endpoint.
    pub fn remove_point(&mut self, wire: WireId, index: usize) -> bool {
        let Ok(w) = self.store.wire(wire) else {
            return false;
        };
        let count = w.point_count();
        if index >= count {
            return false;
        }

        let mut moves = Vec::new();
        if index > 0 && index + 1 < count {
            if let (Some(before), Some(after)) = (w.segment(index - 1), w.segment(index)) {
                let merged = LineSegment::new(before.p1(), after.p2());
                let (len_before, len_after) = (before.length(), after.length());
                let total = len_before + len_after;
                let along = |distance: f64| {
                    if total > TOLERANCE {
                        merged.point_at(distance / total)
                    } else {
                        merged.p1()
                    }
                };
                for (other, j, at) in self.junctions_on_segment(wire, &before, false) {
                    push_unique(&mut moves, (other, j, along(before.param_of(&at) * len_before)));
                }
                for (other, j, at) in self.junctions_on_segment(wire, &after, false) {
                    let distance = len_before + after.param_of(&at) * len_after;
                    push_unique(&mut moves, (other, j, along(distance)));
                }
            }
        } else if count >= 2 {
            let (terminal, new_end) = if index == 0 {
                (w.segment(0), w.position(1))
            } else {
                (w.segment(count - 2), w.position(count - 2))
            };
            if let (Some(terminal), Some(new_end)) = (terminal, new_end) {
                for (other, j, _) in self.junctions_on_segment(wire, &terminal, false) {
                    push_unique(&mut moves, (other, j, new_end));
                }
            }
        }

        if let Ok(w) = self.store.wire_mut(wire) {
            w.remove_raw(index);
        }
        self.emit(WireEvent::PointRemoved { wire, index });
        self.apply_junction_moves(moves);
        true
    }

    /// Moves the point at `index` to `position`.
    pub fn move_point_to(&mut self, wire: WireId, index: usize, position: Point2) -> bool {
        let Some(current) = self.store.wire(wire).ok().and_then(|w| w.position(index)) else {
            return false;
        };
        self.drag_point(wire, index, position - current)
    }

    /// Moves the point at `index` by `delta`.
    pub fn move_point_by(&mut self, wire: WireId, index: usize, delta: Vector2) -> bool {
        self.drag_point(wire, index, delta)
    }

    /// Translates segment `index` by `delta`.
    ///
    /// Junctions strictly inside the segment move along; a terminal point
    /// that is connected (junction or attached connector) keeps its place
    /// and a new point is spliced in to preserve the stub. The displacement
    /// is snapped to the grid when snapping is enabled.
    pub fn move_line_segment_by(&mut self, wire: WireId, index: usize, delta: Vector2) -> bool {
        let delta = self.settings.snap_vector(delta);
        self.translate_segment(wire, index, delta)
    }

    fn translate_segment(&mut self, wire: WireId, index: usize, delta: Vector2) -> bool {
        if is_null_vector(&delta) {
            return false;
        }
        let Some(segment) = self.store.wire(wire).ok().and_then(|w| w.segment(index)) else {
            return false;
        };

        for (other, j, _) in self.junctions_on_segment(wire, &segment, true) {
            self.drag_point(other, j, delta);
        }

        let mut index = index;
        let mut start_anchored = false;
        if index == 0 && self.endpoint_is_connected(wire, 0) {
            self.prepend_point(wire, segment.p1());
            index += 1;
            start_anchored = true;
        }
        let last = self
            .store
            .wire(wire)
            .ok()
            .and_then(Wire::last_index)
            .unwrap_or(0);
        let mut end_anchored = false;
        if index + 1 == last && self.endpoint_is_connected(wire, last) {
            self.append_point(wire, segment.p2());
            end_anchored = true;
        }

        let skip = [index];
        self.relocate_point(wire, index, segment.p1() + delta, &skip, !start_anchored);
        self.relocate_point(wire, index + 1, segment.p2() + delta, &skip, !end_anchored);
        true
    }

    /// Removes duplicate consecutive points and redundant collinear points.
    pub fn simplify(&mut self, wire: WireId) -> bool {
        if !self.store.contains_wire(wire) {
            return false;
        }
        self.remove_duplicate_points(wire);
        self.remove_obsolete_points(wire);
        true
    }

    /// Sets or clears the junction flag of a point.
    pub fn set_point_is_junction(&mut self, wire: WireId, index: usize, is_junction: bool) -> bool {
        self.store
            .wire_mut(wire)
            .is_ok_and(|w| w.set_junction_flag(index, is_junction))
    }

    fn remove_duplicate_points(&mut self, wire: WireId) {
        let mut i = 0;
        loop {
            let Ok(w) = self.store.wire_mut(wire) else {
                return;
            };
            if w.point_count() <= 2 || i + 1 >= w.point_count() {
                return;
            }
            let (a, b) = (w.points()[i], w.points()[i + 1]);
            if a.coincides_with(&b) {
                if !a.is_junction {
                    w.set_junction_flag(i, b.is_junction);
                }
                w.remove_raw(i + 1);
                self.emit(WireEvent::PointRemoved { wire, index: i + 1 });
            } else {
                i += 1;
            }
        }
    }

    fn remove_obsolete_points(&mut self, wire: WireId) {
        let mut i = 1;
        loop {
            let Ok(w) = self.store.wire_mut(wire) else {
                return;
            };
            if w.point_count() < 3 || i + 1 >= w.point_count() {
                return;
            }
            let points = w.points();
            let (prev, point, next) = (points[i - 1], points[i], points[i + 1]);
            let span = LineSegment::new(prev.position, next.position);
            if !point.is_junction && span.contains_point(&point.position, 0.0) {
                w.remove_raw(i);
                self.emit(WireEvent::PointRemoved { wire, index: i });
            } else {
                i += 1;
            }
        }
    }

    /// Moves a point with straight-angle preservation.
    ///
    /// The point stays marked as moving for the whole cascade, so nothing
    /// triggered by this move can drag it a second time.
    pub(super) fn drag_point(&mut self, wire: WireId, index: usize, delta: Vector2) -> bool {
        if is_null_vector(&delta) || self.moving.contains(&(wire, index)) {
            return false;
        }
        let Some(count) = self.store.wire(wire).ok().map(Wire::point_count) else {
            return false;
        };
        if index >= count {
            return false;
        }
        let straight = self.settings.preserve_straight_angles;
        let mut index = index;

        if straight && count == 2 && !self.wire_is_moving(wire) {
            if let Some(corner) = self.auxiliary_corner(wire, delta) {
                self.insert_point_exact(wire, 1, corner);
                self.insert_point_exact(wire, 1, corner);
                if index == 1 {
                    index += 2;
                }
            }
        }

        if !self.begin_move(wire, index) {
            trace!(?wire, index, "point already moving, skipping");
            return false;
        }

        let mut skip = Vec::with_capacity(2);
        if straight {
            index = self.avoid_collisions(wire, index, delta);
            let Some(current) = self.store.wire(wire).ok().and_then(|w| w.position(index)) else {
                self.end_move(wire, index);
                return false;
            };
            if index >= 1 {
                if let Some(prev) = self.store.wire(wire).ok().and_then(|w| w.position(index - 1)) {
                    let line = LineSegment::new(prev, current);
                    if self.nudge_neighbor(wire, index - 1, index - 1, line, delta) {
                        skip.push(index - 1);
                    }
                }
            }
            if let Some(next) = self.store.wire(wire).ok().and_then(|w| w.position(index + 1)) {
                let line = LineSegment::new(current, next);
                if self.nudge_neighbor(wire, index + 1, index, line, delta) {
                    skip.push(index);
                }
            }
        }

        let moved = match self.store.wire(wire).ok().and_then(|w| w.position(index)) {
            Some(current) => self.relocate_held(wire, index, current + delta, &skip, true),
            None => false,
        };
        self.end_move(wire, index);
        moved
    }

    /// Shifts the segment beyond a neighbor that the dragged point would
    /// land on, so that consecutive points keep [`MIN_POINT_SPACING`] apart.
    ///
    /// Only wires with more than three points are adjusted. Returns the index
    /// of the dragged point, which grows if a stub was spliced in front of it.
    fn avoid_collisions(&mut self, wire: WireId, index: usize, delta: Vector2) -> usize {
        let Ok(w) = self.store.wire(wire) else {
            return index;
        };
        let count = w.point_count();
        let Some(target) = w.position(index).map(|p| p + delta) else {
            return index;
        };
        if count <= 3 {
            return index;
        }
        let too_close = |neighbor: Option<Point2>| {
            neighbor.is_some_and(|p| (target - p).norm() <= MIN_POINT_SPACING)
        };
        let prev_close = index >= 2 && too_close(w.position(index - 1));
        let next_close = too_close(w.position(index + 1));

        let mut index = index;
        if prev_close {
            trace!(?wire, index, "dragged point would hit its predecessor");
            self.translate_segment(wire, index - 2, delta);
            let grown = self
                .store
                .wire(wire)
                .map_or(count, Wire::point_count)
                .saturating_sub(count);
            if grown > 0 {
                self.end_move(wire, index);
                index += grown;
                self.begin_move(wire, index);
            }
        }
        if next_close {
            trace!(?wire, index, "dragged point would hit its successor");
            self.translate_segment(wire, index + 1, delta);
        }
        index
    }

    /// Returns where the two helper points go when a straight two-point wire
    /// is dragged across its axis.
    fn auxiliary_corner(&self, wire: WireId, delta: Vector2) -> Option<Point2> {
        let line = self.store.wire(wire).ok()?.segment(0)?;
        if line.is_null() {
            return None;
        }
        let across_horizontal = line.is_horizontal() && delta.y.abs() > TOLERANCE;
        let across_vertical = line.is_vertical() && delta.x.abs() > TOLERANCE;
        if !across_horizontal && !across_vertical {
            return None;
        }
        let half = (line.length() / 2.0).trunc();
        let (p1, p2) = (line.p1(), line.p2());
        if line.is_horizontal() {
            let left = if p2.x < p1.x { p2 } else { p1 };
            Some(Point2::new(left.x + half, left.y))
        } else {
            let upper = if p2.y < p1.y { p2 } else { p1 };
            Some(Point2::new(upper.x, upper.y + half))
        }
    }

    /// Shifts the point at `neighbor` so that `line`, the segment `shared`
    /// between it and the dragged point, keeps its axis.
    ///
    /// Returns `true` if the segment was handled and must not be re-homed
    /// again when the dragged point itself moves.
    fn nudge_neighbor(
        &mut self,
        wire: WireId,
        neighbor: usize,
        shared: usize,
        line: LineSegment,
        delta: Vector2,
    ) -> bool {
        let Ok(direction) = line.direction() else {
            return false;
        };
        if !line.is_horizontal() && !line.is_vertical() {
            return false;
        }
        // Only the component across the axis survives.
        let shift = delta - direction * direction.dot(&delta);
        if is_null_vector(&shift) {
            return false;
        }

        for (other, j, _) in self.junctions_on_segment(wire, &line, true) {
            self.drag_point(other, j, shift);
        }
        let Some(position) = self.store.wire(wire).ok().and_then(|w| w.position(neighbor)) else {
            return false;
        };
        self.relocate_point(wire, neighbor, position + shift, &[shared], true);
        true
    }

    /// Moves one point without straight-angle handling.
    ///
    /// Junctions of connected wires sitting on the point are carried along
    /// (unless `carry` is false) and junctions strictly inside the adjoining
    /// segments are re-homed proportionally, except on `skip` segments.
    fn relocate_point(
        &mut self,
        wire: WireId,
        index: usize,
        target: Point2,
        skip: &[usize],
        carry: bool,
    ) -> bool {
        if !self.begin_move(wire, index) {
            trace!(?wire, index, "point already moving, skipping");
            return false;
        }
        let moved = self.relocate_held(wire, index, target, skip, carry);
        self.end_move(wire, index);
        moved
    }

    /// Body of [`Self::relocate_point`] for a point the caller has already
    /// marked as moving.
    fn relocate_held(
        &mut self,
        wire: WireId,
        index: usize,
        target: Point2,
        skip: &[usize],
        carry: bool,
    ) -> bool {
        let Ok(w) = self.store.wire(wire) else {
            return false;
        };
        let Some(current) = w.position(index) else {
            return false;
        };
        if points_coincide(&current, &target) {
            return false;
        }
        let next = w.position(index + 1).filter(|_| !skip.contains(&index));
        let prev = index
            .checked_sub(1)
            .filter(|i| !skip.contains(i))
            .and_then(|i| w.position(i));

        let mut rehome = Vec::new();
        if let Some(next) = next {
            let old = LineSegment::new(current, next);
            let new = LineSegment::new(target, next);
            for (other, j, at) in self.junctions_on_segment(wire, &old, true) {
                push_unique(&mut rehome, (other, j, old.map_onto(&at, &new)));
            }
        }
        if let Some(prev) = prev {
            let old = LineSegment::new(prev, current);
            let new = LineSegment::new(prev, target);
            for (other, j, at) in self.junctions_on_segment(wire, &old, true) {
                push_unique(&mut rehome, (other, j, old.map_onto(&at, &new)));
            }
        }

        if carry {
            let delta = target - current;
            for other in self.store.edges().neighbors(wire) {
                let riders: Vec<usize> = self
                    .store
                    .wire(other)
                    .map(|o| {
                        o.junctions()
                            .into_iter()
                            .filter(|&j| o.position(j).is_some_and(|p| points_coincide(&p, &current)))
                            .collect()
                    })
                    .unwrap_or_default();
                for j in riders {
                    self.drag_point(other, j, delta);
                }
            }
        }

        self.apply_junction_moves(rehome);

        if let Ok(w) = self.store.wire_mut(wire) {
            w.set_position(index, target);
        }
        self.emit_point_moved(wire, index);
        true
    }

    /// Lists junctions of wires connected to `wire` that lie on `segment`.
    fn junctions_on_segment(
        &self,
        wire: WireId,
        segment: &LineSegment,
        strict: bool,
    ) -> Vec<JunctionMove> {
        let mut found = Vec::new();
        for other in self.store.edges().neighbors(wire) {
            let Ok(o) = self.store.wire(other) else {
                continue;
            };
            for j in o.junctions() {
                let Some(at) = o.position(j) else {
                    continue;
                };
                let on = if strict {
                    segment.contains_point_strictly(&at)
                } else {
                    segment.contains_point(&at, 0.0)
                };
                if on {
                    found.push((other, j, at));
                }
            }
        }
        found
    }

    fn apply_junction_moves(&mut self, moves: Vec<JunctionMove>) {
        for (other, j, destination) in moves {
            self.relocate_point(other, j, destination, &[], true);
        }
    }

    /// Returns `true` if the point is a junction or holds a connector.
    fn endpoint_is_connected(&self, wire: WireId, index: usize) -> bool {
        let is_junction = self
            .store
            .wire(wire)
            .ok()
            .and_then(|w| w.point(index))
            .is_some_and(|p| p.is_junction);
        is_junction || self.wire_point_is_attached(wire, index)
    }
}

fn push_unique(moves: &mut Vec<JunctionMove>, entry: JunctionMove) {
    if !moves.iter().any(|&(w, j, _)| w == entry.0 && j == entry.1) {
        moves.push(entry);
    }
}
