use tracing::{debug, warn};

use crate::math::{points_coincide, Point2};
use crate::topology::{Wire, WireId};

use super::WireSystem;

/// Identity of an external connector (a pin of a schematic symbol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectorId(pub u64);

/// Identity of the scene a connector or wire system lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(pub u64);

/// The wire point a connector is glued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub wire: WireId,
    pub index: usize,
}

impl WireSystem {
    /// Glues `connector` to point `index` of `wire`.
    ///
    /// `index` may range over `-1..=point_count`; both `-1` and
    /// `point_count` denote the trailing endpoint. Returns `false` if the
    /// connector is already attached, the wire is unknown or empty, or the
    /// index is out of range.
    pub fn attach_connector(&mut self, wire: WireId, index: isize, connector: ConnectorId) -> bool {
        if self.attachments.contains_key(&connector) {
            return false;
        }
        let Some(count) = self.store.wire(wire).ok().map(Wire::point_count) else {
            return false;
        };
        let Some(index) = resolve_index(index, count) else {
            warn!(?wire, index, count, "connector index out of range");
            return false;
        };
        self.attachments.insert(connector, Attachment { wire, index });
        debug!(?connector, ?wire, index, "connector attached");
        true
    }

    /// Glues `connector` to whichever endpoint of `wire` sits at `position`.
    pub fn attach_connector_at_extremity(
        &mut self,
        wire: WireId,
        connector: ConnectorId,
        position: Point2,
    ) -> bool {
        let Ok(w) = self.store.wire(wire) else {
            return false;
        };
        let Some(last) = w.last_index() else {
            return false;
        };
        let index = if w.position(0).is_some_and(|p| points_coincide(&p, &position)) {
            0
        } else if w.position(last).is_some_and(|p| points_coincide(&p, &position)) {
            last
        } else {
            return false;
        };
        isize::try_from(index).is_ok_and(|index| self.attach_connector(wire, index, connector))
    }

    /// Releases `connector`. Returns `false` if it was not attached.
    pub fn detach(&mut self, connector: ConnectorId) -> bool {
        let detached = self.attachments.remove(&connector).is_some();
        if detached {
            debug!(?connector, "connector detached");
        }
        detached
    }

    /// Releases every connector glued to `wire` and returns how many there were.
    pub fn detach_all(&mut self, wire: WireId) -> usize {
        let before = self.attachments.len();
        self.attachments.retain(|_, a| a.wire != wire);
        let removed = before - self.attachments.len();
        if removed > 0 {
            debug!(?wire, removed, "connectors detached");
        }
        removed
    }

    /// Returns the wire `connector` is glued to.
    #[must_use]
    pub fn attached_wire(&self, connector: ConnectorId) -> Option<WireId> {
        self.attachments.get(&connector).map(|a| a.wire)
    }

    /// Returns the index of the point `connector` is glued to.
    #[must_use]
    pub fn attached_point_index(&self, connector: ConnectorId) -> Option<usize> {
        self.attachments.get(&connector).map(|a| a.index)
    }

    /// Returns the connectors glued to `wire`, in connector order.
    #[must_use]
    pub fn connectors_attached_to(&self, wire: WireId) -> Vec<ConnectorId> {
        self.attachments
            .iter()
            .filter(|(_, a)| a.wire == wire)
            .map(|(&c, _)| c)
            .collect()
    }

    /// Returns `true` if some connector is glued to point `index` of `wire`.
    #[must_use]
    pub fn wire_point_is_attached(&self, wire: WireId, index: usize) -> bool {
        self.attachments
            .values()
            .any(|a| a.wire == wire && a.index == index)
    }

    /// Returns the first wire having a point exactly at `point`.
    #[must_use]
    pub fn wire_with_point_at(&self, point: &Point2) -> Option<WireId> {
        self.store.wire_ids().into_iter().find(|&id| {
            self.store
                .wire(id)
                .is_ok_and(|w| w.index_of_point_at(point).is_some())
        })
    }

    /// Follows a connector that moved to `position`.
    ///
    /// Connectors of another scene are ignored.
    pub fn connector_moved(
        &mut self,
        connector: ConnectorId,
        scene: Option<SceneId>,
        position: Point2,
    ) -> bool {
        if scene != self.scene {
            return false;
        }
        let Some(&Attachment { wire, index }) = self.attachments.get(&connector) else {
            return false;
        };
        self.move_point_to(wire, index, position)
    }

    /// Keeps tracked indices on their points after an insertion at `index`.
    pub(super) fn rebase_after_insert(&mut self, wire: WireId, index: usize) {
        let Some(count) = self.store.wire(wire).ok().map(Wire::point_count) else {
            return;
        };
        let old_last = count.saturating_sub(2);
        for attachment in self.attachments.values_mut().filter(|a| a.wire == wire) {
            let tracked = attachment.index;
            if tracked == 0 && index == 0 {
                continue;
            }
            if tracked >= index || (count >= 2 && tracked == old_last) {
                attachment.index += 1;
            }
        }
    }

    /// Keeps tracked indices on their points after a removal at `index`.
    pub(super) fn rebase_after_remove(&mut self, wire: WireId, index: usize) {
        let has_points = self.store.wire(wire).is_ok_and(|w| w.point_count() > 0);
        if !has_points {
            self.detach_all(wire);
            return;
        }
        for attachment in self.attachments.values_mut().filter(|a| a.wire == wire) {
            if attachment.index >= index && attachment.index > 0 {
                attachment.index -= 1;
            }
        }
    }
}

/// Maps a signed attach index onto a point index.
fn resolve_index(index: isize, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    if index == -1 {
        return Some(count - 1);
    }
    let index = usize::try_from(index).ok()?;
    match index {
        i if i == count => Some(count - 1),
        i if i < count => Some(i),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn three_point_wire(system: &mut WireSystem) -> WireId {
        system.add_wire(Wire::from_positions([
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(100.0, 0.0),
        ]))
    }

    #[test]
    fn attach_accepts_trailing_aliases() {
        let mut system = WireSystem::new();
        let w = three_point_wire(&mut system);

        assert!(system.attach_connector(w, -1, ConnectorId(1)));
        assert!(system.attach_connector(w, 3, ConnectorId(2)));
        assert_eq!(system.attached_point_index(ConnectorId(1)), Some(2));
        assert_eq!(system.attached_point_index(ConnectorId(2)), Some(2));
        assert!(!system.attach_connector(w, 4, ConnectorId(3)));
        assert!(!system.attach_connector(w, -2, ConnectorId(3)));
    }

    #[test]
    fn connector_attaches_only_once() {
        let mut system = WireSystem::new();
        let w = three_point_wire(&mut system);

        assert!(system.attach_connector(w, 0, ConnectorId(7)));
        assert!(!system.attach_connector(w, 1, ConnectorId(7)));
        assert_eq!(system.attached_wire(ConnectorId(7)), Some(w));
        assert!(system.detach(ConnectorId(7)));
        assert!(!system.detach(ConnectorId(7)));
    }

    #[test]
    fn removal_before_tracked_point_rebases() {
        let mut system = WireSystem::new();
        let w = three_point_wire(&mut system);
        system.attach_connector(w, 1, ConnectorId(1));

        system.remove_point(w, 0);
        assert_eq!(system.attached_point_index(ConnectorId(1)), Some(0));
    }

    #[test]
    fn insertion_keeps_first_and_last_tracking() {
        let mut system = WireSystem::new();
        let w = three_point_wire(&mut system);
        system.attach_connector(w, 0, ConnectorId(1));
        system.attach_connector(w, -1, ConnectorId(2));

        system.prepend_point(w, Point2::new(-10.0, 0.0));
        system.append_point(w, Point2::new(110.0, 0.0));
        let count = system.wire(w).unwrap().point_count();

        assert_eq!(system.attached_point_index(ConnectorId(1)), Some(0));
        assert_eq!(system.attached_point_index(ConnectorId(2)), Some(count - 1));
    }

    #[test]
    fn emptied_wire_drops_attachments() {
        let mut system = WireSystem::new();
        let w = system.add_wire(Wire::from_positions([Point2::new(0.0, 0.0)]));
        system.attach_connector(w, 0, ConnectorId(1));

        system.remove_point(w, 0);
        assert!(system.attached_wire(ConnectorId(1)).is_none());
    }

    #[test]
    fn extremity_attachment_matches_endpoints_only() {
        let mut system = WireSystem::new();
        let w = three_point_wire(&mut system);

        assert!(!system.attach_connector_at_extremity(w, ConnectorId(1), Point2::new(50.0, 0.0)));
        assert!(system.attach_connector_at_extremity(w, ConnectorId(1), Point2::new(100.0, 0.0)));
        assert_eq!(system.attached_point_index(ConnectorId(1)), Some(2));
        assert_eq!(system.connectors_attached_to(w), vec![ConnectorId(1)]);
        assert!(system.wire_point_is_attached(w, 2));
    }

    #[test]
    fn connector_moves_only_in_same_scene() {
        let mut system = WireSystem::new();
        system.set_scene(Some(SceneId(1)));
        let w = three_point_wire(&mut system);
        system.attach_connector(w, 0, ConnectorId(1));

        let target = Point2::new(0.0, -20.0);
        assert!(!system.connector_moved(ConnectorId(1), Some(SceneId(2)), target));
        assert!(system.connector_moved(ConnectorId(1), Some(SceneId(1)), target));

        let index = system.attached_point_index(ConnectorId(1)).unwrap();
        assert_eq!(system.wire(w).unwrap().position(index), Some(target));
    }

    #[test]
    fn destroyed_wire_releases_connectors() {
        let mut system = WireSystem::new();
        let w = three_point_wire(&mut system);
        system.attach_connector(w, 0, ConnectorId(1));
        system.attach_connector(w, 2, ConnectorId(2));

        assert!(system.remove_wire(w));
        assert!(system.connectors_attached_to(w).is_empty());
        assert_eq!(system.wire_with_point_at(&Point2::new(0.0, 0.0)), None);
    }

    #[test]
    fn connector_tracks_the_end_through_a_new_bend() {
        let mut system = WireSystem::new();
        let w = system.add_wire(Wire::from_positions([
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
        ]));
        system.attach_connector(w, 1, ConnectorId(1));

        let target = Point2::new(100.0, 40.0);
        assert!(system.connector_moved(ConnectorId(1), None, target));
        assert_eq!(system.wire(w).unwrap().point_count(), 4);
        assert_eq!(system.attached_point_index(ConnectorId(1)), Some(3));
        assert_eq!(system.wire(w).unwrap().position(3), Some(target));
    }
}
