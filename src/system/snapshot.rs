//! Plain-data image of a [`WireSystem`] for persistence.
//!
//! Wires are referred to by their position in [`SystemSnapshot::wires`];
//! IDs are not stable across a save/load cycle.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SnapshotError};
use crate::geometry::WirePoint;
use crate::math::Point2;
use crate::settings::Settings;
use crate::topology::{Wire, WireId};

use super::WireSystem;

/// Wires, nets and join edges of a whole system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub wires: Vec<WireSnapshot>,
    #[serde(default)]
    pub nets: Vec<NetSnapshot>,
    /// Join edges as pairs of wire indices.
    #[serde(default)]
    pub connections: Vec<(usize, usize)>,
}

/// Ordered points of one wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSnapshot {
    pub points: Vec<PointSnapshot>,
}

/// One wire point with its junction flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub junction: bool,
}

/// A net's name and member wires, as indices into [`SystemSnapshot::wires`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetSnapshot {
    #[serde(default)]
    pub name: String,
    pub wires: Vec<usize>,
}

impl From<&WirePoint> for PointSnapshot {
    fn from(point: &WirePoint) -> Self {
        Self {
            x: point.position.x,
            y: point.position.y,
            junction: point.is_junction,
        }
    }
}

impl From<PointSnapshot> for WirePoint {
    fn from(point: PointSnapshot) -> Self {
        Self {
            position: Point2::new(point.x, point.y),
            is_junction: point.junction,
        }
    }
}

impl WireSystem {
    /// Captures wires, nets and join edges.
    #[must_use]
    pub fn snapshot(&self) -> SystemSnapshot {
        let ids = self.store.wire_ids();
        let position: BTreeMap<WireId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let wires = ids
            .iter()
            .filter_map(|&id| self.store.wire(id).ok())
            .map(|w| WireSnapshot {
                points: w.points().iter().map(PointSnapshot::from).collect(),
            })
            .collect();

        let nets = self
            .store
            .net_ids()
            .into_iter()
            .filter_map(|id| self.store.net(id).ok())
            .map(|net| NetSnapshot {
                name: net.name().to_owned(),
                wires: net.wires().iter().filter_map(|w| position.get(w).copied()).collect(),
            })
            .collect();

        let connections = self
            .store
            .edges()
            .edges()
            .into_iter()
            .filter_map(|(a, b)| Some((*position.get(&a)?, *position.get(&b)?)))
            .collect();

        SystemSnapshot {
            wires,
            nets,
            connections,
        }
    }

    /// Rebuilds a system from a snapshot.
    ///
    /// Wires not listed in any net get a singleton net; nets without wires
    /// are dropped. Join edges merge the nets of their wires.
    ///
    /// # Errors
    ///
    /// Returns an error if a net or connection refers to a wire index that
    /// does not exist, or a wire is listed in more than one net.
    pub fn from_snapshot(snapshot: &SystemSnapshot, settings: Settings) -> Result<Self> {
        let mut system = Self::with_settings(settings);
        let ids: Vec<WireId> = snapshot
            .wires
            .iter()
            .map(|w| {
                let points = w.points.iter().copied().map(WirePoint::from).collect();
                system.add_wire(Wire::new(points))
            })
            .collect();
        let lookup = |index: usize| {
            ids.get(index).copied().ok_or(SnapshotError::WireIndexOutOfRange {
                index,
                count: ids.len(),
            })
        };

        let mut listed = BTreeSet::new();
        for net in &snapshot.nets {
            // The first member's singleton net becomes the restored net.
            let mut target = None;
            for &index in &net.wires {
                if !listed.insert(index) {
                    return Err(SnapshotError::DuplicateMembership(index).into());
                }
                let wire = lookup(index)?;
                let singleton = system.store.wire(wire)?.net();
                match target {
                    None => {
                        system.store.net_mut(singleton)?.set_name(net.name.as_str());
                        target = Some(singleton);
                    }
                    Some(id) => {
                        system.store.assign_wire_to_net(wire, id)?;
                        system.store.remove_net(singleton);
                    }
                }
            }
        }

        for &(a, b) in &snapshot.connections {
            let (a, b) = (lookup(a)?, lookup(b)?);
            system.store.edges_mut().connect(a, b);
            let (net, other) = (system.store.wire(a)?.net(), system.store.wire(b)?.net());
            if system.merge_nets(net, other) {
                system.store.remove_net(other);
            }
        }

        debug!(
            wires = system.store.wire_count(),
            nets = system.store.net_count(),
            "system restored from snapshot"
        );
        Ok(system)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::WireNetError;

    fn tee() -> WireSystem {
        let mut system = WireSystem::new();
        let a = system.add_wire(Wire::from_positions([
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
        ]));
        system.add_wire(Wire::from_positions([
            Point2::new(50.0, 0.0),
            Point2::new(50.0, 100.0),
        ]));
        system.add_wire(Wire::from_positions([
            Point2::new(0.0, 200.0),
            Point2::new(100.0, 200.0),
        ]));
        system.generate_junctions();
        let net = system.net_of(a).unwrap();
        system.set_net_name(net, "SIG");
        system
    }

    #[test]
    fn json_round_trip_restores_topology() {
        let system = tee();
        let json = serde_json::to_string(&system.snapshot()).unwrap();
        let decoded: SystemSnapshot = serde_json::from_str(&json).unwrap();
        let restored = WireSystem::from_snapshot(&decoded, Settings::default()).unwrap();

        assert_eq!(restored.snapshot(), system.snapshot());
        assert_eq!(restored.nets().len(), 2);

        let ids = restored.wires();
        assert!(restored.are_connected(ids[0], ids[1]));
        assert!(restored.wire(ids[1]).unwrap().points()[0].is_junction);
        let net = restored.net(restored.net_of(ids[0]).unwrap()).unwrap();
        assert_eq!(net.name(), "SIG");
    }

    #[test]
    fn missing_fields_default() {
        let json = r#"{"wires":[{"points":[{"x":0,"y":0},{"x":10,"y":0}]}]}"#;
        let snapshot: SystemSnapshot = serde_json::from_str(json).unwrap();
        let system = WireSystem::from_snapshot(&snapshot, Settings::default()).unwrap();

        assert_eq!(system.wires().len(), 1);
        assert_eq!(system.nets().len(), 1);
    }

    #[test]
    fn bad_indices_are_rejected() {
        let snapshot = SystemSnapshot {
            wires: vec![WireSnapshot::default()],
            nets: Vec::new(),
            connections: vec![(0, 3)],
        };
        let err = WireSystem::from_snapshot(&snapshot, Settings::default()).unwrap_err();
        assert!(matches!(
            err,
            WireNetError::Snapshot(SnapshotError::WireIndexOutOfRange { index: 3, count: 1 })
        ));

        let snapshot = SystemSnapshot {
            wires: vec![WireSnapshot::default()],
            nets: vec![
                NetSnapshot {
                    name: String::new(),
                    wires: vec![0],
                },
                NetSnapshot {
                    name: String::new(),
                    wires: vec![0],
                },
            ],
            connections: Vec::new(),
        };
        let err = WireSystem::from_snapshot(&snapshot, Settings::default()).unwrap_err();
        assert!(matches!(
            err,
            WireNetError::Snapshot(SnapshotError::DuplicateMembership(0))
        ));
    }
}
