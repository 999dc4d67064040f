use tracing::debug;

use crate::geometry::{LineSegment, WirePoint};
use crate::topology::{Net, NetId, Wire};

use super::{WireEvent, WireSystem};

impl WireSystem {
    /// Renames a net. Returns `false` for an unknown net.
    pub fn set_net_name(&mut self, net: NetId, name: impl Into<String>) -> bool {
        let Ok(n) = self.store.net_mut(net) else {
            return false;
        };
        n.set_name(name);
        debug!(?net, name = n.name(), "net renamed");
        true
    }

    /// Returns every net sharing `net`'s name, `net` included.
    ///
    /// An unnamed net belongs to no global net and yields an empty list.
    #[must_use]
    pub fn global_net(&self, net: NetId) -> Vec<NetId> {
        let Ok(n) = self.store.net(net) else {
            return Vec::new();
        };
        if n.name().is_empty() {
            return Vec::new();
        }
        self.store
            .net_ids()
            .into_iter()
            .filter(|&id| id == net || self.store.net(id).is_ok_and(|o| n.shares_global_net_with(o)))
            .collect()
    }

    /// Highlights or un-highlights `net` and every net of its global net.
    pub fn set_net_highlighted(&mut self, net: NetId, highlighted: bool) -> bool {
        if self.store.net(net).is_err() {
            return false;
        }
        let mut targets = self.global_net(net);
        if targets.is_empty() {
            targets.push(net);
        }
        for id in targets {
            let changed = self
                .store
                .net_mut(id)
                .is_ok_and(|n| n.set_highlighted(highlighted));
            if changed {
                self.emit(WireEvent::NetHighlightChanged {
                    net: id,
                    highlighted,
                });
            }
        }
        true
    }

    /// Simplifies every wire of `net`.
    pub fn simplify_net(&mut self, net: NetId) -> bool {
        let Ok(members) = self.store.net(net).map(|n| n.wires().to_vec()) else {
            return false;
        };
        for wire in members {
            self.simplify(wire);
        }
        true
    }

    /// Returns the segments of every wire of `net`.
    #[must_use]
    pub fn net_line_segments(&self, net: NetId) -> Vec<LineSegment> {
        self.member_wires(net)
            .flat_map(|w| w.line_segments())
            .collect()
    }

    /// Returns the points of every wire of `net`.
    #[must_use]
    pub fn net_points(&self, net: NetId) -> Vec<WirePoint> {
        self.member_wires(net)
            .flat_map(|w| w.points().to_vec())
            .collect()
    }

    fn member_wires(&self, net: NetId) -> impl Iterator<Item = &Wire> + '_ {
        self.store
            .net(net)
            .map(Net::wires)
            .unwrap_or_default()
            .iter()
            .filter_map(|&id| self.store.wire(id).ok())
    }
}
