use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, trace};

use crate::math::Point2;
use crate::topology::{Net, NetId, Wire, WireId};

use super::{WireEvent, WireSystem};

impl WireSystem {
    /// Registers a wire in a new singleton net and returns its ID.
    ///
    /// The wire is not connected to anything; call [`Self::connect_wire`]
    /// or [`Self::generate_junctions`] afterwards.
    pub fn add_wire(&mut self, wire: Wire) -> WireId {
        let net = self.store.add_net(Net::new());
        let id = self.store.insert_wire(wire, net);
        debug!(?id, ?net, "wire added");
        id
    }

    /// Removes a wire from the system.
    ///
    /// Junction flags on formerly connected wires that only existed because
    /// of this wire are cleared, attachments are dropped, and the wire's net
    /// is deleted if it became empty or split if the wire was a bridge.
    pub fn remove_wire(&mut self, wire: WireId) -> bool {
        let Ok(removed) = self.store.wire(wire).cloned() else {
            return false;
        };
        let net = removed.net();
        let neighbors = self.store.edges().neighbors(wire);

        for &other in &neighbors {
            self.store.edges_mut().disconnect(wire, other);
            self.clear_orphaned_junctions(other, &removed);
        }

        self.store.remove_wire(wire);
        self.emit(WireEvent::WireDestroyed { wire });

        let emptied = self.store.net(net).is_ok_and(Net::is_empty);
        if emptied {
            self.store.remove_net(net);
            debug!(?wire, ?net, "wire removed, net deleted");
        } else {
            self.split_into_components(net);
            debug!(?wire, ?net, "wire removed");
        }
        true
    }

    /// Joins `other` to `wire` and merges their nets.
    ///
    /// Endpoints of `other` lying on `wire` become junctions (or, if there
    /// are none, endpoints of `wire` lying on `other`). Returns `false` if
    /// the wires were already joined.
    pub fn connect_wire(&mut self, wire: WireId, other: WireId) -> bool {
        if !self.store.contains_wire(wire) || !self.store.contains_wire(other) {
            return false;
        }
        if !self.store.edges_mut().connect(wire, other) {
            return false;
        }

        if !self.flag_endpoints_on(other, wire) {
            self.flag_endpoints_on(wire, other);
        }

        let (Some(net), Some(other_net)) = (self.net_of(wire), self.net_of(other)) else {
            return true;
        };
        if self.merge_nets(net, other_net) {
            self.store.remove_net(other_net);
            debug!(?net, ?other_net, "nets merged");
        }
        true
    }

    /// Moves every wire of `other_net` into `net`.
    ///
    /// Returns `false` if both are the same net. `other_net` is left empty
    /// in the registry; the caller decides whether to delete it.
    pub fn merge_nets(&mut self, net: NetId, other_net: NetId) -> bool {
        if net == other_net {
            return false;
        }
        let Ok(members) = self.store.net(other_net).map(|n| n.wires().to_vec()) else {
            return false;
        };
        if self.store.net(net).is_err() {
            return false;
        }
        for member in members {
            if let Err(err) = self.store.assign_wire_to_net(member, net) {
                debug!(?member, %err, "skipping stale net member");
            }
        }
        true
    }

    /// Removes the join edge between the two wires.
    ///
    /// If the wires reachable from `wire` no longer cover the whole net, the
    /// rest moves into a new net.
    pub fn disconnect_wire(&mut self, wire: WireId, other: WireId) -> bool {
        if !self.store.edges_mut().disconnect(wire, other) {
            return false;
        }
        let Some(net) = self.net_of(wire) else {
            return true;
        };
        let kept = self.wires_connected_to(wire);
        let members = self
            .store
            .net(net)
            .map(|n| n.wires().to_vec())
            .unwrap_or_default();
        if kept.len() < members.len() {
            let new_net = self.store.add_net(Net::new());
            for member in members.into_iter().filter(|m| !kept.contains(m)) {
                if let Err(err) = self.store.assign_wire_to_net(member, new_net) {
                    debug!(?member, %err, "skipping stale net member");
                }
            }
            debug!(?net, ?new_net, "net split");
        }
        true
    }

    /// Returns `wire` and every wire reachable from it over join edges
    /// inside its net.
    #[must_use]
    pub fn wires_connected_to(&self, wire: WireId) -> BTreeSet<WireId> {
        let mut reached = BTreeSet::new();
        let Some(net) = self.net_of(wire) else {
            return reached;
        };
        let mut queue = VecDeque::from([wire]);
        reached.insert(wire);
        while let Some(current) = queue.pop_front() {
            for next in self.store.edges().neighbors(current) {
                if self.net_of(next) == Some(net) && reached.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        reached
    }

    /// Discovers connectivity from geometry alone.
    ///
    /// Every wire endpoint lying on another wire becomes a junction and the
    /// two wires are connected.
    pub fn generate_junctions(&mut self) {
        let ids = self.store.wire_ids();
        for &wire in &ids {
            for &other in &ids {
                if wire == other {
                    continue;
                }
                let (Ok(w), Ok(o)) = (self.store.wire(wire), self.store.wire(other)) else {
                    continue;
                };
                let Some(last) = o.last_index() else {
                    continue;
                };
                let hits: Vec<usize> = [0, last]
                    .into_iter()
                    .filter(|&i| o.position(i).is_some_and(|p| w.point_is_on_wire(&p)))
                    .collect();
                for index in hits {
                    self.connect_wire(wire, other);
                    self.set_point_is_junction(other, index, true);
                }
            }
        }
        debug!(
            wires = ids.len(),
            nets = self.store.net_count(),
            "junctions generated"
        );
    }

    /// Updates connectivity after the user moved a point of `wire`.
    ///
    /// Only endpoints are considered: an endpoint that left a connected wire
    /// loses its junction (and the edge, unless another junction still holds
    /// the wires together); an endpoint that landed on another wire becomes
    /// a junction and joins it.
    pub fn point_moved_by_user(&mut self, wire: WireId, index: usize) {
        let Ok(w) = self.store.wire(wire) else {
            return;
        };
        if !w.is_endpoint(index) {
            return;
        }
        let Some(point) = w.point(index).copied() else {
            return;
        };

        if point.is_junction {
            let mut still_on_a_wire = false;
            for other in self.store.edges().neighbors(wire) {
                let Ok(o) = self.store.wire(other) else {
                    continue;
                };
                if o.point_is_on_wire(&point.position) {
                    still_on_a_wire = true;
                    continue;
                }
                if !self.joined_elsewhere(wire, other, index) {
                    trace!(?wire, ?other, "endpoint left wire, disconnecting");
                    self.disconnect_wire(other, wire);
                }
            }
            if !still_on_a_wire {
                self.set_point_is_junction(wire, index, false);
            }
        }

        for other in self.store.wire_ids() {
            if other == wire {
                continue;
            }
            let lands = self
                .store
                .wire(other)
                .is_ok_and(|o| o.point_is_on_wire(&point.position));
            if lands {
                self.set_point_is_junction(wire, index, true);
                if !self.are_connected(wire, other) {
                    self.connect_wire(other, wire);
                }
            }
        }
    }

    /// Flags endpoints of `wire` that lie on `on`. Returns `true` if any did.
    fn flag_endpoints_on(&mut self, wire: WireId, on: WireId) -> bool {
        let (Ok(w), Ok(target)) = (self.store.wire(wire), self.store.wire(on)) else {
            return false;
        };
        let Some(last) = w.last_index() else {
            return false;
        };
        let hits: Vec<usize> = [0, last]
            .into_iter()
            .filter(|&i| w.position(i).is_some_and(|p| target.point_is_on_wire(&p)))
            .collect();
        for &index in &hits {
            self.set_point_is_junction(wire, index, true);
        }
        !hits.is_empty()
    }

    /// Returns `true` if something other than endpoint `index` of `wire`
    /// still ties `wire` to `other`.
    fn joined_elsewhere(&self, wire: WireId, other: WireId, index: usize) -> bool {
        let (Ok(w), Ok(o)) = (self.store.wire(wire), self.store.wire(other)) else {
            return false;
        };
        let ours = w
            .junctions()
            .into_iter()
            .filter(|&j| j != index)
            .filter_map(|j| w.position(j))
            .any(|p| o.point_is_on_wire(&p));
        let theirs = o
            .junctions()
            .into_iter()
            .filter_map(|j| o.position(j))
            .any(|p| w.point_is_on_wire(&p));
        ours || theirs
    }

    /// Clears junction flags of `wire` that sat on `removed` and are not
    /// backed by any other connected wire.
    fn clear_orphaned_junctions(&mut self, wire: WireId, removed: &Wire) {
        let Ok(w) = self.store.wire(wire) else {
            return;
        };
        let neighbors: Vec<Wire> = self
            .store
            .edges()
            .neighbors(wire)
            .into_iter()
            .filter_map(|n| self.store.wire(n).ok().cloned())
            .collect();
        let orphaned: Vec<usize> = w
            .junctions()
            .into_iter()
            .filter(|&j| {
                w.position(j).is_some_and(|p: Point2| {
                    removed.point_is_on_wire(&p)
                        && !neighbors.iter().any(|n| n.point_is_on_wire(&p))
                })
            })
            .collect();
        for j in orphaned {
            self.set_point_is_junction(wire, j, false);
        }
    }

    /// Splits a net into one net per connected component.
    ///
    /// The component of the first member keeps the original net.
    fn split_into_components(&mut self, net: NetId) {
        let Ok(members) = self.store.net(net).map(|n| n.wires().to_vec()) else {
            return;
        };
        let mut assigned: BTreeSet<WireId> = BTreeSet::new();
        for member in members {
            if assigned.contains(&member) {
                continue;
            }
            let component = self.wires_connected_to(member);
            let first = assigned.is_empty();
            assigned.extend(component.iter().copied());
            if first {
                continue;
            }
            let new_net = self.store.add_net(Net::new());
            for wire in component {
                if let Err(err) = self.store.assign_wire_to_net(wire, new_net) {
                    debug!(?wire, %err, "skipping stale net member");
                }
            }
            debug!(?net, ?new_net, "net split");
        }
    }
}
