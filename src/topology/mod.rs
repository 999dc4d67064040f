pub mod edges;
pub mod net;
pub mod wire;

pub use edges::JoinEdges;
pub use net::{Net, NetId};
pub use wire::{Wire, WireId};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena that owns all wires and nets.
///
/// Entities reference each other via typed IDs (generational indices):
/// a wire's `net` field is the authoritative owner, the net keeps the
/// mirrored member list, and join edges live in a separate table.
#[derive(Debug, Default)]
pub struct WireStore {
    wires: SlotMap<WireId, Wire>,
    nets: SlotMap<NetId, Net>,
    edges: JoinEdges,
}

impl WireStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Wire operations ---

    /// Inserts a wire into `net` and returns its ID.
    pub(crate) fn insert_wire(&mut self, mut wire: Wire, net: NetId) -> WireId {
        wire.set_net(net);
        let id = self.wires.insert(wire);
        if let Some(net) = self.nets.get_mut(net) {
            net.add_wire(id);
        }
        id
    }

    /// Removes a wire, its edges and its net membership.
    pub(crate) fn remove_wire(&mut self, id: WireId) -> Option<Wire> {
        let wire = self.wires.remove(id)?;
        self.edges.remove_wire(id);
        if let Some(net) = self.nets.get_mut(wire.net()) {
            net.remove_wire(id);
        }
        Some(wire)
    }

    /// Returns a reference to the wire, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&Wire, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Returns a mutable reference to the wire, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub(crate) fn wire_mut(&mut self, id: WireId) -> Result<&mut Wire, TopologyError> {
        self.wires
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Returns `true` if the wire exists.
    #[must_use]
    pub fn contains_wire(&self, id: WireId) -> bool {
        self.wires.contains_key(id)
    }

    /// Returns the IDs of all wires.
    #[must_use]
    pub fn wire_ids(&self) -> Vec<WireId> {
        self.wires.keys().collect()
    }

    /// Returns the number of wires.
    #[must_use]
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    // --- Net operations ---

    /// Inserts a net and returns its ID.
    pub(crate) fn add_net(&mut self, net: Net) -> NetId {
        self.nets.insert(net)
    }

    /// Removes a net from the registry. Its wires are left untouched.
    pub(crate) fn remove_net(&mut self, id: NetId) -> Option<Net> {
        self.nets.remove(id)
    }

    /// Returns a reference to the net, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn net(&self, id: NetId) -> Result<&Net, TopologyError> {
        self.nets
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("net".into()))
    }

    /// Returns a mutable reference to the net, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub(crate) fn net_mut(&mut self, id: NetId) -> Result<&mut Net, TopologyError> {
        self.nets
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("net".into()))
    }

    /// Returns the IDs of all nets.
    #[must_use]
    pub fn net_ids(&self) -> Vec<NetId> {
        self.nets.keys().collect()
    }

    /// Returns the number of nets.
    #[must_use]
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Moves `wire` into `net`, keeping the back-reference and both member
    /// lists in sync.
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is not found in the store.
    pub(crate) fn assign_wire_to_net(&mut self, wire: WireId, net: NetId) -> Result<(), TopologyError> {
        if !self.nets.contains_key(net) {
            return Err(TopologyError::EntityNotFound("net".into()));
        }
        let old = self.wire(wire)?.net();
        if old == net {
            return Ok(());
        }
        if let Some(old_net) = self.nets.get_mut(old) {
            old_net.remove_wire(wire);
        }
        self.net_mut(net)?.add_wire(wire);
        self.wire_mut(wire)?.set_net(net);
        Ok(())
    }

    // --- Join edges ---

    /// Returns the join-edge table.
    #[must_use]
    pub fn edges(&self) -> &JoinEdges {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut JoinEdges {
        &mut self.edges
    }

    /// Removes every wire, net and edge.
    pub(crate) fn clear(&mut self) {
        self.wires.clear();
        self.nets.clear();
        self.edges.clear();
    }
}
