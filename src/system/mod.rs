//! The wire/net manager.
//!
//! [`WireSystem`] owns the wire arena, the net registry, the join-edge table
//! and the connector attachments. Every editing operation enters here and
//! runs its whole invariant-restoring cascade before returning.

mod connectivity;
mod connectors;
mod editing;
mod events;
mod nets;
mod snapshot;

pub use connectors::{Attachment, ConnectorId, SceneId};
pub use events::WireEvent;
pub use snapshot::{NetSnapshot, PointSnapshot, SystemSnapshot, WireSnapshot};

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use crate::error::TopologyError;
use crate::math::Point2;
use crate::settings::Settings;
use crate::topology::{Net, NetId, Wire, WireId, WireStore};

/// Owner of all wires, nets and connector attachments of one scene.
#[derive(Debug, Default)]
pub struct WireSystem {
    store: WireStore,
    attachments: BTreeMap<ConnectorId, Attachment>,
    settings: Settings,
    scene: Option<SceneId>,
    events: Vec<WireEvent>,
    /// `(wire, point index)` pairs whose move is in progress.
    moving: HashSet<(WireId, usize)>,
}

impl WireSystem {
    /// Creates an empty system with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty system with the given settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Returns the current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the settings.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Returns the scene the wires live in.
    #[must_use]
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    /// Sets the scene the wires live in.
    pub fn set_scene(&mut self, scene: Option<SceneId>) {
        self.scene = scene;
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &WireStore {
        &self.store
    }

    /// Returns the wire with the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire does not exist.
    pub fn wire(&self, id: WireId) -> Result<&Wire, TopologyError> {
        self.store.wire(id)
    }

    /// Returns the net with the given ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the net does not exist.
    pub fn net(&self, id: NetId) -> Result<&Net, TopologyError> {
        self.store.net(id)
    }

    /// Returns every wire ID.
    #[must_use]
    pub fn wires(&self) -> Vec<WireId> {
        self.store.wire_ids()
    }

    /// Returns every net ID.
    #[must_use]
    pub fn nets(&self) -> Vec<NetId> {
        self.store.net_ids()
    }

    /// Returns the net owning `wire`.
    #[must_use]
    pub fn net_of(&self, wire: WireId) -> Option<NetId> {
        self.store.wire(wire).ok().map(Wire::net)
    }

    /// Returns the wires directly joined to `wire`.
    #[must_use]
    pub fn connected_wires(&self, wire: WireId) -> Vec<WireId> {
        self.store.edges().neighbors(wire)
    }

    /// Returns `true` if a join edge exists between the two wires.
    #[must_use]
    pub fn are_connected(&self, wire: WireId, other: WireId) -> bool {
        self.store.edges().are_connected(wire, other)
    }

    /// Returns the first wire passing within the hit tolerance of `point`.
    #[must_use]
    pub fn hit_test(&self, point: &Point2) -> Option<WireId> {
        let tolerance = self.settings.hit_tolerance;
        self.store.wire_ids().into_iter().find(|&id| {
            self.store
                .wire(id)
                .is_ok_and(|wire| wire.point_is_near_wire(point, tolerance))
        })
    }

    /// Drains the queued notifications.
    pub fn take_events(&mut self) -> Vec<WireEvent> {
        std::mem::take(&mut self.events)
    }

    /// Removes every wire, net and attachment.
    pub fn clear(&mut self) {
        self.store.clear();
        self.attachments.clear();
        self.moving.clear();
        self.events.clear();
    }

    /// Applies the system's own reaction to an event, then queues it.
    fn emit(&mut self, event: WireEvent) {
        match event {
            WireEvent::PointInserted { wire, index } => self.rebase_after_insert(wire, index),
            WireEvent::PointRemoved { wire, index } => self.rebase_after_remove(wire, index),
            WireEvent::WireDestroyed { wire } => {
                self.detach_all(wire);
            }
            WireEvent::PointMoved { .. } | WireEvent::NetHighlightChanged { .. } => {}
        }
        trace!(?event, "wire event");
        self.events.push(event);
    }

    fn emit_point_moved(&mut self, wire: WireId, index: usize) {
        let point = self
            .store
            .wire(wire)
            .ok()
            .and_then(|w| w.point(index).copied());
        if let Some(point) = point {
            self.emit(WireEvent::PointMoved { wire, index, point });
        }
    }

    /// Marks a point as being moved. Returns `false` if it already is.
    fn begin_move(&mut self, wire: WireId, index: usize) -> bool {
        self.moving.insert((wire, index))
    }

    fn end_move(&mut self, wire: WireId, index: usize) {
        self.moving.remove(&(wire, index));
    }

    fn wire_is_moving(&self, wire: WireId) -> bool {
        self.moving.iter().any(|&(w, _)| w == wire)
    }
}
