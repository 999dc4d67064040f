use crate::geometry::WirePoint;
use crate::topology::{NetId, WireId};

/// Notifications emitted while the wire system mutates.
///
/// The system reacts to each event synchronously (connector index rebasing,
/// detaching) before queueing it for outside consumers such as a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum WireEvent {
    /// A point was inserted at `index`.
    PointInserted { wire: WireId, index: usize },
    /// The point formerly at `index` was removed.
    PointRemoved { wire: WireId, index: usize },
    /// The point at `index` now sits at `point`.
    PointMoved {
        wire: WireId,
        index: usize,
        point: WirePoint,
    },
    /// The wire was removed from the system.
    WireDestroyed { wire: WireId },
    /// The highlight flag of a net changed.
    NetHighlightChanged { net: NetId, highlighted: bool },
}
