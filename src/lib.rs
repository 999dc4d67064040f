//! Wire and net connectivity for schematic editors.
//!
//! A [`WireSystem`] owns polyline wires, groups them into nets, tracks the
//! join edges between wires and keeps external connectors glued to wire
//! points while the geometry is edited.

pub mod error;
pub mod geometry;
pub mod math;
pub mod settings;
pub mod system;
pub mod topology;

pub use error::{Result, WireNetError};
pub use settings::Settings;
pub use system::{Attachment, ConnectorId, SceneId, SystemSnapshot, WireEvent, WireSystem};
pub use topology::{Net, NetId, Wire, WireId};
