use thiserror::Error;

/// Top-level error type for the wire connectivity engine.
#[derive(Debug, Error)]
pub enum WireNetError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length segment")]
    ZeroLengthSegment,
}

/// Errors related to the wire/net topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("no segment of the wire contains ({x}, {y})")]
    SegmentNotFound { x: f64, y: f64 },
}

/// Errors raised while restoring a persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("wire index {index} is out of range ({count} wires)")]
    WireIndexOutOfRange { index: usize, count: usize },

    #[error("wire {0} is listed in more than one net")]
    DuplicateMembership(usize),
}

/// Convenience type alias for results using [`WireNetError`].
pub type Result<T> = std::result::Result<T, WireNetError>;
