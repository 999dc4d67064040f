pub mod line;
pub mod wire_point;

pub use line::{LineSegment, Rect};
pub use wire_point::WirePoint;
