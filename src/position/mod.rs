//! Open position tracking.

pub mod desk;
pub mod tracker;

pub use desk::{DeskError, PositionDesk};
pub use tracker::{ClosedPosition, Position, PositionError, PositionTracker};
