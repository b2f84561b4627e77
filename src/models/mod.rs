//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{Candle, IndicatorPoint, IndicatorSeries};
pub use signal::Decision;
