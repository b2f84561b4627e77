//! Trend indicators: SMA crossover

pub mod sma;

pub use sma::*;
