use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid moving average windows: short={short}, long={long} (need 0 < short < long)")]
    InvalidWindows { short: usize, long: usize },
}
