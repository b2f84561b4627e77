use serde::{Deserialize, Serialize};
use std::fmt;

/// Confirmed directional call produced by the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Sell,
}

impl Decision {
    /// Raw per-bar signal value this decision confirms.
    pub fn signal_value(self) -> i32 {
        match self {
            Decision::Buy => 1,
            Decision::Sell => -1,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy => write!(f, "BUY"),
            Decision::Sell => write!(f, "SELL"),
        }
    }
}
