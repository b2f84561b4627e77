use chrono::{DateTime, Utc};
use serde::Serialize;

/// Polling loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    Starting,
    Running,
    Stopped,
    Failed,
}

/// Snapshot the loop publishes after every tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopStatus {
    pub state: LoopState,
    pub signal_count: usize,
    pub last_signal: Option<i32>,
    pub last_price: Option<f64>,
    pub last_tick_at: Option<DateTime<Utc>>,
}

impl Default for LoopStatus {
    fn default() -> Self {
        Self {
            state: LoopState::Starting,
            signal_count: 0,
            last_signal: None,
            last_price: None,
            last_tick_at: None,
        }
    }
}
