//! Risk checks for the open position

use crate::position::tracker::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed alert thresholds, all in percent except the heartbeat cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub critical_loss_pct: f64,
    pub warning_loss_pct: f64,
    pub warning_profit_pct: f64,
    pub heartbeat_minutes: u32,
    /// Distance of the recommended protective orders from the entry
    pub protective_pct: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical_loss_pct: -5.0,
            warning_loss_pct: -3.0,
            warning_profit_pct: 5.0,
            heartbeat_minutes: 30,
            protective_pct: 3.0,
        }
    }
}

impl RiskThresholds {
    /// Recommended stop-loss and take-profit prices for a fresh entry.
    pub fn protective_levels(&self, entry_price: f64) -> ProtectiveLevels {
        ProtectiveLevels {
            stop_loss: entry_price * (1.0 - self.protective_pct / 100.0),
            take_profit: entry_price * (1.0 + self.protective_pct / 100.0),
            pct: self.protective_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtectiveLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    Critical,
    StopLossWarning,
    TakeProfitWarning,
    Heartbeat,
}

impl AlertKind {
    /// Alerts that come with the position keyboard attached
    pub fn wants_keyboard(self) -> bool {
        matches!(self, AlertKind::Critical | AlertKind::TakeProfitWarning)
    }
}

/// One alert with the figures it was computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAlert {
    pub kind: AlertKind,
    pub price: f64,
    pub profit_percent: f64,
    pub holding_minutes: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskMonitor {
    thresholds: RiskThresholds,
}

impl RiskMonitor {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    /// First matching category in priority order, or `None`.
    pub fn evaluate(
        &self,
        position: &Position,
        price: f64,
        now: DateTime<Utc>,
    ) -> Option<RiskAlert> {
        let profit_percent = position.profit_percent(price);
        let holding_minutes = position.holding_minutes(now);
        let kind = self.classify(profit_percent, holding_minutes)?;

        Some(RiskAlert {
            kind,
            price,
            profit_percent,
            holding_minutes,
        })
    }

    pub fn classify(&self, profit_percent: f64, holding_minutes: f64) -> Option<AlertKind> {
        let t = &self.thresholds;
        if profit_percent < t.critical_loss_pct {
            Some(AlertKind::Critical)
        } else if profit_percent < t.warning_loss_pct {
            Some(AlertKind::StopLossWarning)
        } else if profit_percent > t.warning_profit_pct {
            Some(AlertKind::TakeProfitWarning)
        } else if self.heartbeat_due(holding_minutes) {
            Some(AlertKind::Heartbeat)
        } else {
            None
        }
    }

    fn heartbeat_due(&self, holding_minutes: f64) -> bool {
        let cadence = self.thresholds.heartbeat_minutes;
        if cadence == 0 || holding_minutes <= f64::from(cadence) {
            return false;
        }
        (holding_minutes.floor() as u64) % u64::from(cadence) == 0
    }
}
