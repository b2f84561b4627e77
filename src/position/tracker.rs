//! Single-position bookkeeping and P&L

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("a position is already open (entry {entry_price:.2})")]
    AlreadyOpen { entry_price: f64 },
    #[error("no open position")]
    NotOpen,
    #[error("invalid price: {0}")]
    InvalidPrice(f64),
}

/// The open position. Created and destroyed whole, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_price: f64,
    pub entry_time: DateTime<Utc>,
}

impl Position {
    pub fn profit_percent(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price * 100.0
    }

    pub fn holding_minutes(&self, now: DateTime<Utc>) -> f64 {
        (now - self.entry_time).num_milliseconds() as f64 / 60_000.0
    }
}

/// Result of closing a position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub profit_percent: f64,
    pub holding_minutes: f64,
}

/// Holds at most one open position.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    position: Option<Position>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self { position: None }
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn is_open(&self) -> bool {
        self.position.is_some()
    }

    pub fn open(
        &mut self,
        entry_price: f64,
        entry_time: DateTime<Utc>,
    ) -> Result<Position, PositionError> {
        if let Some(existing) = self.position {
            return Err(PositionError::AlreadyOpen {
                entry_price: existing.entry_price,
            });
        }
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(PositionError::InvalidPrice(entry_price));
        }

        let position = Position {
            entry_price,
            entry_time,
        };
        self.position = Some(position);
        Ok(position)
    }

    pub fn close(
        &mut self,
        exit_price: f64,
        now: DateTime<Utc>,
    ) -> Result<ClosedPosition, PositionError> {
        let position = self.position.ok_or(PositionError::NotOpen)?;
        if !exit_price.is_finite() || exit_price <= 0.0 {
            return Err(PositionError::InvalidPrice(exit_price));
        }

        self.position = None;
        Ok(ClosedPosition {
            entry_price: position.entry_price,
            exit_price,
            entry_time: position.entry_time,
            exit_time: now,
            profit_percent: position.profit_percent(exit_price),
            holding_minutes: position.holding_minutes(now),
        })
    }

    pub fn unrealized_profit_percent(&self, current_price: f64) -> Option<f64> {
        self.position.map(|p| p.profit_percent(current_price))
    }

    pub fn holding_minutes(&self, now: DateTime<Utc>) -> Option<f64> {
        self.position.map(|p| p.holding_minutes(now))
    }
}
