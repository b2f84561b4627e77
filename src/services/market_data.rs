//! Market data provider interface.

use crate::models::indicators::Candle;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("market data API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid market data: {0}")]
    Invalid(String),
    #[error("no last price for {0}")]
    NoPrice(String),
}

/// Bar granularity. The signal loop only trades one-minute bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandleInterval {
    #[default]
    OneMinute,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Candles in `[from, to]`, ordered by strictly increasing timestamp
    async fn fetch_candles(
        &self,
        instrument_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: CandleInterval,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Price of the last trade
    async fn fetch_last_price(&self, instrument_id: &str) -> Result<f64, MarketDataError>;
}

/// Sort by time and drop duplicate timestamps so the series is strictly increasing.
pub fn normalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);
    candles
}
