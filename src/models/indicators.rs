use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar. Series are ordered by strictly increasing `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Crossover values for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub short_ma: f64,
    pub long_ma: f64,
    /// +1 when the short average is above the long one, -1 below, 0 equal
    pub signal: i32,
}

/// Candle series augmented with per-bar crossover values.
///
/// `points[i]` belongs to `candles[i]` and is `None` until enough history
/// exists for the long average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub candles: Vec<Candle>,
    pub points: Vec<Option<IndicatorPoint>>,
    pub short_period: usize,
    pub long_period: usize,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// True when at least one bar carries indicator values.
    pub fn has_indicators(&self) -> bool {
        self.points.iter().any(Option::is_some)
    }

    /// Last bar and its indicator values, if any.
    pub fn last(&self) -> Option<(&Candle, Option<IndicatorPoint>)> {
        let candle = self.candles.last()?;
        let point = self.points.last().copied().flatten();
        Some((candle, point))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Candle, Option<IndicatorPoint>)> {
        self.candles.iter().zip(self.points.iter().copied())
    }
}
