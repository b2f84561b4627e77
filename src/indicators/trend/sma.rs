//! SMA (Simple Moving Average) crossover indicator

use crate::indicators::error::IndicatorError;
use crate::models::indicators::{Candle, IndicatorPoint, IndicatorSeries};

pub const DEFAULT_SHORT_PERIOD: usize = 5;
pub const DEFAULT_LONG_PERIOD: usize = 20;

/// Short/long window pair for the crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverWindows {
    short: usize,
    long: usize,
}

impl CrossoverWindows {
    pub fn new(short: usize, long: usize) -> Result<Self, IndicatorError> {
        if short == 0 || short >= long {
            return Err(IndicatorError::InvalidWindows { short, long });
        }
        Ok(Self { short, long })
    }

    pub fn short(&self) -> usize {
        self.short
    }

    pub fn long(&self) -> usize {
        self.long
    }
}

impl Default for CrossoverWindows {
    fn default() -> Self {
        Self {
            short: DEFAULT_SHORT_PERIOD,
            long: DEFAULT_LONG_PERIOD,
        }
    }
}

/// Trailing SMA of the closes ending at the last candle
pub fn calculate_sma(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }
    let window = &candles[candles.len() - period..];
    Some(window.iter().map(|c| c.close).sum::<f64>() / period as f64)
}

/// Direction of the short average relative to the long one
pub fn crossover_signal(short_ma: f64, long_ma: f64) -> i32 {
    if short_ma > long_ma {
        1
    } else if short_ma < long_ma {
        -1
    } else {
        0
    }
}

/// Compute short/long SMAs and the per-bar crossover signal.
///
/// Bars before index `long - 1` carry no values. A series shorter than the
/// long window comes back without any indicator values.
pub fn calculate_crossover(candles: &[Candle], windows: CrossoverWindows) -> IndicatorSeries {
    let mut points = vec![None; candles.len()];

    if candles.len() >= windows.long {
        for (i, point) in points.iter_mut().enumerate().skip(windows.long - 1) {
            let history = &candles[..=i];
            let short_ma = calculate_sma(history, windows.short);
            let long_ma = calculate_sma(history, windows.long);
            if let (Some(short_ma), Some(long_ma)) = (short_ma, long_ma) {
                *point = Some(IndicatorPoint {
                    short_ma,
                    long_ma,
                    signal: crossover_signal(short_ma, long_ma),
                });
            }
        }
    }

    IndicatorSeries {
        candles: candles.to_vec(),
        points,
        short_period: windows.short,
        long_period: windows.long,
    }
}
