//! Dependencies shared by the polling loop and the bot handler

use crate::core::runtime::RuntimeConfig;
use crate::indicators::calculate_crossover;
use crate::models::indicators::IndicatorSeries;
use crate::notify::Notifier;
use crate::position::PositionDesk;
use crate::services::chart::ChartRenderer;
use crate::services::market_data::{MarketDataError, MarketDataProvider};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// External capabilities plus the handle to the position desk.
///
/// Nothing in here is mutable state: the desk owns the position and the
/// polling loop owns the signal history.
#[derive(Clone)]
pub struct SignalContext {
    pub market_data: Arc<dyn MarketDataProvider>,
    pub charts: Arc<dyn ChartRenderer>,
    pub notifier: Arc<dyn Notifier>,
    pub desk: PositionDesk,
}

impl SignalContext {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        charts: Arc<dyn ChartRenderer>,
        notifier: Arc<dyn Notifier>,
        desk: PositionDesk,
    ) -> Self {
        Self {
            market_data,
            charts,
            notifier,
            desk,
        }
    }

    /// Fetch the lookback window ending at `now` and compute the crossover.
    pub async fn load_series(
        &self,
        config: &RuntimeConfig,
        now: DateTime<Utc>,
    ) -> Result<IndicatorSeries, MarketDataError> {
        let candles = self
            .market_data
            .fetch_candles(
                &config.instrument_id,
                now - config.lookback,
                now,
                config.interval,
            )
            .await?;
        Ok(calculate_crossover(&candles, config.windows))
    }
}
