//! Signal polling loop
//!
//! One tick: fetch candles, compute the crossover, feed the debouncer,
//! announce confirmed decisions, then check the open position for risk.
//! Failures are logged and the loop backs off; only shutdown ends it.

use crate::core::context::SignalContext;
use crate::core::status::{LoopState, LoopStatus};
use crate::indicators::CrossoverWindows;
use crate::models::indicators::IndicatorSeries;
use crate::models::signal::Decision;
use crate::notify::{messages, Keyboard, NotifyError};
use crate::position::DeskError;
use crate::risk::{AlertKind, RiskMonitor, RiskThresholds};
use crate::services::market_data::{CandleInterval, MarketDataError};
use crate::signals::{SignalDebouncer, DEFAULT_CONFIRMATION};
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Configuration for the signal loop
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub instrument_id: String,
    pub instrument_name: String,
    pub interval: CandleInterval,
    pub windows: CrossoverWindows,
    pub lookback: chrono::Duration,
    pub confirmation: usize,
    pub tick_interval: Duration,
    pub error_backoff: Duration,
    /// Wait before retrying when there are fewer candles than the long window
    pub no_data_retry: Duration,
    pub risk: RiskThresholds,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            instrument_id: "BBG004730ZJ9".to_string(),
            instrument_name: "VTB".to_string(),
            interval: CandleInterval::OneMinute,
            windows: CrossoverWindows::default(),
            lookback: chrono::Duration::days(1),
            confirmation: DEFAULT_CONFIRMATION,
            tick_interval: Duration::from_secs(60),
            error_backoff: Duration::from_secs(120),
            no_data_retry: Duration::from_secs(30),
            risk: RiskThresholds::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
    #[error(transparent)]
    Desk(#[from] DeskError),
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not enough candles for the long average; the history was left alone
    Skipped { candles: usize },
    Evaluated {
        signal: i32,
        price: f64,
        decision: Option<Decision>,
        alert: Option<AlertKind>,
    },
}

pub struct SignalLoop {
    config: RuntimeConfig,
    ctx: SignalContext,
    debouncer: SignalDebouncer,
    risk: RiskMonitor,
    status: watch::Sender<LoopStatus>,
}

impl SignalLoop {
    /// Create the loop and the receiver that observes its status
    pub fn new(config: RuntimeConfig, ctx: SignalContext) -> (Self, watch::Receiver<LoopStatus>) {
        let (status, status_rx) = watch::channel(LoopStatus::default());
        let signal_loop = Self {
            debouncer: SignalDebouncer::new(config.confirmation),
            risk: RiskMonitor::new(config.risk),
            config,
            ctx,
            status,
        };
        (signal_loop, status_rx)
    }

    pub fn debouncer(&self) -> &SignalDebouncer {
        &self.debouncer
    }

    /// Run until `shutdown` flips to true (or its sender goes away).
    ///
    /// Returns an error only when the position desk has stopped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), TickError> {
        self.set_state(LoopState::Starting);
        info!(
            instrument = %self.config.instrument_id,
            tick_seconds = self.config.tick_interval.as_secs(),
            confirmation = self.config.confirmation,
            "SignalLoop: starting for {} ({})",
            self.config.instrument_name,
            self.config.instrument_id
        );
        let activated = messages::activated(&self.config.instrument_name);
        log_delivery("activation", self.ctx.notifier.send_text(&activated, None).await);
        self.set_state(LoopState::Running);

        loop {
            let stop = *shutdown.borrow();
            if stop {
                break;
            }
            let now = Utc::now();
            let delay = match self.tick(now).await {
                Ok(TickOutcome::Skipped { .. }) => self.config.no_data_retry,
                Ok(_) => self.config.tick_interval,
                Err(TickError::Desk(e)) => {
                    error!(error = %e, at = %now, "SignalLoop: position desk unavailable, stopping");
                    self.set_state(LoopState::Failed);
                    return Err(TickError::Desk(e));
                }
                Err(e) => {
                    error!(
                        operation = "tick",
                        at = %now,
                        error = %e,
                        backoff_seconds = self.config.error_backoff.as_secs(),
                        "SignalLoop: tick failed: {}",
                        e
                    );
                    self.config.error_backoff
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("SignalLoop: shutdown requested");
        self.set_state(LoopState::Stopped);
        log_delivery("shutdown", self.ctx.notifier.send_text(&messages::stopped(), None).await);
        Ok(())
    }

    /// One evaluation cycle at `now`
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, TickError> {
        let series = self.ctx.load_series(&self.config, now).await?;

        let latest = series.last().and_then(|(candle, point)| Some((candle.close, point?.signal)));
        let Some((price, signal)) = latest else {
            debug!(
                instrument = %self.config.instrument_id,
                candles = series.len(),
                required = self.config.windows.long(),
                "SignalLoop: not enough candles ({} < {}), skipping",
                series.len(),
                self.config.windows.long()
            );
            return Ok(TickOutcome::Skipped {
                candles: series.len(),
            });
        };

        self.debouncer.record(signal);
        let decision = self.debouncer.evaluate();
        debug!(
            instrument = %self.config.instrument_id,
            signal = signal,
            price = price,
            history = self.debouncer.len(),
            "SignalLoop: recorded signal {}",
            signal
        );

        if let Some(decision) = decision {
            info!(
                instrument = %self.config.instrument_id,
                decision = %decision,
                price = price,
                "SignalLoop: confirmed {} at {:.2}",
                decision,
                price
            );
            self.announce(decision, price, &series).await?;
        }

        let alert = self.check_position(now).await?;

        self.status.send_modify(|status| {
            status.signal_count = self.debouncer.len();
            status.last_signal = Some(signal);
            status.last_price = Some(price);
            status.last_tick_at = Some(now);
        });

        Ok(TickOutcome::Evaluated {
            signal,
            price,
            decision,
            alert,
        })
    }

    async fn announce(
        &self,
        decision: Decision,
        price: f64,
        series: &IndicatorSeries,
    ) -> Result<(), TickError> {
        let in_position = self.ctx.desk.snapshot().await?.is_some();
        let caption = messages::decision_caption(
            decision,
            price,
            &self.config.instrument_name,
            self.config.confirmation,
        );
        let notifier = &self.ctx.notifier;

        match self.ctx.charts.render(series).await {
            Ok(image) => log_delivery("decision chart", notifier.send_photo(image, &caption).await),
            Err(e) => {
                warn!(error = %e, "SignalLoop: chart rendering failed, sending text only");
                log_delivery("decision", notifier.send_text(&caption, None).await);
            }
        }

        let keyboard = Keyboard::signal(in_position);
        log_delivery(
            "decision keyboard",
            notifier.send_text(&messages::confirm_prompt(), Some(&keyboard)).await,
        );
        Ok(())
    }

    async fn check_position(&self, now: DateTime<Utc>) -> Result<Option<AlertKind>, TickError> {
        let Some(position) = self.ctx.desk.snapshot().await? else {
            return Ok(None);
        };

        let price = self
            .ctx
            .market_data
            .fetch_last_price(&self.config.instrument_id)
            .await?;
        let Some(alert) = self.risk.evaluate(&position, price, now) else {
            return Ok(None);
        };

        info!(
            alert = ?alert.kind,
            price = alert.price,
            profit_percent = alert.profit_percent,
            holding_minutes = alert.holding_minutes,
            "SignalLoop: risk alert {:?} ({:+.2}%)",
            alert.kind,
            alert.profit_percent
        );
        let keyboard = alert.kind.wants_keyboard().then(|| Keyboard::signal(true));
        log_delivery(
            "risk alert",
            self.ctx
                .notifier
                .send_text(&messages::risk_alert(&alert), keyboard.as_ref())
                .await,
        );
        Ok(Some(alert.kind))
    }

    fn set_state(&self, state: LoopState) {
        self.status.send_modify(|status| status.state = state);
    }
}

/// Delivery failures never abort a tick
pub(crate) fn log_delivery(operation: &str, result: Result<(), NotifyError>) {
    if let Err(e) = result {
        warn!(operation = operation, error = %e, "notification delivery failed: {}", e);
    }
}
