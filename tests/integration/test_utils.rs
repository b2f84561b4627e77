use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use scalpwatch::core::{RuntimeConfig, SignalContext};
use scalpwatch::models::indicators::{Candle, IndicatorSeries};
use scalpwatch::notify::{Keyboard, Notifier, NotifyError};
use scalpwatch::position::{PositionDesk, PositionTracker};
use scalpwatch::services::chart::{ChartError, ChartRenderer};
use scalpwatch::services::market_data::{CandleInterval, MarketDataError, MarketDataProvider};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

/// One-minute candles starting at `start_time()`
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(
                close,
                close + 0.1,
                close - 0.1,
                close,
                1_000.0 + i as f64,
                start_time() + Duration::minutes(i as i64),
            )
        })
        .collect()
}

/// Falls for 20 bars, then jumps: signals -1, -1, +1, +1, +1, +1 on bars 19..=24
pub fn crossover_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..20).map(|i| 100.0 - 0.5 * i as f64).collect();
    closes.extend([92.0, 115.0, 125.0, 135.0, 145.0]);
    closes
}

/// Scripted market data. `None` candles simulate an outage.
#[allow(dead_code)]
pub struct FakeMarketData {
    candles: Mutex<Option<Vec<Candle>>>,
    price: Mutex<Option<f64>>,
    pub requests: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

#[allow(dead_code)]
impl FakeMarketData {
    pub fn new(candles: Vec<Candle>, price: f64) -> Self {
        Self {
            candles: Mutex::new(Some(candles)),
            price: Mutex::new(Some(price)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_candles(&self, candles: Vec<Candle>) {
        *self.candles.lock().unwrap() = Some(candles);
    }

    pub fn set_price(&self, price: f64) {
        *self.price.lock().unwrap() = Some(price);
    }

    pub fn drop_price(&self) {
        *self.price.lock().unwrap() = None;
    }

    pub fn go_offline(&self) {
        *self.candles.lock().unwrap() = None;
        *self.price.lock().unwrap() = None;
    }
}

#[async_trait]
impl MarketDataProvider for FakeMarketData {
    async fn fetch_candles(
        &self,
        _instrument_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        _interval: CandleInterval,
    ) -> Result<Vec<Candle>, MarketDataError> {
        self.requests.lock().unwrap().push((from, to));
        self.candles
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| MarketDataError::Invalid("market data offline".to_string()))
    }

    async fn fetch_last_price(&self, instrument_id: &str) -> Result<f64, MarketDataError> {
        self.price
            .lock()
            .unwrap()
            .ok_or_else(|| MarketDataError::NoPrice(instrument_id.to_string()))
    }
}

pub struct FakeCharts {
    pub fail: bool,
}

#[async_trait]
impl ChartRenderer for FakeCharts {
    async fn render(&self, series: &IndicatorSeries) -> Result<Vec<u8>, ChartError> {
        if series.is_empty() {
            return Err(ChartError::NoData);
        }
        if self.fail {
            return Err(ChartError::Api {
                status: 500,
                body: "renderer_down: *quota*".to_string(),
            });
        }
        Ok(b"\x89PNG fake".to_vec())
    }
}

/// Everything the notifier was asked to deliver
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        text: String,
        keyboard: Option<Keyboard>,
    },
    Photo {
        caption: String,
    },
    Edit {
        message_id: i64,
        text: String,
        keyboard: Option<Keyboard>,
    },
}

#[allow(dead_code)]
impl Sent {
    pub fn text(&self) -> &str {
        match self {
            Sent::Text { text, .. } | Sent::Edit { text, .. } => text,
            Sent::Photo { caption } => caption,
        }
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        match self {
            Sent::Text { keyboard, .. } | Sent::Edit { keyboard, .. } => keyboard.as_ref(),
            Sent::Photo { .. } => None,
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    fn record(&self, sent: Sent) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(sent);
        if self.fail {
            return Err(NotifyError::Api {
                method: "sendMessage",
                description: "Bad Request: chat not found".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, text: &str, keyboard: Option<&Keyboard>) -> Result<(), NotifyError> {
        self.record(Sent::Text {
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        })
    }

    async fn send_photo(&self, _image: Vec<u8>, caption: &str) -> Result<(), NotifyError> {
        self.record(Sent::Photo {
            caption: caption.to_string(),
        })
    }

    async fn edit_text(
        &self,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), NotifyError> {
        self.record(Sent::Edit {
            message_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        })
    }
}

/// Fakes wired into a context with a live desk
#[allow(dead_code)]
pub struct TestHarness {
    pub market: Arc<FakeMarketData>,
    pub notifier: Arc<RecordingNotifier>,
    pub desk: PositionDesk,
    pub ctx: SignalContext,
    pub config: RuntimeConfig,
}

#[allow(dead_code)]
impl TestHarness {
    pub fn new(candles: Vec<Candle>, price: f64) -> Self {
        Self::with_parts(candles, price, false, RecordingNotifier::default())
    }

    pub fn with_parts(
        candles: Vec<Candle>,
        price: f64,
        chart_fails: bool,
        notifier: RecordingNotifier,
    ) -> Self {
        let market = Arc::new(FakeMarketData::new(candles, price));
        let notifier = Arc::new(notifier);
        let (desk, _handle) = PositionDesk::spawn(PositionTracker::new());
        let ctx = SignalContext::new(
            market.clone(),
            Arc::new(FakeCharts { fail: chart_fails }),
            notifier.clone(),
            desk.clone(),
        );
        Self {
            market,
            notifier,
            desk,
            ctx,
            config: RuntimeConfig::default(),
        }
    }
}
