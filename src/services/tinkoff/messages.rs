//! Tinkoff Invest REST gateway payloads

use crate::models::indicators::Candle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const CANDLE_INTERVAL_1_MIN: &str = "CANDLE_INTERVAL_1_MIN";

#[derive(Debug, Serialize)]
pub struct GetCandlesRequest<'a> {
    pub figi: &'a str,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub interval: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct GetCandlesResponse {
    #[serde(default)]
    pub candles: Vec<HistoricCandle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricCandle {
    pub open: Quotation,
    pub high: Quotation,
    pub low: Quotation,
    pub close: Quotation,
    #[serde(deserialize_with = "int64")]
    pub volume: i64,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub is_complete: bool,
}

impl From<HistoricCandle> for Candle {
    fn from(c: HistoricCandle) -> Self {
        Candle::new(
            c.open.to_f64(),
            c.high.to_f64(),
            c.low.to_f64(),
            c.close.to_f64(),
            c.volume as f64,
            c.time,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct GetLastPricesRequest<'a> {
    pub figi: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLastPricesResponse {
    #[serde(default)]
    pub last_prices: Vec<LastPrice>,
}

#[derive(Debug, Deserialize)]
pub struct LastPrice {
    pub figi: String,
    pub price: Option<Quotation>,
    pub time: Option<DateTime<Utc>>,
}

/// Fixed-point price: `units` whole part plus `nano` billionths.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Quotation {
    #[serde(default, deserialize_with = "int64")]
    pub units: i64,
    #[serde(default)]
    pub nano: i32,
}

impl Quotation {
    pub fn to_f64(self) -> f64 {
        self.units as f64 + f64::from(self.nano) / 1e9
    }
}

/// The gateway encodes int64 as JSON strings; accept both forms.
fn int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(i64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
