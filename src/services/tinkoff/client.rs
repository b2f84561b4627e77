//! Tinkoff Invest market data provider

use super::messages::{
    GetCandlesRequest, GetCandlesResponse, GetLastPricesRequest, GetLastPricesResponse,
    CANDLE_INTERVAL_1_MIN,
};
use crate::models::indicators::Candle;
use crate::services::market_data::{
    normalize_candles, CandleInterval, MarketDataError, MarketDataProvider,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://invest-public-api.tinkoff.ru/rest";
const MARKET_DATA_SERVICE: &str = "tinkoff.public.invest.api.contract.v1.MarketDataService";

pub struct TinkoffMarketDataProvider {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl TinkoffMarketDataProvider {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MarketDataError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, token, http))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        }
    }

    async fn call<Req, Resp>(&self, method: &str, body: &Req) -> Result<Resp, MarketDataError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}/{}", self.base_url, MARKET_DATA_SERVICE, method);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

fn interval_name(interval: CandleInterval) -> &'static str {
    match interval {
        CandleInterval::OneMinute => CANDLE_INTERVAL_1_MIN,
    }
}

#[async_trait]
impl MarketDataProvider for TinkoffMarketDataProvider {
    async fn fetch_candles(
        &self,
        instrument_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        interval: CandleInterval,
    ) -> Result<Vec<Candle>, MarketDataError> {
        if from >= to {
            return Err(MarketDataError::Invalid(format!(
                "empty candle range {} .. {}",
                from, to
            )));
        }

        let request = GetCandlesRequest {
            figi: instrument_id,
            from,
            to,
            interval: interval_name(interval),
        };
        let response: GetCandlesResponse = self.call("GetCandles", &request).await?;
        let candles = normalize_candles(response.candles.into_iter().map(Candle::from).collect());

        debug!(
            instrument = %instrument_id,
            count = candles.len(),
            "Tinkoff: fetched {} candles for {}",
            candles.len(),
            instrument_id
        );
        Ok(candles)
    }

    async fn fetch_last_price(&self, instrument_id: &str) -> Result<f64, MarketDataError> {
        let request = GetLastPricesRequest {
            figi: vec![instrument_id],
        };
        let response: GetLastPricesResponse = self.call("GetLastPrices", &request).await?;

        let price = response
            .last_prices
            .into_iter()
            .find(|p| p.figi == instrument_id)
            .and_then(|p| p.price)
            .map(|q| q.to_f64())
            .filter(|p| *p > 0.0)
            .ok_or_else(|| MarketDataError::NoPrice(instrument_id.to_string()))?;

        Ok(price)
    }
}
