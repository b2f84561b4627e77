//! Chart rendering through a QuickChart-compatible HTTP service
//!
//! The chart is described as a Chart.js config (close price, both averages,
//! crossover markers, volume on a secondary axis) and rendered to PNG remotely.

use crate::models::indicators::IndicatorSeries;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://quickchart.io";

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chart service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("no candles to draw")]
    NoData,
}

#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// PNG image of the series
    async fn render(&self, series: &IndicatorSeries) -> Result<Vec<u8>, ChartError>;
}

pub struct QuickChartRenderer {
    base_url: String,
    title: String,
    http: reqwest::Client,
}

impl QuickChartRenderer {
    pub fn new(
        base_url: impl Into<String>,
        title: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ChartError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, title, http))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        title: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            title: title.into(),
            http,
        }
    }
}

#[async_trait]
impl ChartRenderer for QuickChartRenderer {
    async fn render(&self, series: &IndicatorSeries) -> Result<Vec<u8>, ChartError> {
        if series.is_empty() {
            return Err(ChartError::NoData);
        }

        let body = json!({
            "width": WIDTH,
            "height": HEIGHT,
            "format": "png",
            "backgroundColor": "white",
            "chart": chart_config(series, &self.title),
        });

        let response = self
            .http
            .post(format!("{}/chart", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChartError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Chart.js config for the series.
///
/// Markers sit on the bars where the crossover signal flips.
pub fn chart_config(series: &IndicatorSeries, title: &str) -> Value {
    let labels: Vec<String> = series
        .candles
        .iter()
        .map(|c| c.timestamp.format("%H:%M").to_string())
        .collect();
    let closes: Vec<f64> = series.candles.iter().map(|c| c.close).collect();
    let volumes: Vec<f64> = series.candles.iter().map(|c| c.volume).collect();
    let short_ma: Vec<Option<f64>> = series.points.iter().map(|p| p.map(|p| p.short_ma)).collect();
    let long_ma: Vec<Option<f64>> = series.points.iter().map(|p| p.map(|p| p.long_ma)).collect();

    let mut buys = vec![None; series.len()];
    let mut sells = vec![None; series.len()];
    let mut previous = 0;
    for (i, (candle, point)) in series.iter().enumerate() {
        let Some(point) = point else { continue };
        if point.signal != previous {
            match point.signal {
                1 => buys[i] = Some(candle.close),
                -1 => sells[i] = Some(candle.close),
                _ => {}
            }
        }
        previous = point.signal;
    }

    let mut datasets = vec![json!({
        "type": "line",
        "label": "Close",
        "data": closes,
        "borderColor": "blue",
        "fill": false,
        "pointRadius": 0,
        "yAxisID": "price",
    })];

    if series.has_indicators() {
        datasets.push(json!({
            "type": "line",
            "label": format!("MA {}", series.short_period),
            "data": short_ma,
            "borderColor": "orange",
            "borderDash": [6, 3],
            "fill": false,
            "pointRadius": 0,
            "yAxisID": "price",
        }));
        datasets.push(json!({
            "type": "line",
            "label": format!("MA {}", series.long_period),
            "data": long_ma,
            "borderColor": "green",
            "borderDash": [10, 3, 2, 3],
            "fill": false,
            "pointRadius": 0,
            "yAxisID": "price",
        }));
        datasets.push(marker_dataset("Buy signal", buys, "green", 0));
        datasets.push(marker_dataset("Sell signal", sells, "red", 180));
    }

    datasets.push(json!({
        "type": "bar",
        "label": "Volume",
        "data": volumes,
        "backgroundColor": "rgba(0, 0, 255, 0.3)",
        "yAxisID": "volume",
    }));

    json!({
        "type": "bar",
        "data": { "labels": labels, "datasets": datasets },
        "options": {
            "title": { "display": true, "text": format!("{} with trading signals", title) },
            "scales": {
                "yAxes": [
                    { "id": "price", "position": "left", "scaleLabel": { "display": true, "labelString": "Price" } },
                    { "id": "volume", "position": "right", "gridLines": { "display": false }, "scaleLabel": { "display": true, "labelString": "Volume" } }
                ]
            }
        }
    })
}

fn marker_dataset(label: &str, data: Vec<Option<f64>>, color: &str, rotation: u32) -> Value {
    json!({
        "type": "line",
        "label": label,
        "data": data,
        "showLine": false,
        "pointStyle": "triangle",
        "pointRotation": rotation,
        "pointRadius": 8,
        "backgroundColor": color,
        "borderColor": color,
        "yAxisID": "price",
    })
}
