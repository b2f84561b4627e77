use chrono::{Duration, TimeZone, Utc};
use scalpwatch::indicators::{calculate_crossover, CrossoverWindows};
use scalpwatch::models::indicators::Candle;
use scalpwatch::services::chart::{ChartError, ChartRenderer, QuickChartRenderer};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn candles(count: usize) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let close = 100.0 + (i % 4) as f64;
            Candle::new(close, close, close, close, 50.0, start + Duration::minutes(i as i64))
        })
        .collect()
}

#[tokio::test]
async fn test_render_posts_chart_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chart"))
        .and(body_partial_json(json!({
            "width": 1200,
            "height": 800,
            "format": "png",
            "chart": { "options": { "title": { "text": "VTB with trading signals" } } }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"\x89PNG\r\n".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let renderer = QuickChartRenderer::with_client(server.uri(), "VTB", reqwest::Client::new());
    let series = calculate_crossover(&candles(30), CrossoverWindows::default());
    let image = renderer.render(&series).await.unwrap();
    assert!(image.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_render_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chart"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad chart"))
        .mount(&server)
        .await;

    let renderer = QuickChartRenderer::with_client(server.uri(), "VTB", reqwest::Client::new());
    let series = calculate_crossover(&candles(5), CrossoverWindows::default());
    let result = renderer.render(&series).await;
    assert!(matches!(result, Err(ChartError::Api { status: 400, .. })));
}

#[tokio::test]
async fn test_render_empty_series_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let renderer = QuickChartRenderer::with_client(server.uri(), "VTB", reqwest::Client::new());
    let series = calculate_crossover(&[], CrossoverWindows::default());
    assert!(matches!(renderer.render(&series).await, Err(ChartError::NoData)));
}
