//! Scalpwatch signal worker
//!
//! Runs the polling loop, the position desk and the Telegram listener in one
//! process until Ctrl-C.

use dotenvy::dotenv;
use scalpwatch::bot::{BotHandler, BotListener};
use scalpwatch::config::Config;
use scalpwatch::core::{SignalContext, SignalLoop};
use scalpwatch::logging;
use scalpwatch::position::{PositionDesk, PositionTracker};
use scalpwatch::services::{QuickChartRenderer, TelegramClient, TinkoffMarketDataProvider};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env()?;
    info!("Starting Scalpwatch signal worker");
    info!(environment = %config.environment, "Environment");
    info!(
        instrument = %config.runtime.instrument_id,
        short = config.runtime.windows.short(),
        long = config.runtime.windows.long(),
        confirmation = config.runtime.confirmation,
        "Signal: SMA {}/{} crossover on {}",
        config.runtime.windows.short(),
        config.runtime.windows.long(),
        config.runtime.instrument_name
    );

    let market_data = Arc::new(TinkoffMarketDataProvider::new(
        config.tinkoff_base_url.clone(),
        config.tinkoff_token.clone(),
        config.request_timeout,
    )?);
    let charts = Arc::new(QuickChartRenderer::new(
        config.chart_base_url.clone(),
        config.runtime.instrument_name.clone(),
        config.request_timeout,
    )?);
    let telegram = TelegramClient::new(
        config.telegram_base_url.clone(),
        config.telegram_token.clone(),
        config.telegram_chat_id,
        config.request_timeout,
    )?;

    let (desk, desk_handle) = PositionDesk::spawn(PositionTracker::new());
    let ctx = SignalContext::new(market_data, charts, Arc::new(telegram.clone()), desk);

    let (signal_loop, status) = SignalLoop::new(config.runtime.clone(), ctx.clone());
    let handler = BotHandler::new(config.runtime.clone(), ctx, status);
    let listener = BotListener::new(telegram, handler, config.updates_timeout_seconds);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener_handle = tokio::spawn(listener.run(shutdown_rx.clone()));
    let mut loop_handle = tokio::spawn(signal_loop.run(shutdown_rx));

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            let _ = shutdown_tx.send(true);
            match (&mut loop_handle).await {
                Ok(Err(e)) => error!(error = %e, "Signal loop ended with error"),
                Err(e) => error!(error = %e, "Signal loop task failed"),
                Ok(Ok(())) => {}
            }
        }
        result = &mut loop_handle => {
            match result {
                Ok(Err(e)) => error!(error = %e, "Signal loop failed"),
                Err(e) => error!(error = %e, "Signal loop task failed"),
                Ok(Ok(())) => info!("Signal loop stopped"),
            }
            let _ = shutdown_tx.send(true);
        }
    }

    let _ = listener_handle.await;
    desk_handle.abort();
    info!("Worker stopped");

    Ok(())
}
