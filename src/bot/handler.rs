//! Command and button handling
//!
//! Position changes go through the desk, so a confirm racing a second confirm
//! still sees the single-position rule. Rejected transitions leave the
//! position untouched and tell the operator why.

use crate::bot::{BotEvent, Command};
use crate::core::context::SignalContext;
use crate::core::runtime::{log_delivery, RuntimeConfig};
use crate::core::status::LoopStatus;
use crate::notify::messages::{self, PositionStatus, StatusReport};
use crate::notify::{ButtonAction, Keyboard};
use crate::position::{DeskError, PositionError};
use crate::services::chart::ChartError;
use crate::services::market_data::MarketDataError;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Error)]
enum HandlerError {
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
    #[error(transparent)]
    Desk(#[from] DeskError),
}

#[derive(Clone)]
pub struct BotHandler {
    config: RuntimeConfig,
    ctx: SignalContext,
    status: watch::Receiver<LoopStatus>,
}

impl BotHandler {
    pub fn new(
        config: RuntimeConfig,
        ctx: SignalContext,
        status: watch::Receiver<LoopStatus>,
    ) -> Self {
        Self {
            config,
            ctx,
            status,
        }
    }

    /// Handle one event. Errors are logged and reported to the chat.
    pub async fn handle(&self, event: BotEvent, now: DateTime<Utc>) {
        info!(event = ?event, "BotHandler: handling event");
        if let Err(e) = self.dispatch(&event, now).await {
            error!(event = ?event, at = %now, error = %e, "BotHandler: event failed: {}", e);
            let text = messages::error(&e.to_string());
            log_delivery("handler error", self.ctx.notifier.send_text(&text, None).await);
        }
    }

    async fn dispatch(&self, event: &BotEvent, now: DateTime<Utc>) -> Result<(), HandlerError> {
        match *event {
            BotEvent::Command(Command::Start) => {
                let text = messages::help(&self.config.instrument_name);
                log_delivery("help", self.ctx.notifier.send_text(&text, None).await);
                Ok(())
            }
            BotEvent::Command(Command::Status) => self.send_status(now).await,
            BotEvent::Command(Command::Chart) => {
                self.send_chart(now).await;
                Ok(())
            }
            BotEvent::Command(Command::Position) => self.send_position_menu().await,
            BotEvent::Button { action, message_id } => {
                self.on_button(action, message_id, now).await
            }
        }
    }

    async fn on_button(
        &self,
        action: ButtonAction,
        message_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(), HandlerError> {
        match action {
            ButtonAction::ConfirmBuy => self.confirm_buy(message_id, now).await,
            ButtonAction::ConfirmSell => self.confirm_sell(message_id, now, false).await,
            ButtonAction::EmergencySell => self.confirm_sell(message_id, now, true).await,
            ButtonAction::CancelSignal => {
                self.respond(message_id, &messages::signal_cancelled(), None).await;
                Ok(())
            }
            ButtonAction::ShowChart => {
                self.send_chart(now).await;
                Ok(())
            }
            ButtonAction::ForceBuy => self.manual_buy(message_id).await,
            ButtonAction::ForceSell => self.manual_sell(message_id).await,
            ButtonAction::RefreshStatus => self.send_status(now).await,
        }
    }

    async fn confirm_buy(&self, message_id: Option<i64>, now: DateTime<Utc>) -> Result<(), HandlerError> {
        if let Some(position) = self.ctx.desk.snapshot().await? {
            self.reject(&PositionError::AlreadyOpen {
                entry_price: position.entry_price,
            })
            .await;
            return Ok(());
        }

        let price = self.last_price().await?;
        let position = match self.ctx.desk.open(price, now).await {
            Ok(position) => position,
            Err(DeskError::Position(e)) => {
                self.reject(&e).await;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let text = messages::position_opened(&position, &self.config.instrument_name);
        self.respond(message_id, &text, None).await;

        let levels = self.config.risk.protective_levels(position.entry_price);
        log_delivery(
            "protective levels",
            self.ctx
                .notifier
                .send_text(&messages::protective_levels(&levels), None)
                .await,
        );
        Ok(())
    }

    async fn confirm_sell(
        &self,
        message_id: Option<i64>,
        now: DateTime<Utc>,
        emergency: bool,
    ) -> Result<(), HandlerError> {
        if self.ctx.desk.snapshot().await?.is_none() {
            self.reject(&PositionError::NotOpen).await;
            return Ok(());
        }

        let price = self.last_price().await?;
        let closed = match self.ctx.desk.close(price, now).await {
            Ok(closed) => closed,
            Err(DeskError::Position(e)) => {
                self.reject(&e).await;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let text = if emergency {
            messages::emergency_closed(&closed)
        } else {
            messages::position_closed(&closed, &self.config.instrument_name)
        };
        self.respond(message_id, &text, None).await;
        Ok(())
    }

    async fn manual_buy(&self, message_id: Option<i64>) -> Result<(), HandlerError> {
        if let Some(position) = self.ctx.desk.snapshot().await? {
            self.reject(&PositionError::AlreadyOpen {
                entry_price: position.entry_price,
            })
            .await;
            return Ok(());
        }

        let price = self.last_price().await?;
        let text = messages::manual_buy_prompt(price, &self.config.instrument_name);
        self.respond(message_id, &text, Some(&Keyboard::manual_confirm(true)))
            .await;
        Ok(())
    }

    async fn manual_sell(&self, message_id: Option<i64>) -> Result<(), HandlerError> {
        let Some(position) = self.ctx.desk.snapshot().await? else {
            self.reject(&PositionError::NotOpen).await;
            return Ok(());
        };

        let price = self.last_price().await?;
        let text = messages::manual_sell_prompt(
            price,
            position.profit_percent(price),
            &self.config.instrument_name,
        );
        self.respond(message_id, &text, Some(&Keyboard::manual_confirm(false)))
            .await;
        Ok(())
    }

    async fn send_status(&self, now: DateTime<Utc>) -> Result<(), HandlerError> {
        let signal_count = self.status.borrow().signal_count;

        let position = match self.ctx.desk.snapshot().await? {
            Some(position) => {
                let current_price = self.last_price().await?;
                Some(PositionStatus {
                    position,
                    current_price,
                    profit_percent: position.profit_percent(current_price),
                    holding_minutes: position.holding_minutes(now),
                })
            }
            None => None,
        };

        let report = StatusReport {
            instrument: &self.config.instrument_name,
            instrument_id: &self.config.instrument_id,
            signal_count,
            position,
        };
        log_delivery(
            "status",
            self.ctx.notifier.send_text(&messages::status(&report), None).await,
        );
        Ok(())
    }

    async fn send_position_menu(&self) -> Result<(), HandlerError> {
        let in_position = self.ctx.desk.snapshot().await?.is_some();
        let keyboard = Keyboard::position(in_position);
        log_delivery(
            "position menu",
            self.ctx
                .notifier
                .send_text(&messages::position_keyboard_title(), Some(&keyboard))
                .await,
        );
        Ok(())
    }

    /// Render and send the current chart; failures are reported in the chat
    async fn send_chart(&self, now: DateTime<Utc>) {
        let notifier = &self.ctx.notifier;
        let series = match self.ctx.load_series(&self.config, now).await {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => {
                log_delivery("chart", notifier.send_text(&messages::not_enough_data(), None).await);
                return;
            }
            Err(e) => {
                self.chart_failed(&e.to_string()).await;
                return;
            }
        };

        match self.ctx.charts.render(&series).await {
            Ok(image) => {
                let caption = messages::chart_caption(&self.config.instrument_name);
                log_delivery("chart", notifier.send_photo(image, &caption).await);
            }
            Err(ChartError::NoData) => {
                log_delivery("chart", notifier.send_text(&messages::not_enough_data(), None).await);
            }
            Err(e) => self.chart_failed(&e.to_string()).await,
        }
    }

    async fn chart_failed(&self, reason: &str) {
        error!(error = %reason, "BotHandler: chart failed");
        log_delivery(
            "chart error",
            self.ctx
                .notifier
                .send_text(&messages::chart_failed(reason), None)
                .await,
        );
    }

    async fn last_price(&self) -> Result<f64, HandlerError> {
        Ok(self
            .ctx
            .market_data
            .fetch_last_price(&self.config.instrument_id)
            .await?)
    }

    async fn reject(&self, reason: &PositionError) {
        info!(reason = %reason, "BotHandler: transition rejected");
        log_delivery(
            "rejection",
            self.ctx
                .notifier
                .send_text(&messages::rejected(&reason.to_string()), None)
                .await,
        );
    }

    /// Edit the message that carried the button, or send a new one
    async fn respond(&self, message_id: Option<i64>, text: &str, keyboard: Option<&Keyboard>) {
        let notifier = &self.ctx.notifier;
        let result = match message_id {
            Some(id) => notifier.edit_text(id, text, keyboard).await,
            None => notifier.send_text(text, keyboard).await,
        };
        log_delivery("reply", result);
    }
}
