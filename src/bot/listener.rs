//! Long-polls Telegram for updates and feeds them to the handler

use crate::bot::{BotEvent, BotHandler, Command};
use crate::notify::ButtonAction;
use crate::services::telegram::messages::Update;
use crate::services::telegram::TelegramClient;
use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

const MAX_POLL_BACKOFF: Duration = Duration::from_secs(60);

pub struct BotListener {
    client: TelegramClient,
    handler: BotHandler,
    poll_timeout_seconds: u64,
}

impl BotListener {
    pub fn new(client: TelegramClient, handler: BotHandler, poll_timeout_seconds: u64) -> Self {
        Self {
            client,
            handler,
            poll_timeout_seconds,
        }
    }

    /// Poll until shutdown. Events are handled one at a time, in order.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut offset: Option<i64> = None;
        let mut backoff = poll_backoff();
        info!(chat_id = self.client.chat_id(), "BotListener: started");

        loop {
            let stop = *shutdown.borrow();
            if stop {
                break;
            }
            let polled = tokio::select! {
                polled = self.client.get_updates(offset, self.poll_timeout_seconds) => polled,
                _ = shutdown.changed() => break,
            };

            match polled {
                Ok(updates) => {
                    backoff = poll_backoff();
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        self.process(update).await;
                    }
                }
                Err(e) => {
                    let delay = backoff.next().unwrap_or(MAX_POLL_BACKOFF);
                    warn!(
                        operation = "getUpdates",
                        error = %e,
                        retry_in_ms = delay.as_millis() as u64,
                        "BotListener: polling failed: {}",
                        e
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = shutdown.changed() => break,
                    }
                }
            }
        }

        info!("BotListener: stopped");
    }

    async fn process(&self, update: Update) {
        if let Some(query) = &update.callback_query {
            if let Err(e) = self.client.answer_callback_query(&query.id).await {
                warn!(error = %e, "BotListener: failed to answer callback query");
            }
        }

        match event_from_update(&update, self.client.chat_id()) {
            Some(event) => self.handler.handle(event, Utc::now()).await,
            None => debug!(update_id = update.update_id, "BotListener: ignoring update"),
        }
    }
}

fn poll_backoff() -> ExponentialBackoff {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(MAX_POLL_BACKOFF)
        .with_max_times(usize::MAX)
        .build()
}

/// Map a Telegram update to an event, ignoring other chats and unknown input.
pub fn event_from_update(update: &Update, chat_id: i64) -> Option<BotEvent> {
    if let Some(query) = &update.callback_query {
        let message = query.message.as_ref();
        if message.map(|m| m.chat.id) != Some(chat_id) {
            return None;
        }
        let data = query.data.as_deref()?;
        return match data.parse::<ButtonAction>() {
            Ok(action) => Some(BotEvent::Button {
                action,
                message_id: message.map(|m| m.message_id),
            }),
            Err(e) => {
                warn!(error = %e, "BotListener: unknown button");
                None
            }
        };
    }

    let message = update.message.as_ref()?;
    if message.chat.id != chat_id {
        return None;
    }
    let text = message.text.as_deref()?;
    if !text.starts_with('/') {
        return None;
    }
    match text.parse::<Command>() {
        Ok(command) => Some(BotEvent::Command(command)),
        Err(e) => {
            debug!(error = %e, "BotListener: unknown command");
            None
        }
    }
}
