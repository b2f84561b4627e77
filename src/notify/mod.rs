//! Operator notifications: delivery trait, keyboards and message texts.

pub mod keyboard;
pub mod messages;

pub use keyboard::{Button, ButtonAction, Keyboard};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Http(reqwest::Error),
    #[error("chat API rejected {method}: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

/// Drops the request URL: Bot API paths carry the token.
impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Http(e.without_url())
    }
}

/// Outbound side of the chat gateway. All messages go to the configured chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, text: &str, keyboard: Option<&Keyboard>) -> Result<(), NotifyError>;

    async fn send_photo(&self, image: Vec<u8>, caption: &str) -> Result<(), NotifyError>;

    /// Replace the text (and keyboard) of a message sent earlier
    async fn edit_text(
        &self,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), NotifyError>;
}
