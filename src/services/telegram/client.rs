//! Telegram Bot API client

use super::messages::{
    AnswerCallbackQueryRequest, ApiResponse, EditMessageTextRequest, GetUpdatesRequest,
    InlineKeyboardMarkup, SendMessageRequest, Update, PARSE_MODE,
};
use crate::notify::{Keyboard, Notifier, NotifyError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Extra time on top of the long-poll timeout before the request is abandoned
const LONG_POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TelegramClient {
    base_url: String,
    token: String,
    chat_id: i64,
    http: reqwest::Client,
}

impl TelegramClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: i64,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, token, chat_id, http))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: i64,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id,
            http,
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<Req, Resp>(&self, method: &'static str, body: &Req) -> Result<Resp, NotifyError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;
        unwrap_envelope(method, response).await
    }

    /// Long-poll for new updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, NotifyError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message", "callback_query"],
        };
        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs) + LONG_POLL_GRACE)
            .json(&request)
            .send()
            .await?;
        unwrap_envelope("getUpdates", response).await
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), NotifyError> {
        let request = AnswerCallbackQueryRequest { callback_query_id };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }
}

async fn unwrap_envelope<Resp>(
    method: &'static str,
    response: reqwest::Response,
) -> Result<Resp, NotifyError>
where
    Resp: DeserializeOwned,
{
    let envelope: ApiResponse<Resp> = response.json().await?;
    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse { description, .. } => Err(NotifyError::Api {
            method,
            description: description.unwrap_or_else(|| "no description".to_string()),
        }),
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send_text(&self, text: &str, keyboard: Option<&Keyboard>) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: self.chat_id,
            text,
            parse_mode: PARSE_MODE,
            reply_markup: keyboard.map(InlineKeyboardMarkup::from),
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        debug!(chat_id = self.chat_id, "Telegram: sent message: {}", text);
        Ok(())
    }

    async fn send_photo(&self, image: Vec<u8>, caption: &str) -> Result<(), NotifyError> {
        let photo = Part::bytes(image)
            .file_name("chart.png")
            .mime_str("image/png")?;
        let form = Form::new()
            .text("chat_id", self.chat_id.to_string())
            .text("caption", caption.to_string())
            .text("parse_mode", PARSE_MODE)
            .part("photo", photo);

        let response = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;
        let _: serde_json::Value = unwrap_envelope("sendPhoto", response).await?;
        debug!(chat_id = self.chat_id, "Telegram: sent photo");
        Ok(())
    }

    async fn edit_text(
        &self,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), NotifyError> {
        let request = EditMessageTextRequest {
            chat_id: self.chat_id,
            message_id,
            text,
            parse_mode: PARSE_MODE,
            reply_markup: keyboard.map(InlineKeyboardMarkup::from),
        };
        let _: serde_json::Value = self.call("editMessageText", &request).await?;
        Ok(())
    }
}
