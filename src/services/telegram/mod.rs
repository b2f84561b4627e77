//! Telegram Bot API transport for notifications and operator commands.

pub mod client;
pub mod messages;

pub use client::{TelegramClient, DEFAULT_BASE_URL};
