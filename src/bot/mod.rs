//! Operator commands and inline-button events.

pub mod handler;
pub mod listener;

pub use handler::BotHandler;
pub use listener::{event_from_update, BotListener};

use crate::notify::ButtonAction;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Status,
    Chart,
    Position,
}

impl FromStr for Command {
    type Err = String;

    /// Accepts `/status`, `/status@SomeBot` and trailing arguments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.split_whitespace().next().unwrap_or_default();
        let name = word.strip_prefix('/').unwrap_or(word);
        let name = name.split('@').next().unwrap_or_default();
        match name {
            "start" => Ok(Command::Start),
            "status" => Ok(Command::Status),
            "chart" => Ok(Command::Chart),
            "position" => Ok(Command::Position),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// Inbound event from the chat gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    Command(Command),
    Button {
        action: ButtonAction,
        /// Message carrying the pressed keyboard; replies edit it in place
        message_id: Option<i64>,
    },
}
