use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inline button ids understood by the bot handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    ConfirmBuy,
    ConfirmSell,
    CancelSignal,
    ShowChart,
    ForceBuy,
    ForceSell,
    EmergencySell,
    RefreshStatus,
}

impl ButtonAction {
    pub const ALL: [ButtonAction; 8] = [
        ButtonAction::ConfirmBuy,
        ButtonAction::ConfirmSell,
        ButtonAction::CancelSignal,
        ButtonAction::ShowChart,
        ButtonAction::ForceBuy,
        ButtonAction::ForceSell,
        ButtonAction::EmergencySell,
        ButtonAction::RefreshStatus,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ButtonAction::ConfirmBuy => "confirm_buy",
            ButtonAction::ConfirmSell => "confirm_sell",
            ButtonAction::CancelSignal => "cancel_signal",
            ButtonAction::ShowChart => "show_chart",
            ButtonAction::ForceBuy => "force_buy",
            ButtonAction::ForceSell => "force_sell",
            ButtonAction::EmergencySell => "emergency_sell",
            ButtonAction::RefreshStatus => "refresh_status",
        }
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ButtonAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| format!("unknown button id: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn new(label: &str, action: ButtonAction) -> Self {
        Self {
            label: label.to_string(),
            action,
        }
    }
}

/// Rows of inline buttons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn row(mut self, button: Button) -> Self {
        self.rows.push(vec![button]);
        self
    }

    pub fn actions(&self) -> Vec<ButtonAction> {
        self.rows.iter().flatten().map(|b| b.action).collect()
    }

    /// Keyboard attached to decisions and risk alerts
    pub fn signal(in_position: bool) -> Self {
        let confirm = if in_position {
            Button::new("✅ Confirm sell", ButtonAction::ConfirmSell)
        } else {
            Button::new("✅ Confirm buy", ButtonAction::ConfirmBuy)
        };
        let keyboard = Keyboard::default()
            .row(confirm)
            .row(Button::new("❌ Cancel signal", ButtonAction::CancelSignal))
            .row(Button::new("📊 Show chart", ButtonAction::ShowChart));

        if in_position {
            keyboard.row(Button::new("⚡ Emergency sell", ButtonAction::EmergencySell))
        } else {
            keyboard
        }
    }

    /// Keyboard for the `/position` command
    pub fn position(in_position: bool) -> Self {
        let keyboard = if in_position {
            Keyboard::default()
                .row(Button::new("📉 Sell signal", ButtonAction::ForceSell))
                .row(Button::new("🔥 Emergency sell", ButtonAction::EmergencySell))
        } else {
            Keyboard::default().row(Button::new("📈 Buy signal", ButtonAction::ForceBuy))
        };
        keyboard.row(Button::new("🔄 Refresh status", ButtonAction::RefreshStatus))
    }

    /// Confirm/cancel pair shown for a manual signal
    pub fn manual_confirm(buy: bool) -> Self {
        let confirm = if buy {
            Button::new("✅ Confirm buy", ButtonAction::ConfirmBuy)
        } else {
            Button::new("✅ Confirm sell", ButtonAction::ConfirmSell)
        };
        Keyboard::default()
            .row(confirm)
            .row(Button::new("❌ Cancel", ButtonAction::CancelSignal))
    }
}
