//! Message texts (Telegram Markdown)

use crate::models::signal::Decision;
use crate::position::tracker::{ClosedPosition, Position};
use crate::risk::{AlertKind, ProtectiveLevels, RiskAlert};

pub fn activated(instrument: &str) -> String {
    format!("🚀 {} signal system activated! Waiting for data...", instrument)
}

pub fn stopped() -> String {
    "🛑 Signal system stopped by operator".to_string()
}

pub fn help(instrument: &str) -> String {
    format!(
        "🚀 {} trading signal system is running!\n\
         Commands:\n\
         /status - current status\n\
         /chart - current chart\n\
         /position - position management",
        instrument
    )
}

pub fn decision_caption(decision: Decision, price: f64, instrument: &str, confirmations: usize) -> String {
    let (action, reason, recommendation) = match decision {
        Decision::Buy => (
            "BUY",
            "sustained uptrend",
            "Consider opening a position within 2-5 minutes.\n\
             Preferred entry: 0.1-0.3% below the current price.",
        ),
        Decision::Sell => (
            "SELL",
            "sustained downtrend",
            "Consider closing the position within 2-5 minutes.\n\
             Preferred exit: 0.1-0.3% above the current price.",
        ),
    };

    format!(
        "🚨 *{} SIGNAL {}*\n\
         • Current price: `{:.2}`\n\
         • Reason: {}\n\
         • Confirming signals: {}\n\n\
         📌 *Recommendation*\n\
         {}",
        action, instrument, price, reason, confirmations, recommendation
    )
}

pub fn confirm_prompt() -> String {
    "Confirm the action:".to_string()
}

pub fn risk_alert(alert: &RiskAlert) -> String {
    match alert.kind {
        AlertKind::Critical => format!(
            "🚨 *CRITICAL LOSS!*\n\
             • Current price: `{:.2}`\n\
             • Loss: `{:.2}%`\n\
             • Immediate exit recommended!",
            alert.price, alert.profit_percent
        ),
        AlertKind::StopLossWarning => format!(
            "⚠️ *STOP-LOSS WARNING*\n\
             • Current price: `{:.2}`\n\
             • Loss: `{:.2}%`\n\
             • Consider selling",
            alert.price, alert.profit_percent
        ),
        AlertKind::TakeProfitWarning => format!(
            "⚠️ *TAKE-PROFIT WARNING*\n\
             • Current price: `{:.2}`\n\
             • Profit: `{:.2}%`\n\
             • Consider locking in the profit",
            alert.price, alert.profit_percent
        ),
        AlertKind::Heartbeat => format!(
            "ℹ️ *POSITION STATUS*\n\
             • Current price: `{:.2}`\n\
             • Profit: `{:.2}%`\n\
             • Holding time: `{:.1} min`",
            alert.price, alert.profit_percent, alert.holding_minutes
        ),
    }
}

/// Figures for the `/status` reply
#[derive(Debug, Clone)]
pub struct StatusReport<'a> {
    pub instrument: &'a str,
    pub instrument_id: &'a str,
    pub signal_count: usize,
    pub position: Option<PositionStatus>,
}

#[derive(Debug, Clone, Copy)]
pub struct PositionStatus {
    pub position: Position,
    pub current_price: f64,
    pub profit_percent: f64,
    pub holding_minutes: f64,
}

pub fn status(report: &StatusReport<'_>) -> String {
    let system = if report.signal_count > 0 {
        "🟢 Active"
    } else {
        "🟡 Waiting for data"
    };
    let position = if report.position.is_some() {
        "Bought"
    } else {
        "No position"
    };

    let mut message = format!(
        "📊 *System status*\n\
         • System: {}\n\
         • Position: {}\n\
         • Instrument: {}\n\
         • FIGI: `{}`\n\
         • Recent signals: {}",
        system, position, report.instrument, report.instrument_id, report.signal_count
    );

    if let Some(p) = &report.position {
        message.push_str(&format!(
            "\n\n💰 *Current position*\n\
             • Entry price: {:.2}\n\
             • Entry time: {}\n\
             • Current price: {:.2}\n\
             • Profit: {:+.2}%\n\
             • Holding time: {:.1} min",
            p.position.entry_price,
            p.position.entry_time.format("%Y-%m-%d %H:%M"),
            p.current_price,
            p.profit_percent,
            p.holding_minutes
        ));
    }
    message
}

pub fn position_opened(position: &Position, instrument: &str) -> String {
    format!(
        "✅ *Position opened!*\n\
         • Bought {}\n\
         • Price: {:.2}\n\
         • Time: {}\n\
         • The next sell signal will be analysed automatically",
        instrument,
        position.entry_price,
        position.entry_time.format("%Y-%m-%d %H:%M")
    )
}

pub fn protective_levels(levels: &ProtectiveLevels) -> String {
    format!(
        "⚡ *Risk management recommendation*\n\
         Place orders to protect the position:\n\
         • Stop-loss: `{:.2}` (-{:.0}%)\n\
         • Take-profit: `{:.2}` (+{:.0}%)\n\
         \n\
         Manage the position: /position",
        levels.stop_loss, levels.pct, levels.take_profit, levels.pct
    )
}

pub fn position_closed(closed: &ClosedPosition, instrument: &str) -> String {
    format!(
        "✅ *Position closed!*\n\
         • Sold {}\n\
         • Price: {:.2}\n\
         • Profit: {:+.2}%\n\
         • Holding time: {:.1} min",
        instrument, closed.exit_price, closed.profit_percent, closed.holding_minutes
    )
}

pub fn emergency_closed(closed: &ClosedPosition) -> String {
    format!(
        "🚨 *Emergency sell!*\n\
         • Position force-closed\n\
         • Price: {:.2}\n\
         • Profit: {:+.2}%",
        closed.exit_price, closed.profit_percent
    )
}

pub fn manual_buy_prompt(price: f64, instrument: &str) -> String {
    format!(
        "⚠️ *Manual buy signal*\n\
         • Current price: {:.2}\n\
         • Buying {} is suggested\n\
         • Confirm the action:",
        price, instrument
    )
}

pub fn manual_sell_prompt(price: f64, profit_percent: f64, instrument: &str) -> String {
    format!(
        "⚠️ *Manual sell signal*\n\
         • Current price: {:.2}\n\
         • Profit: {:+.2}%\n\
         • Selling {} is suggested\n\
         • Confirm the action:",
        price, profit_percent, instrument
    )
}

pub fn position_keyboard_title() -> String {
    "⚙️ Position management:".to_string()
}

pub fn signal_cancelled() -> String {
    "❌ Signal cancelled".to_string()
}

pub fn rejected(reason: &str) -> String {
    format!("⚠️ Position unchanged: {}", escape_markdown(reason))
}

pub fn error(reason: &str) -> String {
    format!("⚠️ Error: {}", escape_markdown(reason))
}

pub fn chart_caption(instrument: &str) -> String {
    format!("📈 Current {} chart with indicators", instrument)
}

pub fn not_enough_data() -> String {
    "⚠️ Not enough data to build a chart".to_string()
}

pub fn chart_failed(error: &str) -> String {
    format!("⚠️ Failed to build the chart: {}", escape_markdown(error))
}

/// Escape free text (error bodies, API descriptions) for legacy Markdown.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
