//! Process configuration, read once at startup from environment variables
//! (a `.env` file is loaded first by the binary).

use crate::core::runtime::RuntimeConfig;
use crate::indicators::CrossoverWindows;
use crate::services::{chart, telegram, tinkoff};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment (`APP_ENV`), `sandbox` when unset
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub tinkoff_token: String,
    pub tinkoff_base_url: String,
    pub telegram_token: String,
    pub telegram_chat_id: i64,
    pub telegram_base_url: String,
    pub chart_base_url: String,
    /// Timeout for every outbound HTTP call
    pub request_timeout: Duration,
    /// Long-poll window for inbound bot updates
    pub updates_timeout_seconds: u64,
    pub runtime: RuntimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            tinkoff_token: String::new(),
            tinkoff_base_url: tinkoff::DEFAULT_BASE_URL.to_string(),
            telegram_token: String::new(),
            telegram_chat_id: 0,
            telegram_base_url: telegram::DEFAULT_BASE_URL.to_string(),
            chart_base_url: chart::DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            updates_timeout_seconds: 30,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults,
    /// except the credentials which are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let runtime_defaults = RuntimeConfig::default();

        let short: usize = parse_or(&lookup, "SHORT_MA_PERIOD", runtime_defaults.windows.short())?;
        let long: usize = parse_or(&lookup, "LONG_MA_PERIOD", runtime_defaults.windows.long())?;
        let windows = CrossoverWindows::new(short, long).map_err(|e| ConfigError::Invalid {
            key: "LONG_MA_PERIOD",
            value: long.to_string(),
            reason: e.to_string(),
        })?;

        let history_days: i64 = parse_or(&lookup, "HISTORY_DAYS", runtime_defaults.lookback.num_days())?;
        if history_days <= 0 {
            return Err(ConfigError::Invalid {
                key: "HISTORY_DAYS",
                value: history_days.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let confirmation: usize = parse_or(&lookup, "SIGNAL_CONFIRMATION", runtime_defaults.confirmation)?;
        if confirmation == 0 {
            return Err(ConfigError::Invalid {
                key: "SIGNAL_CONFIRMATION",
                value: confirmation.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let runtime = RuntimeConfig {
            instrument_id: lookup("INSTRUMENT_FIGI").unwrap_or(runtime_defaults.instrument_id),
            instrument_name: lookup("INSTRUMENT_NAME").unwrap_or(runtime_defaults.instrument_name),
            interval: runtime_defaults.interval,
            windows,
            lookback: chrono::Duration::days(history_days),
            confirmation,
            tick_interval: seconds_or(&lookup, "TICK_INTERVAL_SECONDS", runtime_defaults.tick_interval)?,
            error_backoff: seconds_or(&lookup, "ERROR_BACKOFF_SECONDS", runtime_defaults.error_backoff)?,
            no_data_retry: seconds_or(&lookup, "NO_DATA_RETRY_SECONDS", runtime_defaults.no_data_retry)?,
            risk: runtime_defaults.risk,
        };

        Ok(Self {
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
            tinkoff_token: required(&lookup, "TINKOFF_TOKEN")?,
            tinkoff_base_url: lookup("TINKOFF_BASE_URL").unwrap_or(defaults.tinkoff_base_url),
            telegram_token: required(&lookup, "TELEGRAM_TOKEN")?,
            telegram_chat_id: parse_required(&lookup, "TELEGRAM_CHAT_ID")?,
            telegram_base_url: lookup("TELEGRAM_BASE_URL").unwrap_or(defaults.telegram_base_url),
            chart_base_url: lookup("CHART_BASE_URL").unwrap_or(defaults.chart_base_url),
            request_timeout: seconds_or(&lookup, "REQUEST_TIMEOUT_SECONDS", defaults.request_timeout)?,
            updates_timeout_seconds: parse_or(&lookup, "UPDATES_TIMEOUT_SECONDS", defaults.updates_timeout_seconds)?,
            runtime,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parse_value<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_required<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, required(lookup, key)?)
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => parse_value(key, value),
        None => Ok(default),
    }
}

fn seconds_or<F>(lookup: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let seconds: u64 = parse_or(lookup, key, default.as_secs())?;
    if seconds == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: seconds.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}
