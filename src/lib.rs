//! Moving-average crossover signal service.
//!
//! Polls one-minute candles for a single instrument, debounces the crossover
//! signal into confirmed BUY/SELL calls, tracks one manually confirmed
//! position and notifies the operator over Telegram.

pub mod bot;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod notify;
pub mod position;
pub mod risk;
pub mod services;
pub mod signals;
