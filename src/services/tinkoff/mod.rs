//! Tinkoff Invest market data over the REST gateway.

pub mod client;
pub mod messages;

pub use client::{TinkoffMarketDataProvider, DEFAULT_BASE_URL};
