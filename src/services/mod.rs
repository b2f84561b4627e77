//! External collaborators: market data, chart rendering, chat transport.

pub mod chart;
pub mod market_data;
pub mod telegram;
pub mod tinkoff;

pub use chart::{ChartError, ChartRenderer, QuickChartRenderer};
pub use market_data::{CandleInterval, MarketDataError, MarketDataProvider};
pub use telegram::TelegramClient;
pub use tinkoff::TinkoffMarketDataProvider;
