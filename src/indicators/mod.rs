pub mod error;
pub mod trend;

pub use error::IndicatorError;
pub use trend::{calculate_crossover, CrossoverWindows};
