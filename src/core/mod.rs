//! Core application primitives (context, polling loop)

pub mod context;
pub mod runtime;
pub mod status;

pub use context::SignalContext;
pub use runtime::*;
pub use status::{LoopState, LoopStatus};
