//! Signal evaluation interfaces.

pub mod debouncer;

pub use debouncer::*;
