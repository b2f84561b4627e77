//! Confirmation window over raw per-bar signals

use crate::models::signal::Decision;
use std::collections::VecDeque;

pub const DEFAULT_CONFIRMATION: usize = 3;

/// Upper bound on retained signals while no decision fires (one day of bars).
pub const MAX_HISTORY: usize = 1440;

/// Turns the noisy per-bar crossover signal into a confirmed decision.
///
/// A decision fires only when the last `confirmation` recorded signals are all
/// +1 (buy) or all -1 (sell). Firing clears the history, so the next decision
/// needs a fresh run of identical signals. Mixed runs leave the history alone.
#[derive(Debug, Clone)]
pub struct SignalDebouncer {
    history: VecDeque<i32>,
    confirmation: usize,
}

impl SignalDebouncer {
    pub fn new(confirmation: usize) -> Self {
        let confirmation = confirmation.max(1);
        Self {
            history: VecDeque::with_capacity(confirmation),
            confirmation,
        }
    }

    pub fn confirmation(&self) -> usize {
        self.confirmation
    }

    pub fn record(&mut self, signal: i32) {
        if self.history.len() >= MAX_HISTORY.max(self.confirmation) {
            self.history.pop_front();
        }
        self.history.push_back(signal);
    }

    /// Inspect the tail of the history; clears it when a decision fires.
    pub fn evaluate(&mut self) -> Option<Decision> {
        if self.history.len() < self.confirmation {
            return None;
        }

        let start = self.history.len() - self.confirmation;
        let recent = || self.history.range(start..);
        let decision = if recent().all(|&s| s == 1) {
            Some(Decision::Buy)
        } else if recent().all(|&s| s == -1) {
            Some(Decision::Sell)
        } else {
            None
        };

        if decision.is_some() {
            self.history.clear();
        }
        decision
    }

    pub fn history(&self) -> Vec<i32> {
        self.history.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for SignalDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRMATION)
    }
}
