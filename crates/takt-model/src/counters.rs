use serde::{Deserialize, Serialize};

/// Production counters since the last reset.
///
/// Monotonically non-decreasing between resets; a reset zeroes both fields
/// together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub good: u64,
    pub bad: u64,
}

impl Counters {
    /// Total number of items produced since the last reset.
    pub fn total(&self) -> u64 {
        self.good + self.bad
    }

    /// Record one produced item.
    pub fn record(&mut self, bad: bool) {
        if bad {
            self.bad += 1;
        } else {
            self.good += 1;
        }
    }

    /// Zero both counters.
    pub fn reset(&mut self) {
        *self = Counters::default();
    }
}
