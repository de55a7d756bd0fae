use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Per-session counters. Sessions are single-threaded, so plain cells suffice.
#[derive(Default)]
pub struct MetricsRecorder {
    delivered: Cell<usize>,
    ignored: Cell<usize>,
    notified: Cell<usize>,
}

/// Copy of the counters at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub delivered: usize,
    pub ignored: usize,
    pub notified: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_delivered(&self) {
        self.delivered.set(self.delivered.get() + 1);
    }

    pub fn record_ignored(&self) {
        self.ignored.set(self.ignored.get() + 1);
    }

    pub fn record_notified(&self) {
        self.notified.set(self.notified.get() + 1);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            delivered: self.delivered.get(),
            ignored: self.ignored.get(),
            notified: self.notified.get(),
        }
    }
}
