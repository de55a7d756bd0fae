use crate::prelude::RecordKind;
use crate::source::TimingSource;
use serde::{Deserialize, Serialize};

/// Which record kinds the current environment can observe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportReport {
    pub event_timing: bool,
    pub long_tasks: bool,
    pub loaf: bool,
    pub is_chromium_based: bool,
    pub user_agent: String,
}

impl SupportReport {
    pub fn probe(source: &dyn TimingSource, user_agent: &str) -> Self {
        Self {
            event_timing: source.supports(RecordKind::Event),
            long_tasks: source.supports(RecordKind::LongTask),
            loaf: source.supports(RecordKind::LongAnimationFrame),
            is_chromium_based: is_likely_chromium_based(user_agent),
            user_agent: user_agent.to_string(),
        }
    }

    /// Kinds the probe found missing.
    pub fn missing_kinds(&self) -> Vec<RecordKind> {
        let mut missing = Vec::new();
        if !self.event_timing {
            missing.push(RecordKind::Event);
        }
        if !self.long_tasks {
            missing.push(RecordKind::LongTask);
        }
        if !self.loaf {
            missing.push(RecordKind::LongAnimationFrame);
        }
        missing
    }
}

/// Heuristic only: Chromium builds advertise `Chrome` or `Edg`.
pub fn is_likely_chromium_based(user_agent: &str) -> bool {
    user_agent.contains("Chrome") || user_agent.contains("Edg")
}
