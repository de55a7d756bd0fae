use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timing::RawTimingRecord;

/// Record kinds a timing source can deliver, named after their `entryType`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RecordKind {
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "longtask")]
    LongTask,
    #[serde(rename = "long-animation-frame")]
    LongAnimationFrame,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Event,
        RecordKind::LongTask,
        RecordKind::LongAnimationFrame,
    ];

    pub fn entry_type(&self) -> &'static str {
        match self {
            RecordKind::Event => "event",
            RecordKind::LongTask => "longtask",
            RecordKind::LongAnimationFrame => "long-animation-frame",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_type())
    }
}

/// Lifecycle of a monitor session.
///
/// `Unsupported` and `Stopped` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    Unsupported,
    Idle,
    Active,
    Stopped,
}

/// Shared configuration for monitor sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Replay records the source emitted before the subscription existed.
    pub buffered: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { buffered: true }
    }
}

/// Common error type for the monitoring core.
#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
    #[error("unsupported record kind: {0}")]
    UnsupportedKind(RecordKind),
    #[error("{0} session already stopped")]
    SessionStopped(RecordKind),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

pub type MonitorResult<T> = Result<T, MonitorError>;

/// A component that turns raw records of one kind into derived updates.
///
/// `process` returns `Some` only when derived state changed and the
/// session's notification should fire.
pub trait RecordProcessor {
    type Update;

    fn kind(&self) -> RecordKind;
    fn process(&mut self, record: &RawTimingRecord) -> Option<Self::Update>;
}
