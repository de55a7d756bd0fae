//! Raw performance-timing records as delivered by the platform.
//!
//! Every optional field stays an `Option` here; default substitution happens
//! once per record kind in the `metrics` module.

pub mod event;
pub mod frame;
pub mod task;

pub use event::RawEventTiming;
pub use frame::{RawFrameTiming, RawScriptTiming};
pub use task::{RawLongTaskTiming, RawTaskAttribution};

use crate::prelude::{MonitorError, MonitorResult, RecordKind};
use serde::{Deserialize, Serialize};

/// One timing record, tagged by its `entryType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "entryType")]
pub enum RawTimingRecord {
    #[serde(rename = "event")]
    Event(RawEventTiming),
    #[serde(rename = "longtask")]
    LongTask(RawLongTaskTiming),
    #[serde(rename = "long-animation-frame")]
    LongAnimationFrame(RawFrameTiming),
}

impl RawTimingRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            RawTimingRecord::Event(_) => RecordKind::Event,
            RawTimingRecord::LongTask(_) => RecordKind::LongTask,
            RawTimingRecord::LongAnimationFrame(_) => RecordKind::LongAnimationFrame,
        }
    }

    pub fn start_time(&self) -> f64 {
        match self {
            RawTimingRecord::Event(entry) => entry.start_time,
            RawTimingRecord::LongTask(entry) => entry.start_time,
            RawTimingRecord::LongAnimationFrame(entry) => entry.start_time,
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            RawTimingRecord::Event(entry) => entry.duration,
            RawTimingRecord::LongTask(entry) => entry.duration,
            RawTimingRecord::LongAnimationFrame(entry) => entry.duration,
        }
    }

    /// Decodes a JSON array of records, e.g. the output of
    /// `performance.getEntries().map(e => e.toJSON())`.
    ///
    /// Fails with [`MonitorError::InvalidRecord`] when a record carries a
    /// negative start time or duration.
    pub fn parse_batch(json: &str) -> MonitorResult<Vec<RawTimingRecord>> {
        let records: Vec<RawTimingRecord> = serde_json::from_str(json)?;
        for (index, record) in records.iter().enumerate() {
            record.validate().map_err(|reason| {
                MonitorError::InvalidRecord(format!("record {}: {}", index, reason))
            })?;
        }
        Ok(records)
    }

    fn validate(&self) -> Result<(), String> {
        if self.start_time() < 0.0 {
            return Err(format!(
                "{} startTime {} is negative",
                self.kind(),
                self.start_time()
            ));
        }
        if self.duration() < 0.0 {
            return Err(format!(
                "{} duration {} is negative",
                self.kind(),
                self.duration()
            ));
        }
        Ok(())
    }
}

impl From<RawEventTiming> for RawTimingRecord {
    fn from(entry: RawEventTiming) -> Self {
        RawTimingRecord::Event(entry)
    }
}

impl From<RawLongTaskTiming> for RawTimingRecord {
    fn from(entry: RawLongTaskTiming) -> Self {
        RawTimingRecord::LongTask(entry)
    }
}

impl From<RawFrameTiming> for RawTimingRecord {
    fn from(entry: RawFrameTiming) -> Self {
        RawTimingRecord::LongAnimationFrame(entry)
    }
}

/// Treats empty strings like missing ones.
pub(crate) fn text_or(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

/// A boundary timestamp counts as present only when it is a non-zero number.
pub(crate) fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_batch_dispatches_on_entry_type() {
        let json = r#"[
            {"entryType": "event", "name": "click", "startTime": 10.2, "duration": 48,
             "interactionId": 7, "processingStart": 12.0, "processingEnd": 40.5, "target": "BUTTON"},
            {"entryType": "longtask", "name": "self", "startTime": 5, "duration": 120},
            {"entryType": "long-animation-frame", "startTime": 100, "duration": 80,
             "renderStart": 140, "styleAndLayoutStart": 160, "scripts": []}
        ]"#;

        let records = RawTimingRecord::parse_batch(json).unwrap();
        let kinds: Vec<_> = records.iter().map(RawTimingRecord::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecordKind::Event,
                RecordKind::LongTask,
                RecordKind::LongAnimationFrame
            ]
        );
        assert_eq!(records[0].duration(), 48.0);
        assert_eq!(records[2].start_time(), 100.0);
    }

    #[test]
    fn parse_batch_rejects_unknown_entry_type() {
        let json = r#"[{"entryType": "paint", "startTime": 1, "duration": 0}]"#;
        assert!(RawTimingRecord::parse_batch(json).is_err());
    }

    #[test]
    fn parse_batch_rejects_negative_timings() {
        let json = r#"[
            {"entryType": "longtask", "name": "self", "startTime": 5, "duration": 120},
            {"entryType": "event", "name": "click", "startTime": 10, "duration": -8}
        ]"#;
        match RawTimingRecord::parse_batch(json) {
            Err(MonitorError::InvalidRecord(reason)) => {
                assert!(reason.starts_with("record 1:"));
                assert!(reason.contains("duration"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_optional_fields_decode_as_none() {
        let json = r#"[{"entryType": "event", "name": "mouseover", "startTime": 1, "duration": 8}]"#;
        let records = RawTimingRecord::parse_batch(json).unwrap();
        match &records[0] {
            RawTimingRecord::Event(entry) => {
                assert_eq!(entry.interaction_id, None);
                assert_eq!(entry.target, None);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn text_or_treats_empty_as_missing() {
        assert_eq!(text_or(&None, "unknown"), "unknown");
        assert_eq!(text_or(&Some(String::new()), "unknown"), "unknown");
        assert_eq!(text_or(&Some("DIV".into()), "unknown"), "DIV");
    }

    #[test]
    fn present_filters_zero_and_nan() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some(0.0)), None);
        assert_eq!(present(Some(f64::NAN)), None);
        assert_eq!(present(Some(-3.0)), Some(-3.0));
    }
}
