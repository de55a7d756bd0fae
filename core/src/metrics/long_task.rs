use crate::math::stats::StatsHelper;
use crate::timing::{text_or, RawLongTaskTiming, RawTaskAttribution};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAttribution {
    pub name: String,
    pub container_type: String,
    pub container_src: String,
    pub container_id: String,
    pub container_name: String,
}

impl TaskAttribution {
    pub fn from_raw(raw: &RawTaskAttribution) -> Self {
        Self {
            name: text_or(&raw.name, "unknown"),
            container_type: text_or(&raw.container_type, "unknown"),
            container_src: text_or(&raw.container_src, ""),
            container_id: text_or(&raw.container_id, ""),
            container_name: text_or(&raw.container_name, ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTaskRecord {
    pub name: String,
    pub start_time: i64,
    pub duration: i64,
    pub attribution: Vec<TaskAttribution>,
    pub captured_at: DateTime<Local>,
}

impl LongTaskRecord {
    pub fn from_raw(task: &RawLongTaskTiming) -> Self {
        Self {
            name: task.name.clone(),
            start_time: StatsHelper::round_ms(task.start_time),
            duration: StatsHelper::round_ms(task.duration),
            attribution: task
                .attribution
                .iter()
                .flatten()
                .map(TaskAttribution::from_raw)
                .collect(),
            captured_at: Local::now(),
        }
    }
}

/// Append-only log of long tasks in arrival order.
#[derive(Debug, Default)]
pub struct LongTaskRecorder {
    records: Vec<LongTaskRecord>,
}

impl LongTaskRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, task: &RawLongTaskTiming) -> LongTaskRecord {
        let record = LongTaskRecord::from_raw(task);
        self.records.push(record.clone());
        record
    }

    pub fn records(&self) -> &[LongTaskRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_kept_in_arrival_order_without_dedup() {
        let mut recorder = LongTaskRecorder::new();
        recorder.record(&RawLongTaskTiming::new("self", 300.0, 72.4));
        recorder.record(&RawLongTaskTiming::new("self", 100.0, 72.4));
        recorder.record(&RawLongTaskTiming::new("self", 300.0, 72.4));

        let starts: Vec<i64> = recorder.records().iter().map(|r| r.start_time).collect();
        assert_eq!(starts, vec![300, 100, 300]);
        assert_eq!(recorder.records()[0].duration, 72);
    }

    #[test]
    fn attribution_fields_default_when_missing() {
        let mut task = RawLongTaskTiming::new("cross-origin-descendant", 12.0, 250.5);
        task.attribution = Some(vec![
            RawTaskAttribution::default(),
            RawTaskAttribution {
                name: Some("unknown".into()),
                container_type: Some("iframe".into()),
                container_src: Some("https://ads.example.test/frame.html".into()),
                container_id: Some("ad-slot".into()),
                container_name: Some(String::new()),
            },
        ]);

        let mut recorder = LongTaskRecorder::new();
        let record = recorder.record(&task);

        assert_eq!(record.duration, 251);
        assert_eq!(record.attribution.len(), 2);
        assert_eq!(record.attribution[0].name, "unknown");
        assert_eq!(record.attribution[0].container_type, "unknown");
        assert_eq!(record.attribution[0].container_src, "");
        assert_eq!(record.attribution[1].container_type, "iframe");
        assert_eq!(record.attribution[1].container_id, "ad-slot");
        assert_eq!(record.attribution[1].container_name, "");
    }

    #[test]
    fn missing_attribution_list_is_empty() {
        let mut recorder = LongTaskRecorder::new();
        let record = recorder.record(&RawLongTaskTiming::new("self", 0.0, 51.0));
        assert!(record.attribution.is_empty());
        assert_eq!(recorder.len(), 1);
    }
}
