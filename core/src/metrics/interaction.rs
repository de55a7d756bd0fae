use crate::math::stats::StatsHelper;
use crate::timing::{text_or, RawEventTiming};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Largest duration seen so far for one interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionSample {
    pub interaction_id: u64,
    pub max_duration: f64,
}

/// Presentation snapshot of the event that set an interaction's maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionDetail {
    pub id: u64,
    pub name: String,
    pub duration: i64,
    pub start_time: i64,
    pub processing_start: i64,
    pub processing_end: i64,
    pub target: String,
    pub captured_at: DateTime<Local>,
}

impl InteractionDetail {
    pub fn from_entry(id: u64, entry: &RawEventTiming) -> Self {
        Self {
            id,
            name: entry.name.clone(),
            duration: StatsHelper::round_ms(entry.duration),
            start_time: StatsHelper::round_ms(entry.start_time),
            processing_start: StatsHelper::round_ms(entry.processing_start.unwrap_or(0.0)),
            processing_end: StatsHelper::round_ms(entry.processing_end.unwrap_or(0.0)),
            target: text_or(&entry.target, "unknown"),
            captured_at: Local::now(),
        }
    }

    /// Time spent in event handlers.
    pub fn processing_time(&self) -> i64 {
        self.processing_end - self.processing_start
    }
}

/// Deduplicates event records into one sample per interaction id.
///
/// Samples and details share a slot index, both kept in first-seen order.
#[derive(Debug, Default)]
pub struct InteractionStore {
    positions: HashMap<u64, usize>,
    samples: Vec<InteractionSample>,
    details: Vec<InteractionDetail>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event record into the store.
    ///
    /// Returns `true` when the interaction is new or its maximum duration
    /// grew, i.e. when derived metrics must be recomputed.
    pub fn observe(&mut self, entry: &RawEventTiming) -> bool {
        let Some(id) = entry.countable_interaction() else {
            return false;
        };
        if entry.duration.is_nan() {
            return false;
        }

        match self.positions.get(&id).copied() {
            Some(slot) => {
                let current = self.samples[slot].max_duration;
                if entry.duration <= current {
                    return false;
                }
                self.samples[slot].max_duration = entry.duration;
                self.details[slot] = InteractionDetail::from_entry(id, entry);
            }
            None => {
                self.positions.insert(id, self.samples.len());
                self.samples.push(InteractionSample {
                    interaction_id: id,
                    max_duration: entry.duration,
                });
                self.details.push(InteractionDetail::from_entry(id, entry));
            }
        }
        true
    }

    pub fn samples(&self) -> &[InteractionSample] {
        &self.samples
    }

    pub fn details(&self) -> &[InteractionDetail] {
        &self.details
    }

    pub fn sample(&self, interaction_id: u64) -> Option<InteractionSample> {
        self.positions
            .get(&interaction_id)
            .map(|&slot| self.samples[slot])
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn reset(&mut self) {
        self.positions.clear();
        self.samples.clear();
        self.details.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(id: u64, duration: f64) -> RawEventTiming {
        RawEventTiming::new("click", id, 100.0, duration)
            .with_processing(101.2, 130.6)
            .with_target("BUTTON")
    }

    #[test]
    fn first_sight_creates_sample_and_detail() {
        let mut store = InteractionStore::new();
        assert!(store.observe(&click(1, 48.4)));

        assert_eq!(store.len(), 1);
        let detail = &store.details()[0];
        assert_eq!(detail.id, 1);
        assert_eq!(detail.duration, 48);
        assert_eq!(detail.processing_start, 101);
        assert_eq!(detail.processing_end, 131);
        assert_eq!(detail.processing_time(), 30);
        assert_eq!(detail.target, "BUTTON");
    }

    #[test]
    fn sentinel_interaction_ids_are_ignored() {
        let mut store = InteractionStore::new();
        let hover = RawEventTiming {
            name: "pointerover".into(),
            duration: 300.0,
            ..Default::default()
        };
        let zero = RawEventTiming::new("pointerenter", 0, 0.0, 300.0);

        assert!(!store.observe(&hover));
        assert!(!store.observe(&zero));
        assert!(store.is_empty());
    }

    #[test]
    fn equal_duration_is_a_no_op() {
        let mut store = InteractionStore::new();
        assert!(store.observe(&click(3, 80.0)));
        let before = store.details()[0].clone();

        let mut repeat = click(3, 80.0);
        repeat.name = "pointerup".into();
        assert!(!store.observe(&repeat));

        assert_eq!(store.details()[0], before);
        assert_eq!(store.sample(3).unwrap().max_duration, 80.0);
    }

    #[test]
    fn smaller_duration_keeps_maximum() {
        let mut store = InteractionStore::new();
        store.observe(&click(3, 80.0));
        assert!(!store.observe(&click(3, 16.0)));
        assert_eq!(store.sample(3).unwrap().max_duration, 80.0);
    }

    #[test]
    fn greater_duration_replaces_detail_in_place() {
        let mut store = InteractionStore::new();
        store.observe(&click(1, 40.0));
        store.observe(&click(2, 24.0));

        let pointerup = RawEventTiming::new("pointerup", 1, 90.0, 96.0).with_target("A");
        assert!(store.observe(&pointerup));

        assert_eq!(store.len(), 2);
        assert_eq!(store.details().len(), 2);
        assert_eq!(store.samples()[0].max_duration, 96.0);
        assert_eq!(store.details()[0].name, "pointerup");
        assert_eq!(store.details()[0].target, "A");
        assert_eq!(store.details()[1].id, 2);
        assert!(store.samples().iter().all(|s| s.max_duration != 40.0));
    }

    #[test]
    fn nan_durations_are_never_stored() {
        let mut store = InteractionStore::new();
        assert!(!store.observe(&click(4, f64::NAN)));
        assert!(store.is_empty());
        assert_eq!(store.sample(4), None);

        assert!(store.observe(&click(4, 56.0)));
        assert!(!store.observe(&click(4, f64::NAN)));
        assert_eq!(store.sample(4).unwrap().max_duration, 56.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let mut store = InteractionStore::new();
        let bare = RawEventTiming::new("keydown", 9, 12.0, 32.0);
        store.observe(&bare);

        let detail = &store.details()[0];
        assert_eq!(detail.target, "unknown");
        assert_eq!(detail.processing_start, 0);
        assert_eq!(detail.processing_end, 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = InteractionStore::new();
        store.observe(&click(1, 40.0));
        store.observe(&click(2, 60.0));
        store.reset();

        assert!(store.is_empty());
        assert!(store.details().is_empty());
        assert_eq!(store.sample(1), None);
        assert!(store.observe(&click(1, 10.0)));
    }
}
