use crate::math::stats::StatsHelper;
use crate::metrics::interaction::InteractionSample;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this many interactions the worst one is reported.
pub const MIN_SAMPLES_FOR_PERCENTILE: usize = 50;
pub const INP_QUANTILE: f64 = 0.98;

pub const GOOD_THRESHOLD_MS: i64 = 200;
pub const POOR_THRESHOLD_MS: i64 = 500;

/// Derives Interaction to Next Paint from per-interaction maxima.
///
/// Recomputes from scratch on every call: O(n log n) in the number of
/// interactions, which stays small within a single page session.
pub struct InpAggregator;

impl InpAggregator {
    pub fn compute(samples: &[InteractionSample]) -> Option<i64> {
        let durations: Vec<f64> = samples.iter().map(|s| s.max_duration).collect();
        Self::compute_durations(&durations)
    }

    pub fn compute_durations(durations: &[f64]) -> Option<i64> {
        if durations.is_empty() {
            return None;
        }
        let sorted = StatsHelper::sorted_ascending(durations);
        let index = if sorted.len() < MIN_SAMPLES_FOR_PERCENTILE {
            sorted.len() - 1
        } else {
            StatsHelper::rank_index(sorted.len(), INP_QUANTILE)
        };
        Some(StatsHelper::round_ms(sorted[index]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InpRating {
    Good,
    NeedsImprovement,
    Poor,
    Unknown,
}

impl InpRating {
    pub fn from_inp(inp: Option<i64>) -> Self {
        match inp {
            None => InpRating::Unknown,
            Some(ms) if ms <= GOOD_THRESHOLD_MS => InpRating::Good,
            Some(ms) if ms <= POOR_THRESHOLD_MS => InpRating::NeedsImprovement,
            Some(_) => InpRating::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InpRating::Good => "Good",
            InpRating::NeedsImprovement => "Needs Improvement",
            InpRating::Poor => "Poor",
            InpRating::Unknown => "Waiting for input",
        }
    }
}

impl fmt::Display for InpRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_set_is_unknown() {
        assert_eq!(InpAggregator::compute(&[]), None);
    }

    #[test]
    fn small_sets_report_the_maximum() {
        let samples = [
            InteractionSample {
                interaction_id: 1,
                max_duration: 32.0,
            },
            InteractionSample {
                interaction_id: 2,
                max_duration: 264.6,
            },
            InteractionSample {
                interaction_id: 3,
                max_duration: 8.0,
            },
        ];
        assert_eq!(InpAggregator::compute(&samples), Some(265));
    }

    #[test]
    fn fifty_samples_switch_to_the_percentile_rank() {
        let durations: Vec<f64> = (1..=50).map(f64::from).collect();
        assert_eq!(InpAggregator::compute_durations(&durations), Some(50));

        let mut with_outlier: Vec<f64> = (1..=99).map(f64::from).collect();
        with_outlier.push(5_000.0);
        assert_eq!(InpAggregator::compute_durations(&with_outlier), Some(99));
    }

    #[test]
    fn forty_nine_samples_still_report_the_maximum() {
        let mut durations: Vec<f64> = vec![10.0; 48];
        durations.push(900.0);
        assert_eq!(InpAggregator::compute_durations(&durations), Some(900));
    }

    #[test]
    fn rating_thresholds_are_inclusive() {
        assert_eq!(InpRating::from_inp(None), InpRating::Unknown);
        assert_eq!(InpRating::from_inp(Some(200)), InpRating::Good);
        assert_eq!(InpRating::from_inp(Some(201)), InpRating::NeedsImprovement);
        assert_eq!(InpRating::from_inp(Some(500)), InpRating::NeedsImprovement);
        assert_eq!(InpRating::from_inp(Some(501)), InpRating::Poor);
        assert_eq!(InpRating::Poor.to_string(), "Poor");
    }

    proptest! {
        #[test]
        fn below_threshold_equals_rounded_max(
            durations in prop::collection::vec(0.0f64..2_000.0, 1..MIN_SAMPLES_FOR_PERCENTILE)
        ) {
            let max = durations.iter().cloned().fold(f64::MIN, f64::max);
            prop_assert_eq!(
                InpAggregator::compute_durations(&durations),
                Some(StatsHelper::round_ms(max))
            );
        }

        #[test]
        fn at_or_above_threshold_uses_the_98th_rank(
            durations in prop::collection::vec(0.0f64..2_000.0, MIN_SAMPLES_FOR_PERCENTILE..400)
        ) {
            let mut sorted = durations.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let index = (sorted.len() as f64 * 0.98).floor() as usize;
            prop_assert_eq!(
                InpAggregator::compute_durations(&durations),
                Some(StatsHelper::round_ms(sorted[index]))
            );
        }

        #[test]
        fn result_never_exceeds_the_maximum(
            durations in prop::collection::vec(0.0f64..2_000.0, 1..400)
        ) {
            let max = durations.iter().cloned().fold(f64::MIN, f64::max);
            let inp = InpAggregator::compute_durations(&durations).unwrap();
            prop_assert!(inp <= StatsHelper::round_ms(max));
        }
    }
}
