pub struct StatsHelper;

impl StatsHelper {
    /// Rounds to the nearest whole millisecond, halves toward positive infinity.
    pub fn round_ms(value: f64) -> i64 {
        (value + 0.5).floor() as i64
    }

    pub fn sorted_ascending(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Zero-based index of the `quantile` rank in a sorted slice of `len` values.
    pub fn rank_index(len: usize, quantile: f64) -> usize {
        if len == 0 {
            return 0;
        }
        ((len as f64 * quantile).floor() as usize).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_ms_rounds_halves_up() {
        assert_eq!(StatsHelper::round_ms(2.5), 3);
        assert_eq!(StatsHelper::round_ms(2.49), 2);
        assert_eq!(StatsHelper::round_ms(-2.5), -2);
        assert_eq!(StatsHelper::round_ms(0.0), 0);
    }

    #[test]
    fn sorted_ascending_leaves_input_untouched() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(StatsHelper::sorted_ascending(&values), vec![1.0, 2.0, 3.0]);
        assert_eq!(values, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn rank_index_floors_and_stays_in_bounds() {
        assert_eq!(StatsHelper::rank_index(50, 0.98), 49);
        assert_eq!(StatsHelper::rank_index(100, 0.98), 98);
        assert_eq!(StatsHelper::rank_index(1, 0.98), 0);
        assert_eq!(StatsHelper::rank_index(10, 1.0), 9);
        assert_eq!(StatsHelper::rank_index(0, 0.98), 0);
    }
}
