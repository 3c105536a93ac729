//! Stateless grouping primitives used by the summary functions.
//!
//! These are pure functions over record slices. Grouping always goes through
//! a `BTreeMap`, so every result comes back sorted by key.

use std::collections::BTreeMap;

/// Running sum and row count for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    pub sum: u64,
    pub count: usize,
}

impl GroupStats {
    pub fn add(&mut self, value: u64) {
        self.sum += value;
        self.count += 1;
    }

    /// Arithmetic mean, `None` for an empty group.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }
}

/// Groups `records` by `key` and accumulates `value` per group.
pub fn group_stats<T, K, KF, VF>(records: &[T], key: KF, value: VF) -> BTreeMap<K, GroupStats>
where
    K: Ord,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> u64,
{
    let mut groups: BTreeMap<K, GroupStats> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(value(record));
    }
    groups
}

/// Groups `records` by `key` and sums `value` per group.
pub fn group_sum<T, K, KF, VF>(records: &[T], key: KF, value: VF) -> BTreeMap<K, u64>
where
    K: Ord,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> u64,
{
    group_stats(records, key, value)
        .into_iter()
        .map(|(k, stats)| (k, stats.sum))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_sum_orders_by_key() {
        let rows = vec![(3, 10), (1, 5), (3, 7), (2, 1)];
        let sums = group_sum(&rows, |r| r.0, |r| r.1);
        let flat: Vec<(i32, u64)> = sums.into_iter().collect();
        assert_eq!(flat, vec![(1, 5), (2, 1), (3, 17)]);
    }

    #[test]
    fn group_stats_counts_rows() {
        let rows = vec![("a", 2), ("a", 4), ("b", 9)];
        let stats = group_stats(&rows, |r| r.0, |r| r.1);
        assert_eq!(stats["a"], GroupStats { sum: 6, count: 2 });
        assert_eq!(stats["a"].mean(), Some(3.0));
        assert_eq!(stats["b"].mean(), Some(9.0));
    }

    #[test]
    fn empty_group_has_no_mean() {
        assert_eq!(GroupStats::default().mean(), None);
    }

    #[test]
    fn empty_input_gives_empty_groups() {
        let rows: Vec<(u8, u64)> = Vec::new();
        assert!(group_sum(&rows, |r| r.0, |r| r.1).is_empty());
    }
}
