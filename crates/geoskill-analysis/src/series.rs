use std::collections::BTreeMap;

use geoskill_stats::rate::{Mean, Rate};
use serde::Serialize;

/// An aggregated value together with the number of samples behind it.
///
/// `value` is `None` for groups without samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountedValue {
    pub count: u64,
    pub value: Option<f64>,
}

impl From<Mean> for CountedValue {
    fn from(mean: Mean) -> Self {
        Self {
            count: mean.count(),
            value: mean.value(),
        }
    }
}

impl From<Rate> for CountedValue {
    fn from(rate: Rate) -> Self {
        Self {
            count: rate.total(),
            value: rate.value(),
        }
    }
}

/// A series of aggregated values keyed by group.
pub type Series<K> = BTreeMap<K, CountedValue>;

/// Accumulates a [`Mean`] per group.
#[derive(Debug, Clone)]
pub(crate) struct GroupedMean<K> {
    groups: BTreeMap<K, Mean>,
}

impl<K> Default for GroupedMean<K> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K> GroupedMean<K>
where
    K: Ord,
{
    pub(crate) fn push(&mut self, key: K, value: f64) {
        self.groups.entry(key).or_default().push(value);
    }

    pub(crate) fn into_series(self) -> Series<K> {
        self.groups
            .into_iter()
            .map(|(key, mean)| (key, mean.into()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_mean() {
        let mut grouped = GroupedMean::default();
        grouped.push("b", 1.0);
        grouped.push("a", 2.0);
        grouped.push("b", 3.0);
        let series = grouped.into_series();

        assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(series["b"], CountedValue { count: 2, value: Some(2.0) });
    }

    #[test]
    fn test_empty_rate_has_no_value() {
        let value = CountedValue::from(Rate::default());
        assert_eq!(value.count, 0);
        assert_eq!(value.value, None);
    }
}
