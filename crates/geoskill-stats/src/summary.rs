use serde::Serialize;

use crate::{descriptive::DescriptiveStats, histogram::Histogram, percentiles::Percentiles};

/// Percentiles reported by [`Summary::with_defaults`].
pub const DEFAULT_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

/// Histogram bin count used by [`Summary::with_defaults`].
pub const DEFAULT_BIN_COUNT: usize = 10;

/// Descriptive statistics, percentiles and a histogram of one dataset.
///
/// # Examples
///
/// ```
/// use geoskill_stats::summary::Summary;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let summary = Summary::new(values, &[25.0, 50.0, 75.0], 5, None).unwrap();
///
/// assert_eq!(summary.stats.mean, 5.5);
/// assert_eq!(summary.percentiles.get(50.0), Some(5.0));
/// assert_eq!(summary.histogram.total(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub stats: DescriptiveStats,
    pub percentiles: Percentiles,
    pub histogram: Histogram,
}

impl Summary {
    /// Summarizes unsorted values. Returns `None` for an empty dataset or zero bins.
    #[must_use]
    pub fn new<I>(
        values: I,
        percentile_points: &[f64],
        bin_count: usize,
        hist_range: Option<(f64, f64)>,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);

        let stats = DescriptiveStats::from_sorted(&sorted)?;
        let percentiles = Percentiles::from_sorted(&sorted, percentile_points);
        let histogram = Histogram::new(sorted, bin_count, hist_range)?;
        Some(Self {
            stats,
            percentiles,
            histogram,
        })
    }

    /// Summarizes with [`DEFAULT_PERCENTILES`] and [`DEFAULT_BIN_COUNT`] over the data range.
    #[must_use]
    pub fn with_defaults<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(values, &DEFAULT_PERCENTILES, DEFAULT_BIN_COUNT, None)
    }
}
