use serde::Serialize;

/// Precomputed percentile values for a dataset.
///
/// # Examples
///
/// ```
/// use geoskill_stats::percentiles::Percentiles;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(25.0), Some(3.0));
/// assert_eq!(percentiles.get(50.0), Some(5.0));
/// assert_eq!(percentiles.get(90.0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentiles {
    /// `(percentile, value)` pairs in the requested order, percentile in `0.0..=100.0`.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from values sorted in ascending order.
    ///
    /// Percentiles of an empty dataset are omitted.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `sorted_values` is not sorted.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .filter_map(|&p| Some((p, compute_percentile(sorted_values, p)?)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a precomputed percentile.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| (p - percentile).abs() < f64::EPSILON)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Computes a single percentile with the nearest-rank method.
///
/// The `p`-th percentile of `n` sorted values is the value at rank
/// `ceil(n * p / 100)` (1-based), clamped to the first value for `p = 0`.
/// Returns `None` for an empty dataset.
///
/// # Examples
///
/// ```
/// use geoskill_stats::percentiles::compute_percentile;
///
/// let values = [15.0, 20.0, 35.0, 40.0, 50.0];
/// assert_eq!(compute_percentile(&values, 30.0), Some(20.0));
/// assert_eq!(compute_percentile(&values, 40.0), Some(20.0));
/// assert_eq!(compute_percentile(&values, 50.0), Some(35.0));
/// assert_eq!(compute_percentile(&values, 100.0), Some(50.0));
/// assert_eq!(compute_percentile(&[], 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    if sorted_values.is_empty() {
        return None;
    }
    let rank = (sorted_values.len() as f64 * percentile.clamp(0.0, 100.0) / 100.0).ceil() as usize;
    let idx = rank.clamp(1, sorted_values.len()) - 1;
    Some(sorted_values[idx])
}
