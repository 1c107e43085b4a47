//! Class breaks for grouping continuous values.
//!
//! A classification splits the range of a dataset into a small number of
//! classes, e.g. to colour places by difficulty. Three methods are provided:
//!
//! - **Equidistant**: classes of equal width between the minimum and maximum.
//! - **Nested means**: the data is split at its mean, then each half at its
//!   own mean, recursively. The class count is rounded down to a power of two.
//! - **Jenks natural breaks**: the split that minimizes the summed squared
//!   deviation from the class means, found by dynamic programming in
//!   `O(classes * n^2)`.
//!
//! Breaks are returned as ascending, deduplicated bounds starting at the
//! minimum and ending at the maximum, so `k` classes have at most `k + 1`
//! bounds. Fewer classes come out when the data has too few distinct values.
//!
//! ```text
//! bounds:   b0        b1          b2        b3
//!           |-class 0-|--class 1--|-class 2-|
//! ```

use serde::{Deserialize, Serialize};

/// How to place class breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    Equidistant,
    NestedMeans,
    #[default]
    Jenks,
}

impl ClassificationMethod {
    /// Computes class breaks for `values`.
    ///
    /// Returns `None` for an empty dataset or zero classes. Non-finite
    /// values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoskill_stats::classification::ClassificationMethod;
    ///
    /// let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    /// let equidistant = ClassificationMethod::Equidistant.breaks(&values, 4).unwrap();
    /// assert_eq!(equidistant.bounds(), &[0.0, 1.75, 3.5, 5.25, 7.0]);
    ///
    /// let nested = ClassificationMethod::NestedMeans.breaks(&values, 2).unwrap();
    /// assert_eq!(nested.bounds(), &[0.0, 3.5, 7.0]);
    /// ```
    #[must_use]
    pub fn breaks(self, values: &[f64], classes: usize) -> Option<ClassBreaks> {
        if classes == 0 {
            return None;
        }
        let mut sorted = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let inner = match self {
            Self::Equidistant => equidistant(&sorted, classes),
            Self::NestedMeans => nested_means(&sorted, classes.ilog2()),
            Self::Jenks => jenks(&sorted, classes),
        };
        Some(ClassBreaks::from_bounds(&sorted, inner))
    }
}

/// Ascending class bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassBreaks {
    bounds: Vec<f64>,
}

impl ClassBreaks {
    fn from_bounds(sorted: &[f64], inner: Vec<f64>) -> Self {
        let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
        let mut bounds = inner;
        bounds.retain(|b| *b > min && *b < max);
        bounds.push(min);
        bounds.push(max);
        bounds.sort_by(f64::total_cmp);
        bounds.dedup();
        Self { bounds }
    }

    #[must_use]
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Number of classes; a single-valued dataset has one class.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.bounds.len().saturating_sub(1).max(1)
    }

    /// Class of `value`: the class whose lower bound is the greatest bound not
    /// above `value`. The maximum belongs to the last class. Returns `None`
    /// outside the classified range.
    #[must_use]
    pub fn classify(&self, value: f64) -> Option<usize> {
        let (&min, &max) = (self.bounds.first()?, self.bounds.last()?);
        if !(min..=max).contains(&value) {
            return None;
        }
        let above = self.bounds.partition_point(|b| *b <= value);
        Some(above.saturating_sub(1).min(self.class_count() - 1))
    }
}

#[expect(clippy::cast_precision_loss)]
fn equidistant(sorted: &[f64], classes: usize) -> Vec<f64> {
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
    let width = (max - min) / classes as f64;
    (1..classes).map(|i| min + width * i as f64).collect()
}

#[expect(clippy::cast_precision_loss)]
fn nested_means(sorted: &[f64], depth: u32) -> Vec<f64> {
    if depth == 0 || sorted.is_empty() {
        return vec![];
    }
    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let split = sorted.partition_point(|v| *v < mean);
    let mut breaks = vec![mean];
    breaks.extend(nested_means(&sorted[..split], depth - 1));
    breaks.extend(nested_means(&sorted[split..], depth - 1));
    breaks
}

/// Returns the lower bound of every class but the first.
#[expect(clippy::cast_precision_loss)]
fn jenks(sorted: &[f64], classes: usize) -> Vec<f64> {
    let n = sorted.len();
    let classes = classes.min(n);
    if classes <= 1 {
        return vec![];
    }

    // prefix sums for O(1) squared deviation of any slice
    let mut sum = vec![0.0; n + 1];
    let mut sum_sq = vec![0.0; n + 1];
    for (i, v) in sorted.iter().enumerate() {
        sum[i + 1] = sum[i] + v;
        sum_sq[i + 1] = sum_sq[i] + v * v;
    }
    let deviation = |start: usize, end: usize| {
        let count = (end - start) as f64;
        let s = sum[end] - sum[start];
        sum_sq[end] - sum_sq[start] - s * s / count
    };

    // cost[c][i]: best cost of the first i values in c + 1 classes
    // start[c][i]: where the last of those classes starts
    let mut cost = vec![vec![f64::INFINITY; n + 1]; classes];
    let mut start = vec![vec![0; n + 1]; classes];
    for i in 1..=n {
        cost[0][i] = deviation(0, i);
    }
    for c in 1..classes {
        for i in (c + 1)..=n {
            for j in c..i {
                let candidate = cost[c - 1][j] + deviation(j, i);
                if candidate < cost[c][i] {
                    cost[c][i] = candidate;
                    start[c][i] = j;
                }
            }
        }
    }

    let mut breaks = Vec::with_capacity(classes - 1);
    let mut end = n;
    for c in (1..classes).rev() {
        let lower = start[c][end];
        breaks.push(sorted[lower]);
        end = lower;
    }
    breaks.reverse();
    breaks
}
