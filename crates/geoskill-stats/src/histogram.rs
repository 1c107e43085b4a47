use std::ops::Range;

use serde::Serialize;

/// Equal-width histogram over a fixed range.
///
/// The range is either given explicitly or taken from the data. Values that
/// fall outside an explicit range are not dropped silently: they are counted in
/// [`underflow`](Self::underflow) and [`overflow`](Self::overflow).
///
/// ```text
///   underflow │ bin 0 │ bin 1 │ ... │ bin n-1 │ overflow
///             min                           max
/// ```
///
/// The last bin includes `max`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Number of values below the histogram range.
    pub underflow: u64,
    /// Number of values above the histogram range.
    pub overflow: u64,
}

/// A single histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram of `bin_count` bins.
    ///
    /// Without an explicit `range` the histogram spans the data. A degenerate
    /// range (all values equal) is widened to one unit around the value.
    ///
    /// Returns `None` if there are no values and no explicit range, or if
    /// `bin_count` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geoskill_stats::histogram::Histogram;
    /// let histogram = Histogram::new([0.5, 1.0, 1.5, 3.9, 4.0, 7.0], 4, Some((0.0, 4.0))).unwrap();
    /// let counts = histogram.bins.iter().map(|bin| bin.count).collect::<Vec<_>>();
    /// assert_eq!(counts, vec![1, 2, 0, 2]);
    /// assert_eq!(histogram.overflow, 1);
    /// assert_eq!(histogram.total(), 6);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, bin_count: usize, range: Option<(f64, f64)>) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if bin_count == 0 {
            return None;
        }
        let values = values.into_iter().collect::<Vec<_>>();
        let (mut min, mut max) = match range {
            Some(range) => range,
            None => {
                let min = values.iter().copied().reduce(f64::min)?;
                let max = values.iter().copied().reduce(f64::max)?;
                (min, max)
            }
        };
        if max - min < f64::EPSILON {
            min -= 0.5;
            max = min + 1.0;
        }

        let width = (max - min) / bin_count as f64;
        let mut bins = (0..bin_count)
            .map(|i| HistogramBin {
                range: (min + width * i as f64)..(min + width * (i + 1) as f64),
                count: 0,
            })
            .collect::<Vec<_>>();
        let mut underflow = 0;
        let mut overflow = 0;

        for value in values {
            if value < min {
                underflow += 1;
            } else if value > max {
                overflow += 1;
            } else {
                let idx = (((value - min) / width).floor() as usize).min(bin_count - 1);
                bins[idx].count += 1;
            }
        }

        Some(Self {
            bins,
            underflow,
            overflow,
        })
    }

    /// Number of values counted, including underflow and overflow.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.underflow + self.overflow + self.bins.iter().map(|bin| bin.count).sum::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_range_covers_every_value() {
        let histogram = Histogram::new([-2.0, -1.0, 0.0, 1.0, 2.0], 2, None).unwrap();
        assert_eq!(histogram.underflow, 0);
        assert_eq!(histogram.overflow, 0);
        assert_eq!(histogram.bins[0].count, 2);
        assert_eq!(histogram.bins[1].count, 3);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let histogram = Histogram::new([3.0, 3.0, 3.0], 3, None).unwrap();
        assert_eq!(histogram.total(), 3);
        assert!(histogram.bins[0].range.start < 3.0);
        assert!(histogram.bins[2].range.end > 3.0);
    }

    #[test]
    fn test_empty_data_with_range_has_empty_bins() {
        let histogram = Histogram::new([], 5, Some((0.0, 1.0))).unwrap();
        assert_eq!(histogram.bins.len(), 5);
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn test_no_data_and_no_range() {
        assert!(Histogram::new([], 5, None).is_none());
        assert!(Histogram::new([1.0], 0, None).is_none());
    }

    #[test]
    fn test_underflow() {
        let histogram = Histogram::new([-5.0, 0.5], 1, Some((0.0, 1.0))).unwrap();
        assert_eq!(histogram.underflow, 1);
        assert_eq!(histogram.bins[0].count, 1);
    }
}
