//! Accumulators for success rates and means.
//!
//! Aggregations over groups regularly hit groups with no samples (a place
//! nobody answered, a session number only a few users reached). Both
//! accumulators report such groups as `None` rather than NaN.

use std::ops::AddAssign;

use serde::{Serialize, Serializer};

/// Fraction of successful trials.
///
/// # Examples
///
/// ```
/// use geoskill_stats::rate::Rate;
///
/// let mut rate = Rate::default();
/// rate.push(true);
/// rate.push(false);
/// assert_eq!(rate.value(), Some(0.5));
/// assert_eq!(rate.total(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rate {
    successes: u64,
    total: u64,
}

impl Rate {
    #[must_use]
    pub const fn new(successes: u64, total: u64) -> Self {
        assert!(successes <= total, "successes must not exceed total");
        Self { successes, total }
    }

    pub fn push(&mut self, success: bool) {
        self.successes += u64::from(success);
        self.total += 1;
    }

    #[must_use]
    pub const fn successes(&self) -> u64 {
        self.successes
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// `successes / total`, or `None` without trials.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        (self.total > 0).then(|| self.successes as f64 / self.total as f64)
    }
}

impl AddAssign for Rate {
    fn add_assign(&mut self, rhs: Self) {
        self.successes += rhs.successes;
        self.total += rhs.total;
    }
}

impl FromIterator<bool> for Rate {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut rate = Self::default();
        rate.extend(iter);
        rate
    }
}

impl Extend<bool> for Rate {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = bool>,
    {
        for success in iter {
            self.push(success);
        }
    }
}

/// Serialized as the rate value, `null` without trials.
impl Serialize for Rate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value().serialize(serializer)
    }
}

/// Running arithmetic mean.
///
/// # Examples
///
/// ```
/// use geoskill_stats::rate::Mean;
///
/// let mean = [2.0, 4.0, 9.0].into_iter().collect::<Mean>();
/// assert_eq!(mean.value(), Some(5.0));
/// assert_eq!(Mean::default().value(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// The mean, or `None` if nothing was pushed.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl AddAssign for Mean {
    fn add_assign(&mut self, rhs: Self) {
        self.sum += rhs.sum;
        self.count += rhs.count;
    }
}

impl FromIterator<f64> for Mean {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut mean = Self::default();
        mean.extend(iter);
        mean
    }
}

impl Extend<f64> for Mean {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for value in iter {
            self.push(value);
        }
    }
}

impl Serialize for Mean {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value().serialize(serializer)
    }
}
