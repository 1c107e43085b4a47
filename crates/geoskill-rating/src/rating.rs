//! Rating records and tables.
//!
//! A [`RatingRecord`] is a latent value (skill for users, difficulty for
//! places) paired with the number of updates applied to it so far. The count
//! drives the decaying learning rate of [`EloModel`](crate::EloModel).
//!
//! A [`RatingTable`] owns the records of one estimation context. Entities that
//! have never been rated are cold starts: reading them yields [`ZERO_RATING`]
//! instead of an error.

use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

/// Value and update count of a single rated entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Latent skill or difficulty on the logistic scale.
    pub value: f64,
    /// Number of updates applied to this record.
    pub observation_count: u64,
}

/// Record of an entity nothing is known about yet.
pub const ZERO_RATING: RatingRecord = RatingRecord {
    value: 0.0,
    observation_count: 0,
};

impl Default for RatingRecord {
    fn default() -> Self {
        ZERO_RATING
    }
}

impl RatingRecord {
    #[must_use]
    pub const fn new(value: f64, observation_count: u64) -> Self {
        Self {
            value,
            observation_count,
        }
    }

    /// Record that starts from `value` with no observations behind it.
    #[must_use]
    pub const fn seeded(value: f64) -> Self {
        Self::new(value, 0)
    }

    /// Stores an updated value and counts the update.
    pub fn apply(&mut self, value: f64) {
        self.value = value;
        self.observation_count += 1;
    }
}

/// Ratings of one kind of entity, keyed by id and iterated in key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(
        serialize = "K: Serialize",
        deserialize = "K: Deserialize<'de> + Ord"
    )
)]
pub struct RatingTable<K> {
    records: BTreeMap<K, RatingRecord>,
}

impl<K> Default for RatingTable<K> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<K> RatingTable<K>
where
    K: Ord,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `key`, or [`ZERO_RATING`] if it was never rated.
    #[must_use]
    pub fn get(&self, key: &K) -> RatingRecord {
        self.records.get(key).copied().unwrap_or(ZERO_RATING)
    }

    /// Returns the stored record for `key`, if any.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<&RatingRecord> {
        self.records.get(key)
    }

    /// Returns the record for `key`, creating a [`ZERO_RATING`] entry first if needed.
    pub fn get_or_insert(&mut self, key: K) -> &mut RatingRecord {
        self.get_or_insert_with(key, || ZERO_RATING)
    }

    /// Returns the record for `key`, creating it with `default` first if needed.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut RatingRecord
    where
        F: FnOnce() -> RatingRecord,
    {
        self.records.entry(key).or_insert_with(default)
    }

    pub fn insert(&mut self, key: K, record: RatingRecord) -> Option<RatingRecord> {
        self.records.insert(key, record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, RatingRecord> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.records.keys()
    }

    /// Iterates over rating values, in key order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.values().map(|record| record.value)
    }
}

impl<K> FromIterator<(K, RatingRecord)> for RatingTable<K>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, RatingRecord)>,
    {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a, K> IntoIterator for &'a RatingTable<K> {
    type Item = (&'a K, &'a RatingRecord);
    type IntoIter = btree_map::Iter<'a, K, RatingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
