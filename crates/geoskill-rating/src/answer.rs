//! Answer events and the identifiers they refer to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time an answer was recorded.
pub type Timestamp = DateTime<Utc>;

/// Identifier of a user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct UserId(pub u32);

/// Identifier of a place, used both for the place asked and the place answered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct PlaceId(pub u32);

/// One quiz attempt.
///
/// A user was asked to locate `place` and picked `answered` (or nothing, on
/// a skip or timeout) out of `option_count` presented options. An
/// `option_count` of zero means the question had no options to guess from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub user: UserId,
    pub place: PlaceId,
    pub answered: Option<PlaceId>,
    pub option_count: u32,
    pub response_time_ms: u64,
    pub timestamp: Timestamp,
}

impl AnswerEvent {
    #[must_use]
    pub fn new(
        user: UserId,
        place: PlaceId,
        answered: Option<PlaceId>,
        option_count: u32,
        response_time_ms: u64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            user,
            place,
            answered,
            option_count,
            response_time_ms,
            timestamp,
        }
    }

    /// Returns `true` if the user picked the place they were asked for.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.answered == Some(self.place)
    }

    /// Probability of answering correctly by picking an option at random.
    ///
    /// Zero when no options were presented.
    #[must_use]
    pub fn guess_probability(&self) -> f64 {
        if self.option_count > 0 {
            1.0 / f64::from(self.option_count)
        } else {
            0.0
        }
    }

    /// Returns the wrongly chosen place, if this answer picked one.
    #[must_use]
    pub fn mistaken_for(&self) -> Option<PlaceId> {
        self.answered.filter(|answered| *answered != self.place)
    }
}
