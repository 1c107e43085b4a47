//! Logistic prediction and the paired skill/difficulty update rule.
//!
//! # Prediction
//!
//! The chance of a correct answer is modelled as "lucky guess" or "knew it":
//!
//! ```text
//! guess = 1 / option_count        (0 when no options were shown)
//! p     = guess + (1 - guess) * logistic(skill - difficulty)
//! ```
//!
//! # Update
//!
//! After observing the outcome (`1` correct, `0` otherwise) both records move
//! against each other, scaled by learning rates that decay hyperbolically with
//! the number of updates each record has already seen:
//!
//! ```text
//! k(n)           = 1 / (1 + 0.05 * n)
//! skill'         = skill      + k(n_user)  * (result - p)
//! difficulty'    = difficulty - k(n_place) * (result - p)
//! ```
//!
//! The update is a pure function. Callers store the new values with
//! [`RatingRecord::apply`], which also counts the observation.

use std::collections::BTreeMap;

use crate::{AnswerEvent, PlaceId, RatingError, RatingRecord, RatingTable};

/// Slope of the hyperbolic learning-rate decay.
pub const LEARNING_RATE_DECAY: f64 = 0.05;

/// Standard logistic function, `1 / (1 + e^-x)`.
#[must_use]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// New values produced by one [`EloModel::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    pub skill: f64,
    pub difficulty: f64,
}

/// The Elo-style update rule, optionally bounding rating values.
///
/// Without a bound values are unrestricted, so a pathological answer stream can
/// push them arbitrarily far. A bound clamps every updated value to
/// `[-bound, bound]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EloModel {
    bound: Option<f64>,
}

impl EloModel {
    /// Unbounded model.
    #[must_use]
    pub const fn new() -> Self {
        Self { bound: None }
    }

    /// Model clamping values to `[-bound, bound]`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::InvalidConfig`] unless `bound` is finite and positive.
    pub fn bounded(bound: f64) -> Result<Self, RatingError> {
        if !bound.is_finite() || bound <= 0.0 {
            return Err(RatingError::InvalidConfig {
                reason: format!("rating bound must be finite and positive, got {bound}"),
            });
        }
        Ok(Self { bound: Some(bound) })
    }

    #[must_use]
    pub const fn bound(&self) -> Option<f64> {
        self.bound
    }

    /// Probability that a user of `skill` answers a place of `difficulty`
    /// correctly, given the chance `guess` of picking the right option at random.
    #[must_use]
    pub fn predict(skill: f64, difficulty: f64, guess: f64) -> f64 {
        guess + (1.0 - guess) * logistic(skill - difficulty)
    }

    /// Learning rate of a record that has seen `observation_count` updates.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn learning_rate(observation_count: u64) -> f64 {
        1.0 / (1.0 + LEARNING_RATE_DECAY * observation_count as f64)
    }

    /// Computes the new skill and difficulty values after observing `event`.
    #[must_use]
    pub fn update(
        &self,
        event: &AnswerEvent,
        skill: RatingRecord,
        difficulty: RatingRecord,
    ) -> RatingUpdate {
        let prediction = Self::predict(skill.value, difficulty.value, event.guess_probability());
        let result = if event.is_correct() { 1.0 } else { 0.0 };
        let surprise = result - prediction;

        let k_user = Self::learning_rate(skill.observation_count);
        let k_place = Self::learning_rate(difficulty.observation_count);

        RatingUpdate {
            skill: self.clamp(skill.value + k_user * surprise),
            difficulty: self.clamp(difficulty.value - k_place * surprise),
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        let Some(bound) = self.bound else {
            return value;
        };
        if value.abs() > bound {
            tracing::debug!(value, bound, "rating clamped to bound");
            value.clamp(-bound, bound)
        } else {
            value
        }
    }
}

/// Predicted success chance of a user with zero skill, ignoring guessing.
#[must_use]
pub fn difficulty_to_success_probability(difficulty: RatingRecord) -> f64 {
    logistic(-difficulty.value)
}

/// Predicted success chance of a specific user and place, ignoring guessing.
#[must_use]
pub fn success_probability(skill: RatingRecord, difficulty: RatingRecord) -> f64 {
    logistic(skill.value - difficulty.value)
}

/// Predicted success chance for every place a user has a current skill for.
#[must_use]
pub fn success_probabilities(
    skills: &RatingTable<PlaceId>,
    difficulties: &RatingTable<PlaceId>,
) -> BTreeMap<PlaceId, f64> {
    skills
        .iter()
        .map(|(place, skill)| (*place, success_probability(*skill, difficulties.get(place))))
        .collect()
}
