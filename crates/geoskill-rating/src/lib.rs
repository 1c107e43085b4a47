//! Incremental skill and difficulty estimation for timed multiple-choice answers.
//!
//! This crate is the rating core of geoskill. It turns a log of quiz answers
//! ("which place is this?") into paired latent estimates: a skill for every
//! user and a difficulty for every place, both on a common logistic scale.
//!
//! # Pipeline
//!
//! ```text
//! AnswerEvent (unordered, all users)
//!     ↓ group by user, order by timestamp
//! AnswerLog ── SessionSegmenter ──→ TaggedAnswer (session id per answer)
//!     ↓
//! FirstAttemptFilter (prior / global passes)   or   raw order (current pass)
//!     ↓
//! EloModel::update (pure)  ──→  RatingRecord / RatingTable
//!     ↓
//! KnowledgeEstimator ──→ GlobalRatings, prior skill, current knowledge
//! ```
//!
//! # Modules
//!
//! - [`answer`]: answer events and identifiers
//! - [`session`]: session segmentation by inactivity gap
//! - [`first_attempt`]: reduction to one answer per (session, place)
//! - [`rating`]: rating records and owned rating tables
//! - [`model`]: the logistic prediction and update rule
//! - [`log`]: answer logs grouped per user
//! - [`estimator`]: the three estimation passes
//! - [`config`]: estimator configuration
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone as _, Utc};
//! use geoskill_rating::{
//!     AnswerEvent, AnswerLog, EstimatorConfig, KnowledgeEstimator, PlaceId, UserId,
//! };
//!
//! let at = |min| Utc.with_ymd_and_hms(2014, 5, 1, 10, min, 0).unwrap();
//! let events = vec![
//!     AnswerEvent::new(UserId(1), PlaceId(7), Some(PlaceId(7)), 4, 2100, at(0)),
//!     AnswerEvent::new(UserId(1), PlaceId(9), Some(PlaceId(3)), 4, 5400, at(1)),
//!     AnswerEvent::new(UserId(2), PlaceId(7), Some(PlaceId(7)), 0, 1800, at(2)),
//! ];
//!
//! let config = EstimatorConfig::default();
//! let estimator = KnowledgeEstimator::new(config.clone())?;
//! let log = AnswerLog::from_events(events, &config.segmenter()?)?;
//!
//! let global = estimator.compute_global_difficulties(&log);
//! assert!(global.places.get(&PlaceId(7)).value < 0.0);
//! assert!(global.places.get(&PlaceId(9)).value > 0.0);
//!
//! let user = log.user(UserId(1)).unwrap();
//! let prior = estimator.estimate_prior_knowledge(user, &global.places);
//! assert_eq!(prior.observation_count, 2);
//! # Ok::<(), geoskill_rating::RatingError>(())
//! ```

pub use self::{
    answer::*, config::*, estimator::*, first_attempt::*, log::*, model::*, rating::*, session::*,
};

pub mod answer;
pub mod config;
pub mod estimator;
pub mod first_attempt;
pub mod log;
pub mod model;
pub mod rating;
pub mod session;

/// Errors raised when an answer stream or a configuration cannot be used for estimation.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RatingError {
    #[display(
        "answers of user {user} are out of order at position {index}: {timestamp} precedes {previous}"
    )]
    OutOfOrderInput {
        user: UserId,
        index: usize,
        previous: Timestamp,
        timestamp: Timestamp,
    },
    #[display("answer at position {index} belongs to user {found}, expected user {expected}")]
    MixedUsers {
        expected: UserId,
        found: UserId,
        index: usize,
    },
    #[display("invalid estimator configuration: {reason}")]
    InvalidConfig { reason: String },
}
