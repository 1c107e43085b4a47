//! Estimator configuration.
//!
//! The configuration is plain serde data so that it can be read from a JSON
//! file; every field has a default.
//!
//! ```json
//! {
//!   "session_gap_secs": 1800,
//!   "prior_scope": "per_session",
//!   "difficulty_scope": "per_session",
//!   "global_order": "by_user",
//!   "rating_bound": null,
//!   "response_time_limit_ms": 60000
//! }
//! ```

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_SESSION_GAP_SECS, EloModel, FirstAttemptFilter, FirstAttemptScope, RatingError,
    SessionSegmenter,
};

/// Default upper limit on response times considered by statistics, in milliseconds.
pub const DEFAULT_RESPONSE_TIME_LIMIT_MS: u64 = 60_000;

/// Order in which the global difficulty pass visits first attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalOrder {
    /// Users by ascending id, each user's answers by ascending timestamp.
    #[default]
    ByUser,
    /// All users' answers merged by timestamp; ties keep the by-user order.
    Chronological,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Inactivity gap, in seconds, after which a new session starts.
    pub session_gap_secs: i64,
    /// First-attempt window for prior knowledge.
    pub prior_scope: FirstAttemptScope,
    /// First-attempt window for the global difficulty pass.
    pub difficulty_scope: FirstAttemptScope,
    pub global_order: GlobalOrder,
    /// Symmetric clamp on rating values; `None` leaves them unbounded.
    pub rating_bound: Option<f64>,
    /// Answers slower than this are ignored by response-time statistics.
    pub response_time_limit_ms: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            session_gap_secs: DEFAULT_SESSION_GAP_SECS,
            prior_scope: FirstAttemptScope::PerSession,
            difficulty_scope: FirstAttemptScope::PerSession,
            global_order: GlobalOrder::ByUser,
            rating_bound: None,
            response_time_limit_ms: DEFAULT_RESPONSE_TIME_LIMIT_MS,
        }
    }
}

impl EstimatorConfig {
    /// Checks every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), RatingError> {
        self.session_gap()?;
        self.model()?;
        if self.response_time_limit_ms == 0 {
            return Err(RatingError::InvalidConfig {
                reason: "response time limit must be positive".to_owned(),
            });
        }
        Ok(())
    }

    pub fn session_gap(&self) -> Result<TimeDelta, RatingError> {
        if self.session_gap_secs < 0 {
            return Err(RatingError::InvalidConfig {
                reason: format!(
                    "session gap must not be negative, got {}s",
                    self.session_gap_secs
                ),
            });
        }
        TimeDelta::try_seconds(self.session_gap_secs).ok_or_else(|| RatingError::InvalidConfig {
            reason: format!("session gap of {}s is out of range", self.session_gap_secs),
        })
    }

    pub fn segmenter(&self) -> Result<SessionSegmenter, RatingError> {
        Ok(SessionSegmenter::new(self.session_gap()?))
    }

    pub fn model(&self) -> Result<EloModel, RatingError> {
        match self.rating_bound {
            Some(bound) => EloModel::bounded(bound),
            None => Ok(EloModel::new()),
        }
    }

    #[must_use]
    pub fn prior_filter(&self) -> FirstAttemptFilter {
        FirstAttemptFilter::new(self.prior_scope)
    }

    #[must_use]
    pub fn difficulty_filter(&self) -> FirstAttemptFilter {
        FirstAttemptFilter::new(self.difficulty_scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EstimatorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.session_gap().unwrap(), TimeDelta::minutes(30));
        assert_eq!(config.model().unwrap().bound(), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EstimatorConfig =
            serde_json::from_str(r#"{"session_gap_secs": 600, "prior_scope": "whole_history"}"#)
                .unwrap();
        assert_eq!(config.session_gap_secs, 600);
        assert_eq!(config.prior_scope, FirstAttemptScope::WholeHistory);
        assert_eq!(config.difficulty_scope, FirstAttemptScope::PerSession);
        assert_eq!(config.global_order, GlobalOrder::ByUser);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_str::<EstimatorConfig>(r#"{"session_gap": 600}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_gap_is_invalid() {
        let config = EstimatorConfig {
            session_gap_secs: -1,
            ..EstimatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RatingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_non_positive_bound_is_invalid() {
        let config = EstimatorConfig {
            rating_bound: Some(0.0),
            ..EstimatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bound_reaches_model() {
        let config = EstimatorConfig {
            rating_bound: Some(6.0),
            ..EstimatorConfig::default()
        };
        assert_eq!(config.model().unwrap().bound(), Some(6.0));
    }
}
