//! Session segmentation of a user's answer stream.
//!
//! A session is a contiguous burst of activity. Consecutive answers of one
//! user belong to the same session as long as the time between them does not
//! exceed the configured gap:
//!
//! ```text
//! answers:   x  x   x              x x     (gap > 30 min between 3rd and 4th)
//! sessions:  1  1   1              2 2
//! ```
//!
//! Numbering starts at 1 for the first answer of every user and increases by
//! one for every gap strictly longer than the threshold. A gap exactly equal to
//! the threshold keeps the current session.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::{AnswerEvent, RatingError};

/// Default inactivity gap separating two sessions, in seconds.
pub const DEFAULT_SESSION_GAP_SECS: i64 = 30 * 60;

/// Per-user session number.
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
)]
#[serde(transparent)]
pub struct SessionId(pub u32);

impl SessionId {
    /// Session of the first answer of every user.
    pub const FIRST: Self = Self(1);

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// An answer together with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedAnswer {
    pub session: SessionId,
    pub event: AnswerEvent,
}

/// Splits a single user's ordered answers into sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSegmenter {
    gap: TimeDelta,
}

impl Default for SessionSegmenter {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(DEFAULT_SESSION_GAP_SECS))
    }
}

impl SessionSegmenter {
    #[must_use]
    pub const fn new(gap: TimeDelta) -> Self {
        Self { gap }
    }

    /// Computes the session id of every answer.
    ///
    /// The answers must belong to one user and be sorted ascending by
    /// timestamp; equal timestamps are allowed.
    ///
    /// # Errors
    ///
    /// - [`RatingError::OutOfOrderInput`] if a timestamp precedes its predecessor
    /// - [`RatingError::MixedUsers`] if the answers belong to more than one user
    pub fn segment(&self, events: &[AnswerEvent]) -> Result<Vec<SessionId>, RatingError> {
        let Some(first) = events.first() else {
            return Ok(vec![]);
        };

        let mut sessions = Vec::with_capacity(events.len());
        let mut current = SessionId::FIRST;
        sessions.push(current);

        for (index, pair) in events.windows(2).enumerate() {
            let (previous, event) = (&pair[0], &pair[1]);
            let index = index + 1;
            if event.user != first.user {
                return Err(RatingError::MixedUsers {
                    expected: first.user,
                    found: event.user,
                    index,
                });
            }
            if event.timestamp < previous.timestamp {
                return Err(RatingError::OutOfOrderInput {
                    user: event.user,
                    index,
                    previous: previous.timestamp,
                    timestamp: event.timestamp,
                });
            }
            if event.timestamp - previous.timestamp > self.gap {
                current = current.next();
            }
            sessions.push(current);
        }

        Ok(sessions)
    }

    /// Tags every answer with its session id.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`SessionSegmenter::segment`].
    pub fn tag(&self, events: Vec<AnswerEvent>) -> Result<Vec<TaggedAnswer>, RatingError> {
        let sessions = self.segment(&events)?;
        Ok(sessions
            .into_iter()
            .zip(events)
            .map(|(session, event)| TaggedAnswer { session, event })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;
    use crate::{PlaceId, Timestamp, UserId};

    fn at(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2014, 3, 2, 8, 0, 0).unwrap() + TimeDelta::minutes(minutes)
    }

    fn answers(user: u32, minutes: &[i64]) -> Vec<AnswerEvent> {
        minutes
            .iter()
            .map(|&m| AnswerEvent::new(UserId(user), PlaceId(1), None, 4, 1000, at(m)))
            .collect()
    }

    fn ids(raw: &[u32]) -> Vec<SessionId> {
        raw.iter().copied().map(SessionId).collect()
    }

    #[test]
    fn test_empty_stream() {
        let segmenter = SessionSegmenter::default();
        assert!(segmenter.segment(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_first_answer_starts_session_one() {
        let segmenter = SessionSegmenter::default();
        assert_eq!(segmenter.segment(&answers(1, &[0])).unwrap(), ids(&[1]));
    }

    #[test]
    fn test_gap_longer_than_threshold_starts_new_session() {
        let segmenter = SessionSegmenter::default();
        let sessions = segmenter.segment(&answers(1, &[0, 10, 50])).unwrap();
        assert_eq!(sessions, ids(&[1, 1, 2]));
    }

    #[test]
    fn test_gap_equal_to_threshold_keeps_session() {
        let segmenter = SessionSegmenter::default();
        let sessions = segmenter.segment(&answers(1, &[0, 30, 61])).unwrap();
        assert_eq!(sessions, ids(&[1, 1, 2]));
    }

    #[test]
    fn test_equal_timestamps_are_accepted() {
        let segmenter = SessionSegmenter::default();
        let sessions = segmenter.segment(&answers(1, &[5, 5, 5])).unwrap();
        assert_eq!(sessions, ids(&[1, 1, 1]));
    }

    #[test]
    fn test_custom_gap() {
        let segmenter = SessionSegmenter::new(TimeDelta::minutes(5));
        let sessions = segmenter.segment(&answers(1, &[0, 4, 10, 12, 30])).unwrap();
        assert_eq!(sessions, ids(&[1, 1, 2, 2, 3]));
    }

    #[test]
    fn test_out_of_order_is_rejected() {
        let segmenter = SessionSegmenter::default();
        let err = segmenter.segment(&answers(3, &[0, 10, 5])).unwrap_err();
        assert_eq!(
            err,
            RatingError::OutOfOrderInput {
                user: UserId(3),
                index: 2,
                previous: at(10),
                timestamp: at(5),
            }
        );
    }

    #[test]
    fn test_mixed_users_are_rejected() {
        let segmenter = SessionSegmenter::default();
        let mut events = answers(1, &[0, 1]);
        events.extend(answers(2, &[2]));
        let err = segmenter.segment(&events).unwrap_err();
        assert!(matches!(
            err,
            RatingError::MixedUsers {
                found: UserId(2),
                index: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_tag_pairs_answers_with_sessions() {
        let segmenter = SessionSegmenter::default();
        let tagged = segmenter.tag(answers(1, &[0, 45])).unwrap();
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].session, SessionId(1));
        assert_eq!(tagged[1].session, SessionId(2));
        assert_eq!(tagged[1].event.timestamp, at(45));
    }
}
