//! Reduction of an answer stream to first attempts.
//!
//! A user may be asked the same place several times. Only the first attempt
//! reflects whether the user knew the place before being shown the answer, so
//! the prior-knowledge and global-difficulty passes look at first attempts only.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{PlaceId, SessionId, TaggedAnswer, UserId};

/// Window within which repeated questions about a place are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstAttemptScope {
    /// Keep the first attempt at a place in every session.
    #[default]
    PerSession,
    /// Keep only the first attempt at a place across the user's whole history.
    WholeHistory,
}

/// Keeps the first answer for each distinct (user, session, place) key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstAttemptFilter {
    scope: FirstAttemptScope,
}

impl FirstAttemptFilter {
    #[must_use]
    pub const fn new(scope: FirstAttemptScope) -> Self {
        Self { scope }
    }

    /// Returns the first attempts in their original relative order.
    #[must_use]
    pub fn apply<'a, I>(&self, answers: I) -> Vec<&'a TaggedAnswer>
    where
        I: IntoIterator<Item = &'a TaggedAnswer>,
    {
        let mut seen = HashSet::<(UserId, Option<SessionId>, PlaceId)>::new();
        answers
            .into_iter()
            .filter(|answer| {
                let session = match self.scope {
                    FirstAttemptScope::PerSession => Some(answer.session),
                    FirstAttemptScope::WholeHistory => None,
                };
                seen.insert((answer.event.user, session, answer.event.place))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone as _, Utc};

    use super::*;
    use crate::AnswerEvent;

    fn tagged(user: u32, session: u32, place: u32, minute: i64) -> TaggedAnswer {
        TaggedAnswer {
            session: SessionId(session),
            event: AnswerEvent::new(
                UserId(user),
                PlaceId(place),
                None,
                2,
                900,
                Utc.with_ymd_and_hms(2014, 2, 1, 12, 0, 0).unwrap() + TimeDelta::minutes(minute),
            ),
        }
    }

    fn places(answers: &[&TaggedAnswer]) -> Vec<(u32, u32)> {
        answers
            .iter()
            .map(|a| (a.session.0, a.event.place.0))
            .collect()
    }

    #[test]
    fn test_keeps_first_attempt_per_session_and_place() {
        let answers = [tagged(1, 1, 5, 0), tagged(1, 1, 5, 1), tagged(1, 1, 7, 2)];
        let first = FirstAttemptFilter::default().apply(&answers);
        assert_eq!(first.len(), 2);
        assert!(std::ptr::eq(first[0], &answers[0]));
        assert!(std::ptr::eq(first[1], &answers[2]));
    }

    #[test]
    fn test_per_session_scope_keeps_repeats_in_later_sessions() {
        let answers = [
            tagged(1, 1, 5, 0),
            tagged(1, 1, 5, 1),
            tagged(1, 2, 5, 60),
            tagged(1, 2, 6, 61),
        ];
        let first = FirstAttemptFilter::new(FirstAttemptScope::PerSession).apply(&answers);
        assert_eq!(places(&first), vec![(1, 5), (2, 5), (2, 6)]);
    }

    #[test]
    fn test_whole_history_scope_drops_repeats_across_sessions() {
        let answers = [
            tagged(1, 1, 5, 0),
            tagged(1, 2, 5, 60),
            tagged(1, 2, 6, 61),
        ];
        let first = FirstAttemptFilter::new(FirstAttemptScope::WholeHistory).apply(&answers);
        assert_eq!(places(&first), vec![(1, 5), (2, 6)]);
    }

    #[test]
    fn test_users_are_filtered_independently() {
        let answers = [tagged(1, 1, 5, 0), tagged(2, 1, 5, 1), tagged(2, 1, 5, 2)];
        let first = FirstAttemptFilter::default().apply(&answers);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].event.user, UserId(2));
    }
}
