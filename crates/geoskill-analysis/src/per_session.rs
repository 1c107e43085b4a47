//! Statistics grouped by session number.
//!
//! Session numbers restart at 1 for every user, so the group of session `n`
//! collects the `n`-th session of every user who had at least `n` sessions.
//! Each value is first computed per (user, session) and then averaged over
//! users; `count` is the number of users contributing to the group.

use std::collections::BTreeMap;

use geoskill_rating::{
    AnswerLog, FirstAttemptFilter, FirstAttemptScope, KnowledgeEstimator, PlaceId, RatingTable,
    SessionId,
};
use geoskill_stats::rate::{Mean, Rate};

use crate::{
    filter::within_time_limit,
    series::{GroupedMean, Series},
};

/// Mean session duration in seconds, from first to last answer.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn session_lengths(log: &AnswerLog) -> Series<SessionId> {
    let mut lengths = GroupedMean::default();
    for history in log.users() {
        for session in history.sessions() {
            let (first, last) = (&session[0], &session[session.len() - 1]);
            let millis = (last.event.timestamp - first.event.timestamp).num_milliseconds();
            lengths.push(first.session, millis as f64 / 1000.0);
        }
    }
    lengths.into_series()
}

/// Mean number of answers given in a session.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn answers_per_session(log: &AnswerLog) -> Series<SessionId> {
    let mut answers = GroupedMean::default();
    for history in log.users() {
        for session in history.sessions() {
            answers.push(session[0].session, session.len() as f64);
        }
    }
    answers.into_series()
}

/// Number of users who reached each session number.
#[must_use]
pub fn users_per_session(log: &AnswerLog) -> BTreeMap<SessionId, u64> {
    let mut users = BTreeMap::new();
    for history in log.users() {
        for session in history.sessions() {
            *users.entry(session[0].session).or_default() += 1;
        }
    }
    users
}

/// Mean success rate of the first attempts made in a session.
#[must_use]
pub fn success_per_session(log: &AnswerLog) -> Series<SessionId> {
    let filter = FirstAttemptFilter::new(FirstAttemptScope::PerSession);
    let mut success = GroupedMean::default();
    for history in log.users() {
        for session in history.sessions() {
            let rate = filter
                .apply(session)
                .into_iter()
                .map(|answer| answer.event.is_correct())
                .collect::<Rate>();
            if let Some(value) = rate.value() {
                success.push(session[0].session, value);
            }
        }
    }
    success.into_series()
}

/// How much faster users answer at the end of a session than at its start.
///
/// For every session, the mean response time of the last `sample` answers is
/// subtracted from the mean of the first `sample` answers. Answers at or above
/// `limit_ms` are ignored. Positive values mean users got faster.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn response_time_start_end(log: &AnswerLog, sample: usize, limit_ms: u64) -> Series<SessionId> {
    let mut speedup = GroupedMean::default();
    for history in log.users() {
        for session in history.sessions() {
            let times = session
                .iter()
                .filter(|answer| within_time_limit(&answer.event, limit_ms))
                .map(|answer| answer.event.response_time_ms as f64)
                .collect::<Vec<_>>();
            let head = times.iter().copied().take(sample).collect::<Mean>();
            let tail = times.iter().copied().rev().take(sample).collect::<Mean>();
            if let (Some(head), Some(tail)) = (head.value(), tail.value()) {
                speedup.push(session[0].session, head - tail);
            }
        }
    }
    speedup.into_series()
}

/// Mean prior skill at the end of each session number.
///
/// A user contributes to a session number only if that session contained
/// first attempts.
#[must_use]
pub fn skill_per_session(
    log: &AnswerLog,
    estimator: &KnowledgeEstimator,
    difficulties: &RatingTable<PlaceId>,
) -> Series<SessionId> {
    let mut skill = GroupedMean::default();
    for history in log.users() {
        for (session, record) in estimator.estimate_prior_trajectory(history, difficulties) {
            skill.push(session, record.value);
        }
    }
    skill.into_series()
}

#[cfg(test)]
mod tests {
    use geoskill_rating::EstimatorConfig;

    use super::*;
    use crate::{
        series::CountedValue,
        testing::{answer, correct, log, wrong},
    };

    fn sample_log() -> AnswerLog {
        log(vec![
            // user 1: two sessions
            correct(1, 10, 0),
            wrong(1, 11, 12, 4),
            wrong(1, 10, 12, 5),
            correct(1, 10, 100),
            // user 2: one session
            correct(2, 11, 0),
            correct(2, 12, 10),
        ])
    }

    #[test]
    fn test_session_lengths() {
        let lengths = session_lengths(&sample_log());
        assert_eq!(lengths[&SessionId(1)], CountedValue { count: 2, value: Some(450.0) });
        assert_eq!(lengths[&SessionId(2)], CountedValue { count: 1, value: Some(0.0) });
    }

    #[test]
    fn test_answers_and_users_per_session() {
        let log = sample_log();
        let answers = answers_per_session(&log);
        assert_eq!(answers[&SessionId(1)].value, Some(2.5));
        assert_eq!(answers[&SessionId(2)].value, Some(1.0));

        let users = users_per_session(&log);
        assert_eq!(users, BTreeMap::from([(SessionId(1), 2), (SessionId(2), 1)]));
    }

    #[test]
    fn test_success_uses_first_attempts() {
        let success = success_per_session(&sample_log());
        // user 1: place 10 first correct, place 11 wrong -> 0.5; user 2 -> 1.0
        assert_eq!(success[&SessionId(1)].value, Some(0.75));
        assert_eq!(success[&SessionId(2)].value, Some(1.0));
    }

    #[test]
    fn test_response_time_start_end() {
        let log = log(vec![
            answer(1, 1, Some(1), 0, 9000),
            answer(1, 2, Some(2), 1, 7000),
            answer(1, 3, Some(3), 2, 90_000),
            answer(1, 4, Some(4), 3, 3000),
            answer(1, 5, Some(5), 4, 1000),
        ]);
        let speedup = response_time_start_end(&log, 2, 60_000);
        // first two: 8000, last two: 2000
        assert_eq!(speedup[&SessionId(1)], CountedValue { count: 1, value: Some(6000.0) });
    }

    #[test]
    fn test_response_time_start_end_skips_sessions_without_fast_answers() {
        let log = log(vec![answer(1, 1, Some(1), 0, 70_000)]);
        assert!(response_time_start_end(&log, 5, 60_000).is_empty());
    }

    #[test]
    fn test_skill_per_session_follows_trajectory() {
        let log = sample_log();
        let estimator = KnowledgeEstimator::new(EstimatorConfig::default()).unwrap();
        let difficulties = RatingTable::new();
        let skill = skill_per_session(&log, &estimator, &difficulties);

        let user1 = estimator.estimate_prior_trajectory(log.user(1.into()).unwrap(), &difficulties);
        let user2 = estimator.estimate_prior_knowledge(log.user(2.into()).unwrap(), &difficulties);
        let expected = f64::midpoint(user1[0].1.value, user2.value);
        assert!((skill[&SessionId(1)].value.unwrap() - expected).abs() < 1e-12);
        assert_eq!(skill[&SessionId(2)].count, 1);
    }
}
