//! Learning curves over a user's sequence of first attempts.
//!
//! The item number of an answer is its 1-based position among the user's
//! first attempts (per session). Grouping by item number shows how success and
//! speed develop as users see more questions.

use geoskill_rating::{AnswerLog, FirstAttemptFilter, FirstAttemptScope};

use crate::{
    filter::within_time_limit,
    series::{GroupedMean, Series},
};

/// Success rate of the `k`-th first attempt, over users.
#[must_use]
pub fn success_over_items(log: &AnswerLog) -> Series<usize> {
    let mut success = GroupedMean::default();
    for history in log.users() {
        for (index, answer) in history
            .first_attempts(FirstAttemptScope::PerSession)
            .into_iter()
            .enumerate()
        {
            success.push(index + 1, if answer.event.is_correct() { 1.0 } else { 0.0 });
        }
    }
    success.into_series()
}

/// Mean response time of the `k`-th first attempt, over users.
///
/// Answers at or above `limit_ms` are dropped before first attempts are taken.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn response_time_over_items(log: &AnswerLog, limit_ms: u64) -> Series<usize> {
    let filter = FirstAttemptFilter::new(FirstAttemptScope::PerSession);
    let mut times = GroupedMean::default();
    for history in log.users() {
        let fast = history
            .answers()
            .iter()
            .filter(|answer| within_time_limit(&answer.event, limit_ms));
        for (index, answer) in filter.apply(fast).into_iter().enumerate() {
            times.push(index + 1, answer.event.response_time_ms as f64);
        }
    }
    times.into_series()
}
