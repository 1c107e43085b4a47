//! Activity and success over wall-clock time.
//!
//! All times are taken in UTC.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate, TimeDelta, Timelike as _};
use geoskill_rating::{AnswerLog, Timestamp};
use geoskill_stats::rate::Rate;
use serde::{Deserialize, Serialize};

use crate::series::{GroupedMean, Series};

/// Calendar period used to bucket answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    /// ISO week, starting on Monday.
    Week,
    #[default]
    Month,
}

impl Period {
    /// First day of the period containing `timestamp`.
    #[must_use]
    pub fn start(self, timestamp: Timestamp) -> NaiveDate {
        let date = timestamp.date_naive();
        match self {
            Self::Day => date,
            Self::Week => {
                date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

/// Number of answers per weekday, Monday first.
#[must_use]
pub fn weekday_activity(log: &AnswerLog) -> [u64; 7] {
    let mut counts = [0; 7];
    for answer in log.answers() {
        counts[answer.event.timestamp.weekday().num_days_from_monday() as usize] += 1;
    }
    counts
}

/// Number of answers per hour of the day.
#[must_use]
pub fn hourly_activity(log: &AnswerLog) -> [u64; 24] {
    let mut counts = [0; 24];
    for answer in log.answers() {
        counts[answer.event.timestamp.hour() as usize] += 1;
    }
    counts
}

/// Mean success rate per period.
///
/// The success rate of every user active in a period is computed over all
/// their answers in it, then averaged over those users.
#[must_use]
pub fn success_over_time(log: &AnswerLog, period: Period) -> Series<NaiveDate> {
    let mut success = GroupedMean::default();
    for history in log.users() {
        let mut rates = BTreeMap::<NaiveDate, Rate>::new();
        for answer in history.answers() {
            rates
                .entry(period.start(answer.event.timestamp))
                .or_default()
                .push(answer.event.is_correct());
        }
        for (start, rate) in rates {
            if let Some(value) = rate.value() {
                success.push(start, value);
            }
        }
    }
    success.into_series()
}

/// Number of new users per period, by the time of their first answer.
#[must_use]
pub fn users_over_time(log: &AnswerLog, period: Period) -> BTreeMap<NaiveDate, u64> {
    let mut users = BTreeMap::new();
    for history in log.users() {
        if let Some(first) = history.answers().first() {
            *users.entry(period.start(first.event.timestamp)).or_default() += 1;
        }
    }
    users
}

/// Mean number of answers per active user in each period.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn answers_over_time(log: &AnswerLog, period: Period) -> Series<NaiveDate> {
    let mut answers = GroupedMean::default();
    for history in log.users() {
        let mut counts = BTreeMap::<NaiveDate, u64>::new();
        for answer in history.answers() {
            *counts.entry(period.start(answer.event.timestamp)).or_default() += 1;
        }
        for (start, count) in counts {
            answers.push(start, count as f64);
        }
    }
    answers.into_series()
}
