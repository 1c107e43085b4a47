//! Aggregate statistics over answer logs.
//!
//! This crate builds on the rating core to describe how users behave and how
//! places are learned. Every analysis is a pure function from an
//! [`AnswerLog`](geoskill_rating::AnswerLog) (plus, where needed, the frozen
//! difficulty table and an estimator) to plain serializable data.
//!
//! # Overview
//!
//! ```text
//! AnswerLog ─┬─ per_session   aggregated by session number
//!            ├─ per_place     aggregated by place asked
//!            ├─ per_time      aggregated by weekday, hour or calendar period
//!            ├─ per_item      aggregated by position in a user's first attempts
//!            └─ cohort        prior skill of two groups of users side by side
//!                   ↓
//!              report         GlobalReport / PlaceReport / UserReport
//! ```
//!
//! Grouped results are [`Series`](series::Series) of
//! [`CountedValue`](series::CountedValue): each group carries the number of
//! samples behind it, and groups without samples have no value instead of NaN.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone as _, Utc};
//! use geoskill_analysis::{filter::Correctness, per_place, per_session};
//! use geoskill_rating::{AnswerEvent, AnswerLog, PlaceId, SessionId, SessionSegmenter, UserId};
//!
//! let at = |min| Utc.with_ymd_and_hms(2014, 5, 1, 10, min, 0).unwrap();
//! let events = vec![
//!     AnswerEvent::new(UserId(1), PlaceId(7), Some(PlaceId(7)), 4, 2100, at(0)),
//!     AnswerEvent::new(UserId(1), PlaceId(9), Some(PlaceId(3)), 4, 5400, at(2)),
//!     AnswerEvent::new(UserId(2), PlaceId(7), Some(PlaceId(9)), 4, 1800, at(5)),
//! ];
//! let log = AnswerLog::from_events(events, &SessionSegmenter::default())?;
//!
//! let counts = per_place::answer_counts(&log, Correctness::Incorrect);
//! assert_eq!(counts[&PlaceId(7)], 1);
//!
//! let lengths = per_session::session_lengths(&log);
//! assert_eq!(lengths[&SessionId(1)].count, 2);
//! assert_eq!(lengths[&SessionId(1)].value, Some(60.0));
//! # Ok::<(), geoskill_rating::RatingError>(())
//! ```

pub mod cohort;
pub mod filter;
pub mod per_item;
pub mod per_place;
pub mod per_session;
pub mod per_time;
pub mod report;
pub mod series;
