//! Serializable reports bundling the analyses.
//!
//! - [`GlobalReport`]: the whole log
//! - [`PlaceReport`]: one place
//! - [`UserReport`]: one user's prior and current knowledge

use std::collections::BTreeMap;

use chrono::NaiveDate;
use geoskill_rating::{
    AnswerLog, KnowledgeEstimator, PlaceId, RatingRecord, RatingTable, SessionId, UserHistory,
    UserId, difficulty_to_success_probability, success_probability,
};
use geoskill_stats::{
    classification::{ClassBreaks, ClassificationMethod},
    summary::Summary,
};
use serde::{Deserialize, Serialize};

use crate::{
    filter::Correctness,
    per_item, per_place, per_session,
    per_time::{self, Period},
    series::{CountedValue, Series},
};

/// Tunables of the reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportOptions {
    /// Calendar period of the time series.
    pub period: Period,
    /// Number of answers at each end of a session compared for speed-up.
    pub response_sample: usize,
    pub classification: ClassificationMethod,
    /// Number of difficulty classes.
    pub classes: usize,
    /// Mistaken places below this portion are merged in answer portions.
    pub portion_threshold: Option<f64>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            period: Period::Month,
            response_sample: 5,
            classification: ClassificationMethod::Jenks,
            classes: 6,
            portion_threshold: Some(0.05),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSection {
    pub lengths_secs: Series<SessionId>,
    pub answers: Series<SessionId>,
    pub users: BTreeMap<SessionId, u64>,
    pub success: Series<SessionId>,
    pub response_time_start_end: Series<SessionId>,
    pub prior_skill: Series<SessionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSection {
    pub answer_counts: BTreeMap<PlaceId, u64>,
    pub success_rates: Series<PlaceId>,
    pub mean_response_time: Series<PlaceId>,
    pub prior_knowledge: BTreeMap<PlaceId, f64>,
    pub average_current_knowledge: BTreeMap<PlaceId, f64>,
    pub difficulty_response_time: Vec<per_place::DifficultyResponseTime>,
    pub difficulty: Option<Summary>,
    pub difficulty_classes: Option<ClassBreaks>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSection {
    pub period: Period,
    pub weekday_activity: [u64; 7],
    pub hourly_activity: [u64; 24],
    pub success: Series<NaiveDate>,
    pub new_users: BTreeMap<NaiveDate, u64>,
    pub answers: Series<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSection {
    pub success: Series<usize>,
    pub response_time: Series<usize>,
}

/// Every aggregate statistic of an answer log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalReport {
    pub users: usize,
    pub answers: usize,
    pub places: usize,
    pub sessions: SessionSection,
    pub per_place: PlaceSection,
    pub per_time: TimeSection,
    pub per_item: ItemSection,
}

impl GlobalReport {
    #[must_use]
    pub fn build(
        log: &AnswerLog,
        estimator: &KnowledgeEstimator,
        difficulties: &RatingTable<PlaceId>,
        options: &ReportOptions,
    ) -> Self {
        let limit_ms = estimator.config().response_time_limit_ms;
        let difficulty_values = difficulties.values().collect::<Vec<_>>();

        let sessions = SessionSection {
            lengths_secs: per_session::session_lengths(log),
            answers: per_session::answers_per_session(log),
            users: per_session::users_per_session(log),
            success: per_session::success_per_session(log),
            response_time_start_end: per_session::response_time_start_end(
                log,
                options.response_sample,
                limit_ms,
            ),
            prior_skill: per_session::skill_per_session(log, estimator, difficulties),
        };
        let per_place = PlaceSection {
            answer_counts: per_place::answer_counts(log, Correctness::Any),
            success_rates: per_place::success_rates(log),
            mean_response_time: per_place::mean_response_time(log, Correctness::Any, limit_ms),
            prior_knowledge: per_place::prior_knowledge(difficulties),
            average_current_knowledge: per_place::average_current_knowledge(
                log,
                estimator,
                difficulties,
            ),
            difficulty_response_time: per_place::difficulty_response_time(
                log,
                difficulties,
                limit_ms,
            ),
            difficulty: Summary::with_defaults(difficulty_values.iter().copied()),
            difficulty_classes: options
                .classification
                .breaks(&difficulty_values, options.classes),
        };
        let per_time = TimeSection {
            period: options.period,
            weekday_activity: per_time::weekday_activity(log),
            hourly_activity: per_time::hourly_activity(log),
            success: per_time::success_over_time(log, options.period),
            new_users: per_time::users_over_time(log, options.period),
            answers: per_time::answers_over_time(log, options.period),
        };
        let per_item = ItemSection {
            success: per_item::success_over_items(log),
            response_time: per_item::response_time_over_items(log, limit_ms),
        };

        tracing::info!(users = log.user_count(), "global report built");
        Self {
            users: log.user_count(),
            answers: log.answer_count(),
            places: per_place.answer_counts.len(),
            sessions,
            per_place,
            per_time,
            per_item,
        }
    }
}

/// Statistics of a single place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceReport {
    pub place: PlaceId,
    /// `None` if the place is missing from the difficulty table.
    pub difficulty: Option<RatingRecord>,
    pub prior_success_probability: Option<f64>,
    pub answers: usize,
    pub correct_answers: u64,
    pub success: Option<CountedValue>,
    pub mean_response_time: Option<CountedValue>,
    pub mistaken_places: per_place::MistakenPlaces,
    pub answer_portions: Vec<(per_place::AnswerSlice, f64)>,
    pub success_over_items: Series<usize>,
    pub response_time_over_items: Series<usize>,
}

impl PlaceReport {
    #[must_use]
    pub fn build(
        log: &AnswerLog,
        place: PlaceId,
        estimator: &KnowledgeEstimator,
        difficulties: &RatingTable<PlaceId>,
        options: &ReportOptions,
    ) -> Self {
        let limit_ms = estimator.config().response_time_limit_ms;
        let asked = log.select(|answer| answer.event.place == place);
        let difficulty = difficulties.find(&place).copied();

        Self {
            place,
            difficulty,
            prior_success_probability: difficulty.map(difficulty_to_success_probability),
            answers: asked.answer_count(),
            correct_answers: per_place::answer_counts(&asked, Correctness::Correct)
                .get(&place)
                .copied()
                .unwrap_or(0),
            success: per_place::place_success(&asked, place),
            mean_response_time: per_place::mean_response_time(&asked, Correctness::Any, limit_ms)
                .remove(&place),
            mistaken_places: per_place::mistaken_places(&asked, place),
            answer_portions: per_place::answer_portions(&asked, place, options.portion_threshold),
            success_over_items: per_item::success_over_items(&asked),
            response_time_over_items: per_item::response_time_over_items(&asked, limit_ms),
        }
    }
}

/// Current skill of a user at one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceKnowledge {
    pub place: PlaceId,
    pub skill: RatingRecord,
    pub success_probability: f64,
}

/// Prior and current knowledge of a single user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub user: UserId,
    pub answers: usize,
    pub sessions: usize,
    pub prior: RatingRecord,
    pub prior_trajectory: Vec<(SessionId, RatingRecord)>,
    pub current: Vec<PlaceKnowledge>,
}

impl UserReport {
    #[must_use]
    pub fn build(
        history: &UserHistory,
        estimator: &KnowledgeEstimator,
        difficulties: &RatingTable<PlaceId>,
    ) -> Self {
        let knowledge = estimator.estimate_user(history, difficulties);
        let current = knowledge
            .current
            .iter()
            .map(|(place, skill)| PlaceKnowledge {
                place: *place,
                skill: *skill,
                success_probability: success_probability(*skill, difficulties.get(place)),
            })
            .collect();

        Self {
            user: history.user(),
            answers: history.len(),
            sessions: history.session_count(),
            prior: knowledge.prior,
            prior_trajectory: estimator.estimate_prior_trajectory(history, difficulties),
            current,
        }
    }
}

#[cfg(test)]
mod tests {
    use geoskill_rating::EstimatorConfig;

    use super::*;
    use crate::testing::{answer, correct, log, wrong};

    fn fixture() -> (AnswerLog, KnowledgeEstimator, RatingTable<PlaceId>) {
        let log = log(vec![
            correct(1, 10, 0),
            wrong(1, 11, 12, 1),
            correct(1, 11, 90),
            wrong(2, 10, 11, 0),
            correct(2, 12, 1),
            answer(3, 11, None, 0, 70_000),
        ]);
        let estimator = KnowledgeEstimator::new(EstimatorConfig::default()).unwrap();
        let global = estimator.compute_global_difficulties(&log);
        (log, estimator, global.places)
    }

    #[test]
    fn test_global_report_totals() {
        let (log, estimator, difficulties) = fixture();
        let report = GlobalReport::build(&log, &estimator, &difficulties, &ReportOptions::default());

        assert_eq!(report.users, 3);
        assert_eq!(report.answers, 6);
        assert_eq!(report.places, 3);
        assert_eq!(report.sessions.users[&SessionId(2)], 1);
        assert_eq!(report.per_time.weekday_activity[0], 6);
        assert_eq!(report.per_place.prior_knowledge.len(), 3);
        assert!(report.per_place.difficulty_classes.is_some());
        assert_eq!(report.per_place.difficulty.as_ref().unwrap().stats.count, 3);
    }

    #[test]
    fn test_global_report_serializes() {
        let (log, estimator, difficulties) = fixture();
        let report = GlobalReport::build(&log, &estimator, &difficulties, &ReportOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["users"], 3);
        assert!(json["per_time"]["success"]["2014-03-01"].is_object());
        assert!(json["sessions"]["users"]["1"].is_number());
    }

    #[test]
    fn test_place_report() {
        let (log, estimator, difficulties) = fixture();
        let report = PlaceReport::build(
            &log,
            PlaceId(11),
            &estimator,
            &difficulties,
            &ReportOptions::default(),
        );

        assert_eq!(report.answers, 3);
        assert_eq!(report.correct_answers, 1);
        assert!(report.difficulty.is_some());
        // user 1 in two sessions and user 3
        assert_eq!(report.success.unwrap().count, 3);
        assert_eq!(report.mean_response_time.unwrap().count, 2);
        assert_eq!(report.mistaken_places.mistaken_for, vec![(PlaceId(12), 1)]);
    }

    #[test]
    fn test_place_report_for_unknown_place() {
        let (log, estimator, difficulties) = fixture();
        let report = PlaceReport::build(
            &log,
            PlaceId(99),
            &estimator,
            &difficulties,
            &ReportOptions::default(),
        );
        assert_eq!(report.answers, 0);
        assert_eq!(report.difficulty, None);
        assert_eq!(report.success, None);
        assert!(report.answer_portions.is_empty());
    }

    #[test]
    fn test_user_report() {
        let (log, estimator, difficulties) = fixture();
        let report = UserReport::build(log.user(UserId(1)).unwrap(), &estimator, &difficulties);

        assert_eq!(report.answers, 3);
        assert_eq!(report.sessions, 2);
        assert_eq!(report.prior_trajectory.len(), 2);
        assert_eq!(report.prior, report.prior_trajectory[1].1);
        let places = report.current.iter().map(|k| k.place).collect::<Vec<_>>();
        assert_eq!(places, vec![PlaceId(10), PlaceId(11)]);
        assert_eq!(report.current[1].skill.observation_count, 2);
    }
}
