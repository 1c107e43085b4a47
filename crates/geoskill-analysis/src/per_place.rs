//! Statistics grouped by the place asked.

use std::collections::BTreeMap;

use geoskill_rating::{
    AnswerLog, FirstAttemptScope, KnowledgeEstimator, PlaceId, RatingTable,
    difficulty_to_success_probability, logistic,
};
use geoskill_stats::rate::{Mean, Rate};
use serde::Serialize;

use crate::{
    filter::{Correctness, within_time_limit},
    series::{CountedValue, GroupedMean, Series},
};

/// Number of answers per place asked.
#[must_use]
pub fn answer_counts(log: &AnswerLog, correctness: Correctness) -> BTreeMap<PlaceId, u64> {
    let mut counts = BTreeMap::new();
    for answer in log.answers().filter(|a| correctness.matches(&a.event)) {
        *counts.entry(answer.event.place).or_default() += 1;
    }
    counts
}

/// Mean response time in milliseconds per place asked, ignoring answers at or
/// above `limit_ms`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_response_time(
    log: &AnswerLog,
    correctness: Correctness,
    limit_ms: u64,
) -> Series<PlaceId> {
    let mut times = GroupedMean::default();
    for answer in log.answers() {
        let event = &answer.event;
        if correctness.matches(event) && within_time_limit(event, limit_ms) {
            times.push(event.place, event.response_time_ms as f64);
        }
    }
    times.into_series()
}

/// Success rate of first attempts per place.
///
/// Each user contributes their first attempt at the place in every session.
#[must_use]
pub fn success_rates(log: &AnswerLog) -> Series<PlaceId> {
    let mut rates = BTreeMap::<PlaceId, Rate>::new();
    for answer in log.first_attempts(FirstAttemptScope::PerSession) {
        rates
            .entry(answer.event.place)
            .or_default()
            .push(answer.event.is_correct());
    }
    rates
        .into_iter()
        .map(|(place, rate)| (place, rate.into()))
        .collect()
}

/// Places a place was mistaken for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MistakenPlaces {
    /// Number of first attempts at the place.
    pub first_attempts: u64,
    /// Wrongly picked places with their counts, most frequent first.
    pub mistaken_for: Vec<(PlaceId, u64)>,
}

/// Counts which places users picked when first asked for `place`.
///
/// Unanswered questions count as attempts but not as confusions.
#[must_use]
pub fn mistaken_places(log: &AnswerLog, place: PlaceId) -> MistakenPlaces {
    let mut first_attempts = 0;
    let mut counts = BTreeMap::<PlaceId, u64>::new();
    for answer in log.first_attempts(FirstAttemptScope::PerSession) {
        if answer.event.place != place {
            continue;
        }
        first_attempts += 1;
        if let Some(other) = answer.event.mistaken_for() {
            *counts.entry(other).or_default() += 1;
        }
    }
    let mut mistaken_for = counts.into_iter().collect::<Vec<_>>();
    mistaken_for.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    MistakenPlaces {
        first_attempts,
        mistaken_for,
    }
}

/// One slice of [`answer_portions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSlice {
    /// The place itself was picked.
    Correct,
    /// Another place was picked.
    Mistaken(PlaceId),
    /// Mistaken places below the portion threshold, merged.
    Other,
}

/// Portions of first attempts at `place` by what was picked.
///
/// Portions sum to one over answered attempts. With a `threshold`, mistaken
/// places with a smaller portion are merged into [`AnswerSlice::Other`].
/// Returns an empty list if `place` was never answered.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn answer_portions(
    log: &AnswerLog,
    place: PlaceId,
    threshold: Option<f64>,
) -> Vec<(AnswerSlice, f64)> {
    let mut counts = BTreeMap::<AnswerSlice, u64>::new();
    for answer in log.first_attempts(FirstAttemptScope::PerSession) {
        if answer.event.place != place {
            continue;
        }
        let slice = match answer.event.answered {
            None => continue,
            Some(picked) if picked == place => AnswerSlice::Correct,
            Some(picked) => AnswerSlice::Mistaken(picked),
        };
        *counts.entry(slice).or_default() += 1;
    }
    let total = counts.values().sum::<u64>();
    if total == 0 {
        return vec![];
    }

    let mut portions = Vec::new();
    let mut other = 0.0;
    for (slice, count) in counts {
        let portion = count as f64 / total as f64;
        match threshold {
            Some(threshold) if slice != AnswerSlice::Correct && portion < threshold => {
                other += portion;
            }
            _ => portions.push((slice, portion)),
        }
    }
    if other > 0.0 {
        portions.push((AnswerSlice::Other, other));
    }
    portions
}

/// Response times of a place next to its predicted success probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyResponseTime {
    pub place: PlaceId,
    /// Success probability of a user with zero skill.
    pub success_probability: f64,
    pub correct_ms: f64,
    pub incorrect_ms: f64,
}

/// Mean response times of correct and incorrect answers per place, ordered
/// from the hardest place to the easiest.
///
/// Correct answers are taken from first attempts and incorrect answers from
/// all answers. Places lacking either are left out.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn difficulty_response_time(
    log: &AnswerLog,
    difficulties: &RatingTable<PlaceId>,
    limit_ms: u64,
) -> Vec<DifficultyResponseTime> {
    let mut correct = BTreeMap::<PlaceId, Mean>::new();
    for answer in log.first_attempts(FirstAttemptScope::PerSession) {
        let event = &answer.event;
        if event.is_correct() && within_time_limit(event, limit_ms) {
            correct
                .entry(event.place)
                .or_default()
                .push(event.response_time_ms as f64);
        }
    }
    let incorrect = mean_response_time(log, Correctness::Incorrect, limit_ms);

    let mut rows = correct
        .into_iter()
        .filter_map(|(place, correct)| {
            let correct_ms = correct.value()?;
            let incorrect_ms = incorrect.get(&place)?.value?;
            let difficulty = difficulties.find(&place)?;
            Some(DifficultyResponseTime {
                place,
                success_probability: difficulty_to_success_probability(*difficulty),
                correct_ms,
                incorrect_ms,
            })
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.success_probability.total_cmp(&b.success_probability));
    rows
}

/// Predicted success per place for the average user.
///
/// Every user's current skill is estimated from their first attempts, seeded
/// with their prior skill. Skills are averaged per place and turned into a
/// success probability against the place's difficulty.
#[must_use]
pub fn average_current_knowledge(
    log: &AnswerLog,
    estimator: &KnowledgeEstimator,
    difficulties: &RatingTable<PlaceId>,
) -> BTreeMap<PlaceId, f64> {
    let mut skills = BTreeMap::<PlaceId, Mean>::new();
    for history in log.users() {
        let prior = estimator.estimate_prior_knowledge(history, difficulties);
        let attempts = history.first_attempts(FirstAttemptScope::PerSession);
        let current = estimator.current_knowledge_from(prior, attempts, difficulties);
        for (place, record) in &current {
            skills.entry(*place).or_default().push(record.value);
        }
    }
    skills
        .into_iter()
        .filter_map(|(place, skill)| {
            let skill = skill.value()?;
            Some((place, logistic(skill - difficulties.get(&place).value)))
        })
        .collect()
}

/// Predicted success per place for a user nothing is known about.
#[must_use]
pub fn prior_knowledge(difficulties: &RatingTable<PlaceId>) -> BTreeMap<PlaceId, f64> {
    difficulties
        .iter()
        .map(|(place, record)| (*place, difficulty_to_success_probability(*record)))
        .collect()
}

/// Counted first-attempt success of one place, or `None` if it was never asked.
#[must_use]
pub fn place_success(log: &AnswerLog, place: PlaceId) -> Option<CountedValue> {
    success_rates(log).remove(&place)
}

#[cfg(test)]
mod tests {
    use geoskill_rating::{EstimatorConfig, RatingRecord};

    use super::*;
    use crate::testing::{answer, correct, log, wrong};

    fn sample_log() -> AnswerLog {
        log(vec![
            correct(1, 10, 0),
            wrong(1, 11, 12, 1),
            wrong(1, 11, 13, 2),
            wrong(2, 11, 12, 0),
            correct(2, 12, 1),
            answer(3, 11, None, 0, 10_000),
            wrong(3, 10, 11, 1),
        ])
    }

    #[test]
    fn test_answer_counts_by_correctness() {
        let log = sample_log();
        let all = answer_counts(&log, Correctness::Any);
        assert_eq!(all[&PlaceId(11)], 4);
        let correct = answer_counts(&log, Correctness::Correct);
        assert_eq!(correct.get(&PlaceId(11)), None);
        assert_eq!(correct[&PlaceId(10)], 1);
        let incorrect = answer_counts(&log, Correctness::Incorrect);
        assert_eq!(incorrect[&PlaceId(11)], 4);
    }

    #[test]
    fn test_mean_response_time_respects_limit() {
        let log = log(vec![
            answer(1, 5, Some(5), 0, 1000),
            answer(1, 5, Some(5), 1, 3000),
            answer(2, 5, Some(5), 0, 60_000),
        ]);
        let times = mean_response_time(&log, Correctness::Any, 60_000);
        assert_eq!(times[&PlaceId(5)], CountedValue { count: 2, value: Some(2000.0) });
    }

    #[test]
    fn test_success_rates_use_first_attempts() {
        let rates = success_rates(&sample_log());
        assert_eq!(rates[&PlaceId(10)], CountedValue { count: 2, value: Some(0.5) });
        // user 1's repeat is dropped
        assert_eq!(rates[&PlaceId(11)], CountedValue { count: 3, value: Some(0.0) });
        assert_eq!(place_success(&sample_log(), PlaceId(99)), None);
    }

    #[test]
    fn test_mistaken_places() {
        let mistaken = mistaken_places(&sample_log(), PlaceId(11));
        assert_eq!(mistaken.first_attempts, 3);
        assert_eq!(mistaken.mistaken_for, vec![(PlaceId(12), 2)]);
    }

    #[test]
    fn test_mistaken_places_ordering() {
        let log = log(vec![
            wrong(1, 1, 3, 0),
            wrong(2, 1, 2, 0),
            wrong(3, 1, 3, 0),
            wrong(4, 1, 4, 0),
        ]);
        let mistaken = mistaken_places(&log, PlaceId(1));
        assert_eq!(
            mistaken.mistaken_for,
            vec![(PlaceId(3), 2), (PlaceId(2), 1), (PlaceId(4), 1)]
        );
    }

    #[test]
    fn test_answer_portions() {
        let log = log(vec![
            correct(1, 1, 0),
            correct(2, 1, 0),
            wrong(3, 1, 2, 0),
            wrong(4, 1, 2, 0),
            wrong(5, 1, 3, 0),
            answer(6, 1, None, 0, 1000),
        ]);
        let portions = answer_portions(&log, PlaceId(1), None);
        assert_eq!(
            portions,
            vec![
                (AnswerSlice::Correct, 0.4),
                (AnswerSlice::Mistaken(PlaceId(2)), 0.4),
                (AnswerSlice::Mistaken(PlaceId(3)), 0.2),
            ]
        );

        let merged = answer_portions(&log, PlaceId(1), Some(0.3));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[2], (AnswerSlice::Other, 0.2));
        assert!(answer_portions(&log, PlaceId(9), None).is_empty());
    }

    #[test]
    fn test_difficulty_response_time_orders_by_probability() {
        let log = log(vec![
            answer(1, 1, Some(1), 0, 1000),
            answer(2, 1, Some(9), 0, 5000),
            answer(1, 2, Some(2), 1, 2000),
            answer(2, 2, Some(9), 1, 6000),
            answer(1, 3, Some(3), 2, 2000),
        ]);
        let mut difficulties = RatingTable::new();
        difficulties.insert(PlaceId(1), RatingRecord::new(-1.0, 2));
        difficulties.insert(PlaceId(2), RatingRecord::new(1.0, 2));
        difficulties.insert(PlaceId(3), RatingRecord::new(0.0, 1));

        let rows = difficulty_response_time(&log, &difficulties, 60_000);
        // place 3 has no incorrect answers
        let places = rows.iter().map(|row| row.place).collect::<Vec<_>>();
        assert_eq!(places, vec![PlaceId(2), PlaceId(1)]);
        assert!((rows[0].correct_ms - 2000.0).abs() < f64::EPSILON);
        assert!((rows[0].incorrect_ms - 6000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_prior_knowledge() {
        let mut difficulties = RatingTable::new();
        difficulties.insert(PlaceId(1), RatingRecord::new(0.0, 3));
        let prior = prior_knowledge(&difficulties);
        assert!((prior[&PlaceId(1)] - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_current_knowledge_covers_answered_places() {
        let log = sample_log();
        let estimator = KnowledgeEstimator::new(EstimatorConfig::default()).unwrap();
        let global = estimator.compute_global_difficulties(&log);
        let knowledge = average_current_knowledge(&log, &estimator, &global.places);

        assert_eq!(
            knowledge.keys().copied().collect::<Vec<_>>(),
            vec![PlaceId(10), PlaceId(11), PlaceId(12)]
        );
        assert!(knowledge.values().all(|p| (0.0..=1.0).contains(p)));
        assert!(knowledge[&PlaceId(12)] > knowledge[&PlaceId(11)]);
    }
}
