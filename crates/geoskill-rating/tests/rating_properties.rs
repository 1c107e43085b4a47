use chrono::{TimeDelta, TimeZone as _, Utc};
use geoskill_rating::{
    AnswerEvent, AnswerLog, EloModel, EstimatorConfig, KnowledgeEstimator, PlaceId, RatingRecord,
    SessionSegmenter, UserId,
};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-12;

fn event(user: u32, place: u32, correct: bool, options: u32, offset_secs: i64) -> AnswerEvent {
    let answered = if correct { place } else { place + 500 };
    AnswerEvent::new(
        UserId(user),
        PlaceId(place),
        Some(PlaceId(answered)),
        options,
        1500,
        Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(offset_secs),
    )
}

fn events() -> impl Strategy<Value = Vec<AnswerEvent>> {
    prop::collection::vec(
        (
            0u32..6,
            0u32..12,
            any::<bool>(),
            prop::sample::select(vec![0u32, 1, 2, 3, 4, 6]),
            0i64..20_000,
        ),
        0..80,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(user, place, correct, options, offset)| {
                event(user, place, correct, options, offset)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prediction_stays_between_guess_and_one(
        skill in -20.0f64..20.0,
        difficulty in -20.0f64..20.0,
        options in 0u32..10,
    ) {
        let guess = event(1, 1, true, options, 0).guess_probability();
        let p = EloModel::predict(skill, difficulty, guess);
        prop_assert!(p >= guess - TOLERANCE && p <= 1.0 + TOLERANCE, "p = {p}, guess = {guess}");
    }

    #[test]
    fn prediction_grows_with_skill(
        skill in -10.0f64..10.0,
        delta in 0.01f64..5.0,
        difficulty in -10.0f64..10.0,
        options in 0u32..8,
    ) {
        let guess = event(1, 1, true, options, 0).guess_probability();
        let low = EloModel::predict(skill, difficulty, guess);
        let high = EloModel::predict(skill + delta, difficulty, guess);
        prop_assert!(high >= low - TOLERANCE);
    }

    #[test]
    fn correct_answer_never_lowers_skill(
        skill in -8.0f64..8.0,
        skill_count in 0u64..500,
        difficulty in -8.0f64..8.0,
        difficulty_count in 0u64..500,
        options in 0u32..8,
    ) {
        let update = EloModel::new().update(
            &event(1, 1, true, options, 0),
            RatingRecord::new(skill, skill_count),
            RatingRecord::new(difficulty, difficulty_count),
        );
        prop_assert!(update.skill >= skill - TOLERANCE);
        prop_assert!(update.difficulty <= difficulty + TOLERANCE);
    }

    #[test]
    fn incorrect_answer_never_raises_skill(
        skill in -8.0f64..8.0,
        difficulty in -8.0f64..8.0,
        options in 0u32..8,
    ) {
        let update = EloModel::new().update(
            &event(1, 1, false, options, 0),
            RatingRecord::seeded(skill),
            RatingRecord::seeded(difficulty),
        );
        prop_assert!(update.skill <= skill + TOLERANCE);
        prop_assert!(update.difficulty >= difficulty - TOLERANCE);
    }

    #[test]
    fn certain_prediction_leaves_records_unchanged(
        skill in -8.0f64..8.0,
        skill_count in 0u64..500,
        difficulty in -8.0f64..8.0,
        difficulty_count in 0u64..500,
    ) {
        let update = EloModel::new().update(
            &event(1, 1, true, 1, 0),
            RatingRecord::new(skill, skill_count),
            RatingRecord::new(difficulty, difficulty_count),
        );
        prop_assert_eq!(update.skill, skill);
        prop_assert_eq!(update.difficulty, difficulty);
    }

    #[test]
    fn learning_rate_is_decreasing(n in 0u64..100_000) {
        let k = EloModel::learning_rate(n);
        prop_assert!(k > 0.0 && k <= 1.0);
        prop_assert!(EloModel::learning_rate(n + 1) < k);
    }

    #[test]
    fn sessions_start_at_one_and_step_by_one(offsets in prop::collection::vec(0i64..10_000, 1..40)) {
        let mut offsets = offsets;
        offsets.sort_unstable();
        let events = offsets.iter().map(|&o| event(1, 1, true, 0, o)).collect::<Vec<_>>();
        let sessions = SessionSegmenter::new(TimeDelta::seconds(600)).segment(&events).unwrap();

        prop_assert_eq!(sessions.len(), events.len());
        prop_assert_eq!(sessions[0].0, 1);
        for (pair, window) in sessions.windows(2).zip(offsets.windows(2)) {
            let step = pair[1].0 - pair[0].0;
            prop_assert_eq!(step == 1, window[1] - window[0] > 600);
            prop_assert!(step <= 1);
        }
    }

    #[test]
    fn estimation_is_deterministic(events in events()) {
        let estimator = KnowledgeEstimator::new(EstimatorConfig::default()).unwrap();
        let segmenter = SessionSegmenter::default();
        let first_log = AnswerLog::from_events(events.clone(), &segmenter).unwrap();
        let second_log = AnswerLog::from_events(events, &segmenter).unwrap();

        let first = estimator.compute_global_difficulties(&first_log);
        let second = estimator.compute_global_difficulties(&second_log);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            estimator.estimate_all_users(&first_log, &first.places),
            estimator.estimate_all_users(&second_log, &second.places)
        );
    }

    #[test]
    fn bounded_ratings_stay_in_bounds(events in events(), bound in 0.5f64..4.0) {
        let config = EstimatorConfig {
            rating_bound: Some(bound),
            ..EstimatorConfig::default()
        };
        let estimator = KnowledgeEstimator::new(config).unwrap();
        let log = AnswerLog::from_events(events, &SessionSegmenter::default()).unwrap();
        let global = estimator.compute_global_difficulties(&log);

        prop_assert!(global.places.values().all(|v| v.abs() <= bound));
        prop_assert!(global.users.values().all(|v| v.abs() <= bound));
        for knowledge in estimator.estimate_all_users(&log, &global.places).values() {
            prop_assert!(knowledge.prior.value.abs() <= bound);
            prop_assert!(knowledge.current.values().all(|v| v.abs() <= bound));
        }
    }

    #[test]
    fn ratings_stay_finite(events in events()) {
        let estimator = KnowledgeEstimator::new(EstimatorConfig::default()).unwrap();
        let log = AnswerLog::from_events(events, &SessionSegmenter::default()).unwrap();
        let global = estimator.compute_global_difficulties(&log);
        prop_assert!(global.places.values().all(f64::is_finite));
        prop_assert!(global.users.values().all(f64::is_finite));
    }
}
