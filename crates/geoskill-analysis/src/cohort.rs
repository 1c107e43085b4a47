//! Side-by-side comparison of two groups of users, e.g. the arms of an A/B test.

use geoskill_rating::{AnswerLog, KnowledgeEstimator, PlaceId, RatingTable};
use geoskill_stats::summary::{DEFAULT_BIN_COUNT, DEFAULT_PERCENTILES, Summary};
use serde::Serialize;

/// Prior skill distribution of one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub users: usize,
    pub answers: usize,
    /// `None` for a cohort without users.
    pub prior_skill: Option<Summary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortComparison {
    pub a: CohortSummary,
    pub b: CohortSummary,
    /// Mean prior skill of `b` minus that of `a`.
    pub mean_difference: Option<f64>,
}

/// Compares the prior skill of two cohorts against the same difficulties.
///
/// Both histograms share one range so their bins line up.
#[must_use]
pub fn compare_prior_skill(
    a: &AnswerLog,
    b: &AnswerLog,
    estimator: &KnowledgeEstimator,
    difficulties: &RatingTable<PlaceId>,
) -> CohortComparison {
    let skills = |log: &AnswerLog| {
        log.users()
            .map(|history| estimator.estimate_prior_knowledge(history, difficulties).value)
            .collect::<Vec<_>>()
    };
    let (skills_a, skills_b) = (skills(a), skills(b));

    let range = skills_a
        .iter()
        .chain(&skills_b)
        .copied()
        .fold(None, |range: Option<(f64, f64)>, v| match range {
            Some((min, max)) => Some((min.min(v), max.max(v))),
            None => Some((v, v)),
        });
    let summarize = |log: &AnswerLog, skills: Vec<f64>| CohortSummary {
        users: log.user_count(),
        answers: log.answer_count(),
        prior_skill: Summary::new(skills, &DEFAULT_PERCENTILES, DEFAULT_BIN_COUNT, range),
    };
    let a = summarize(a, skills_a);
    let b = summarize(b, skills_b);

    let mean_difference = match (&a.prior_skill, &b.prior_skill) {
        (Some(a), Some(b)) => Some(b.stats.mean - a.stats.mean),
        _ => None,
    };
    tracing::debug!(?mean_difference, "cohorts compared");
    CohortComparison {
        a,
        b,
        mean_difference,
    }
}
