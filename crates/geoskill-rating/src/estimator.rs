//! The three estimation passes over an answer log.
//!
//! - **Global difficulties** ([`KnowledgeEstimator::compute_global_difficulties`]):
//!   one sequential pass over every user's first attempts, updating a skill per
//!   user and a difficulty per place. The resulting difficulty table is frozen
//!   and shared by all later passes.
//! - **Prior knowledge** ([`KnowledgeEstimator::estimate_prior_knowledge`]):
//!   a single skill per user, folded over the user's first attempts against
//!   the frozen difficulties.
//! - **Current knowledge** ([`KnowledgeEstimator::estimate_current_knowledge`]):
//!   a skill per place the user touched, seeded with the prior skill and updated
//!   by every answer in order.
//!
//! The global pass mutates shared difficulty records and must run on one
//! thread. The per-user passes only read the frozen table and are run in
//! parallel by [`KnowledgeEstimator::estimate_all_users`].

use std::{collections::BTreeMap, num::NonZeroUsize, panic, thread};

use serde::{Deserialize, Serialize};

use crate::{
    AnswerLog, EloModel, EstimatorConfig, GlobalOrder, PlaceId, RatingError, RatingRecord,
    RatingTable, SessionId, TaggedAnswer, UserHistory, UserId, ZERO_RATING,
};

/// Output of the global pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalRatings {
    /// Difficulty of every place that was asked.
    pub places: RatingTable<PlaceId>,
    /// Global prior skill of every user, a by-product of the pass.
    pub users: RatingTable<UserId>,
}

/// Prior and current knowledge of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserKnowledge {
    pub prior: RatingRecord,
    pub current: RatingTable<PlaceId>,
}

/// Runs the estimation passes with one configuration.
#[derive(Debug, Clone)]
pub struct KnowledgeEstimator {
    config: EstimatorConfig,
    model: EloModel,
}

impl KnowledgeEstimator {
    /// Creates an estimator after validating `config`.
    pub fn new(config: EstimatorConfig) -> Result<Self, RatingError> {
        config.validate()?;
        let model = config.model()?;
        Ok(Self { config, model })
    }

    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    #[must_use]
    pub fn model(&self) -> &EloModel {
        &self.model
    }

    /// Estimates the difficulty of every place from all users' first attempts.
    ///
    /// Every visited answer updates both the user's skill and the place's
    /// difficulty and counts one observation on each.
    #[must_use]
    pub fn compute_global_difficulties(&self, log: &AnswerLog) -> GlobalRatings {
        let mut attempts = log.first_attempts(self.config.difficulty_scope);
        if self.config.global_order == GlobalOrder::Chronological {
            attempts.sort_by_key(|answer| answer.event.timestamp);
        }

        let mut ratings = GlobalRatings::default();
        for answer in attempts {
            let event = &answer.event;
            let skill = ratings.users.get_or_insert(event.user);
            let difficulty = ratings.places.get_or_insert(event.place);
            let update = self.model.update(event, *skill, *difficulty);
            skill.apply(update.skill);
            difficulty.apply(update.difficulty);
        }

        tracing::info!(
            places = ratings.places.len(),
            users = ratings.users.len(),
            "global difficulties computed"
        );
        ratings
    }

    /// Estimates how much a user knew before their tracked history.
    ///
    /// Difficulties are read only; places missing from the table are treated
    /// as cold starts.
    #[must_use]
    pub fn estimate_prior_knowledge(
        &self,
        history: &UserHistory,
        difficulties: &RatingTable<PlaceId>,
    ) -> RatingRecord {
        let attempts = history.first_attempts(self.config.prior_scope);
        self.fold_prior(attempts, difficulties, |_, _| {})
    }

    /// Prior skill as it stood at the end of each session.
    #[must_use]
    pub fn estimate_prior_trajectory(
        &self,
        history: &UserHistory,
        difficulties: &RatingTable<PlaceId>,
    ) -> Vec<(SessionId, RatingRecord)> {
        let attempts = history.first_attempts(self.config.prior_scope);
        let mut trajectory = Vec::<(SessionId, RatingRecord)>::new();
        self.fold_prior(attempts, difficulties, |session, skill| {
            match trajectory.last_mut() {
                Some((last, record)) if *last == session => *record = skill,
                _ => trajectory.push((session, skill)),
            }
        });
        trajectory
    }

    fn fold_prior<'a, I, F>(
        &self,
        attempts: I,
        difficulties: &RatingTable<PlaceId>,
        mut observe: F,
    ) -> RatingRecord
    where
        I: IntoIterator<Item = &'a TaggedAnswer>,
        F: FnMut(SessionId, RatingRecord),
    {
        let mut skill = ZERO_RATING;
        for answer in attempts {
            let difficulty = difficulties.get(&answer.event.place);
            let update = self.model.update(&answer.event, skill, difficulty);
            skill.apply(update.skill);
            observe(answer.session, skill);
        }
        skill
    }

    /// Estimates the user's per-place skill after every answer they gave.
    #[must_use]
    pub fn estimate_current_knowledge(
        &self,
        history: &UserHistory,
        difficulties: &RatingTable<PlaceId>,
    ) -> RatingTable<PlaceId> {
        let prior = self.estimate_prior_knowledge(history, difficulties);
        self.current_knowledge_from(prior, history.answers(), difficulties)
    }

    /// Tracks per-place skill over `answers`, seeding every place with `prior`.
    #[must_use]
    pub fn current_knowledge_from<'a, I>(
        &self,
        prior: RatingRecord,
        answers: I,
        difficulties: &RatingTable<PlaceId>,
    ) -> RatingTable<PlaceId>
    where
        I: IntoIterator<Item = &'a TaggedAnswer>,
    {
        let mut skills = RatingTable::new();
        for answer in answers {
            let event = &answer.event;
            let skill =
                skills.get_or_insert_with(event.place, || RatingRecord::seeded(prior.value));
            let update = self.model.update(event, *skill, difficulties.get(&event.place));
            skill.apply(update.skill);
        }
        skills
    }

    /// Prior and current knowledge of one user.
    #[must_use]
    pub fn estimate_user(
        &self,
        history: &UserHistory,
        difficulties: &RatingTable<PlaceId>,
    ) -> UserKnowledge {
        let prior = self.estimate_prior_knowledge(history, difficulties);
        let current = self.current_knowledge_from(prior, history.answers(), difficulties);
        UserKnowledge { prior, current }
    }

    /// Estimates every user of `log`, spreading users across worker threads.
    #[must_use]
    pub fn estimate_all_users(
        &self,
        log: &AnswerLog,
        difficulties: &RatingTable<PlaceId>,
    ) -> BTreeMap<UserId, UserKnowledge> {
        let histories = log.users().collect::<Vec<_>>();
        if histories.is_empty() {
            return BTreeMap::new();
        }
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = histories.len().div_ceil(workers);

        let knowledge = thread::scope(|s| {
            let handles = histories
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|history| {
                                (history.user(), self.estimate_user(history, difficulties))
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect::<BTreeMap<_, _>>()
        });

        tracing::info!(users = knowledge.len(), "user knowledge estimated");
        knowledge
    }
}
