//! Answer logs grouped per user.
//!
//! The update rule is order dependent, so every estimation pass walks a
//! user's answers in timestamp order. [`AnswerLog`] establishes that order
//! once, tags each answer with its session, and iterates users by ascending
//! id so that every pass over the log is reproducible.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    AnswerEvent, FirstAttemptFilter, FirstAttemptScope, RatingError, SessionSegmenter,
    TaggedAnswer, UserId,
};

/// All answers of one user, ordered by timestamp and tagged with sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserHistory {
    user: UserId,
    answers: Vec<TaggedAnswer>,
}

impl UserHistory {
    /// Builds a history from answers already sorted by timestamp.
    ///
    /// # Errors
    ///
    /// Fails if the answers are out of order or belong to another user.
    pub fn new(
        user: UserId,
        events: Vec<AnswerEvent>,
        segmenter: &SessionSegmenter,
    ) -> Result<Self, RatingError> {
        if let Some((index, event)) = events.iter().enumerate().find(|(_, e)| e.user != user) {
            return Err(RatingError::MixedUsers {
                expected: user,
                found: event.user,
                index,
            });
        }
        let answers = segmenter.tag(events)?;
        Ok(Self { user, answers })
    }

    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    #[must_use]
    pub fn answers(&self) -> &[TaggedAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Iterates over the answers of each session, in session order.
    pub fn sessions(&self) -> impl Iterator<Item = &[TaggedAnswer]> + '_ {
        self.answers.chunk_by(|a, b| a.session == b.session)
    }

    /// Number of sessions with at least one answer in this history.
    ///
    /// For a history narrowed by [`AnswerLog::select`] this can be lower than
    /// the last session id.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions().count()
    }

    #[must_use]
    pub fn first_attempts(&self, scope: FirstAttemptScope) -> Vec<&TaggedAnswer> {
        FirstAttemptFilter::new(scope).apply(&self.answers)
    }
}

/// Answers of many users, grouped per user and iterated by ascending user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnswerLog {
    users: BTreeMap<UserId, UserHistory>,
}

impl AnswerLog {
    /// Groups answers per user, sorting each user's answers by timestamp.
    ///
    /// The sort is stable: answers with equal timestamps keep their input order.
    pub fn from_events<I>(events: I, segmenter: &SessionSegmenter) -> Result<Self, RatingError>
    where
        I: IntoIterator<Item = AnswerEvent>,
    {
        let mut grouped = group_by_user(events);
        for events in grouped.values_mut() {
            events.sort_by_key(|event| event.timestamp);
        }
        Self::from_grouped(grouped, segmenter)
    }

    /// Groups answers per user, requiring each user's answers to be in timestamp order.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::OutOfOrderInput`] for the first user whose answers
    /// are not sorted. Nothing is built in that case.
    pub fn from_ordered_events<I>(
        events: I,
        segmenter: &SessionSegmenter,
    ) -> Result<Self, RatingError>
    where
        I: IntoIterator<Item = AnswerEvent>,
    {
        Self::from_grouped(group_by_user(events), segmenter)
    }

    fn from_grouped(
        grouped: BTreeMap<UserId, Vec<AnswerEvent>>,
        segmenter: &SessionSegmenter,
    ) -> Result<Self, RatingError> {
        let users = grouped
            .into_iter()
            .map(|(user, events)| Ok((user, UserHistory::new(user, events, segmenter)?)))
            .collect::<Result<BTreeMap<_, _>, RatingError>>()?;
        tracing::debug!(users = users.len(), "answer log grouped");
        Ok(Self { users })
    }

    #[must_use]
    pub fn user(&self, user: UserId) -> Option<&UserHistory> {
        self.users.get(&user)
    }

    pub fn users(&self) -> impl ExactSizeIterator<Item = &UserHistory> + '_ {
        self.users.values()
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.users.values().map(UserHistory::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterates over every answer, user by user.
    pub fn answers(&self) -> impl Iterator<Item = &TaggedAnswer> + '_ {
        self.users.values().flat_map(|history| history.answers.iter())
    }

    /// First attempts of every user, user by user.
    #[must_use]
    pub fn first_attempts(&self, scope: FirstAttemptScope) -> Vec<&TaggedAnswer> {
        self.users
            .values()
            .flat_map(|history| history.first_attempts(scope))
            .collect()
    }

    /// Keeps only the answers matching `predicate`.
    ///
    /// Session tags are kept as computed over the full log, so a session of
    /// the selection may be missing answers. Users without remaining answers
    /// are dropped.
    #[must_use]
    pub fn select<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&TaggedAnswer) -> bool,
    {
        let users = self
            .users
            .iter()
            .filter_map(|(user, history)| {
                let answers = history
                    .answers
                    .iter()
                    .filter(|&answer| predicate(answer))
                    .cloned()
                    .collect::<Vec<_>>();
                (!answers.is_empty()).then(|| {
                    let history = UserHistory {
                        user: *user,
                        answers,
                    };
                    (*user, history)
                })
            })
            .collect();
        Self { users }
    }
}

fn group_by_user<I>(events: I) -> BTreeMap<UserId, Vec<AnswerEvent>>
where
    I: IntoIterator<Item = AnswerEvent>,
{
    let mut grouped = BTreeMap::<UserId, Vec<AnswerEvent>>::new();
    for event in events {
        grouped.entry(event.user).or_default().push(event);
    }
    grouped
}
