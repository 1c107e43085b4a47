use geoskill_rating::AnswerEvent;
use serde::{Deserialize, Serialize};

/// Selects answers by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correctness {
    #[default]
    Any,
    Correct,
    Incorrect,
}

impl Correctness {
    #[must_use]
    pub fn matches(self, event: &AnswerEvent) -> bool {
        match self {
            Self::Any => true,
            Self::Correct => event.is_correct(),
            Self::Incorrect => !event.is_correct(),
        }
    }
}

/// Whether `event` is fast enough to be used for response-time statistics.
#[must_use]
pub fn within_time_limit(event: &AnswerEvent, limit_ms: u64) -> bool {
    event.response_time_ms < limit_ms
}
