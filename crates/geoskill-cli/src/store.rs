//! Difficulty store written by `geoskill difficulties` and read by the other
//! subcommands.
//!
//! ```json
//! {
//!   "created_at": "2014-06-01T12:00:00Z",
//!   "config": { "session_gap_secs": 1800, ... },
//!   "places": { "51": { "value": -0.8, "observation_count": 412 } },
//!   "users": { "7": { "value": 1.2, "observation_count": 35 } }
//! }
//! ```
//!
//! Only `places` and `users` are required.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use geoskill_rating::{EstimatorConfig, GlobalRatings, PlaceId, RatingTable, UserId};
use serde::{Deserialize, Serialize};

use crate::util::{Output, read_json_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DifficultyStore {
    /// When the global pass ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Configuration of the global pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EstimatorConfig>,
    pub places: RatingTable<PlaceId>,
    pub users: RatingTable<UserId>,
}

impl DifficultyStore {
    #[must_use]
    pub fn new(ratings: GlobalRatings, config: &EstimatorConfig) -> Self {
        let GlobalRatings { places, users } = ratings;
        Self {
            created_at: Some(Utc::now()),
            config: Some(config.clone()),
            places,
            users,
        }
    }

    pub fn load<P>(path: P, config: &EstimatorConfig) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let store: Self = read_json_file("difficulty store", path)?;
        if !store.computed_with(config) {
            tracing::warn!(
                path = %path.display(),
                "difficulty store was computed with a different configuration"
            );
        }
        tracing::info!(
            places = store.places.len(),
            users = store.users.len(),
            path = %path.display(),
            "difficulty store loaded"
        );
        Ok(store)
    }

    /// Whether the stored difficulties were computed the way `config` would
    /// compute them. Settings the global pass never reads are not compared.
    /// A store without a recorded configuration is trusted.
    fn computed_with(&self, config: &EstimatorConfig) -> bool {
        self.config.as_ref().is_none_or(|stored| {
            stored.session_gap_secs == config.session_gap_secs
                && stored.difficulty_scope == config.difficulty_scope
                && stored.global_order == config.global_order
                && stored.rating_bound == config.rating_bound
        })
    }

    pub fn save(&self, output: Option<PathBuf>) -> anyhow::Result<()> {
        Output::save_json(self, output)
    }
}
