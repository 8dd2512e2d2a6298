use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

use super::{Item, RunId, UserId};

/// An item together with the score predicted for one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub item: Item,
    pub score: f64,
}

/// Recommendations produced for a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecommendations {
    pub user_id: UserId,
    pub recommendations: Vec<Recommendation>,
}

/// Output of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    /// Per-user results, in target order
    pub users: Vec<UserRecommendations>,
    /// Targets that could not be scored
    pub failed_users: Vec<UserId>,
}

impl BatchReport {
    pub fn to_json_pretty(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report as pretty JSON to `path`
    pub async fn write_json(&self, path: &Path) -> AppResult<()> {
        tokio::fs::write(path, self.to_json_pretty()?).await?;
        Ok(())
    }
}
