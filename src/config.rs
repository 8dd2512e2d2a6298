use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::UserId,
    services::{PredictionParams, RecommendationParams, RecommendationStrategy},
};

/// Batch run configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Item catalog file (`id,name,...`)
    #[serde(default = "default_items_path")]
    pub items_path: PathBuf,

    /// Rating file (`user_id,item_id,score,...`)
    #[serde(default = "default_ratings_path")]
    pub ratings_path: PathBuf,

    /// Whether the first row of each file is a header
    #[serde(default = "default_true")]
    pub csv_has_headers: bool,

    /// Maximum number of distinct users to load
    #[serde(default = "default_max_users")]
    pub max_users: usize,

    /// Number of neighbors weighed into a prediction (`k`)
    #[serde(default = "default_neighbor_budget")]
    pub neighbor_budget: usize,

    /// Similarity a neighbor must reach to count toward the early stop
    #[serde(default)]
    pub min_similarity: f64,

    /// Minimum predicted score for an item to be recommended
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Maximum recommendations per user
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    #[serde(default)]
    pub strategy: RecommendationStrategy,

    /// Skip items the user has already rated
    #[serde(default)]
    pub exclude_rated: bool,

    /// Users to score; every loaded user when unset
    #[serde(default)]
    pub target_users: Option<Vec<UserId>>,

    /// Report destination; stdout when unset
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

fn default_items_path() -> PathBuf {
    PathBuf::from("data/movies.csv")
}

fn default_ratings_path() -> PathBuf {
    PathBuf::from("data/ratings.csv")
}

fn default_true() -> bool {
    true
}

fn default_max_users() -> usize {
    10_000
}

fn default_neighbor_budget() -> usize {
    3
}

fn default_min_score() -> f64 {
    3.5
}

fn default_max_recommendations() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects thresholds the engine cannot compare against
    pub fn validate(&self) -> AppResult<()> {
        if !self.min_similarity.is_finite() {
            return Err(AppError::Config(format!(
                "MIN_SIMILARITY must be finite, got {}",
                self.min_similarity
            )));
        }
        if !self.min_score.is_finite() {
            return Err(AppError::Config(format!(
                "MIN_SCORE must be finite, got {}",
                self.min_score
            )));
        }
        Ok(())
    }

    pub fn prediction_params(&self) -> PredictionParams {
        PredictionParams {
            neighbor_budget: self.neighbor_budget,
            min_similarity: self.min_similarity,
        }
    }

    pub fn recommendation_params(&self) -> RecommendationParams {
        RecommendationParams {
            prediction: self.prediction_params(),
            min_score: self.min_score,
            max_recommendations: self.max_recommendations,
            strategy: self.strategy,
            exclude_rated: self.exclude_rated,
        }
    }
}
