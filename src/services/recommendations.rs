use serde::{Deserialize, Serialize};

use crate::models::{Catalog, Recommendation, User};

use super::predictor::{predict, PredictionParams};

/// How candidate items are chosen for a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStrategy {
    /// Walk the catalog in order and stop at the first `max_recommendations` hits
    #[default]
    FirstMatch,
    /// Score the whole catalog and keep the best `max_recommendations`
    TopScored,
}

/// Tuning for a recommendation pass over the catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationParams {
    pub prediction: PredictionParams,
    /// Minimum predicted score for an item to be recommended
    pub min_score: f64,
    pub max_recommendations: usize,
    pub strategy: RecommendationStrategy,
    /// Skip items the user has already rated
    pub exclude_rated: bool,
}

impl Default for RecommendationParams {
    fn default() -> Self {
        Self {
            prediction: PredictionParams::default(),
            min_score: 3.5,
            max_recommendations: 10,
            strategy: RecommendationStrategy::default(),
            exclude_rated: false,
        }
    }
}

/// Generates recommendations for one user
///
/// Every candidate item is scored with [`predict`] and kept when its score is at
/// least `min_score`. With [`RecommendationStrategy::FirstMatch`] the catalog is
/// walked in id order and the walk stops after `max_recommendations` hits, so
/// the result is in catalog order and is not a ranking. With
/// [`RecommendationStrategy::TopScored`] the whole catalog is scored and the
/// result is ordered by score, descending, ties in catalog order.
pub fn recommend(
    user: &User,
    catalog: &Catalog,
    population: &[User],
    params: &RecommendationParams,
) -> Vec<Recommendation> {
    if params.max_recommendations == 0 {
        return Vec::new();
    }

    let candidates = catalog
        .values()
        .filter(|item| !(params.exclude_rated && user.has_rated(item.id)))
        .map(|item| Recommendation {
            item: item.clone(),
            score: predict(user, item.id, population, &params.prediction),
        })
        .filter(|rec| rec.score >= params.min_score);

    let recommendations: Vec<Recommendation> = match params.strategy {
        RecommendationStrategy::FirstMatch => {
            candidates.take(params.max_recommendations).collect()
        }
        RecommendationStrategy::TopScored => {
            let mut scored: Vec<Recommendation> = candidates.collect();
            scored.sort_by(|a, b| b.score.total_cmp(&a.score));
            scored.truncate(params.max_recommendations);
            scored
        }
    };

    tracing::debug!(
        user = %user.id,
        strategy = ?params.strategy,
        count = recommendations.len(),
        "Recommendations generated"
    );

    recommendations
}
