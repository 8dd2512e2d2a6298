use serde::{Deserialize, Serialize};

use crate::models::{ItemId, User};

use super::neighbors::select_neighbors;

/// Score returned when no neighbors are requested
pub const NO_NEIGHBORS_SCORE: f64 = 0.01;

/// Tuning for a single prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionParams {
    /// Maximum neighbors weighed into a prediction (`k`)
    pub neighbor_budget: usize,
    /// Similarity a candidate must reach to count toward the early stop
    pub min_similarity: f64,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            neighbor_budget: 3,
            min_similarity: 0.0,
        }
    }
}

/// Predicts the score `user` would give `item`
///
/// Checks run in order and the first match decides:
///
/// 1. `neighbor_budget == 0`: [`NO_NEIGHBORS_SCORE`]
/// 2. `user` already rated `item`: that rating
/// 3. `user` has no ratings: average rating of `item` across the rest of the population (0 if unrated)
/// 4. empty population, or no other user rated `item`: the user's own average
/// 5. otherwise the similarity-weighted average of the selected neighbors' ratings,
///    falling back to the user's own average if the similarities sum to zero
///
/// Never fails and never returns a non-finite value for well-formed input.
pub fn predict(user: &User, item: ItemId, population: &[User], params: &PredictionParams) -> f64 {
    if params.neighbor_budget == 0 {
        return NO_NEIGHBORS_SCORE;
    }

    if let Some(score) = user.rating_for(item) {
        return score;
    }

    let Some(own_average) = user.average_rating() else {
        tracing::trace!(user = %user.id, item = %item, "No ratings, using item average");
        return item_average(item, population, user);
    };

    if population.is_empty() {
        return own_average;
    }

    let neighbors = select_neighbors(
        user,
        item,
        population,
        params.neighbor_budget,
        params.min_similarity,
    );

    if neighbors.is_empty() {
        tracing::trace!(user = %user.id, item = %item, "No neighbors, using user average");
        return own_average;
    }

    let mut similarity_sum = 0.0;
    let mut rating_sum = 0.0;

    for neighbor in &neighbors {
        let Some(rating) = neighbor.user.rating_for(item) else {
            continue;
        };
        similarity_sum += neighbor.similarity;
        rating_sum += rating * neighbor.similarity;
    }

    if similarity_sum == 0.0 {
        return own_average;
    }

    let prediction = rating_sum / similarity_sum;
    if !prediction.is_finite() {
        tracing::warn!(user = %user.id, item = %item, "Non-finite prediction, using user average");
        return own_average;
    }

    prediction
}

/// Average rating of `item` over every user in `population` except `excluding`
///
/// Returns 0 when nobody else has rated it.
pub fn item_average(item: ItemId, population: &[User], excluding: &User) -> f64 {
    let (sum, count) = population
        .iter()
        .filter(|other| other.id != excluding.id)
        .filter_map(|other| other.rating_for(item))
        .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
