use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ItemId, UserId};

/// A user together with their sparse rating vector
///
/// A missing key means "not rated", never "rated zero". Ratings iterate in item
/// id order, so every sum over them is reproducible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub ratings: BTreeMap<ItemId, f64>,
}

impl User {
    /// Creates a user with no ratings
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ratings: BTreeMap::new(),
        }
    }

    /// Creates a user from `(item, score)` pairs; a repeated item keeps the last score
    pub fn with_ratings(id: UserId, ratings: impl IntoIterator<Item = (ItemId, f64)>) -> Self {
        Self {
            id,
            ratings: ratings.into_iter().collect(),
        }
    }

    /// Records a score, replacing any earlier score for the same item
    pub fn rate(&mut self, item: ItemId, score: f64) {
        self.ratings.insert(item, score);
    }

    pub fn rating_for(&self, item: ItemId) -> Option<f64> {
        self.ratings.get(&item).copied()
    }

    pub fn has_rated(&self, item: ItemId) -> bool {
        self.ratings.contains_key(&item)
    }

    pub fn has_ratings(&self) -> bool {
        !self.ratings.is_empty()
    }

    /// Mean of all of this user's scores, `None` when they have rated nothing
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: f64 = self.ratings.values().sum();
        Some(sum / self.ratings.len() as f64)
    }
}
