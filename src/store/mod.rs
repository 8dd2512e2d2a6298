use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{Catalog, User, UserId},
};

pub mod csv_source;

pub use csv_source::CsvRatingSource;

/// Source of the item catalog and rating population
///
/// Implementations skip malformed records rather than failing, and fail only
/// when the underlying data cannot be reached at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingSource: Send + Sync {
    /// Load every rateable item
    async fn load_items(&self) -> AppResult<Catalog>;

    /// Load users and their ratings, in source order
    ///
    /// `catalog` is the result of [`RatingSource::load_items`].
    async fn load_ratings(&self, catalog: &Catalog) -> AppResult<Vec<User>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Immutable snapshot of everything a batch run predicts from
///
/// Users keep load order, which is the order neighbor scanning follows.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    catalog: Catalog,
    users: Vec<User>,
    index: HashMap<UserId, usize>,
}

impl RatingStore {
    pub fn new(catalog: Catalog, users: Vec<User>) -> Self {
        let mut index = HashMap::with_capacity(users.len());
        for (position, user) in users.iter().enumerate() {
            index.entry(user.id).or_insert(position);
        }

        Self {
            catalog,
            users,
            index,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.index.get(&id).map(|&position| &self.users[position])
    }

    pub fn rating_count(&self) -> usize {
        self.users.iter().map(|u| u.ratings.len()).sum()
    }
}

/// Loads a [`RatingStore`] from any source
///
/// Ratings for items missing from the catalog are dropped here, so every
/// store satisfies the catalog invariant whatever the source.
pub async fn load_store(source: &dyn RatingSource) -> AppResult<RatingStore> {
    tracing::info!(source = source.name(), "Loading rating data");

    let catalog = source.load_items().await?;
    let mut users = source.load_ratings(&catalog).await?;

    let mut dropped = 0usize;
    for user in &mut users {
        let before = user.ratings.len();
        user.ratings.retain(|item, _| catalog.contains_key(item));
        dropped += before - user.ratings.len();
    }

    if dropped > 0 {
        tracing::warn!(dropped, "Dropped ratings for items outside the catalog");
    }

    let store = RatingStore::new(catalog, users);

    tracing::info!(
        items = store.catalog().len(),
        users = store.users().len(),
        ratings = store.rating_count(),
        "Rating data loaded"
    );

    Ok(store)
}
