use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod item;
pub mod recommendation;
pub mod run;
pub mod user;

pub use item::{Catalog, Item};
pub use recommendation::{BatchReport, Recommendation, UserRecommendations};
pub use run::RunId;
pub use user::User;

/// Identifier of a rateable item (e.g. a MovieLens `movieId`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

/// Identifier of a rating user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
