//! User-based collaborative filtering
//!
//! Everything here except [`batch`] is a pure, synchronous function of
//! immutable inputs, so predictions for different (user, item) pairs can run
//! on any number of threads without coordination.

pub mod batch;
pub mod neighbors;
pub mod predictor;
pub mod recommendations;
pub mod similarity;

pub use batch::run_batch;
pub use neighbors::{select_neighbors, ScoredNeighbor};
pub use predictor::{predict, PredictionParams};
pub use recommendations::{recommend, RecommendationParams, RecommendationStrategy};
pub use similarity::similarity;
