use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::Instrument;

use crate::{
    error::{AppError, AppResult},
    models::{run::batch_span, BatchReport, RunId, UserId, UserRecommendations},
    store::RatingStore,
};

use super::recommendations::{recommend, RecommendationParams};

/// Generates recommendations for many users in parallel
///
/// Each target user is scored on the blocking thread pool; the store is shared
/// read-only between jobs. An empty `targets` slice means every user in the
/// store, in load order. Results keep target order.
///
/// Unknown users and failed jobs are logged and reported in
/// `BatchReport::failed_users`; the batch fails only when every target fails.
pub async fn run_batch(
    store: Arc<RatingStore>,
    targets: &[UserId],
    params: RecommendationParams,
) -> AppResult<BatchReport> {
    let run_id = RunId::new();
    let span = batch_span(&run_id);

    async move {
        let start = Instant::now();

        let targets: Vec<UserId> = if targets.is_empty() {
            store.users().iter().map(|u| u.id).collect()
        } else {
            targets.to_vec()
        };

        tracing::info!(
            targets = targets.len(),
            items = store.catalog().len(),
            population = store.users().len(),
            "Starting batch run"
        );

        let mut tasks = Vec::with_capacity(targets.len());

        for user_id in &targets {
            let store = store.clone();
            let user_id = *user_id;
            let task = tokio::task::spawn_blocking(move || recommend_for(&store, user_id, &params));
            tasks.push((user_id, task));
        }

        let mut users = Vec::with_capacity(tasks.len());
        let mut failed_users = Vec::new();

        for (user_id, task) in tasks {
            match task.await {
                Ok(Ok(recommendations)) => users.push(recommendations),
                Ok(Err(e)) => {
                    tracing::error!(user = %user_id, error = %e, "Recommendation failed for user");
                    failed_users.push(user_id);
                }
                Err(e) => {
                    tracing::error!(user = %user_id, error = %e, "Task join error");
                    failed_users.push(user_id);
                }
            }
        }

        if !failed_users.is_empty() {
            tracing::warn!(
                success_count = users.len(),
                error_count = failed_users.len(),
                "Partial batch failure"
            );
        }

        if users.is_empty() && !failed_users.is_empty() {
            return Err(AppError::Internal(
                "Failed to generate recommendations for any user".to_string(),
            ));
        }

        tracing::info!(
            users = users.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Batch run completed"
        );

        Ok(BatchReport {
            run_id,
            generated_at: Utc::now(),
            users,
            failed_users,
        })
    }
    .instrument(span)
    .await
}

/// Recommendations for a single user of the store
pub fn recommend_for(
    store: &RatingStore,
    user_id: UserId,
    params: &RecommendationParams,
) -> AppResult<UserRecommendations> {
    let user = store
        .user(user_id)
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

    Ok(UserRecommendations {
        user_id,
        recommendations: recommend(user, store.catalog(), store.users(), params),
    })
}
