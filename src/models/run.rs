use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier attached to every log line and report of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Creates a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creates the span every batch-run log line is recorded under
pub fn batch_span(run_id: &RunId) -> tracing::Span {
    tracing::info_span!("batch_run", run_id = %run_id)
}
