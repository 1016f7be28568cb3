//! Client traits for the task service

use async_trait::async_trait;

use super::{ApiError, FeedbackStatus};
use crate::domain::{ScoredTask, Strategy, TaskBatch, TaskDraft};

/// Scoring calls: analyze a batch, or sample suggestions from drafts
///
/// Each call is a single request. Failures are terminal; nothing is retried.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Score a batch of tasks with the given strategy
    async fn analyze(&self, tasks: &TaskBatch, strategy: &Strategy) -> Result<Vec<ScoredTask>, ApiError>;

    /// Ask the service which of the sampled drafts to tackle first
    async fn suggest(&self, strategy: &Strategy, sample: &[TaskDraft]) -> Result<Vec<ScoredTask>, ApiError>;
}

/// Weight adjustment call
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    /// Nudge one weight component of a strategy by `delta`
    async fn submit_feedback(&self, strategy: &Strategy, component: &str, delta: f64)
    -> Result<FeedbackStatus, ApiError>;
}
