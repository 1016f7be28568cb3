//! HTTP implementation of the task service clients

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    AnalysisClient, AnalyzeRequest, AnalyzeResponse, ApiError, FeedbackClient, FeedbackRequest, FeedbackResponse,
    FeedbackStatus, SuggestResponse,
};
use crate::config::ApiConfig;
use crate::domain::{ScoredTask, Strategy, TaskBatch, TaskDraft};

const ANALYZE_PATH: &str = "/api/tasks/analyze/";
const SUGGEST_PATH: &str = "/api/tasks/suggest/";
const FEEDBACK_PATH: &str = "/api/tasks/feedback/";

/// Client for the `/api/tasks/` endpoints
///
/// No retries. The request timeout is only set when configured.
pub struct TaskApiClient {
    base_url: String,
    http: Client,
}

impl TaskApiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        debug!(?config, "from_config: called");
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            debug!(timeout_ms, "from_config: applying request timeout");
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(ApiError::Network)?;

        Ok(Self::with_client(&config.base_url, http))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fail on non-success status, otherwise decode the JSON body
    async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            debug!(%status, "decode_success: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl AnalysisClient for TaskApiClient {
    async fn analyze(&self, tasks: &TaskBatch, strategy: &Strategy) -> Result<Vec<ScoredTask>, ApiError> {
        debug!(%strategy, count = ?tasks.len_hint(), "analyze: called");
        let body = AnalyzeRequest { tasks, strategy };

        let response = self.http.post(self.url(ANALYZE_PATH)).json(&body).send().await?;
        let decoded: AnalyzeResponse = Self::decode_success(response).await?;
        let tasks = decoded.into_tasks();

        debug!(count = tasks.len(), "analyze: success");
        Ok(tasks)
    }

    async fn suggest(&self, strategy: &Strategy, sample: &[TaskDraft]) -> Result<Vec<ScoredTask>, ApiError> {
        debug!(%strategy, sample_len = sample.len(), "suggest: called");
        // The whole draft list rides in the query string, untruncated
        let sample_json = serde_json::to_string(sample)?;

        let response = self
            .http
            .get(self.url(SUGGEST_PATH))
            .query(&[("strategy", strategy.as_str()), ("sample", sample_json.as_str())])
            .send()
            .await?;
        let decoded: SuggestResponse = Self::decode_success(response).await?;

        debug!(count = decoded.suggestions.len(), "suggest: success");
        Ok(decoded.suggestions)
    }
}

#[async_trait]
impl FeedbackClient for TaskApiClient {
    async fn submit_feedback(
        &self,
        strategy: &Strategy,
        component: &str,
        delta: f64,
    ) -> Result<FeedbackStatus, ApiError> {
        debug!(%strategy, %component, delta, "submit_feedback: called");
        let body = FeedbackRequest::single(strategy, component, delta);

        let response = self.http.post(self.url(FEEDBACK_PATH)).json(&body).send().await?;

        // The body's status field decides acceptance, not the HTTP status
        let text = response.text().await?;
        let decoded: FeedbackResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse feedback response: {}", e)))?;
        let status = FeedbackStatus::from(decoded);

        debug!(accepted = status.is_accepted(), "submit_feedback: complete");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TaskApiClient::with_client("http://localhost:8000/", Client::new());
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url(ANALYZE_PATH), "http://localhost:8000/api/tasks/analyze/");
    }

    #[test]
    fn test_from_config_without_timeout() {
        let config = ApiConfig::default();
        let client = TaskApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), config.base_url);
    }
}
