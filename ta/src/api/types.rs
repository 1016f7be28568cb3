//! Wire types for the task service endpoints

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ScoredTask, Strategy, TaskBatch};

/// Body of `POST /api/tasks/analyze/`
#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub tasks: &'a TaskBatch,
    pub strategy: &'a Strategy,
}

/// Analyze responses come wrapped in `{tasks}` or as a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Wrapped { tasks: Vec<ScoredTask> },
    Bare(Vec<ScoredTask>),
}

impl AnalyzeResponse {
    pub fn into_tasks(self) -> Vec<ScoredTask> {
        match self {
            Self::Wrapped { tasks } => tasks,
            Self::Bare(tasks) => tasks,
        }
    }
}

/// Body of `GET /api/tasks/suggest/`
#[derive(Debug, Default, Deserialize)]
pub struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<ScoredTask>,
}

/// Body of `POST /api/tasks/feedback/`: `{adjustments: {strategy: {component: delta}}}`
#[derive(Debug, Serialize)]
pub struct FeedbackRequest {
    pub adjustments: BTreeMap<String, BTreeMap<String, f64>>,
}

impl FeedbackRequest {
    /// Single adjustment for one component of one strategy
    pub fn single(strategy: &Strategy, component: &str, delta: f64) -> Self {
        let mut changes = BTreeMap::new();
        changes.insert(component.to_string(), delta);

        let mut adjustments = BTreeMap::new();
        adjustments.insert(strategy.as_str().to_string(), changes);

        Self { adjustments }
    }
}

/// Feedback reply as sent by the service
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackResponse {
    /// Any JSON value; only the string "ok" counts as acceptance
    #[serde(default)]
    pub status: Option<Value>,

    /// Updated weight table, when the service includes one
    #[serde(default)]
    pub weights: Option<Value>,
}

/// Outcome of a feedback submission
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackStatus {
    /// Service answered `status: "ok"`
    Accepted { weights: Option<Value> },
    /// Service answered with any other status, or none
    Rejected { status: Option<String> },
}

impl FeedbackStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl From<FeedbackResponse> for FeedbackStatus {
    fn from(response: FeedbackResponse) -> Self {
        match response.status {
            Some(Value::String(status)) if status == "ok" => Self::Accepted {
                weights: response.weights,
            },
            Some(Value::String(status)) => Self::Rejected { status: Some(status) },
            Some(Value::Null) | None => Self::Rejected { status: None },
            Some(other) => Self::Rejected {
                status: Some(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_response_wrapped() {
        let response: AnalyzeResponse = serde_json::from_str(r#"{"tasks": [{"id": "a", "score": 50}]}"#).unwrap();
        let tasks = response.into_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_analyze_response_bare() {
        let response: AnalyzeResponse = serde_json::from_str(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(response.into_tasks().len(), 2);
    }

    #[test]
    fn test_analyze_response_rejects_error_object() {
        let result = serde_json::from_str::<AnalyzeResponse>(r#"{"error": "boom"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_suggest_response_missing_suggestions() {
        let response: SuggestResponse = serde_json::from_str("{}").unwrap();
        assert!(response.suggestions.is_empty());
    }

    #[test]
    fn test_feedback_request_shape() {
        let request = FeedbackRequest::single(&Strategy::new("smart_balance"), "urgency", 0.05);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"adjustments": {"smart_balance": {"urgency": 0.05}}}));
    }

    #[test]
    fn test_feedback_status_from_response() {
        let ok: FeedbackResponse = serde_json::from_str(r#"{"status": "ok", "weights": {"a": 1}}"#).unwrap();
        let status = FeedbackStatus::from(ok);
        assert!(status.is_accepted());
        assert_eq!(
            status,
            FeedbackStatus::Accepted {
                weights: Some(serde_json::json!({"a": 1}))
            }
        );

        let other: FeedbackResponse = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
        assert_eq!(
            FeedbackStatus::from(other),
            FeedbackStatus::Rejected {
                status: Some("queued".to_string())
            }
        );

        let error: FeedbackResponse = serde_json::from_str(r#"{"error": "invalid payload"}"#).unwrap();
        assert_eq!(FeedbackStatus::from(error), FeedbackStatus::Rejected { status: None });
    }

    #[test]
    fn test_feedback_non_string_status_is_rejected() {
        let numeric: FeedbackResponse = serde_json::from_str(r#"{"status": 1}"#).unwrap();
        assert_eq!(
            FeedbackStatus::from(numeric),
            FeedbackStatus::Rejected {
                status: Some("1".to_string())
            }
        );

        let truthy: FeedbackResponse = serde_json::from_str(r#"{"status": true, "weights": {"a": 1}}"#).unwrap();
        assert!(!FeedbackStatus::from(truthy).is_accepted());

        let null: FeedbackResponse = serde_json::from_str(r#"{"status": null}"#).unwrap();
        assert_eq!(FeedbackStatus::from(null), FeedbackStatus::Rejected { status: None });
    }
}
