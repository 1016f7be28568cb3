//! Scored tasks returned by the analysis service

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TaskDraft;
use super::lenient;

/// A task as scored by the remote service
///
/// Every field is optional on the wire: suggestions carry only id, title,
/// score and reason, and bulk input is echoed back as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub due_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub estimated_hours: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub importance: Option<f64>,

    #[serde(default, deserialize_with = "lenient::ids")]
    pub dependencies: Vec<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub score: Option<f64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: Option<String>,
}

impl ScoredTask {
    /// Title, or an empty string when the service sent none
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Graph key: the id when present and non-empty, otherwise the title
    pub fn node_key(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => self.title(),
        }
    }

    /// Importance with missing values treated as zero
    pub fn importance_or_zero(&self) -> f64 {
        self.importance.unwrap_or(0.0)
    }
}

impl From<&TaskDraft> for ScoredTask {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            id: Some(draft.id.clone()),
            title: Some(draft.title.clone()),
            due_date: draft.due_date.clone(),
            estimated_hours: Some(draft.estimated_hours),
            importance: Some(draft.importance as f64),
            dependencies: draft.dependencies.clone(),
            score: None,
            reason: None,
        }
    }
}

/// Task payload sent to the analyze endpoint
///
/// Either the session's drafts or arbitrary bulk JSON, which is forwarded
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskBatch {
    Drafts(Vec<TaskDraft>),
    Raw(Value),
}

impl TaskBatch {
    /// Number of top-level task entries, when that is knowable
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            Self::Drafts(drafts) => Some(drafts.len()),
            Self::Raw(Value::Array(items)) => Some(items.len()),
            Self::Raw(_) => None,
        }
    }
}
