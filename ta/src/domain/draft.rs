//! Locally entered task drafts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hours used when the form value is missing, zero or not a number
const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;

/// Importance used when the form value is missing, zero or not a number
const DEFAULT_IMPORTANCE: i64 = 5;

/// Raw form field values as typed by the user
#[derive(Debug, Clone, Default)]
pub struct DraftForm {
    pub title: String,
    pub due_date: String,
    pub estimated_hours: String,
    pub importance: String,
    /// Comma-separated dependency ids
    pub dependencies: String,
}

/// An unscored task entered in this session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub id: String,
    pub title: String,
    pub due_date: Option<String>,
    pub estimated_hours: f64,
    pub importance: i64,
    pub dependencies: Vec<String>,
}

impl TaskDraft {
    /// Build a draft from form values, substituting defaults
    ///
    /// Nothing is validated beyond that: importance is not clamped and the
    /// due date is passed through as typed.
    pub fn from_form(id: String, form: &DraftForm) -> Self {
        debug!(%id, title = %form.title, "from_form: called");
        let due_date = match form.due_date.trim() {
            "" => None,
            due => Some(due.to_string()),
        };

        let estimated_hours = form
            .estimated_hours
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|h| h.is_finite() && *h != 0.0)
            .unwrap_or(DEFAULT_ESTIMATED_HOURS);

        let importance = form
            .importance
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|i| i.is_finite())
            .map(|i| i.trunc() as i64)
            .filter(|i| *i != 0)
            .unwrap_or(DEFAULT_IMPORTANCE);

        let dependencies = form
            .dependencies
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            id,
            title: form.title.clone(),
            due_date,
            estimated_hours,
            importance,
            dependencies,
        }
    }
}

/// Draft id: the timestamp in milliseconds, rendered in base 36
///
/// Two drafts created in the same millisecond share an id.
pub fn draft_id(now: DateTime<Utc>) -> String {
    let mut millis = now.timestamp_millis().max(0) as u64;
    if millis == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while millis > 0 {
        let digit = (millis % 36) as u32;
        digits.push(std::char::from_digit(digit, 36).unwrap_or('0'));
        millis /= 36;
    }
    digits.iter().rev().collect()
}

/// Ordered, append-only list of drafts for the current session
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: Vec<TaskDraft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a draft from the form and append it
    pub fn add(&mut self, form: &DraftForm) -> &TaskDraft {
        self.add_at(form, Utc::now())
    }

    /// Same as [`DraftStore::add`] with an explicit clock, for tests
    pub fn add_at(&mut self, form: &DraftForm, now: DateTime<Utc>) -> &TaskDraft {
        let draft = TaskDraft::from_form(draft_id(now), form);
        debug!(id = %draft.id, count = self.drafts.len() + 1, "add_at: appending draft");
        self.drafts.push(draft);
        &self.drafts[self.drafts.len() - 1]
    }

    pub fn drafts(&self) -> &[TaskDraft] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
