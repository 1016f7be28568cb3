//! Session state shared by the interactive handlers
//!
//! One `Session` is created at startup and passed to every handler. It owns
//! the draft list, the bulk input buffer, the selected strategy and the last
//! rendered view.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::{AnalysisClient, ApiError, FeedbackClient, FeedbackStatus};
use crate::domain::{DraftForm, DraftStore, ScoredTask, Strategy, TaskBatch, TaskDraft};
use crate::render::TaskView;

/// Errors surfaced to the user from a session action
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid JSON in bulk input: {0}")]
    InvalidBulkJson(#[source] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Identifies one triggering action; stale tickets cannot commit results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic request counter
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: u64,
}

impl RequestGeneration {
    /// Start a new request, superseding any in flight
    pub fn next(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}

/// Parse bulk input; blank input means "use the drafts"
pub fn parse_bulk(text: &str) -> Result<Option<serde_json::Value>, SessionError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some).map_err(SessionError::InvalidBulkJson)
}

/// Parse a feedback delta; anything non-numeric is zero
pub fn parse_delta(text: &str) -> f64 {
    text.trim().parse::<f64>().ok().filter(|d| d.is_finite()).unwrap_or(0.0)
}

/// Interactive session state
#[derive(Debug, Default)]
pub struct Session {
    drafts: DraftStore,
    bulk: String,
    strategy: Strategy,
    generation: RequestGeneration,
    view: Option<TaskView>,
}

impl Session {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        info!(from = %self.strategy, to = %strategy, "Strategy changed");
        self.strategy = strategy;
    }

    pub fn drafts(&self) -> &[TaskDraft] {
        self.drafts.drafts()
    }

    /// Append a draft built from the form
    pub fn add_draft(&mut self, form: &DraftForm) -> &TaskDraft {
        self.drafts.add(form)
    }

    pub fn bulk(&self) -> &str {
        &self.bulk
    }

    /// Replace the bulk input buffer; it is never merged into the drafts
    pub fn set_bulk(&mut self, text: impl Into<String>) {
        self.bulk = text.into();
        debug!(len = self.bulk.len(), "set_bulk: buffer replaced");
    }

    pub fn clear_bulk(&mut self) {
        self.bulk.clear();
    }

    /// Last committed view, if any request has completed
    pub fn view(&self) -> Option<&TaskView> {
        self.view.as_ref()
    }

    /// Payload for analyze: bulk JSON when present, else a copy of the drafts
    ///
    /// Fails before anything is sent when the bulk buffer is not valid JSON.
    pub fn analyze_payload(&self) -> Result<TaskBatch, SessionError> {
        match parse_bulk(&self.bulk)? {
            Some(raw) => Ok(TaskBatch::Raw(raw)),
            None => Ok(TaskBatch::Drafts(self.drafts.drafts().to_vec())),
        }
    }

    /// Take a ticket for a new request
    pub fn begin_request(&mut self) -> Ticket {
        let ticket = self.generation.next();
        debug!(?ticket, "begin_request: issued");
        ticket
    }

    /// Store results for `ticket`, unless a newer request has started
    ///
    /// Returns the new view, or `None` when the results were discarded.
    pub fn commit(&mut self, ticket: Ticket, tasks: Vec<ScoredTask>, today: NaiveDate) -> Option<&TaskView> {
        if !self.generation.is_current(ticket) {
            info!(?ticket, "Discarding superseded response");
            return None;
        }
        debug!(?ticket, count = tasks.len(), "commit: rendering");
        self.view = Some(TaskView::build(tasks, today));
        self.view.as_ref()
    }

    /// Analyze bulk input or drafts and commit the result
    pub async fn analyze(
        &mut self,
        client: &dyn AnalysisClient,
        today: NaiveDate,
    ) -> Result<Option<&TaskView>, SessionError> {
        let payload = self.analyze_payload()?;
        let ticket = self.begin_request();
        let tasks = client.analyze(&payload, &self.strategy).await?;
        Ok(self.commit(ticket, tasks, today))
    }

    /// Request suggestions sampled from the drafts and commit the result
    pub async fn suggest(
        &mut self,
        client: &dyn AnalysisClient,
        today: NaiveDate,
    ) -> Result<Option<&TaskView>, SessionError> {
        let ticket = self.begin_request();
        let tasks = client.suggest(&self.strategy, self.drafts.drafts()).await?;
        Ok(self.commit(ticket, tasks, today))
    }

    /// Send a weight adjustment for the current strategy
    pub async fn feedback(
        &self,
        client: &dyn FeedbackClient,
        component: &str,
        delta: f64,
    ) -> Result<FeedbackStatus, SessionError> {
        Ok(client.submit_feedback(&self.strategy, component, delta).await?)
    }
}
