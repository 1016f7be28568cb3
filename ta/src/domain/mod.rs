//! Domain types for tasks, drafts and strategies

mod draft;
mod lenient;
mod strategy;
mod task;

pub use draft::{DraftForm, DraftStore, TaskDraft, draft_id};
pub use strategy::{KNOWN_STRATEGIES, Strategy};
pub use task::{ScoredTask, TaskBatch};
