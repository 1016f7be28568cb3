//! TaskAnalyzer - terminal client for a task prioritization service
//!
//! Tasks are collected locally, sent to a remote scoring service, and the
//! scored list comes back as three views: a tiered list, an Eisenhower
//! matrix and a dependency graph.
//!
//! # Modules
//!
//! - [`domain`] - Drafts, scored tasks and strategies
//! - [`api`] - Client traits and the HTTP implementation
//! - [`render`] - Tiering, quadrant bucketing and graph construction
//! - [`session`] - State shared by the interactive handlers
//! - [`repl`] - Interactive slash-command front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod render;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use api::{AnalysisClient, ApiError, FeedbackClient, FeedbackStatus, TaskApiClient};
pub use config::{ApiConfig, Config, GraphConfig};
pub use domain::{DraftForm, ScoredTask, Strategy, TaskBatch, TaskDraft};
pub use render::{DependencyGraph, EisenhowerMatrix, GraphView, Quadrant, ScoreTier, TaskView, build_graph, bucket};
pub use session::{Session, SessionError};
