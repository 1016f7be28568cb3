//! Task service client module
//!
//! Wraps the three service endpoints: analyze, suggest and feedback.

pub mod client;
mod error;
mod http;
mod types;

pub use client::{AnalysisClient, FeedbackClient};
pub use error::ApiError;
pub use http::TaskApiClient;
pub use types::{AnalyzeRequest, AnalyzeResponse, FeedbackRequest, FeedbackResponse, FeedbackStatus, SuggestResponse};
