//! Interactive REPL
//!
//! Stands in for the browser form: slash commands add drafts, paste bulk
//! JSON, pick a strategy and trigger analyze, suggest and feedback.

mod session;

pub use session::{ReplSession, write_graph_view};

use std::sync::Arc;

use eyre::Result;

use crate::api::TaskApiClient;
use crate::config::Config;

/// Run the interactive REPL
///
/// This is the main entry point for `ta repl`.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let client = Arc::new(
        TaskApiClient::from_config(&config.api).map_err(|e| eyre::eyre!("Failed to create API client: {}", e))?,
    );

    let mut session = ReplSession::new(client.clone(), client, config);
    session.run().await
}
