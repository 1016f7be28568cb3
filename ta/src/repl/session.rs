//! REPL session management

use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info, warn};

use crate::api::{AnalysisClient, FeedbackClient, FeedbackStatus};
use crate::config::{Config, GraphConfig};
use crate::domain::{DraftForm, KNOWN_STRATEGIES, Strategy};
use crate::render::{GraphView, render_graph, render_matrix, render_results};
use crate::session::{Session, parse_bulk, parse_delta};

/// Interactive REPL session
pub struct ReplSession {
    session: Session,
    analysis: Arc<dyn AnalysisClient>,
    feedback: Arc<dyn FeedbackClient>,
    graph: GraphConfig,
    base_url: String,
}

/// Which request a REPL command triggers
#[derive(Debug, Clone, Copy)]
enum RequestKind {
    Analyze,
    Suggest,
}

enum SlashResult {
    Continue,
    Quit,
}

/// Await `fut` unless Ctrl+C arrives first
async fn cancellable<F: Future>(fut: F) -> Option<F::Output> {
    tokio::select! {
        output = fut => Some(output),
        _ = tokio::signal::ctrl_c() => None,
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

impl ReplSession {
    /// Create a new REPL session
    pub fn new(analysis: Arc<dyn AnalysisClient>, feedback: Arc<dyn FeedbackClient>, config: &Config) -> Self {
        Self {
            session: Session::new(config.strategy.clone()),
            analysis,
            feedback,
            graph: config.graph.clone(),
            base_url: config.api.base_url.clone(),
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input, &mut rl).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        println!("{} Commands start with '/'", "?".yellow());
                        println!("Type {} for available commands", "/help".yellow());
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Task Analyzer".bright_cyan().bold());
        println!("Service: {}", self.base_url);
        println!("Strategy: {}", self.session.strategy());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    ///
    /// Command failures are printed here; only `/quit` ends the loop.
    async fn handle_slash_command(&mut self, input: &str, rl: &mut DefaultEditor) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let args = parts.get(1..).unwrap_or_default();
        debug!(%cmd, ?args, "handle_slash_command: called");

        let outcome = match cmd {
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/help" | "/h" => {
                self.print_help();
                Ok(())
            }
            "/add" | "/a" => self.add_draft(rl),
            "/drafts" | "/list" => {
                self.print_drafts();
                Ok(())
            }
            "/bulk" | "/b" => self.handle_bulk(args, rl),
            "/strategy" | "/s" => {
                self.handle_strategy(args);
                Ok(())
            }
            "/analyze" => {
                self.run_request(RequestKind::Analyze).await;
                Ok(())
            }
            "/suggest" => {
                self.run_request(RequestKind::Suggest).await;
                Ok(())
            }
            "/feedback" | "/fb" => {
                self.send_feedback(args).await;
                Ok(())
            }
            "/results" => self.print_view(|v| render_results(&v.tasks)),
            "/matrix" => self.print_view(|v| render_matrix(&v.matrix)),
            "/graph" => match args.first().copied() {
                Some("export") => self.export_graph(&args[1..]),
                _ => self.print_view(|v| render_graph(&v.graph)),
            },
            "/export" => self.export_graph(args),
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                Ok(())
            }
        };

        if let Err(e) = outcome {
            warn!(%cmd, error = %e, "Command failed");
            println!("{} {:#}", "Error:".red(), e);
        }
        SlashResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Tasks:".bright_cyan());
        println!("  {:22} Add a task draft (prompts for each field)", "/add".yellow());
        println!("  {:22} List task drafts", "/drafts".yellow());
        println!("  {:22} Paste bulk JSON, ended by an empty line", "/bulk".yellow());
        println!("  {:22} Load bulk JSON from a file", "/bulk load <path>".yellow());
        println!("  {:22} Show or clear the bulk input", "/bulk show|clear".yellow());
        println!();
        println!("{}", "Service:".bright_cyan());
        println!("  {:22} Show or set the scoring strategy", "/strategy [name]".yellow());
        println!("  {:22} Score bulk input, or the drafts if none", "/analyze".yellow());
        println!("  {:22} Ask for suggestions from the drafts", "/suggest".yellow());
        println!("  {:22} Adjust a strategy weight", "/feedback <comp> <delta>".yellow());
        println!();
        println!("{}", "Views:".bright_cyan());
        println!("  {:22} Scored list", "/results".yellow());
        println!("  {:22} Eisenhower matrix", "/matrix".yellow());
        println!("  {:22} Dependency graph", "/graph".yellow());
        println!("  {:22} Write the graph document as JSON", "/graph export <path>".yellow());
        println!();
        println!("  {:22} Exit", "/quit".yellow());
        println!("Press Ctrl+C while a request is running to cancel it.");
        println!();
    }

    /// Prompt for one form field; `None` when the user aborts
    fn prompt(rl: &mut DefaultEditor, label: &str) -> Result<Option<String>> {
        match rl.readline(&format!("  {}: ", label)) {
            Ok(value) => Ok(Some(value)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }

    /// Fill in the task form and append the draft
    fn add_draft(&mut self, rl: &mut DefaultEditor) -> Result<()> {
        let mut form = DraftForm::default();
        let fields: [(&str, &mut String); 5] = [
            ("Title", &mut form.title),
            ("Due date (YYYY-MM-DD, blank for none)", &mut form.due_date),
            ("Estimated hours", &mut form.estimated_hours),
            ("Importance (1-10)", &mut form.importance),
            ("Dependencies (comma-separated ids)", &mut form.dependencies),
        ];

        for (label, slot) in fields {
            match Self::prompt(rl, label)? {
                Some(value) => *slot = value,
                None => {
                    println!("{}", "Cancelled, no task added.".dimmed());
                    return Ok(());
                }
            }
        }

        let draft = self.session.add_draft(&form);
        info!(id = %draft.id, "Draft added");
        println!(
            "{} Task {} added to list. Use {} to send it to the service.",
            "+".bright_green(),
            draft.id.yellow(),
            "/analyze".yellow()
        );
        Ok(())
    }

    fn print_drafts(&self) {
        let drafts = self.session.drafts();
        if drafts.is_empty() {
            println!("{}", "No drafts yet. Use /add to create one.".dimmed());
            return;
        }

        println!();
        for (i, draft) in drafts.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                draft.id.yellow(),
                if draft.title.is_empty() { "(untitled)" } else { draft.title.as_str() }
            );
            let deps = if draft.dependencies.is_empty() {
                "-".to_string()
            } else {
                draft.dependencies.join(", ")
            };
            println!(
                "     {}",
                format!(
                    "Due: {} | Est hrs: {} | Importance: {} | Depends on: {}",
                    draft.due_date.as_deref().unwrap_or("-"),
                    draft.estimated_hours,
                    draft.importance,
                    deps
                )
                .dimmed()
            );
        }
        println!();
    }

    fn handle_bulk(&mut self, args: &[&str], rl: &mut DefaultEditor) -> Result<()> {
        match args.first().copied() {
            Some("clear") => {
                self.session.clear_bulk();
                println!("{}", "Bulk input cleared; /analyze will use the drafts.".dimmed());
            }
            Some("show") => {
                if self.session.bulk().trim().is_empty() {
                    println!("{}", "Bulk input is empty.".dimmed());
                } else {
                    println!("{}", self.session.bulk());
                }
            }
            Some("load") => match args.get(1) {
                Some(path) => {
                    let text = fs::read_to_string(path).context(format!("Failed to read {}", path))?;
                    self.set_bulk(text);
                }
                None => println!("Usage: /bulk load <path>"),
            },
            Some(other) => {
                println!("{} Unknown bulk option: {}", "?".yellow(), other);
            }
            None => {
                println!("{}", "Paste JSON, then an empty line to finish (Ctrl+C to abort):".dimmed());
                let mut lines = Vec::new();
                loop {
                    match rl.readline("") {
                        Ok(line) if line.trim().is_empty() => break,
                        Ok(line) => lines.push(line),
                        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                            println!("{}", "Bulk input unchanged.".dimmed());
                            return Ok(());
                        }
                        Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
                    }
                }
                self.set_bulk(lines.join("\n"));
            }
        }
        Ok(())
    }

    /// Store bulk text, telling the user early if it will not parse
    fn set_bulk(&mut self, text: String) {
        if let Err(e) = parse_bulk(&text) {
            println!("{} {}", "Warning:".yellow(), e);
        }
        self.session.set_bulk(text);
        println!("{}", "Bulk input stored; /analyze will send it instead of the drafts.".dimmed());
    }

    fn handle_strategy(&mut self, args: &[&str]) {
        match args.first() {
            Some(name) => match name.parse::<Strategy>() {
                Ok(strategy) => {
                    if !strategy.is_known() {
                        println!("{} '{}' is not a built-in strategy; sending it anyway.", "Note:".yellow(), strategy);
                    }
                    self.session.set_strategy(strategy);
                    println!("Strategy: {}", self.session.strategy());
                }
                Err(e) => println!("{} {}", "Error:".red(), e),
            },
            None => {
                println!("Strategy: {}", self.session.strategy().to_string().bright_white());
                println!("Built-in: {}", KNOWN_STRATEGIES.join(", "));
            }
        }
    }

    /// Run analyze or suggest, rendering the result if it is still current
    async fn run_request(&mut self, kind: RequestKind) {
        debug!(?kind, "run_request: called");

        // Bulk JSON is checked before anything goes over the wire
        if matches!(kind, RequestKind::Analyze)
            && let Err(e) = self.session.analyze_payload()
        {
            println!("{} {}", "Error:".red(), e);
            return;
        }

        println!("{}", format!("Sending to {}...", self.base_url).dimmed());
        let analysis = Arc::clone(&self.analysis);
        let today = today();
        let result = match kind {
            RequestKind::Analyze => cancellable(self.session.analyze(analysis.as_ref(), today)).await,
            RequestKind::Suggest => cancellable(self.session.suggest(analysis.as_ref(), today)).await,
        };

        match result {
            None => {
                warn!(?kind, "Request cancelled by user");
                println!("{}", "Request cancelled.".yellow());
            }
            Some(Err(e)) => {
                warn!(?kind, error = %e, "Request failed");
                println!("{} {}", "Error:".red(), e);
            }
            Some(Ok(Some(view))) => {
                println!();
                print!("{}", view.render_text());
            }
            Some(Ok(None)) => println!("{}", "A newer request superseded this one.".dimmed()),
        }
    }

    async fn send_feedback(&mut self, args: &[&str]) {
        let Some(component) = args.first() else {
            println!("Usage: /feedback <component> <delta>");
            println!("Components: urgency, importance, effort, dependency");
            return;
        };
        let delta = parse_delta(args.get(1).copied().unwrap_or(""));

        let feedback = Arc::clone(&self.feedback);
        let strategy = self.session.strategy().clone();
        match cancellable(feedback.submit_feedback(&strategy, component, delta)).await {
            None => println!("{}", "Request cancelled.".yellow()),
            Some(Ok(FeedbackStatus::Accepted { weights })) => {
                info!(%strategy, %component, delta, "Feedback accepted");
                println!("{} Feedback recorded. New weights saved.", "✓".bright_green());
                if let Some(weights) = weights.as_ref().and_then(|w| w.get(strategy.as_str())) {
                    println!("{}", format!("{} weights: {}", strategy, weights).dimmed());
                }
            }
            Some(Ok(FeedbackStatus::Rejected { status })) => {
                warn!(?status, "Feedback rejected");
                println!("{} Error sending feedback", "✗".red());
            }
            Some(Err(e)) => {
                warn!(error = %e, "Feedback failed");
                println!("{} Feedback error: {}", "✗".red(), e);
            }
        }
    }

    fn print_view(&self, render: impl Fn(&crate::render::TaskView) -> String) -> Result<()> {
        match self.session.view() {
            Some(view) => print!("{}", render(view)),
            None => println!("{}", "Nothing rendered yet. Run /analyze or /suggest first.".dimmed()),
        }
        Ok(())
    }

    fn export_graph(&self, args: &[&str]) -> Result<()> {
        let Some(path) = args.first() else {
            println!("Usage: /graph export <path>");
            return Ok(());
        };
        let Some(view) = self.session.view() else {
            println!("{}", "Nothing rendered yet. Run /analyze or /suggest first.".dimmed());
            return Ok(());
        };

        write_graph_view(Path::new(path), &GraphView::new(&view.graph, &self.graph))?;
        println!("Graph written to {}", path);
        Ok(())
    }
}

/// Write the renderer document as pretty JSON
pub fn write_graph_view(path: &Path, view: &GraphView) -> Result<()> {
    let json = serde_json::to_string_pretty(view).context("Failed to serialize graph")?;
    fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
    info!("Graph view written to {}", path.display());
    Ok(())
}
