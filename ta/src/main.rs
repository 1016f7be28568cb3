//! TaskAnalyzer - terminal client for a task prioritization service
//!
//! CLI entry point for the interactive session and one-shot commands.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use taskanalyzer::api::{AnalysisClient, FeedbackClient, FeedbackStatus, TaskApiClient};
use taskanalyzer::cli::{Cli, Command, OutputFormat, get_log_path};
use taskanalyzer::config::Config;
use taskanalyzer::domain::{Strategy, TaskDraft};
use taskanalyzer::render::{GraphView, TaskView};
use taskanalyzer::repl::{self, write_graph_view};
use taskanalyzer::session::{Session, parse_delta};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = match level_str.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(format!("Logs are written to: {}", get_log_path().display()));
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(url) = cli.url {
        debug!(%url, "main: overriding base url");
        config.api.base_url = url;
    }

    info!("TaskAnalyzer loaded config: base-url={}", config.api.base_url);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Repl) => repl::run_interactive(&config).await,
        Some(Command::Analyze {
            file,
            strategy,
            format,
            graph_out,
        }) => cmd_analyze(&config, &file, strategy, format, graph_out.as_deref()).await,
        Some(Command::Suggest {
            sample,
            strategy,
            format,
        }) => cmd_suggest(&config, sample.as_deref(), strategy, format).await,
        Some(Command::Feedback {
            component,
            delta,
            strategy,
        }) => cmd_feedback(&config, &component, &delta, strategy).await,
    }
}

/// Read a file, or stdin when the path is "-"
fn read_input(path: &Path) -> Result<String> {
    debug!(?path, "read_input: called");
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}

fn resolve_strategy(config: &Config, strategy: Option<String>) -> Result<Strategy> {
    match strategy {
        Some(name) => name.parse::<Strategy>().map_err(|e| eyre::eyre!(e)),
        None => Ok(config.strategy.clone()),
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_view(view: &TaskView, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view.report())?),
        OutputFormat::Text => print!("{}", view.render_text()),
    }
    Ok(())
}

async fn cmd_analyze(
    config: &Config,
    file: &Path,
    strategy: Option<String>,
    format: OutputFormat,
    graph_out: Option<&Path>,
) -> Result<()> {
    debug!(?file, ?strategy, %format, "cmd_analyze: called");
    let mut session = Session::new(resolve_strategy(config, strategy)?);
    session.set_bulk(read_input(file)?);

    // Fails here, before the client exists, when the file is not JSON
    session.analyze_payload()?;

    let client = TaskApiClient::from_config(&config.api).context("Failed to create API client")?;
    let view = session
        .analyze(&client, today())
        .await?
        .ok_or_else(|| eyre::eyre!("Analyze result was superseded"))?;

    print_view(view, &format)?;

    if let Some(path) = graph_out {
        write_graph_view(path, &GraphView::new(&view.graph, &config.graph))?;
    }
    Ok(())
}

async fn cmd_suggest(
    config: &Config,
    sample: Option<&Path>,
    strategy: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    debug!(?sample, ?strategy, %format, "cmd_suggest: called");
    let strategy = resolve_strategy(config, strategy)?;
    let drafts: Vec<TaskDraft> = match sample {
        Some(path) => serde_json::from_str(&read_input(path)?)
            .context(format!("Invalid sample task list in {}", path.display()))?,
        None => Vec::new(),
    };

    let client = TaskApiClient::from_config(&config.api).context("Failed to create API client")?;
    let tasks = client.suggest(&strategy, &drafts).await?;
    info!(count = tasks.len(), "Suggestions received");

    print_view(&TaskView::build(tasks, today()), &format)
}

async fn cmd_feedback(config: &Config, component: &str, delta: &str, strategy: Option<String>) -> Result<()> {
    debug!(%component, %delta, ?strategy, "cmd_feedback: called");
    let strategy = resolve_strategy(config, strategy)?;
    let delta = parse_delta(delta);

    let client = TaskApiClient::from_config(&config.api).context("Failed to create API client")?;
    match client
        .submit_feedback(&strategy, component, delta)
        .await
        .context("Feedback error")?
    {
        FeedbackStatus::Accepted { weights } => {
            println!("Feedback recorded. New weights saved.");
            if let Some(weights) = weights {
                println!("{}", serde_json::to_string_pretty(&weights)?);
            }
            Ok(())
        }
        FeedbackStatus::Rejected { status } => {
            debug!(?status, "cmd_feedback: rejected");
            Err(eyre::eyre!("Error sending feedback"))
        }
    }
}
