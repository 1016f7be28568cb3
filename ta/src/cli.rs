//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// TaskAnalyzer - terminal client for a task prioritization service
#[derive(Parser)]
#[command(
    name = "ta",
    about = "Score, bucket and graph tasks using a remote prioritization service",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Service base URL, overriding the config file
    #[arg(short = 'u', long = "url", global = true, help = "Service base URL")]
    pub url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive session (default)
    Repl,

    /// Send a JSON task list for scoring and print the views
    Analyze {
        /// JSON file with the task list ("-" reads stdin)
        #[arg(short, long, value_name = "PATH")]
        file: PathBuf,

        /// Scoring strategy (defaults to the config value)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Also write the graph document to this path
        #[arg(short, long, value_name = "PATH")]
        graph_out: Option<PathBuf>,
    },

    /// Ask the service for suggestions
    Suggest {
        /// JSON file with sample tasks sent along with the query
        #[arg(long, value_name = "PATH")]
        sample: Option<PathBuf>,

        /// Scoring strategy (defaults to the config value)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Adjust one weight of a strategy
    Feedback {
        /// Weight component (urgency, importance, effort, dependency)
        component: String,

        /// Amount to add to the weight; non-numeric input counts as 0
        #[arg(allow_hyphen_values = true)]
        delta: String,

        /// Strategy to adjust (defaults to the config value)
        #[arg(short, long)]
        strategy: Option<String>,
    },
}

/// Output format for one-shot commands
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Location of the log file, shown in `--help`
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskanalyzer")
        .join("logs")
        .join("taskanalyzer.log")
}
