//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Strategy;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Task service connection
    pub api: ApiConfig,

    /// Strategy selected when a session starts
    pub strategy: Strategy,

    /// Settings handed through to the graph renderer
    pub graph: GraphConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .taskanalyzer.yml
        let local_config = PathBuf::from(".taskanalyzer.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/taskanalyzer/taskanalyzer.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => [Some(PathBuf::from(".taskanalyzer.yml")), Self::user_config_path()]
                .into_iter()
                .flatten()
                .collect(),
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("taskanalyzer").join("taskanalyzer.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Task service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service base URL; endpoint paths are appended to it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds; unset means wait indefinitely
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: None,
        }
    }
}

/// Graph renderer passthrough settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Container element the renderer draws into
    pub container: String,

    /// Layout algorithm name
    pub layout: String,

    /// Style rules, forwarded verbatim
    pub style: serde_json::Value,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            container: "cy".to_string(),
            layout: "dagre".to_string(),
            style: serde_json::json!([
                {
                    "selector": "node",
                    "style": {
                        "label": "data(label)",
                        "text-valign": "center",
                        "background-color": "#0074D9",
                        "color": "#fff",
                        "text-outline-width": 2,
                        "text-outline-color": "#0074D9"
                    }
                },
                {
                    "selector": "edge",
                    "style": {
                        "width": 2,
                        "line-color": "#ccc",
                        "target-arrow-shape": "triangle",
                        "target-arrow-color": "#ccc"
                    }
                }
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert!(config.api.timeout_ms.is_none());
        assert_eq!(config.strategy.as_str(), "smart_balance");
        assert_eq!(config.graph.layout, "dagre");
        assert_eq!(config.graph.container, "cy");
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug

api:
  base-url: https://tasks.example.com
  timeout-ms: 5000

strategy: deadline_driven

graph:
  container: graph
  layout: breadthfirst
  style:
    - selector: node
      style:
        label: data(id)
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.api.base_url, "https://tasks.example.com");
        assert_eq!(config.api.timeout_ms, Some(5000));
        assert_eq!(config.strategy.as_str(), "deadline_driven");
        assert_eq!(config.graph.container, "graph");
        assert_eq!(config.graph.layout, "breadthfirst");
        assert_eq!(config.graph.style[0]["style"]["label"], "data(id)");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
api:
  base-url: http://10.0.0.5:9000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");

        // Defaults for unspecified
        assert!(config.api.timeout_ms.is_none());
        assert_eq!(config.strategy.as_str(), "smart_balance");
        assert_eq!(config.graph.layout, "dagre");
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log-level: warn\nstrategy: high_impact").unwrap();

        let path = file.path().to_path_buf();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.strategy.as_str(), "high_impact");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_explicit_path_missing_fails() {
        let path = PathBuf::from("/nonexistent/taskanalyzer.yml");
        assert!(Config::load(Some(&path)).is_err());
        assert!(Config::load_log_level(Some(&path)).is_none());
    }
}
