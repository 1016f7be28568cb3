//! Scoring strategy selection

use serde::{Deserialize, Serialize};

/// Strategy names the reference service ships with
pub const KNOWN_STRATEGIES: &[&str] = &["smart_balance", "fastest_wins", "high_impact", "deadline_driven"];

/// Opaque identifier selecting the service's scoring profile
///
/// Any string is accepted; the service decides what it means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Strategy(String);

impl Strategy {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference service knows this strategy
    pub fn is_known(&self) -> bool {
        KNOWN_STRATEGIES.contains(&self.0.as_str())
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::new("smart_balance")
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("Strategy name must not be empty".to_string()),
            name => Ok(Self::new(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy() {
        assert_eq!(Strategy::default().as_str(), "smart_balance");
        assert!(Strategy::default().is_known());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("high_impact".parse::<Strategy>().unwrap().as_str(), "high_impact");
        assert!(" ".parse::<Strategy>().is_err());

        let custom: Strategy = "my_profile".parse().unwrap();
        assert!(!custom.is_known());
    }

    #[test]
    fn test_strategy_serde_transparent() {
        let json = serde_json::to_string(&Strategy::new("fastest_wins")).unwrap();
        assert_eq!(json, "\"fastest_wins\"");

        let strategy: Strategy = serde_yaml::from_str("deadline_driven").unwrap();
        assert_eq!(strategy, Strategy::new("deadline_driven"));
    }
}
