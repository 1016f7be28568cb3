//! Flat scored-task list with score tiers

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::domain::ScoredTask;

/// Scores above this are high priority
const HIGH_THRESHOLD: f64 = 70.0;

/// Scores above this (up to the high threshold) are medium priority
const MEDIUM_THRESHOLD: f64 = 40.0;

/// Display tier derived from a task's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    /// Classify a score; a missing score is low
    pub fn for_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s > HIGH_THRESHOLD => Self::High,
            Some(s) if s > MEDIUM_THRESHOLD => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Format an optional field the way the list shows it
pub(crate) fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Render the list in the order given; no sorting happens here
pub fn render_results(tasks: &[ScoredTask]) -> String {
    if tasks.is_empty() {
        return format!("{}\n", "No tasks returned.".dimmed());
    }

    let mut out = String::new();
    for task in tasks {
        let tier = ScoreTier::for_score(task.score);
        let marker = match tier {
            ScoreTier::High => "[high]  ".red().bold(),
            ScoreTier::Medium => "[medium]".yellow(),
            ScoreTier::Low => "[low]   ".green(),
        };

        out.push_str(&format!(
            "{} {} - Score: {}\n",
            marker,
            task.title().bold(),
            show(task.score)
        ));
        if let Some(reason) = &task.reason {
            out.push_str(&format!("         {}\n", reason.italic()));
        }
        out.push_str(&format!(
            "         {}\n",
            format!(
                "Due: {} | Est hrs: {} | Importance: {}",
                show(task.due_date.as_deref()),
                show(task.estimated_hours),
                show(task.importance)
            )
            .dimmed()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(title: &str, score: Option<f64>) -> ScoredTask {
        ScoredTask {
            title: Some(title.to_string()),
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ScoreTier::for_score(Some(71.0)), ScoreTier::High);
        assert_eq!(ScoreTier::for_score(Some(70.01)), ScoreTier::High);
        assert_eq!(ScoreTier::for_score(Some(70.0)), ScoreTier::Medium);
        assert_eq!(ScoreTier::for_score(Some(40.5)), ScoreTier::Medium);
        assert_eq!(ScoreTier::for_score(Some(40.0)), ScoreTier::Low);
        assert_eq!(ScoreTier::for_score(Some(-3.0)), ScoreTier::Low);
        assert_eq!(ScoreTier::for_score(None), ScoreTier::Low);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(ScoreTier::High.to_string(), "high");
        assert_eq!(ScoreTier::Medium.to_string(), "medium");
        assert_eq!(ScoreTier::Low.to_string(), "low");
    }

    #[test]
    fn test_render_preserves_order() {
        let tasks = vec![scored("Second best", Some(50.0)), scored("Best", Some(90.0))];
        let out = render_results(&tasks);

        let second = out.find("Second best").unwrap();
        let best = out.find("Best").unwrap();
        assert!(second < best);
    }

    #[test]
    fn test_render_shows_fields() {
        let task = ScoredTask {
            title: Some("Write report".to_string()),
            due_date: Some("2024-01-05".to_string()),
            estimated_hours: Some(2.0),
            importance: Some(8.0),
            score: Some(75.5),
            reason: Some("Urgency:0.9".to_string()),
            ..Default::default()
        };
        let out = render_results(&[task]);

        assert!(out.contains("Write report"));
        assert!(out.contains("75.5"));
        assert!(out.contains("Urgency:0.9"));
        assert!(out.contains("2024-01-05"));
        assert!(out.contains("high"));
    }

    #[test]
    fn test_render_empty_list() {
        assert!(render_results(&[]).contains("No tasks returned."));
    }
}
