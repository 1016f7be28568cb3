//! Views over a scored-task list
//!
//! The classification steps (tiers, quadrants, graph) are pure functions;
//! the `render_*` functions only format their output as text.

mod eisenhower;
mod graph;
mod results;

pub use eisenhower::{EisenhowerMatrix, Quadrant, bucket, days_until_due, quadrant_for, render_matrix};
pub use graph::{DependencyGraph, GraphEdge, GraphElement, GraphLayout, GraphNode, GraphView, build_graph, render_graph};
pub use results::{ScoreTier, render_results};

use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;

use crate::domain::ScoredTask;

/// Everything derived from one scored-task list
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub tasks: Vec<ScoredTask>,
    pub matrix: EisenhowerMatrix,
    pub graph: DependencyGraph,
}

impl TaskView {
    /// Fan the list out to the three views, rebuilding each from scratch
    pub fn build(tasks: Vec<ScoredTask>, today: NaiveDate) -> Self {
        let matrix = bucket(&tasks, today);
        let graph = build_graph(&tasks);
        Self { tasks, matrix, graph }
    }

    /// List, matrix and graph, one after another
    pub fn render_text(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            "Results".bright_cyan().bold(),
            render_results(&self.tasks),
            "Eisenhower Matrix".bright_cyan().bold(),
            render_matrix(&self.matrix),
            "Dependency Graph".bright_cyan().bold(),
            render_graph(&self.graph)
        )
    }

    /// Serializable form with tiers attached
    pub fn report(&self) -> ViewReport<'_> {
        ViewReport {
            tasks: self
                .tasks
                .iter()
                .map(|task| TieredTask {
                    task,
                    tier: ScoreTier::for_score(task.score),
                })
                .collect(),
            eisenhower: &self.matrix,
            graph: &self.graph,
        }
    }
}

/// JSON output of a view
#[derive(Debug, Serialize)]
pub struct ViewReport<'a> {
    pub tasks: Vec<TieredTask<'a>>,
    pub eisenhower: &'a EisenhowerMatrix,
    pub graph: &'a DependencyGraph,
}

#[derive(Debug, Serialize)]
pub struct TieredTask<'a> {
    #[serde(flatten)]
    pub task: &'a ScoredTask,
    pub tier: ScoreTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ScoredTask> {
        vec![
            ScoredTask {
                id: Some("a".to_string()),
                title: Some("A".to_string()),
                due_date: Some("2024-01-05".to_string()),
                importance: Some(8.0),
                dependencies: vec!["b".to_string()],
                score: Some(82.0),
                ..Default::default()
            },
            ScoredTask {
                id: Some("b".to_string()),
                title: Some("B".to_string()),
                score: Some(12.0),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_view_fans_out() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let view = TaskView::build(sample(), today);

        assert_eq!(view.tasks.len(), 2);
        assert_eq!(view.matrix.len(), 2);
        assert_eq!(view.matrix.get(Quadrant::UrgentImportant).len(), 1);
        assert_eq!(view.graph.nodes.len(), 2);
        assert_eq!(view.graph.edges.len(), 1);

        let text = view.render_text();
        assert!(text.contains("Eisenhower Matrix"));
        assert!(text.contains("Dependency Graph"));
    }

    #[test]
    fn test_report_includes_tiers() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let view = TaskView::build(sample(), today);
        let json = serde_json::to_value(view.report()).unwrap();

        assert_eq!(json["tasks"][0]["id"], "a");
        assert_eq!(json["tasks"][0]["tier"], "high");
        assert_eq!(json["tasks"][1]["tier"], "low");
        assert_eq!(json["eisenhower"]["urgent_important"][0]["id"], "a");
        assert_eq!(json["graph"]["edges"][0]["source"], "b");
    }
}
