//! Dependency graph construction
//!
//! Edges point from prerequisite to dependent. The builder does not check
//! that dependency ids exist; the text view marks the ones that don't.

use std::collections::{HashMap, HashSet};

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::config::GraphConfig;
use crate::domain::ScoredTask;

/// Graph node: one per task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

/// Graph edge from `source` (prerequisite) to `target` (dependent)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Element as the graph renderer expects it: `{group: "nodes"|"edges", data: {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "group", content = "data", rename_all = "lowercase")]
pub enum GraphElement {
    Nodes(GraphNode),
    Edges(GraphEdge),
}

/// Nodes and edges derived from one scored-task list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    /// Nodes first, then edges
    pub fn elements(&self) -> Vec<GraphElement> {
        self.nodes
            .iter()
            .cloned()
            .map(GraphElement::Nodes)
            .chain(self.edges.iter().cloned().map(GraphElement::Edges))
            .collect()
    }

    /// Edges whose prerequisite is not a node of this graph
    pub fn dangling_edges(&self) -> Vec<&GraphEdge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges.iter().filter(|e| !ids.contains(e.source.as_str())).collect()
    }

    /// A dependency cycle among known nodes, if any
    ///
    /// Returns the path of node ids ending where the cycle closes.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        debug!(nodes = self.nodes.len(), "find_cycle: called");
        let mut deps: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in &self.nodes {
            deps.entry(node.id.as_str()).or_default();
        }
        for edge in &self.edges {
            if let Some(list) = deps.get_mut(edge.target.as_str()) {
                list.push(edge.source.as_str());
            }
        }

        let mut visited = HashSet::new();
        let mut stack = HashSet::new();
        let mut path = Vec::new();

        // Walk in node order so the reported cycle is stable
        for node in &self.nodes {
            let id = node.id.as_str();
            if !visited.contains(id) && has_cycle_dfs(id, &deps, &mut visited, &mut stack, &mut path) {
                debug!(?path, "find_cycle: cycle detected");
                return Some(path);
            }
        }
        None
    }
}

/// DFS helper for cycle detection
fn has_cycle_dfs<'a>(
    node: &'a str,
    deps: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut HashSet<&'a str>,
    path: &mut Vec<String>,
) -> bool {
    visited.insert(node);
    stack.insert(node);
    path.push(node.to_string());

    for dep in deps.get(node).into_iter().flatten() {
        if !deps.contains_key(dep) {
            continue;
        }
        if stack.contains(dep) {
            path.push(dep.to_string());
            return true;
        }
        if !visited.contains(dep) && has_cycle_dfs(*dep, deps, visited, stack, path) {
            return true;
        }
    }

    stack.remove(node);
    path.pop();
    false
}

/// Build the graph for a scored-task list
///
/// Deterministic: the same list always yields the same graph, so callers
/// rebuild from scratch instead of diffing.
pub fn build_graph(tasks: &[ScoredTask]) -> DependencyGraph {
    debug!(count = tasks.len(), "build_graph: called");
    let nodes = tasks
        .iter()
        .map(|t| GraphNode {
            id: t.node_key().to_string(),
            label: t.title().to_string(),
        })
        .collect();

    let edges = tasks
        .iter()
        .flat_map(|t| {
            let target = t.node_key();
            t.dependencies.iter().map(move |dep| GraphEdge {
                id: format!("{}_{}", target, dep),
                source: dep.clone(),
                target: target.to_string(),
            })
        })
        .collect::<Vec<_>>();

    debug!(edges = edges.len(), "build_graph: complete");
    DependencyGraph { nodes, edges }
}

/// Document handed to the external graph renderer
///
/// Container, style and layout come from configuration untouched.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub container: String,
    pub elements: Vec<GraphElement>,
    pub style: serde_json::Value,
    pub layout: GraphLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphLayout {
    pub name: String,
}

impl GraphView {
    pub fn new(graph: &DependencyGraph, config: &GraphConfig) -> Self {
        Self {
            container: config.container.clone(),
            elements: graph.elements(),
            style: config.style.clone(),
            layout: GraphLayout {
                name: config.layout.clone(),
            },
        }
    }
}

/// Render nodes and edges as text
pub fn render_graph(graph: &DependencyGraph) -> String {
    if graph.nodes.is_empty() {
        return format!("{}\n", "No tasks to graph.".dimmed());
    }

    let mut out = String::new();
    out.push_str(&format!("{}\n", "Tasks:".bright_cyan()));
    for node in &graph.nodes {
        out.push_str(&format!("  {}  {}\n", node.id.yellow(), node.label));
    }

    out.push_str(&format!("{}\n", "Dependencies:".bright_cyan()));
    if graph.edges.is_empty() {
        out.push_str(&format!("  {}\n", "none".dimmed()));
    }
    let dangling: HashSet<&str> = graph.dangling_edges().into_iter().map(|e| e.id.as_str()).collect();
    for edge in &graph.edges {
        let missing = if dangling.contains(edge.id.as_str()) {
            format!(" {}", "(unknown task)".red())
        } else {
            String::new()
        };
        out.push_str(&format!("  {} -> {}{}\n", edge.source, edge.target, missing));
    }

    if let Some(cycle) = graph.find_cycle() {
        out.push_str(&format!(
            "{} {}\n",
            "Cycle detected:".red().bold(),
            cycle.join(" <- ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: Option<&str>, title: &str, deps: &[&str]) -> ScoredTask {
        ScoredTask {
            id: id.map(String::from),
            title: Some(title.to_string()),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_two_node_graph() {
        let tasks = vec![task(Some("a"), "A", &["b"]), task(Some("b"), "B", &[])];
        let graph = build_graph(&tasks);

        assert_eq!(
            graph.nodes,
            vec![
                GraphNode {
                    id: "a".to_string(),
                    label: "A".to_string()
                },
                GraphNode {
                    id: "b".to_string(),
                    label: "B".to_string()
                },
            ]
        );
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "b");
        assert_eq!(graph.edges[0].target, "a");
        assert_eq!(graph.edges[0].id, "a_b");
        assert!(graph.dangling_edges().is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let tasks = vec![
            task(Some("a"), "A", &["b", "c"]),
            task(None, "Untitled", &["a"]),
            task(Some("c"), "C", &[]),
        ];
        let first = build_graph(&tasks);
        let second = build_graph(&tasks);

        let as_set = |g: &DependencyGraph| -> (HashSet<GraphNode>, HashSet<GraphEdge>) {
            (g.nodes.iter().cloned().collect(), g.edges.iter().cloned().collect())
        };
        assert_eq!(as_set(&first), as_set(&second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_title_used_when_id_missing() {
        let graph = build_graph(&[task(None, "Plan", &["x"])]);
        assert_eq!(graph.nodes[0].id, "Plan");
        assert_eq!(graph.edges[0].target, "Plan");
        assert_eq!(graph.edges[0].id, "Plan_x");
    }

    #[test]
    fn test_dangling_dependency_kept() {
        let graph = build_graph(&[task(Some("a"), "A", &["ghost"])]);
        assert_eq!(graph.edges.len(), 1);
        let dangling = graph.dangling_edges();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].source, "ghost");
        assert!(render_graph(&graph).contains("(unknown task)"));
    }

    #[test]
    fn test_find_cycle() {
        let acyclic = build_graph(&[task(Some("a"), "A", &["b"]), task(Some("b"), "B", &[])]);
        assert!(acyclic.find_cycle().is_none());

        let cyclic = build_graph(&[task(Some("1"), "T1", &["2"]), task(Some("2"), "T2", &["1"])]);
        let cycle = cyclic.find_cycle().unwrap();
        assert_eq!(cycle, vec!["1".to_string(), "2".to_string(), "1".to_string()]);

        let self_loop = build_graph(&[task(Some("s"), "S", &["s"])]);
        assert!(self_loop.find_cycle().is_some());
    }

    #[test]
    fn test_dangling_edges_ignored_for_cycles() {
        let graph = build_graph(&[task(Some("a"), "A", &["ghost"])]);
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_elements_shape() {
        let graph = build_graph(&[task(Some("a"), "A", &["b"]), task(Some("b"), "B", &[])]);
        let json = serde_json::to_value(graph.elements()).unwrap();

        assert_eq!(json[0], serde_json::json!({"group": "nodes", "data": {"id": "a", "label": "A"}}));
        assert_eq!(
            json[2],
            serde_json::json!({"group": "edges", "data": {"id": "a_b", "source": "b", "target": "a"}})
        );
    }

    #[test]
    fn test_graph_view_passes_config_through() {
        let config = GraphConfig {
            container: "deps".to_string(),
            layout: "cose".to_string(),
            style: serde_json::json!([{"selector": "node"}]),
        };
        let graph = build_graph(&[task(Some("a"), "A", &[])]);
        let view = GraphView::new(&graph, &config);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["container"], "deps");
        assert_eq!(json["layout"]["name"], "cose");
        assert_eq!(json["style"], serde_json::json!([{"selector": "node"}]));
        assert_eq!(json["elements"].as_array().unwrap().len(), 1);
    }
}
