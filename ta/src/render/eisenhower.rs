//! Eisenhower matrix bucketing
//!
//! Tasks are split by urgency (days until due) and importance into four
//! quadrants. Past-due tasks have negative days and so count as urgent.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use colored::Colorize;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::domain::ScoredTask;

/// A task due within this many days is urgent
const URGENT_WITHIN_DAYS: i64 = 7;

/// Importance at or above this is important
const IMPORTANT_THRESHOLD: f64 = 7.0;

/// Days assumed for tasks without a due date
const NO_DUE_DATE_DAYS: i64 = 365;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One of the four urgency x importance buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Quadrant {
    /// Display order of the grid
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UrgentImportant,
        Quadrant::NotUrgentImportant,
        Quadrant::UrgentNotImportant,
        Quadrant::NotUrgentNotImportant,
    ];

    pub fn classify(urgent: bool, important: bool) -> Self {
        match (urgent, important) {
            (true, true) => Self::UrgentImportant,
            (false, true) => Self::NotUrgentImportant,
            (true, false) => Self::UrgentNotImportant,
            (false, false) => Self::NotUrgentNotImportant,
        }
    }

    /// Quadrant id
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "urgent_important",
            Self::NotUrgentImportant => "not_urgent_important",
            Self::UrgentNotImportant => "urgent_not_important",
            Self::NotUrgentNotImportant => "not_urgent_not_important",
        }
    }

    /// Cell heading
    pub fn heading(&self) -> &'static str {
        match self {
            Self::UrgentImportant => "Urgent & Important (Do)",
            Self::NotUrgentImportant => "Not Urgent & Important (Schedule)",
            Self::UrgentNotImportant => "Urgent & Not Important (Delegate)",
            Self::NotUrgentNotImportant => "Not Urgent & Not Important (Eliminate)",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::UrgentImportant => 0,
            Self::NotUrgentImportant => 1,
            Self::UrgentNotImportant => 2,
            Self::NotUrgentNotImportant => 3,
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tasks grouped by quadrant, input order kept within each cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EisenhowerMatrix {
    cells: [Vec<ScoredTask>; 4],
}

impl EisenhowerMatrix {
    pub fn get(&self, quadrant: Quadrant) -> &[ScoredTask] {
        &self.cells[quadrant.index()]
    }

    /// Cells in display order
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &[ScoredTask])> {
        Quadrant::ALL.into_iter().map(move |q| (q, self.get(q)))
    }

    /// Total number of tasks across all cells
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, quadrant: Quadrant, task: ScoredTask) {
        self.cells[quadrant.index()].push(task);
    }
}

impl Serialize for EisenhowerMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for (quadrant, tasks) in self.iter() {
            map.serialize_entry(quadrant.as_str(), tasks)?;
        }
        map.end()
    }
}

/// Parse a due date as a date or an RFC 3339 / naive datetime
fn parse_due(due: &str) -> Option<NaiveDateTime> {
    let due = due.trim();
    if let Ok(date) = NaiveDate::parse_from_str(due, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(due) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(due, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Whole days from `today` until the task is due, rounded up
///
/// `Some(365)` when there is no due date, `None` when it does not parse.
pub fn days_until_due(task: &ScoredTask, today: NaiveDate) -> Option<i64> {
    let Some(due) = task.due_date.as_deref() else {
        return Some(NO_DUE_DATE_DAYS);
    };
    let due = parse_due(due)?;
    let start = today.and_hms_opt(0, 0, 0)?;
    let seconds = (due - start).num_seconds() as f64;
    Some((seconds / SECONDS_PER_DAY).ceil() as i64)
}

/// Quadrant for a single task
///
/// An unparsable due date is never urgent.
pub fn quadrant_for(task: &ScoredTask, today: NaiveDate) -> Quadrant {
    let urgent = days_until_due(task, today).is_some_and(|days| days <= URGENT_WITHIN_DAYS);
    let important = task.importance_or_zero() >= IMPORTANT_THRESHOLD;
    Quadrant::classify(urgent, important)
}

/// Split tasks into quadrants; every task lands in exactly one
pub fn bucket(tasks: &[ScoredTask], today: NaiveDate) -> EisenhowerMatrix {
    debug!(count = tasks.len(), %today, "bucket: called");
    let mut matrix = EisenhowerMatrix::default();
    for task in tasks {
        let quadrant = quadrant_for(task, today);
        debug!(key = %task.node_key(), %quadrant, "bucket: assigned");
        matrix.push(quadrant, task.clone());
    }
    matrix
}

/// Render the grid as text
pub fn render_matrix(matrix: &EisenhowerMatrix) -> String {
    let mut out = String::new();
    for (quadrant, tasks) in matrix.iter() {
        out.push_str(&format!("{} ({})\n", quadrant.heading().bright_cyan(), tasks.len()));
        if tasks.is_empty() {
            out.push_str(&format!("  {}\n", "-".dimmed()));
        }
        for task in tasks {
            out.push_str(&format!(
                "  {} Score:{}\n",
                task.title().bold(),
                super::results::show(task.score)
            ));
        }
    }
    out
}
