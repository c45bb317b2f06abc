//! Dashboard statistics and the pure aggregation over a task snapshot.
//!
//! Repositories gather raw counts for a fixed workspace set inside one read
//! transaction; [`DashboardStats::from_snapshot`] turns that snapshot into the
//! client-facing shape. Keeping the arithmetic here means every adapter agrees
//! on label normalisation and week bucketing.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of trailing weeks covered by the weekly completion trend.
pub const WEEKLY_WINDOW_WEEKS: i64 = 6;

/// Start of the weekly completion window ending at `now`.
pub fn weekly_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::weeks(WEEKLY_WINDOW_WEEKS)
}

/// Display label for a stored task status.
///
/// # Examples
/// ```
/// use nexus::domain::normalize_status_label;
///
/// assert_eq!(normalize_status_label("done"), "COMPLETED");
/// assert_eq!(normalize_status_label("review"), "REVIEW");
/// ```
pub fn normalize_status_label(status: &str) -> String {
    match status {
        "todo" => "TODO".to_owned(),
        "in_progress" => "IN_PROGRESS".to_owned(),
        "done" => "COMPLETED".to_owned(),
        other => other.to_uppercase(),
    }
}

/// Raw aggregates read from the store for one workspace set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSnapshot {
    /// Task count per stored status value.
    pub status_counts: Vec<(String, u64)>,
    /// Task count per stored priority value.
    pub priority_counts: Vec<(String, u64)>,
    /// Tasks past their due date and not done.
    pub overdue: u64,
    pub project_count: u64,
    /// `updated_at` of done tasks inside the weekly window.
    pub completions: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    #[schema(example = "IN_PROGRESS")]
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCount {
    #[schema(example = "high")]
    pub priority: String,
    pub count: u64,
}

/// Completed tasks for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCompletion {
    #[schema(example = "Week 07")]
    pub week: String,
    #[schema(example = "2026-W07")]
    pub week_key: String,
    pub completed: u64,
}

/// Aggregated dashboard view across every workspace a user can see.
///
/// ## Invariants
/// - `total_tasks` equals the sum of `tasks_by_status` counts.
/// - `completed_tasks <= total_tasks` and `in_progress_tasks <= total_tasks`.
/// - `weekly_completion` is ordered by `week_key` ascending with no repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub overdue_tasks: u64,
    pub total_projects: u64,
    pub total_workspaces: u64,
    pub tasks_by_status: Vec<StatusCount>,
    pub tasks_by_priority: Vec<PriorityCount>,
    pub weekly_completion: Vec<WeeklyCompletion>,
}

impl DashboardStats {
    /// All-zero stats for a user with no visible workspaces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the dashboard from a snapshot of `workspace_count` workspaces.
    pub fn from_snapshot(snapshot: &TaskSnapshot, workspace_count: u64) -> Self {
        let count_for = |status: &str| {
            snapshot
                .status_counts
                .iter()
                .filter(|(raw, _)| raw == status)
                .map(|(_, count)| *count)
                .sum::<u64>()
        };

        let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
        for (raw, count) in &snapshot.status_counts {
            *by_status.entry(normalize_status_label(raw)).or_default() += count;
        }
        let mut by_priority: BTreeMap<String, u64> = BTreeMap::new();
        for (raw, count) in &snapshot.priority_counts {
            *by_priority.entry(raw.clone()).or_default() += count;
        }

        Self {
            total_tasks: snapshot.status_counts.iter().map(|(_, count)| count).sum(),
            completed_tasks: count_for("done"),
            in_progress_tasks: count_for("in_progress"),
            overdue_tasks: snapshot.overdue,
            total_projects: snapshot.project_count,
            total_workspaces: workspace_count,
            tasks_by_status: sorted_histogram(by_status)
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            tasks_by_priority: sorted_histogram(by_priority)
                .map(|(priority, count)| PriorityCount { priority, count })
                .collect(),
            weekly_completion: weekly_completion(&snapshot.completions),
        }
    }
}

/// Histogram entries by count descending, then label ascending.
fn sorted_histogram(entries: BTreeMap<String, u64>) -> impl Iterator<Item = (String, u64)> {
    let mut sorted: Vec<(String, u64)> = entries.into_iter().collect();
    sorted.sort_by(|(a_label, a_count), (b_label, b_count)| {
        b_count.cmp(a_count).then_with(|| a_label.cmp(b_label))
    });
    sorted.into_iter()
}

/// Bucket completion timestamps by ISO week, ascending.
fn weekly_completion(completions: &[DateTime<Utc>]) -> Vec<WeeklyCompletion> {
    let mut buckets: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for completed_at in completions {
        let iso = completed_at.iso_week();
        *buckets.entry((iso.year(), iso.week())).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|((year, week), completed)| WeeklyCompletion {
            week: format!("Week {week:02}"),
            week_key: format!("{year}-W{week:02}"),
            completed,
        })
        .collect()
}
