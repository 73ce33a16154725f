//! Task urgency scoring and recommendations
//!
//! A task's urgency is its priority base score plus a modifier for how close
//! its due date is. Scores are unclamped: a low-priority task with no due
//! date scores 5, an overdue urgent task scores 150.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Priority, TaskSnapshot};

/// Penalty applied to tasks without a due date
pub const NO_DUE_DATE_PENALTY: i32 = -20;

/// Number of tasks surfaced in the "top urgent" list
pub const TOP_URGENT_LIMIT: usize = 5;

/// Base score for a priority; unknown priorities score as medium
pub fn base_score(priority: Option<Priority>) -> i32 {
    match priority.unwrap_or(Priority::Medium) {
        Priority::Urgent => 100,
        Priority::High => 75,
        Priority::Medium => 50,
        Priority::Low => 25,
    }
}

/// Whole calendar days from `now` until `due`; negative when overdue.
///
/// Only the date portion of either timestamp is considered.
pub fn days_until_due(due: NaiveDateTime, now: NaiveDateTime) -> i64 {
    days_between(now.date(), due.date())
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Where a due date falls relative to today
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DueWindow {
    Overdue,
    Today,
    Tomorrow,
    /// 2 to 7 days out
    ThisWeek,
    /// 8 to 14 days out
    NextWeek,
    Later,
    Unscheduled,
}

impl DueWindow {
    pub fn from_days(days_until_due: Option<i64>) -> Self {
        match days_until_due {
            None => DueWindow::Unscheduled,
            Some(d) if d < 0 => DueWindow::Overdue,
            Some(0) => DueWindow::Today,
            Some(1) => DueWindow::Tomorrow,
            Some(2..=7) => DueWindow::ThisWeek,
            Some(8..=14) => DueWindow::NextWeek,
            Some(_) => DueWindow::Later,
        }
    }

    pub fn modifier(&self) -> i32 {
        match self {
            DueWindow::Overdue => 50,
            DueWindow::Today => 40,
            DueWindow::Tomorrow => 30,
            DueWindow::ThisWeek => 20,
            DueWindow::NextWeek => 10,
            DueWindow::Later => 0,
            DueWindow::Unscheduled => NO_DUE_DATE_PENALTY,
        }
    }
}

/// Score adjustment for the number of days until due (`None` = no due date)
pub fn due_date_modifier(days_until_due: Option<i64>) -> i32 {
    DueWindow::from_days(days_until_due).modifier()
}

/// Compute the urgency score for a task
pub fn urgency_score(
    priority: Option<Priority>,
    due_date: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> i32 {
    let days = due_date.map(|due| days_until_due(due, now));
    base_score(priority) + due_date_modifier(days)
}

impl TaskSnapshot {
    pub fn urgency_score(&self, now: NaiveDateTime) -> i32 {
        urgency_score(self.priority, self.due_date, now)
    }

    pub fn days_until_due(&self, now: NaiveDateTime) -> Option<i64> {
        self.due_date.map(|due| days_until_due(due, now))
    }

    pub fn due_window(&self, now: NaiveDateTime) -> DueWindow {
        DueWindow::from_days(self.days_until_due(now))
    }
}

/// Recommendation tier derived from an urgency score.
///
/// Variants are declared least to most urgent so `Ord` follows urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Low,
    Medium,
    High,
    Urgent,
    Critical,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 120 => Recommendation::Critical,
            s if s >= 100 => Recommendation::Urgent,
            s if s >= 80 => Recommendation::High,
            s if s >= 60 => Recommendation::Medium,
            _ => Recommendation::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Critical => "Critical — handle immediately",
            Recommendation::Urgent => "Urgent — do this today",
            Recommendation::High => "High priority — schedule soon",
            Recommendation::Medium => "Medium priority — this week",
            Recommendation::Low => "Low priority — when you have time",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pair each item with its score and sort by score, highest first.
///
/// The sort is stable, so equal scores keep their input order.
pub fn rank_by_urgency<T, F>(items: Vec<T>, now: NaiveDateTime, snapshot: F) -> Vec<(T, i32)>
where
    F: Fn(&T) -> TaskSnapshot,
{
    let mut scored: Vec<(T, i32)> = items
        .into_iter()
        .map(|item| {
            let score = snapshot(&item).urgency_score(now);
            (item, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

// ============================================================================
// Suggestions
// ============================================================================

/// Task counts that drive the suggestion messages
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStats {
    pub overdue: u32,
    pub due_today: u32,
    /// Due in the next 1 to 7 days; today is counted in `due_today`
    pub due_this_week: u32,
    pub total_incomplete: u32,
    pub total_completed: u32,
}

impl TaskStats {
    /// Tally incomplete tasks by due window. Completed snapshots are counted
    /// in `total_completed` only.
    pub fn tally<'a, I>(tasks: I, now: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'a TaskSnapshot>,
    {
        let mut stats = TaskStats::default();
        for task in tasks {
            if task.is_completed {
                stats.total_completed += 1;
                continue;
            }
            stats.total_incomplete += 1;
            match task.due_window(now) {
                DueWindow::Overdue => stats.overdue += 1,
                DueWindow::Today => stats.due_today += 1,
                DueWindow::Tomorrow | DueWindow::ThisWeek => stats.due_this_week += 1,
                DueWindow::NextWeek | DueWindow::Later | DueWindow::Unscheduled => {}
            }
        }
        stats
    }
}

const BUSY_WEEK_THRESHOLD: u32 = 5;
const BACKLOG_THRESHOLD: u32 = 20;

fn plural(count: u32, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Natural-language suggestions for a set of task counts. Always non-empty.
pub fn build_suggestions(stats: &TaskStats) -> Vec<String> {
    let mut suggestions = Vec::new();

    if stats.overdue > 0 {
        suggestions.push(format!(
            "You have {} - tackle these first",
            plural(stats.overdue, "overdue task", "overdue tasks")
        ));
    }

    if stats.due_today > 0 {
        suggestions.push(format!(
            "{} due today - plan your day around {}",
            plural(stats.due_today, "task", "tasks"),
            if stats.due_today == 1 { "it" } else { "them" }
        ));
    }

    if stats.due_this_week > BUSY_WEEK_THRESHOLD {
        suggestions.push(format!(
            "Busy week ahead: {} tasks due in the next 7 days - consider rescheduling some",
            stats.due_this_week
        ));
    }

    if stats.total_incomplete > BACKLOG_THRESHOLD {
        suggestions.push(format!(
            "{} open tasks - try breaking down or archiving the ones you won't get to",
            stats.total_incomplete
        ));
    }

    if suggestions.is_empty() {
        suggestions.push("You're on top of things - keep up the great work!".to_string());
    }

    suggestions
}
