//! Database models for the Daybook server
//!
//! Re-exports models from the shared crate and adds backend-specific models

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sqlx::FromRow;

pub use shared::models::*;

/// Columns every task query selects, in `TaskRecord` field order
pub const TASK_COLUMNS: &str = "id, title, description, priority, due_date, is_completed, \
is_travel_day, list_id, user_id, created_at";

/// A row of the `tasks` table
#[derive(Debug, Clone, FromRow)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Free text; older rows may hold values outside the `Priority` set
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub is_travel_day: bool,
    pub list_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Recognized priority, or `None` when the stored text is missing or unknown
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(Priority::parse_lenient)
    }

    /// Priority as reported to clients; unknown values read as medium
    pub fn effective_priority(&self) -> Priority {
        self.priority().unwrap_or_default()
    }

    /// Calendar day the task is due on, seen from `offset`
    pub fn due_day(&self, offset: &FixedOffset) -> Option<NaiveDate> {
        self.due_date
            .map(|due| due.with_timezone(offset).date_naive())
    }

    /// Scorer input with the due date expressed as wall-clock time at `offset`
    pub fn snapshot(&self, offset: &FixedOffset) -> TaskSnapshot {
        TaskSnapshot {
            priority: self.priority(),
            due_date: self
                .due_date
                .map(|due| due.with_timezone(offset).naive_local()),
            is_completed: self.is_completed,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_task(id: i64, priority: &str, due_date: Option<DateTime<Utc>>) -> TaskRecord {
    TaskRecord {
        id,
        title: format!("Task {}", id),
        description: None,
        priority: Some(priority.to_string()),
        due_date,
        is_completed: false,
        is_travel_day: false,
        list_id: None,
        user_id: Some(1),
        created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
    }
}
