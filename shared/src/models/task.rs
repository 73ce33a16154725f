//! Task models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Task priority level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Parse a stored priority value, returning `None` for anything unrecognized.
    ///
    /// Rows written by older clients may carry free-form text; callers treat
    /// `None` as "unknown" and score it like [`Priority::Medium`].
    pub fn parse_lenient(value: &str) -> Option<Priority> {
        value.parse().ok()
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when strict priority parsing fails
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// The fields of a task that drive urgency scoring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSnapshot {
    /// `None` when the stored priority was not recognized
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDateTime>,
    pub is_completed: bool,
}

impl TaskSnapshot {
    pub fn new(priority: Option<Priority>, due_date: Option<NaiveDateTime>) -> Self {
        Self {
            priority,
            due_date,
            is_completed: false,
        }
    }
}
