//! Smart task service
//!
//! Ranks incomplete tasks by urgency and derives the overdue, due-today and
//! suggestion views. Scoring itself lives in `shared::urgency`; this service
//! loads rows and shapes responses.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use shared::{build_suggestions, rank_by_urgency, Recommendation, TaskStats, TOP_URGENT_LIMIT};

use crate::error::AppResult;
use crate::models::{Priority, TaskRecord, TASK_COLUMNS};

/// Smart task service
#[derive(Clone)]
pub struct SmartTaskService {
    db: PgPool,
    offset: FixedOffset,
}

/// Task with its urgency score and recommendation
#[derive(Debug, Clone, Serialize)]
pub struct PrioritizedTask {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub days_until_due: Option<i64>,
    pub urgency_score: i32,
    pub recommendation: String,
    pub list_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Incomplete task whose due day has passed
#[derive(Debug, Clone, Serialize)]
pub struct OverdueTask {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub days_overdue: i64,
    pub list_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Incomplete task due today
#[derive(Debug, Clone, Serialize)]
pub struct DueTodayTask {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub list_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Counts, top tasks and advice for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct TaskSuggestions {
    pub stats: TaskStats,
    pub top_urgent_tasks: Vec<PrioritizedTask>,
    pub suggestions: Vec<String>,
    pub feature_enabled: bool,
}

impl SmartTaskService {
    /// Create a new SmartTaskService; `offset` decides which calendar day "today" is
    pub fn new(db: PgPool, offset: FixedOffset) -> Self {
        Self { db, offset }
    }

    /// Incomplete tasks ranked by urgency, at most `limit` of them
    pub async fn prioritized(
        &self,
        limit: usize,
        user_id: Option<i64>,
    ) -> AppResult<Vec<PrioritizedTask>> {
        let tasks = self.incomplete_tasks(user_id).await?;
        tracing::debug!("Ranking {} incomplete tasks", tasks.len());
        Ok(prioritize(tasks, Utc::now(), &self.offset, limit))
    }

    /// Incomplete tasks due before today, oldest first
    pub async fn overdue(&self, user_id: Option<i64>) -> AppResult<Vec<OverdueTask>> {
        let now = Utc::now();
        let today = local_today(now, &self.offset);
        let tasks = self
            .tasks_due_before(start_of_day(today, &self.offset), user_id)
            .await?;
        Ok(overdue_tasks(tasks, now, &self.offset))
    }

    /// Incomplete tasks due today, most important first
    pub async fn due_today(&self, user_id: Option<i64>) -> AppResult<Vec<DueTodayTask>> {
        let now = Utc::now();
        let today = local_today(now, &self.offset);
        let tasks = self
            .tasks_due_between(
                start_of_day(today, &self.offset),
                start_of_day(today + Duration::days(1), &self.offset),
                user_id,
            )
            .await?;
        Ok(due_today_tasks(tasks, now, &self.offset))
    }

    /// Stats, the top urgent tasks and natural-language suggestions
    pub async fn suggestions(&self, user_id: Option<i64>) -> AppResult<TaskSuggestions> {
        let tasks = self.incomplete_tasks(user_id).await?;
        let completed = self.completed_count(user_id).await?;
        Ok(summarize(tasks, completed, Utc::now(), &self.offset))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    async fn incomplete_tasks(&self, user_id: Option<i64>) -> AppResult<Vec<TaskRecord>> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE is_completed = FALSE AND ($1::BIGINT IS NULL OR user_id = $1) \
             ORDER BY id",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, TaskRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        Ok(tasks)
    }

    async fn tasks_due_before(
        &self,
        cutoff: DateTime<Utc>,
        user_id: Option<i64>,
    ) -> AppResult<Vec<TaskRecord>> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE is_completed = FALSE AND due_date IS NOT NULL AND due_date < $1 \
               AND ($2::BIGINT IS NULL OR user_id = $2) \
             ORDER BY due_date ASC, id",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, TaskRecord>(&sql)
            .bind(cutoff)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        Ok(tasks)
    }

    /// Incomplete tasks due in `[start, end)`
    async fn tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user_id: Option<i64>,
    ) -> AppResult<Vec<TaskRecord>> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE is_completed = FALSE AND due_date >= $1 AND due_date < $2 \
               AND ($3::BIGINT IS NULL OR user_id = $3) \
             ORDER BY due_date ASC, id",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, TaskRecord>(&sql)
            .bind(start)
            .bind(end)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        Ok(tasks)
    }

    async fn completed_count(&self, user_id: Option<i64>) -> AppResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks \
             WHERE is_completed = TRUE AND ($1::BIGINT IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

// ============================================================================
// Response assembly
// ============================================================================

fn local_now(now: DateTime<Utc>, offset: &FixedOffset) -> NaiveDateTime {
    now.with_timezone(offset).naive_local()
}

fn local_today(now: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    local_now(now, offset).date()
}

/// UTC instant at which `day` begins at `offset`
pub fn start_of_day(day: NaiveDate, offset: &FixedOffset) -> DateTime<Utc> {
    let local_midnight = day.and_time(NaiveTime::MIN);
    (local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

fn prioritized_task(
    task: TaskRecord,
    score: i32,
    now: NaiveDateTime,
    offset: &FixedOffset,
) -> PrioritizedTask {
    let snapshot = task.snapshot(offset);
    PrioritizedTask {
        priority: task.effective_priority(),
        days_until_due: snapshot.days_until_due(now),
        urgency_score: score,
        recommendation: Recommendation::from_score(score).label().to_string(),
        id: task.id,
        title: task.title,
        description: task.description,
        due_date: task.due_date,
        list_id: task.list_id,
        user_id: task.user_id,
        created_at: task.created_at,
    }
}

/// Score, sort (stable, highest first) and truncate
pub fn prioritize(
    tasks: Vec<TaskRecord>,
    now: DateTime<Utc>,
    offset: &FixedOffset,
    limit: usize,
) -> Vec<PrioritizedTask> {
    let now = local_now(now, offset);

    rank_by_urgency(tasks, now, |task| task.snapshot(offset))
        .into_iter()
        .take(limit)
        .map(|(task, score)| prioritized_task(task, score, now, offset))
        .collect()
}

/// Keep tasks due on an earlier day than today, oldest due date first
pub fn overdue_tasks(
    tasks: Vec<TaskRecord>,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Vec<OverdueTask> {
    let today = local_today(now, offset);

    let mut overdue: Vec<OverdueTask> = tasks
        .into_iter()
        .filter(|task| !task.is_completed)
        .filter_map(|task| {
            let due_date = task.due_date?;
            let due_day = task.due_day(offset)?;
            if due_day >= today {
                return None;
            }
            Some(OverdueTask {
                priority: task.effective_priority(),
                days_overdue: (today - due_day).num_days(),
                id: task.id,
                title: task.title,
                description: task.description,
                due_date,
                list_id: task.list_id,
                user_id: task.user_id,
                created_at: task.created_at,
            })
        })
        .collect();

    overdue.sort_by_key(|task| task.due_date);
    overdue
}

/// Keep tasks due today, highest priority first; ties keep input order
pub fn due_today_tasks(
    tasks: Vec<TaskRecord>,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Vec<DueTodayTask> {
    let today = local_today(now, offset);

    let mut due: Vec<DueTodayTask> = tasks
        .into_iter()
        .filter(|task| !task.is_completed && task.due_day(offset) == Some(today))
        .filter_map(|task| {
            Some(DueTodayTask {
                priority: task.effective_priority(),
                due_date: task.due_date?,
                id: task.id,
                title: task.title,
                description: task.description,
                list_id: task.list_id,
                user_id: task.user_id,
                created_at: task.created_at,
            })
        })
        .collect();

    due.sort_by(|a, b| b.priority.cmp(&a.priority));
    due
}

/// Build the suggestions payload from incomplete tasks plus the completed count
pub fn summarize(
    tasks: Vec<TaskRecord>,
    completed: u32,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> TaskSuggestions {
    let local = local_now(now, offset);
    let snapshots: Vec<_> = tasks
        .iter()
        .filter(|task| !task.is_completed)
        .map(|task| task.snapshot(offset))
        .collect();

    let mut stats = TaskStats::tally(&snapshots, local);
    stats.total_completed = completed;

    let incomplete: Vec<TaskRecord> = tasks.into_iter().filter(|t| !t.is_completed).collect();

    TaskSuggestions {
        suggestions: build_suggestions(&stats),
        top_urgent_tasks: prioritize(incomplete, now, offset, TOP_URGENT_LIMIT),
        stats,
        feature_enabled: true,
    }
}
