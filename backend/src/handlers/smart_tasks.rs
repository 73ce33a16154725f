//! HTTP handlers for smart task endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::UserContext;
use crate::services::smart_task::{
    DueTodayTask, OverdueTask, PrioritizedTask, SmartTaskService, TaskSuggestions,
};
use crate::AppState;

pub const DEFAULT_PRIORITIZED_LIMIT: u32 = 10;

fn default_limit() -> u32 {
    DEFAULT_PRIORITIZED_LIMIT
}

/// Query parameters for the prioritized task list
#[derive(Debug, Deserialize, Validate)]
pub struct PrioritizedQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: u32,
}

fn service(state: AppState) -> SmartTaskService {
    SmartTaskService::new(state.db, state.config.tasks.utc_offset())
}

/// Incomplete tasks ranked by urgency
pub async fn get_prioritized_tasks(
    State(state): State<AppState>,
    user: UserContext,
    Query(query): Query<PrioritizedQuery>,
) -> AppResult<Json<Vec<PrioritizedTask>>> {
    query.validate()?;

    let tasks = service(state)
        .prioritized(query.limit as usize, user.user_id())
        .await?;
    Ok(Json(tasks))
}

/// Incomplete tasks whose due day has passed
pub async fn get_overdue_tasks(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<Vec<OverdueTask>>> {
    let tasks = service(state).overdue(user.user_id()).await?;
    Ok(Json(tasks))
}

/// Incomplete tasks due today
pub async fn get_due_today_tasks(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<Vec<DueTodayTask>>> {
    let tasks = service(state).due_today(user.user_id()).await?;
    Ok(Json(tasks))
}

/// Task stats, top urgent tasks and suggestions
pub async fn get_task_suggestions(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<TaskSuggestions>> {
    let suggestions = service(state).suggestions(user.user_id()).await?;
    Ok(Json(suggestions))
}
