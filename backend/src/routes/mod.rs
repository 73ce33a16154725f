//! Route definitions for the Daybook server

use axum::{middleware, routing::get, Router};

use crate::{handlers, middleware::user_context_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Smart task views, optionally scoped by X-User-Id
        .nest("/tasks", smart_task_routes())
        // Travel weather alerts
        .nest("/weather", weather_routes())
}

/// Smart task routes
fn smart_task_routes() -> Router<AppState> {
    Router::new()
        .route("/prioritized", get(handlers::get_prioritized_tasks))
        .route("/overdue", get(handlers::get_overdue_tasks))
        .route("/due-today", get(handlers::get_due_today_tasks))
        .route("/suggestions", get(handlers::get_task_suggestions))
        .route_layer(middleware::from_fn(user_context_middleware))
}

/// Weather alert routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(handlers::get_travel_alerts))
        .route("/refresh", get(handlers::refresh_travel_alerts))
        .route("/locations", get(handlers::get_monitored_locations))
        .route("/current", get(handlers::get_current_weather))
}
