//! HTTP request handlers

pub mod health;
pub mod smart_tasks;
pub mod weather_alerts;

pub use health::health_check;
pub use smart_tasks::{
    get_due_today_tasks, get_overdue_tasks, get_prioritized_tasks, get_task_suggestions,
};
pub use weather_alerts::{
    get_current_weather, get_monitored_locations, get_travel_alerts, refresh_travel_alerts,
};
