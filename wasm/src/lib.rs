//! WebAssembly module for Daybook
//!
//! Provides client-side computation for:
//! - Task urgency scores and recommendation labels
//! - Weather code descriptions
//! - Forecast alert classification
//!
//! The browser runs exactly the rules the server runs, so an offline
//! dashboard can rank tasks and flag bad travel weather without a round trip.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// A task as sent from JavaScript
#[derive(Debug, Deserialize)]
struct TaskInput {
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
}

/// Score for one task, in input order
#[derive(Debug, Serialize, PartialEq)]
struct ScoredTask {
    index: usize,
    urgency_score: i32,
    recommendation: &'static str,
}

/// Accepts `2024-01-18T09:30:00`, `2024-01-18 09:30:00` or a bare date (midnight)
fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| format!("Invalid timestamp: {}", value))
}

fn score_task(priority: &str, due_date: Option<&str>, now: &str) -> Result<i32, String> {
    let now = parse_timestamp(now)?;
    let due_date = due_date.map(parse_timestamp).transpose()?;
    Ok(shared::urgency_score(
        Priority::parse_lenient(priority),
        due_date,
        now,
    ))
}

fn rank(tasks_json: &str, now: &str) -> Result<String, String> {
    let now = parse_timestamp(now)?;
    let tasks: Vec<TaskInput> =
        serde_json::from_str(tasks_json).map_err(|e| format!("Invalid tasks JSON: {}", e))?;

    let snapshots = tasks
        .iter()
        .map(|task| {
            let due_date = task.due_date.as_deref().map(parse_timestamp).transpose()?;
            let priority = task.priority.as_deref().and_then(Priority::parse_lenient);
            Ok(TaskSnapshot::new(priority, due_date))
        })
        .collect::<Result<Vec<_>, String>>()?;

    let ranked: Vec<ScoredTask> =
        shared::rank_by_urgency(snapshots.into_iter().enumerate().collect(), now, |(_, s)| {
            s.clone()
        })
        .into_iter()
        .map(|((index, _), score)| ScoredTask {
            index,
            urgency_score: score,
            recommendation: shared::Recommendation::from_score(score).label(),
        })
        .collect();

    serde_json::to_string(&ranked).map_err(|e| e.to_string())
}

/// Parse a snake_case setting name; an empty string selects the default
fn setting<T>(name: &str, kind: &str) -> Result<T, String>
where
    T: Default + serde::de::DeserializeOwned,
{
    if name.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("Unknown {}: {}", kind, name))
}

fn classifier_from(strategy: &str, scheme: &str) -> Result<shared::AlertClassifier, String> {
    Ok(shared::AlertClassifier::new(
        setting(strategy, "alert strategy")?,
        setting(scheme, "severity scheme")?,
    ))
}

fn classify(forecast_json: &str, strategy: &str, scheme: &str) -> Result<String, String> {
    let forecast: DailyForecast = serde_json::from_str(forecast_json)
        .map_err(|e| format!("Invalid forecast JSON: {}", e))?;

    if let Err(problem) = shared::validate_forecast(&forecast) {
        warn(&format!("Suspicious forecast for {}: {}", forecast.date, problem));
    }

    let alert = classifier_from(strategy, scheme)?.classify(&forecast);
    serde_json::to_string(&alert).map_err(|e| e.to_string())
}

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

/// Current local wall-clock time from the browser
#[cfg(target_arch = "wasm32")]
fn browser_now() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date(),
        now.get_hours(),
        now.get_minutes(),
        now.get_seconds()
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Urgency score for one task. `now` defaults to the browser's clock.
#[wasm_bindgen]
pub fn urgency_score_for(
    priority: &str,
    due_date: Option<String>,
    now: Option<String>,
) -> Result<i32, JsValue> {
    let now = now.unwrap_or_else(browser_now);
    score_task(priority, due_date.as_deref(), &now).map_err(js_error)
}

/// Recommendation label for a score
#[wasm_bindgen]
pub fn recommendation_for_score(score: i32) -> String {
    shared::Recommendation::from_score(score).label().to_string()
}

/// Rank a JSON array of `{priority, due_date}` tasks; returns scores highest first
#[wasm_bindgen]
pub fn rank_tasks(tasks_json: &str, now: Option<String>) -> Result<String, JsValue> {
    let now = now.unwrap_or_else(browser_now);
    rank(tasks_json, &now).map_err(js_error)
}

/// Description for a WMO weather code
#[wasm_bindgen]
pub fn describe_weather_code(code: i32) -> String {
    shared::describe_weather_code(code).into_owned()
}

/// Classify a JSON forecast day; returns the alert JSON or `null`
#[wasm_bindgen]
pub fn classify_forecast_json(
    forecast_json: &str,
    strategy: &str,
    scheme: &str,
) -> Result<String, JsValue> {
    classify(forecast_json, strategy, scheme).map_err(js_error)
}
