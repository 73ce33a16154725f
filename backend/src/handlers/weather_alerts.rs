//! HTTP handlers for travel weather alert endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::services::weather_alert::{
    CurrentWeatherResponse, MonitoredLocationsResponse, RefreshResponse, TravelAlertsResponse,
    WeatherAlertService,
};
use crate::AppState;

pub const DEFAULT_DAYS_AHEAD: u32 = 7;

fn default_days_ahead() -> u32 {
    DEFAULT_DAYS_AHEAD
}

/// Query parameters for travel alerts
#[derive(Debug, Deserialize, Validate)]
pub struct DaysAheadQuery {
    #[serde(default = "default_days_ahead")]
    #[validate(range(min = 1, max = 14, message = "days_ahead must be between 1 and 14"))]
    pub days_ahead: u32,
}

fn service(state: AppState) -> WeatherAlertService {
    WeatherAlertService::new(state.db, state.weather_client, &state.config)
}

/// Weather alerts for upcoming travel days
pub async fn get_travel_alerts(
    State(state): State<AppState>,
    Query(query): Query<DaysAheadQuery>,
) -> AppResult<Json<TravelAlertsResponse>> {
    query.validate()?;

    let report = service(state).travel_alerts(query.days_ahead).await?;
    Ok(Json(report))
}

/// Recompute travel alerts from fresh forecasts
pub async fn refresh_travel_alerts(
    State(state): State<AppState>,
    Query(query): Query<DaysAheadQuery>,
) -> AppResult<Json<RefreshResponse>> {
    query.validate()?;

    tracing::info!("Refreshing travel alerts for {} days", query.days_ahead);
    let report = service(state).refresh(query.days_ahead).await?;
    Ok(Json(report))
}

/// Locations checked for travel days
pub async fn get_monitored_locations(
    State(state): State<AppState>,
) -> Json<MonitoredLocationsResponse> {
    Json(service(state).monitored_locations())
}

/// Current conditions at each monitored location
pub async fn get_current_weather(State(state): State<AppState>) -> Json<CurrentWeatherResponse> {
    Json(service(state).current_conditions().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_ahead_bounds() {
        assert!(DaysAheadQuery { days_ahead: 1 }.validate().is_ok());
        assert!(DaysAheadQuery { days_ahead: 14 }.validate().is_ok());
        assert!(DaysAheadQuery { days_ahead: 0 }.validate().is_err());
        assert!(DaysAheadQuery { days_ahead: 15 }.validate().is_err());
    }

    #[test]
    fn test_days_ahead_defaults_to_seven() {
        let query: DaysAheadQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.days_ahead, 7);
    }
}
