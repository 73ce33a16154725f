//! Weather alert service
//!
//! Checks upcoming travel-day tasks against each monitored location's
//! forecast and reports the days worth a warning.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use shared::{
    describe_weather_code, Alert, AlertClassifier, AlertSummary, DailyForecast, DateRange,
    MonitoredLocation,
};
use sqlx::PgPool;

use crate::config::{Config, MAX_FORECAST_DAYS};
use crate::error::AppResult;
use crate::external::open_meteo::{
    CurrentConditions, OpenMeteoClient, DATA_SOURCE, DATA_SOURCE_URL,
};
use crate::models::{Priority, TaskRecord, TASK_COLUMNS};

/// Weather alert service
#[derive(Clone)]
pub struct WeatherAlertService {
    db: PgPool,
    client: OpenMeteoClient,
    classifier: AlertClassifier,
    locations: Vec<MonitoredLocation>,
    forecast_days: u32,
    offset: FixedOffset,
}

/// The travel task an alert is about
#[derive(Debug, Clone, Serialize)]
pub struct TravelTask {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub travel_date: NaiveDate,
    pub list_id: Option<i64>,
}

/// Forecast and alert for one location on a travel day
#[derive(Debug, Clone, Serialize)]
pub struct LocationWeather {
    pub location: String,
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub weather_code: i32,
    pub weather_description: String,
    pub precipitation_mm: f64,
    pub precipitation_probability: i32,
    pub windspeed_kmh: f64,
    pub alert: Alert,
}

/// A travel day with at least one location alert, keyed by location key
#[derive(Debug, Clone, Serialize)]
pub struct TravelDayAlert {
    pub task: TravelTask,
    pub weather: BTreeMap<String, LocationWeather>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelAlertsResponse {
    pub alerts: Vec<TravelDayAlert>,
    pub summary: AlertSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshMetadata {
    pub refreshed_at: DateTime<Utc>,
    pub requested_days: u32,
    pub data_source: String,
    pub locations: Vec<String>,
}

/// Travel alerts recomputed on demand, with provenance
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    #[serde(flatten)]
    pub report: TravelAlertsResponse,
    pub refresh_metadata: RefreshMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSourceInfo {
    pub name: String,
    pub url: String,
    pub api_key_required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoredLocationsResponse {
    pub locations: Vec<MonitoredLocation>,
    pub data_source: DataSourceInfo,
}

/// Current conditions for one location, or why they are missing
#[derive(Debug, Clone, Serialize)]
pub struct CurrentLocationWeather {
    pub key: String,
    pub name: String,
    #[serde(flatten)]
    pub conditions: Option<CurrentConditions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentWeatherResponse {
    pub locations: Vec<CurrentLocationWeather>,
    pub updated_at: DateTime<Utc>,
    pub data_source: String,
}

/// Forecast days fetched for one location
#[derive(Debug, Clone)]
pub struct LocationForecast {
    pub location: MonitoredLocation,
    pub days: Vec<DailyForecast>,
}

impl LocationForecast {
    fn day(&self, date: NaiveDate) -> Option<&DailyForecast> {
        self.days.iter().find(|d| d.date == date)
    }
}

impl WeatherAlertService {
    /// Create a new WeatherAlertService from the weather and task settings
    pub fn new(db: PgPool, client: OpenMeteoClient, config: &Config) -> Self {
        Self {
            db,
            client,
            classifier: config.weather.classifier(),
            locations: config.weather.locations.clone(),
            forecast_days: config.weather.forecast_days,
            offset: config.tasks.utc_offset(),
        }
    }

    /// Alerts for incomplete travel-day tasks due within `days_ahead` days
    pub async fn travel_alerts(&self, days_ahead: u32) -> AppResult<TravelAlertsResponse> {
        let now = Utc::now();
        let window_end = now + Duration::days(i64::from(days_ahead));

        let tasks = self.upcoming_travel_tasks(now, window_end).await?;
        let today = now.with_timezone(&self.offset).date_naive();
        let date_range = DateRange {
            start: today,
            end: today + Duration::days(i64::from(days_ahead)),
        };

        if tasks.is_empty() {
            tracing::debug!("No travel days in the next {} days", days_ahead);
            return Ok(TravelAlertsResponse {
                alerts: Vec::new(),
                summary: AlertSummary::new(date_range, 0),
            });
        }

        let forecasts = self.fetch_forecasts(days_ahead).await;
        let report = assemble_travel_alerts(
            &tasks,
            &forecasts,
            &self.classifier,
            &self.offset,
            date_range,
        );

        tracing::info!(
            "Checked {} travel days: {} alerts ({} warning, {} info)",
            report.summary.travel_days_checked,
            report.summary.total_alerts,
            report.summary.warning_count,
            report.summary.info_count
        );
        Ok(report)
    }

    /// Same as `travel_alerts`, stamped with when and from where it was computed
    pub async fn refresh(&self, days_ahead: u32) -> AppResult<RefreshResponse> {
        let report = self.travel_alerts(days_ahead).await?;

        Ok(RefreshResponse {
            report,
            refresh_metadata: RefreshMetadata {
                refreshed_at: Utc::now(),
                requested_days: days_ahead,
                data_source: DATA_SOURCE.to_string(),
                locations: self.locations.iter().map(|l| l.key.clone()).collect(),
            },
        })
    }

    /// Configured locations and the forecast provider
    pub fn monitored_locations(&self) -> MonitoredLocationsResponse {
        MonitoredLocationsResponse {
            locations: self.locations.clone(),
            data_source: DataSourceInfo {
                name: DATA_SOURCE.to_string(),
                url: DATA_SOURCE_URL.to_string(),
                api_key_required: false,
            },
        }
    }

    /// Current conditions at every location; a failing location reports its error
    pub async fn current_conditions(&self) -> CurrentWeatherResponse {
        let mut locations = Vec::with_capacity(self.locations.len());

        for location in &self.locations {
            let entry = match self.client.current_weather(location).await {
                Ok(conditions) => CurrentLocationWeather {
                    key: location.key.clone(),
                    name: location.name.clone(),
                    conditions: Some(conditions),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("No current weather for {}: {}", location.key, e);
                    CurrentLocationWeather {
                        key: location.key.clone(),
                        name: location.name.clone(),
                        conditions: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            locations.push(entry);
        }

        CurrentWeatherResponse {
            locations,
            updated_at: Utc::now(),
            data_source: DATA_SOURCE.to_string(),
        }
    }

    async fn upcoming_travel_tasks(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<TaskRecord>> {
        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE is_travel_day = TRUE AND is_completed = FALSE \
               AND due_date >= $1 AND due_date <= $2 \
             ORDER BY due_date ASC, id",
            TASK_COLUMNS
        );

        let tasks = sqlx::query_as::<_, TaskRecord>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.db)
            .await?;

        Ok(tasks)
    }

    /// One request per location; failed locations are logged and left out
    async fn fetch_forecasts(&self, days_ahead: u32) -> Vec<LocationForecast> {
        let days = self
            .forecast_days
            .max(days_ahead + 1)
            .min(MAX_FORECAST_DAYS);

        let mut forecasts = Vec::with_capacity(self.locations.len());
        for location in &self.locations {
            match self.client.daily_forecast(location, days).await {
                Ok(days) => forecasts.push(LocationForecast {
                    location: location.clone(),
                    days,
                }),
                Err(e) => {
                    tracing::warn!("Skipping {}: forecast unavailable ({})", location.key, e)
                }
            }
        }
        forecasts
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn location_weather(
    location: &MonitoredLocation,
    forecast: &DailyForecast,
    alert: Alert,
) -> LocationWeather {
    LocationWeather {
        location: location.name.clone(),
        date: forecast.date,
        temperature_max: one_decimal(forecast.temperature_max),
        temperature_min: one_decimal(forecast.temperature_min),
        weather_code: forecast.weather_code,
        weather_description: describe_weather_code(forecast.weather_code).into_owned(),
        precipitation_mm: one_decimal(forecast.precipitation_mm),
        precipitation_probability: forecast.precipitation_probability,
        windspeed_kmh: one_decimal(forecast.windspeed_kmh),
        alert,
    }
}

/// Classify every (travel task, location) pair.
///
/// Tasks without an alert at any location are left out, as are locations
/// whose forecast has no entry for the travel date.
pub fn assemble_travel_alerts(
    tasks: &[TaskRecord],
    forecasts: &[LocationForecast],
    classifier: &AlertClassifier,
    offset: &FixedOffset,
    date_range: DateRange,
) -> TravelAlertsResponse {
    let mut summary = AlertSummary::new(date_range, tasks.len() as u32);
    let mut alerts = Vec::new();

    for task in tasks {
        let (Some(due_date), Some(travel_date)) = (task.due_date, task.due_day(offset)) else {
            continue;
        };

        let mut weather = BTreeMap::new();
        for forecast in forecasts {
            let Some(day) = forecast.day(travel_date) else {
                tracing::debug!(
                    "No forecast for {} on {}",
                    forecast.location.key,
                    travel_date
                );
                continue;
            };

            if let Some(alert) = classifier.classify(day) {
                summary.record(alert.level);
                weather.insert(
                    forecast.location.key.clone(),
                    location_weather(&forecast.location, day, alert),
                );
            }
        }

        if !weather.is_empty() {
            alerts.push(TravelDayAlert {
                task: TravelTask {
                    id: task.id,
                    title: task.title.clone(),
                    description: task.description.clone(),
                    priority: task.effective_priority(),
                    due_date,
                    travel_date,
                    list_id: task.list_id,
                },
                weather,
            });
        }
    }

    TravelAlertsResponse { alerts, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_task;
    use chrono::TimeZone;
    use shared::{AlertLevel, AlertStrategy, Coordinates, SeverityScheme};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn location(key: &str) -> MonitoredLocation {
        MonitoredLocation {
            key: key.to_string(),
            name: format!("{} (test)", key),
            coordinates: Coordinates::new(50.0, 0.0),
            timezone: "UTC".to_string(),
        }
    }

    fn benign(day: u32) -> DailyForecast {
        DailyForecast {
            date: date(day),
            temperature_max: 22.0,
            temperature_min: 15.0,
            weather_code: 0,
            precipitation_mm: 0.0,
            precipitation_probability: 5,
            windspeed_kmh: 10.0,
        }
    }

    fn travel_task(id: i64, day: u32) -> TaskRecord {
        TaskRecord {
            is_travel_day: true,
            ..sample_task(id, "high", Some(Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()))
        }
    }

    fn range() -> DateRange {
        DateRange {
            start: date(18),
            end: date(25),
        }
    }

    #[test]
    fn test_only_alerting_tasks_and_locations_are_reported() {
        let stormy = DailyForecast {
            weather_code: 95,
            ..benign(20)
        };
        let foggy = DailyForecast {
            weather_code: 45,
            ..benign(20)
        };
        let forecasts = vec![
            LocationForecast {
                location: location("Dublin"),
                days: vec![benign(19), stormy],
            },
            LocationForecast {
                location: location("Paris"),
                days: vec![benign(19), foggy],
            },
        ];
        let tasks = vec![travel_task(1, 19), travel_task(2, 20)];

        let report = assemble_travel_alerts(
            &tasks,
            &forecasts,
            &AlertClassifier::default(),
            &utc(),
            range(),
        );

        assert_eq!(report.alerts.len(), 1);
        let alert = &report.alerts[0];
        assert_eq!(alert.task.id, 2);
        assert_eq!(alert.task.travel_date, date(20));
        assert_eq!(alert.weather["Dublin"].alert.level, AlertLevel::Warning);
        assert_eq!(alert.weather["Dublin"].weather_description, "Thunderstorm");
        assert_eq!(alert.weather["Paris"].alert.level, AlertLevel::Info);

        assert_eq!(report.summary.travel_days_checked, 2);
        assert_eq!(report.summary.total_alerts, 2);
        assert_eq!(report.summary.warning_count, 1);
        assert_eq!(report.summary.info_count, 1);
        assert_eq!(report.summary.date_range, range());
    }

    #[test]
    fn test_missing_forecast_day_is_skipped() {
        let forecasts = vec![LocationForecast {
            location: location("Dublin"),
            days: vec![DailyForecast {
                weather_code: 95,
                ..benign(18)
            }],
        }];
        let tasks = vec![travel_task(1, 24)];

        let report = assemble_travel_alerts(
            &tasks,
            &forecasts,
            &AlertClassifier::default(),
            &utc(),
            range(),
        );

        assert!(report.alerts.is_empty());
        assert_eq!(report.summary.total_alerts, 0);
        assert_eq!(report.summary.travel_days_checked, 1);
    }

    #[test]
    fn test_no_forecasts_at_all() {
        let tasks = vec![travel_task(1, 19)];
        let report =
            assemble_travel_alerts(&tasks, &[], &AlertClassifier::default(), &utc(), range());
        assert!(report.alerts.is_empty());
        assert_eq!(report.summary.travel_days_checked, 1);
    }

    #[test]
    fn test_classifier_settings_flow_through() {
        let freezing_storm = DailyForecast {
            weather_code: 96,
            temperature_min: -3.0,
            ..benign(19)
        };
        let forecasts = vec![LocationForecast {
            location: location("Dublin"),
            days: vec![freezing_storm],
        }];
        let tasks = vec![travel_task(1, 19)];

        let accumulate = assemble_travel_alerts(
            &tasks,
            &forecasts,
            &AlertClassifier::default(),
            &utc(),
            range(),
        );
        assert_eq!(accumulate.alerts[0].weather["Dublin"].alert.reasons.len(), 2);

        let first_match = assemble_travel_alerts(
            &tasks,
            &forecasts,
            &AlertClassifier::new(AlertStrategy::FirstMatch, SeverityScheme::ThreeLevel),
            &utc(),
            range(),
        );
        let alert = &first_match.alerts[0].weather["Dublin"].alert;
        assert_eq!(alert.reasons.len(), 1);
        assert_eq!(alert.level, AlertLevel::Severe);
        assert_eq!(first_match.summary.severe_count, 1);
    }

    #[test]
    fn test_location_weather_rounds_to_one_decimal() {
        let forecast = DailyForecast {
            temperature_max: 36.26,
            windspeed_kmh: 12.349,
            ..benign(19)
        };
        let alert = AlertClassifier::default().classify(&forecast).unwrap();
        let weather = location_weather(&location("Dublin"), &forecast, alert);

        assert_eq!(weather.temperature_max, 36.3);
        assert_eq!(weather.windspeed_kmh, 12.3);
        assert_eq!(weather.location, "Dublin (test)");
    }

    #[test]
    fn test_current_weather_error_serialization() {
        let entry = CurrentLocationWeather {
            key: "Dublin".to_string(),
            name: "Dublin, Ireland".to_string(),
            conditions: None,
            error: Some("Weather service unavailable".to_string()),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["key"], "Dublin");
        assert_eq!(json["error"], "Weather service unavailable");
        assert!(json.get("temperature").is_none());
    }
}
