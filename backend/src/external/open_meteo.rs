//! Open-Meteo API client
//!
//! Open-Meteo is free and needs no API key. Daily forecasts feed the travel
//! alert classifier; current conditions feed the dashboard panel.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{describe_weather_code, validate_forecast, DailyForecast, MonitoredLocation};

use crate::error::{AppError, AppResult};

/// Name reported to API consumers
pub const DATA_SOURCE: &str = "Open-Meteo API (free)";

/// Public documentation URL
pub const DATA_SOURCE_URL: &str = "https://open-meteo.com/";

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode,\
precipitation_sum,precipitation_probability_max,windspeed_10m_max";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weathercode,windspeed_10m";

/// Open-Meteo forecast client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

/// Current conditions at a monitored location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub weather_code: i32,
    pub weather_description: String,
    pub windspeed_kmh: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

/// Open-Meteo daily forecast response
#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: DailyBlock,
}

/// Parallel arrays indexed by day; any entry may be null
#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m_max: Vec<Option<f64>>,
}

/// Open-Meteo current weather response
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: CurrentBlock,
    daily: Option<TodayBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    weathercode: Option<f64>,
    windspeed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TodayBlock {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    /// Create a client against the given forecast endpoint
    pub fn new(base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Fetch `days` days of daily forecast for a location, in its own timezone
    pub async fn daily_forecast(
        &self,
        location: &MonitoredLocation,
        days: u32,
    ) -> AppResult<Vec<DailyForecast>> {
        let query = [
            ("latitude", location.coordinates.latitude.to_string()),
            ("longitude", location.coordinates.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", location.timezone.clone()),
            ("forecast_days", days.to_string()),
        ];

        let body = self.fetch(&location.key, &query).await?;
        let data: DailyResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Unreadable Open-Meteo forecast for {}: {}", location.key, e);
            AppError::ExternalService(format!("Failed to parse forecast response: {}", e))
        })?;

        let forecasts = convert_daily_response(data);
        for forecast in &forecasts {
            if let Err(problem) = validate_forecast(forecast) {
                tracing::warn!(
                    location = %location.key,
                    date = %forecast.date,
                    "Suspicious forecast values: {}",
                    problem
                );
            }
        }

        tracing::debug!(
            "Fetched {} forecast days for {}",
            forecasts.len(),
            location.key
        );
        Ok(forecasts)
    }

    /// Fetch current conditions plus today's high and low
    pub async fn current_weather(&self, location: &MonitoredLocation) -> AppResult<CurrentConditions> {
        let query = [
            ("latitude", location.coordinates.latitude.to_string()),
            ("longitude", location.coordinates.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", "temperature_2m_max,temperature_2m_min".to_string()),
            ("timezone", location.timezone.clone()),
            ("forecast_days", "1".to_string()),
        ];

        let body = self.fetch(&location.key, &query).await?;
        let data: CurrentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Unreadable Open-Meteo conditions for {}: {}", location.key, e);
            AppError::ExternalService(format!("Failed to parse current weather response: {}", e))
        })?;

        Ok(convert_current_response(data))
    }

    async fn fetch(&self, location_key: &str, query: &[(&str, String)]) -> AppResult<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Open-Meteo request for {} failed: {}", location_key, e);
                AppError::WeatherServiceUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Open-Meteo returned {} for {}: {}",
                status,
                location_key,
                body
            );
            return Err(AppError::ExternalService(format!(
                "Weather API error: {}",
                status
            )));
        }

        response.text().await.map_err(|e| {
            tracing::error!("Reading Open-Meteo body for {} failed: {}", location_key, e);
            AppError::WeatherServiceUnavailable
        })
    }
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

/// Zip the parallel daily arrays into one record per day.
///
/// A day missing either temperature or the weather code is dropped, so no
/// forecast is classified for that date. Missing precipitation and wind
/// values count as 0.
fn convert_daily_response(data: DailyResponse) -> Vec<DailyForecast> {
    let daily = data.daily;

    daily
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, date)| {
            let temperature_max = value_at(&daily.temperature_2m_max, i)?;
            let temperature_min = value_at(&daily.temperature_2m_min, i)?;
            let weather_code = value_at(&daily.weathercode, i)?;

            Some(DailyForecast {
                date: *date,
                temperature_max,
                temperature_min,
                weather_code: weather_code as i32,
                precipitation_mm: value_at(&daily.precipitation_sum, i).unwrap_or(0.0),
                precipitation_probability: value_at(&daily.precipitation_probability_max, i)
                    .unwrap_or(0.0)
                    .round() as i32,
                windspeed_kmh: value_at(&daily.windspeed_10m_max, i).unwrap_or(0.0),
            })
        })
        .collect()
}

fn convert_current_response(data: CurrentResponse) -> CurrentConditions {
    let current = data.current;
    let weather_code = current.weathercode.unwrap_or(0.0) as i32;
    let temperature = current.temperature_2m.unwrap_or(0.0);

    let (temperature_max, temperature_min) = match data.daily {
        Some(today) => (
            value_at(&today.temperature_2m_max, 0).unwrap_or(temperature),
            value_at(&today.temperature_2m_min, 0).unwrap_or(temperature),
        ),
        None => (temperature, temperature),
    };

    CurrentConditions {
        temperature,
        temperature_max,
        temperature_min,
        weather_code,
        weather_description: describe_weather_code(weather_code).into_owned(),
        windspeed_kmh: current.windspeed_10m.unwrap_or(0.0),
        humidity: current.relative_humidity_2m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST_BODY: &str = r#"{
        "latitude": 53.35,
        "longitude": -6.26,
        "timezone": "Europe/Dublin",
        "daily_units": { "temperature_2m_max": "°C" },
        "daily": {
            "time": ["2024-01-18", "2024-01-19", "2024-01-20"],
            "temperature_2m_max": [8.4, 3.1, null],
            "temperature_2m_min": [2.0, -4.2, null],
            "weathercode": [3, 66, 95],
            "precipitation_sum": [0.0, 4.5, null],
            "precipitation_probability_max": [10, 85, null],
            "windspeed_10m_max": [14.2, 38.0, 62.5]
        }
    }"#;

    #[test]
    fn test_convert_daily_response() {
        let data: DailyResponse = serde_json::from_str(FORECAST_BODY).unwrap();
        let forecasts = convert_daily_response(data);

        assert_eq!(forecasts.len(), 2);
        assert_eq!(forecasts[0].date, NaiveDate::from_ymd_opt(2024, 1, 18).unwrap());
        assert_eq!(forecasts[1].weather_code, 66);
        assert_eq!(forecasts[1].temperature_min, -4.2);
        assert_eq!(forecasts[1].precipitation_probability, 85);
        assert_eq!(forecasts[1].windspeed_kmh, 38.0);
    }

    #[test]
    fn test_day_without_temperatures_is_dropped() {
        // Thunderstorm code but no temperatures: nothing to classify
        let data: DailyResponse = serde_json::from_str(FORECAST_BODY).unwrap();
        let forecasts = convert_daily_response(data);

        let stormy = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert!(forecasts.iter().all(|f| f.date != stormy));
    }

    #[test]
    fn test_all_null_day_is_dropped() {
        let body = r#"{ "daily": {
            "time": ["2024-01-20"],
            "temperature_2m_max": [null],
            "temperature_2m_min": [null],
            "weathercode": [null],
            "precipitation_sum": [null],
            "precipitation_probability_max": [null],
            "windspeed_10m_max": [null]
        } }"#;
        let data: DailyResponse = serde_json::from_str(body).unwrap();
        assert!(convert_daily_response(data).is_empty());
    }

    #[test]
    fn test_short_arrays_drop_missing_days() {
        let body = r#"{ "daily": {
            "time": ["2024-01-18", "2024-01-19"],
            "temperature_2m_max": [6.0, 7.0],
            "temperature_2m_min": [1.0, 2.0],
            "weathercode": [45]
        } }"#;
        let data: DailyResponse = serde_json::from_str(body).unwrap();
        let forecasts = convert_daily_response(data);

        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].weather_code, 45);
        assert_eq!(forecasts[0].precipitation_mm, 0.0);
        assert_eq!(forecasts[0].precipitation_probability, 0);
        assert_eq!(forecasts[0].windspeed_kmh, 0.0);
    }

    #[test]
    fn test_convert_current_response() {
        let body = r#"{
            "current": {
                "temperature_2m": 9.6,
                "relative_humidity_2m": 81,
                "weathercode": 61,
                "windspeed_10m": 22.3
            },
            "daily": {
                "time": ["2024-01-18"],
                "temperature_2m_max": [11.2],
                "temperature_2m_min": [5.9]
            }
        }"#;
        let data: CurrentResponse = serde_json::from_str(body).unwrap();
        let conditions = convert_current_response(data);

        assert_eq!(conditions.temperature, 9.6);
        assert_eq!(conditions.temperature_max, 11.2);
        assert_eq!(conditions.temperature_min, 5.9);
        assert_eq!(conditions.weather_code, 61);
        assert_eq!(conditions.weather_description, "Slight rain");
        assert_eq!(conditions.humidity, Some(81.0));
    }

    #[test]
    fn test_current_without_daily_block() {
        let body = r#"{ "current": { "temperature_2m": 4.0, "weathercode": 3, "windspeed_10m": 5.0 } }"#;
        let data: CurrentResponse = serde_json::from_str(body).unwrap();
        let conditions = convert_current_response(data);

        assert_eq!(conditions.temperature_max, 4.0);
        assert_eq!(conditions.temperature_min, 4.0);
        assert_eq!(conditions.humidity, None);
    }

    #[test]
    fn test_client_builds() {
        let client = OpenMeteoClient::new(
            "https://api.open-meteo.com/v1/forecast".to_string(),
            Duration::from_secs(5),
        );
        assert!(client.is_ok());
    }
}
