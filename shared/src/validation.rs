//! Validation utilities for Daybook

use crate::models::DailyForecast;
use crate::types::MonitoredLocation;

// ============================================================================
// Location Validations
// ============================================================================

/// Validate latitude/longitude are within WGS84 bounds
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a monitored location definition
pub fn validate_monitored_location(location: &MonitoredLocation) -> Result<(), &'static str> {
    if location.key.trim().is_empty() {
        return Err("Location key cannot be empty");
    }
    if location.name.trim().is_empty() {
        return Err("Location name cannot be empty");
    }
    if location.timezone.trim().is_empty() {
        return Err("Location timezone cannot be empty");
    }
    validate_coordinates(location.coordinates.latitude, location.coordinates.longitude)
}

// ============================================================================
// Forecast Validations
// ============================================================================

/// Check a forecast day holds physically sensible values.
///
/// The classifier never fails on odd input, but providers occasionally
/// return garbage worth logging.
pub fn validate_forecast(forecast: &DailyForecast) -> Result<(), &'static str> {
    let numbers = [
        forecast.temperature_max,
        forecast.temperature_min,
        forecast.precipitation_mm,
        forecast.windspeed_kmh,
    ];
    if numbers.iter().any(|n| !n.is_finite()) {
        return Err("Forecast contains non-finite values");
    }
    if forecast.temperature_min > forecast.temperature_max {
        return Err("Minimum temperature exceeds maximum");
    }
    if forecast.precipitation_mm < 0.0 {
        return Err("Precipitation cannot be negative");
    }
    if !(0..=100).contains(&forecast.precipitation_probability) {
        return Err("Precipitation probability must be between 0 and 100");
    }
    if forecast.windspeed_kmh < 0.0 {
        return Err("Wind speed cannot be negative");
    }
    Ok(())
}
