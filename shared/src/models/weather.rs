//! Weather forecast and alert models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DateRange;

/// One day of forecast data for a single location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Degrees Celsius
    pub temperature_max: f64,
    /// Degrees Celsius
    pub temperature_min: f64,
    /// WMO weather interpretation code
    pub weather_code: i32,
    pub precipitation_mm: f64,
    /// Percentage, 0-100
    pub precipitation_probability: i32,
    pub windspeed_kmh: f64,
}

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    /// Only produced by the three-level severity scheme
    Severe,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Severe => "severe",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Separator placed between reasons in [`Alert::message`]
pub const REASON_SEPARATOR: &str = " • ";

/// A weather alert for one forecast day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub level: AlertLevel,
    /// Never empty
    pub reasons: Vec<String>,
    pub message: String,
}

impl Alert {
    /// Build an alert from its level and reasons, deriving the message.
    ///
    /// Returns `None` when `reasons` is empty.
    pub fn from_reasons(level: AlertLevel, reasons: Vec<String>) -> Option<Self> {
        if reasons.is_empty() {
            return None;
        }
        let message = reasons.join(REASON_SEPARATOR);
        Some(Self {
            level,
            reasons,
            message,
        })
    }
}

/// Counts of alerts by level across a travel-alert request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertSummary {
    pub total_alerts: u32,
    pub severe_count: u32,
    pub warning_count: u32,
    pub info_count: u32,
    pub travel_days_checked: u32,
    pub date_range: DateRange,
}

impl AlertSummary {
    pub fn new(date_range: DateRange, travel_days_checked: u32) -> Self {
        Self {
            total_alerts: 0,
            severe_count: 0,
            warning_count: 0,
            info_count: 0,
            travel_days_checked,
            date_range,
        }
    }

    /// Count one emitted alert
    pub fn record(&mut self, level: AlertLevel) {
        match level {
            AlertLevel::Severe => self.severe_count += 1,
            AlertLevel::Warning => self.warning_count += 1,
            AlertLevel::Info => self.info_count += 1,
        }
        self.total_alerts += 1;
    }
}
