//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A place whose forecast is checked for travel days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoredLocation {
    /// Short key used in responses, e.g. "Dublin"
    pub key: String,
    /// Display name, e.g. "Dublin, Ireland"
    pub name: String,
    pub coordinates: Coordinates,
    /// IANA timezone the provider uses to bucket days
    pub timezone: String,
}

/// Inclusive date range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    #[serde(rename = "from")]
    pub start: NaiveDate,
    #[serde(rename = "to")]
    pub end: NaiveDate,
}
