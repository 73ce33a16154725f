//! WMO weather interpretation codes
//!
//! Codes follow the table published with the Open-Meteo API. The table is
//! sparse; codes outside it still get a description.

use std::borrow::Cow;

const WEATHER_CODES: &[(i32, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Foggy"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snow"),
    (73, "Moderate snow"),
    (75, "Heavy snow"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Human-readable description for a WMO code
pub fn describe_weather_code(code: i32) -> Cow<'static, str> {
    WEATHER_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| Cow::Borrowed(*description))
        .unwrap_or_else(|| Cow::Owned(format!("Unknown weather ({})", code)))
}

/// Whether the code is one of the published table entries
pub fn is_known_code(code: i32) -> bool {
    WEATHER_CODES.iter().any(|(c, _)| *c == code)
}

pub fn is_thunderstorm(code: i32) -> bool {
    code >= 95
}

/// Heavy rain, heavy freezing rain, heavy snow, violent showers
pub fn is_heavy_precipitation(code: i32) -> bool {
    matches!(code, 65 | 67 | 75 | 82 | 86)
}

/// Freezing drizzle and freezing rain
pub fn is_freezing_rain(code: i32) -> bool {
    matches!(code, 56 | 57 | 66 | 67)
}

pub fn is_moderate_precipitation(code: i32) -> bool {
    matches!(code, 61 | 63 | 71 | 73 | 80 | 81)
}

pub fn is_fog(code: i32) -> bool {
    matches!(code, 45 | 48)
}
