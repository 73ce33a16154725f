//! Weather alert classification
//!
//! A forecast day is run through an ordered rule table. Each rule carries
//! the level it raises and a reason template. How matches combine is chosen
//! by [`AlertStrategy`]; which levels and reason styling are used is chosen
//! by [`SeverityScheme`].

use serde::{Deserialize, Serialize};

use crate::models::{Alert, AlertLevel, DailyForecast};
use crate::weather_codes::{
    describe_weather_code, is_fog, is_freezing_rain, is_heavy_precipitation,
    is_moderate_precipitation, is_thunderstorm,
};

pub const FREEZING_TEMPERATURE_C: f64 = 0.0;
pub const EXTREME_HEAT_C: f64 = 35.0;
pub const STRONG_WIND_KMH: f64 = 50.0;
pub const HIGH_RAIN_CHANCE_PERCENT: i32 = 70;

/// How matching rules combine into one alert
///
/// Travel alerts default to `Accumulate` so every hazard of the day is
/// listed. `FirstMatch` with [`SeverityScheme::TwoLevel`] gives the short
/// form: one reason from the highest-ranked matching rule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertStrategy {
    /// The first matching rule decides the level and the only reason
    FirstMatch,
    /// Every matching rule adds its reason; the level is the highest matched
    #[default]
    Accumulate,
}

/// Which alert levels and reason styling are produced
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeverityScheme {
    /// `info` and `warning` only, plain reason text
    #[default]
    TwoLevel,
    /// Thunderstorms and freezing rain become `severe`; reasons get an emoji prefix
    ThreeLevel,
}

struct Rule {
    level: AlertLevel,
    /// Level under [`SeverityScheme::ThreeLevel`]
    escalated: AlertLevel,
    emoji: &'static str,
    matches: fn(&DailyForecast) -> bool,
    reason: fn(&DailyForecast, &str) -> String,
}

/// Round to a whole number, ties to even
fn whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

const RULES: &[Rule] = &[
    Rule {
        level: AlertLevel::Warning,
        escalated: AlertLevel::Severe,
        emoji: "⚡",
        matches: |f| is_thunderstorm(f.weather_code),
        reason: |_, _| "Thunderstorms expected".to_string(),
    },
    Rule {
        level: AlertLevel::Warning,
        escalated: AlertLevel::Warning,
        emoji: "🌧️",
        matches: |f| is_heavy_precipitation(f.weather_code),
        reason: |_, description| format!("Heavy precipitation: {}", description),
    },
    Rule {
        level: AlertLevel::Warning,
        escalated: AlertLevel::Severe,
        emoji: "❄️",
        matches: |f| is_freezing_rain(f.weather_code),
        reason: |_, _| "Freezing rain — dangerous travel conditions".to_string(),
    },
    Rule {
        level: AlertLevel::Warning,
        escalated: AlertLevel::Warning,
        emoji: "🥶",
        matches: |f| f.temperature_min < FREEZING_TEMPERATURE_C,
        reason: |f, _| format!("Freezing temperatures: {}°C", whole(f.temperature_min)),
    },
    Rule {
        level: AlertLevel::Warning,
        escalated: AlertLevel::Warning,
        emoji: "🔥",
        matches: |f| f.temperature_max > EXTREME_HEAT_C,
        reason: |f, _| format!("Extreme heat: {}°C", whole(f.temperature_max)),
    },
    Rule {
        level: AlertLevel::Info,
        escalated: AlertLevel::Info,
        emoji: "🌦️",
        matches: |f| is_moderate_precipitation(f.weather_code),
        reason: |_, description| description.to_string(),
    },
    Rule {
        level: AlertLevel::Info,
        escalated: AlertLevel::Info,
        emoji: "💨",
        matches: |f| f.windspeed_kmh > STRONG_WIND_KMH,
        reason: |f, _| format!("Strong winds: {} km/h", whole(f.windspeed_kmh)),
    },
    Rule {
        level: AlertLevel::Info,
        escalated: AlertLevel::Info,
        emoji: "☔",
        matches: |f| f.precipitation_probability >= HIGH_RAIN_CHANCE_PERCENT,
        reason: |f, _| format!("High chance of rain: {}%", f.precipitation_probability),
    },
    Rule {
        level: AlertLevel::Info,
        escalated: AlertLevel::Info,
        emoji: "🌫️",
        matches: |f| is_fog(f.weather_code),
        reason: |_, _| "Foggy conditions".to_string(),
    },
];

/// Decides whether a forecast day warrants an alert
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertClassifier {
    pub strategy: AlertStrategy,
    pub scheme: SeverityScheme,
}

impl AlertClassifier {
    pub fn new(strategy: AlertStrategy, scheme: SeverityScheme) -> Self {
        Self { strategy, scheme }
    }

    /// Classify one forecast day. `None` means no alert.
    pub fn classify(&self, forecast: &DailyForecast) -> Option<Alert> {
        let description = describe_weather_code(forecast.weather_code);
        let mut level: Option<AlertLevel> = None;
        let mut reasons = Vec::new();

        for rule in RULES.iter().filter(|rule| (rule.matches)(forecast)) {
            let (rule_level, reason) = self.apply(rule, forecast, &description);
            // Only ever upgrade
            level = Some(level.map_or(rule_level, |current| current.max(rule_level)));
            reasons.push(reason);

            if self.strategy == AlertStrategy::FirstMatch {
                break;
            }
        }

        level.and_then(|level| Alert::from_reasons(level, reasons))
    }

    fn apply(&self, rule: &Rule, forecast: &DailyForecast, description: &str) -> (AlertLevel, String) {
        let text = (rule.reason)(forecast, description);
        match self.scheme {
            SeverityScheme::TwoLevel => (rule.level, text),
            SeverityScheme::ThreeLevel => (rule.escalated, format!("{} {}", rule.emoji, text)),
        }
    }
}

/// Classify with the default classifier (accumulating, two-level)
pub fn classify(forecast: &DailyForecast) -> Option<Alert> {
    AlertClassifier::default().classify(forecast)
}
