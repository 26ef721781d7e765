use std::fmt;

use serde::{Deserialize, Serialize};

use crate::icon::IconCode;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Location used when the device position cannot be read (New Delhi).
    pub const FALLBACK: Coordinates = Coordinates { latitude: 28.67, longitude: 77.22 };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

/// Both temperature scales, always derived from one raw Celsius value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temperature {
    pub celsius: i64,
    pub fahrenheit: i64,
}

impl Temperature {
    pub fn from_celsius(raw: f64) -> Self {
        Self {
            celsius: raw.round() as i64,
            fahrenheit: (raw * 1.8 + 32.0).round() as i64,
        }
    }
}

/// Normalized snapshot of current conditions for one location.
///
/// A reading is never patched in place: every successful fetch produces a
/// new one that replaces the previous value wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub country_code: String,
    pub temperature: Temperature,
    pub humidity_pct: i64,
    pub condition_main: String,
    pub icon: IconCode,
    /// Raw provider icon id, e.g. `"04d"`.
    pub provider_icon: String,
    pub visibility_km: Option<i64>,
    pub wind_speed_mps: Option<i64>,
}

impl WeatherReading {
    pub fn temperature_celsius(&self) -> i64 {
        self.temperature.celsius
    }

    pub fn temperature_fahrenheit(&self) -> i64 {
        self.temperature.fahrenheit
    }

    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}.png", self.provider_icon)
    }
}

/// What the search panel shows after a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    pub query_text: String,
    pub message: String,
}

impl ErrorState {
    pub const NOT_FOUND: &'static str = "Not Found";

    pub fn not_found(query_text: impl Into<String>) -> Self {
        Self { query_text: query_text.into(), message: Self::NOT_FOUND.to_string() }
    }
}

/// Outcome of the most recent city search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchResult {
    Found(WeatherReading),
    Failed(ErrorState),
}

impl SearchResult {
    pub fn reading(&self) -> Option<&WeatherReading> {
        match self {
            SearchResult::Found(reading) => Some(reading),
            SearchResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorState> {
        match self {
            SearchResult::Found(_) => None,
            SearchResult::Failed(err) => Some(err),
        }
    }
}
