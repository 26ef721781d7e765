use chrono::{DateTime, TimeZone};
use weather_core::{SearchResult, WeatherReading, format_datetime};

pub const LOADING: &str = "Detecting your location...\n\
     Your current location will be used for calculating real-time weather.";

/// Primary display: location, icon, date and temperature.
pub fn current<Tz: TimeZone>(reading: &WeatherReading, now: &DateTime<Tz>) -> String {
    format!(
        "{}, {}\n  [{}] {}\n  {}\n  {}°C / {}°F  humidity {}%",
        reading.city,
        reading.country_code,
        reading.icon,
        reading.condition_main,
        format_datetime(now),
        reading.temperature_celsius(),
        reading.temperature_fahrenheit(),
        reading.humidity_pct,
    )
}

/// Search panel: detailed reading, or the failed query.
pub fn search_result(result: &SearchResult) -> String {
    match result {
        SearchResult::Found(reading) => {
            let mut out = format!(
                "{}, {}  ({})\n  Temperature  {}°c ({})\n  Humidity     {}%",
                reading.city,
                reading.country_code,
                reading.icon_url(),
                reading.temperature_celsius(),
                reading.condition_main,
                reading.humidity_pct,
            );
            if let Some(km) = reading.visibility_km {
                out.push_str(&format!("\n  Visibility   {km} km"));
            }
            if let Some(speed) = reading.wind_speed_mps {
                out.push_str(&format!("\n  Wind Speed   {speed} m/s"));
            }
            out
        }
        SearchResult::Failed(err) => format!("{} {}", err.query_text, err.message),
    }
}
