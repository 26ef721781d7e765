use serde::{Deserialize, Serialize};

/// Pictogram shown for the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IconCode {
    #[default]
    ClearDay,
    Cloudy,
    Rain,
    Snow,
    Wind,
    Sleet,
    Fog,
}

impl IconCode {
    /// Map the provider's `weather[0].main` vocabulary onto an icon.
    ///
    /// Matching is exact and case-sensitive; anything unrecognized is `ClearDay`.
    pub fn from_condition(condition_main: &str) -> Self {
        match condition_main {
            "Haze" => IconCode::ClearDay,
            "Clouds" => IconCode::Cloudy,
            "Rain" => IconCode::Rain,
            "Snow" => IconCode::Snow,
            "Dust" | "Tornado" => IconCode::Wind,
            "Drizzle" => IconCode::Sleet,
            "Fog" | "Smoke" => IconCode::Fog,
            _ => IconCode::ClearDay,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconCode::ClearDay => "CLEAR_DAY",
            IconCode::Cloudy => "CLOUDY",
            IconCode::Rain => "RAIN",
            IconCode::Snow => "SNOW",
            IconCode::Wind => "WIND",
            IconCode::Sleet => "SLEET",
            IconCode::Fog => "FOG",
        }
    }

    pub const fn all() -> &'static [IconCode] {
        &[
            IconCode::ClearDay,
            IconCode::Cloudy,
            IconCode::Rain,
            IconCode::Snow,
            IconCode::Wind,
            IconCode::Sleet,
            IconCode::Fog,
        ]
    }
}

impl std::fmt::Display for IconCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorthand for [`IconCode::from_condition`].
pub fn map_icon(condition_main: &str) -> IconCode {
    IconCode::from_condition(condition_main)
}
