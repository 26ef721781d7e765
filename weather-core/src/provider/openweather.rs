use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    icon::IconCode,
    model::{Coordinates, Temperature, WeatherReading},
};

use super::WeatherProvider;

/// Client for the OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    endpoint: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    /// `base_url` is the API root, e.g. `https://api.openweathermap.org/data/2.5/`.
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    pub fn with_client(base_url: &str, api_key: String, http: Client) -> Self {
        let endpoint = if base_url.ends_with('/') {
            format!("{base_url}weather")
        } else {
            format!("{base_url}/weather")
        };

        Self { endpoint, api_key, http }
    }

    async fn fetch_current(&self, query: &[(&str, String)]) -> Result<WeatherReading, FetchError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(query)
            .query(&[("units", "metric"), ("APPID", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "OpenWeather current request failed");
            return Err(FetchError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        let reading = parsed.into_reading()?;

        debug!(
            city = %reading.city,
            condition = %reading.condition_main,
            temp_c = reading.temperature.celsius,
            "OpenWeather reading received"
        );

        Ok(reading)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    visibility: Option<f64>,
    wind: Option<OwWind>,
}

impl OwCurrentResponse {
    fn into_reading(self) -> Result<WeatherReading, FetchError> {
        let weather = self.weather.into_iter().next().ok_or_else(|| {
            FetchError::Parse(serde::de::Error::custom("response contained no weather entry"))
        })?;

        Ok(WeatherReading {
            city: self.name,
            country_code: self.sys.country,
            temperature: Temperature::from_celsius(self.main.temp),
            humidity_pct: self.main.humidity.round() as i64,
            icon: IconCode::from_condition(&weather.main),
            condition_main: weather.main,
            provider_icon: weather.icon,
            visibility_km: self.visibility.map(|m| (m / 1000.0).round() as i64),
            wind_speed_mps: self.wind.map(|w| w.speed.round() as i64),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch_by_coordinates(&self, at: Coordinates) -> Result<WeatherReading, FetchError> {
        debug!(lat = at.latitude, lon = at.longitude, "fetching weather by coordinates");
        self.fetch_current(&[("lat", at.latitude.to_string()), ("lon", at.longitude.to_string())])
            .await
    }

    async fn fetch_by_city(&self, name: &str) -> Result<WeatherReading, FetchError> {
        debug!(city = name, "fetching weather by city");
        self.fetch_current(&[("q", name.to_string())]).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
