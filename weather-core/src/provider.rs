use crate::{Config, FetchError, WeatherReading, model::Coordinates};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Source of current-conditions readings.
///
/// Each call is a single attempt; retrying is left to the caller.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_coordinates(&self, at: Coordinates) -> Result<WeatherReading, FetchError>;

    async fn fetch_by_city(&self, name: &str) -> Result<WeatherReading, FetchError>;
}

/// Construct the OpenWeather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let client = OpenWeatherClient::new(&config.base_url, api_key.to_owned());
    Ok(Arc::new(client))
}
