//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the normalized reading it produces
//! - Device location lookup with a fixed fallback
//! - The periodic refresh task and the city search panel state
//!
//! It is used by `weather-cli`, but the display-facing pieces carry no
//! terminal assumptions and can back any front end.

pub mod config;
pub mod date;
pub mod error;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod scheduler;
pub mod search;

#[cfg(test)]
mod test_support;

pub use config::{Config, GeolocationMode};
pub use date::{format_date, format_datetime};
pub use error::{FetchError, LocationError};
pub use icon::{IconCode, map_icon};
pub use location::{Acquisition, Geolocator, LocationProbe, Notifier, PositionOptions};
pub use model::{Coordinates, ErrorState, SearchResult, Temperature, WeatherReading};
pub use provider::{OpenWeatherClient, WeatherProvider, provider_from_config};
pub use scheduler::{DisplayState, RefreshHandle, RefreshScheduler};
pub use search::{Key, SearchPanel};
