//! Device position lookup with a fixed fallback.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{Instrument, info, info_span, warn};

use crate::{error::LocationError, model::Coordinates};

pub const UNSUPPORTED_MESSAGE: &str = "Geolocation not available";
pub const FALLBACK_MESSAGE: &str = "You have disabled location service. Allow 'This APP' to access \
     your location. A default location will be used for calculating real-time weather.";

/// Knobs forwarded untouched to the platform geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Option<Duration>,
    pub maximum_age: Option<Duration>,
}

/// Platform geolocation capability: one position query per call.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self, options: &PositionOptions) -> Result<Coordinates, LocationError>;
}

/// Blocking-style alert shown to the user.
pub trait Notifier: Send + Sync + Debug {
    fn alert(&self, message: &str);
}

/// Result of a successful [`LocationProbe::acquire`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquisition {
    /// Position reported by the device.
    Located(Coordinates),
    /// Geolocation failed; the configured fallback is used instead.
    Fallback(Coordinates),
}

impl Acquisition {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Acquisition::Located(c) | Acquisition::Fallback(c) => *c,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Acquisition::Fallback(_))
    }
}

/// Single-shot position acquisition.
#[derive(Debug, Clone)]
pub struct LocationProbe {
    geolocator: Arc<dyn Geolocator>,
    notifier: Arc<dyn Notifier>,
    options: PositionOptions,
    fallback: Coordinates,
}

impl LocationProbe {
    pub fn new(geolocator: Arc<dyn Geolocator>, notifier: Arc<dyn Notifier>) -> Self {
        Self { geolocator, notifier, options: PositionOptions::default(), fallback: Coordinates::FALLBACK }
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_fallback(mut self, fallback: Coordinates) -> Self {
        self.fallback = fallback;
        self
    }

    /// Query the geolocator once.
    ///
    /// Every failure other than [`LocationError::Unsupported`] resolves to the
    /// fallback coordinates. Each failure raises exactly one alert; success
    /// raises none.
    pub async fn acquire(&self) -> Result<Acquisition, LocationError> {
        let span = info_span!("location.acquire", geolocator = ?self.geolocator);

        async move {
            match self.geolocator.current_position(&self.options).await {
                Ok(coords) => {
                    info!(lat = coords.latitude, lon = coords.longitude, "position acquired");
                    Ok(Acquisition::Located(coords))
                }
                Err(LocationError::Unsupported) => {
                    warn!("geolocation capability unsupported");
                    self.notifier.alert(UNSUPPORTED_MESSAGE);
                    Err(LocationError::Unsupported)
                }
                Err(err) => {
                    warn!(error = %err, fallback = %self.fallback, "geolocation failed; using fallback");
                    self.notifier.alert(FALLBACK_MESSAGE);
                    Ok(Acquisition::Fallback(self.fallback))
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Geolocator for hosts without any position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Approximate position from the public IP address (ip-api.com).
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    endpoint: String,
    http: Client,
}

pub const IP_API_ENDPOINT: &str = "http://ip-api.com/json";

impl IpGeolocator {
    pub fn new() -> Self {
        Self::with_endpoint(IP_API_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self, options: &PositionOptions) -> Result<Coordinates, LocationError> {
        let mut req = self.http.get(&self.endpoint).query(&[("fields", "status,message,lat,lon")]);
        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await.map_err(|err| {
            if err.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::Unavailable(err.to_string())
            }
        })?;

        let status = res.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(LocationError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!("lookup failed with status {status}")));
        }

        let body: IpApiResponse = res.json().await.map_err(|err| {
            if err.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::Unavailable(err.to_string())
            }
        })?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Unavailable(
                body.message.unwrap_or_else(|| "lookup returned no position".to_string()),
            )),
        }
    }
}
