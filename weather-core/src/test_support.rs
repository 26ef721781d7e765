//! In-memory collaborators shared by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    error::{FetchError, LocationError},
    icon::IconCode,
    location::{Geolocator, Notifier, PositionOptions},
    model::{Coordinates, Temperature, WeatherReading},
    provider::WeatherProvider,
};

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().expect("lock").push(message.to_string());
    }
}

#[derive(Debug)]
pub enum ScriptedGeolocator {
    At(Coordinates),
    Denied,
    TimedOut,
    Unavailable,
}

#[async_trait]
impl Geolocator for ScriptedGeolocator {
    async fn current_position(&self, _: &PositionOptions) -> Result<Coordinates, LocationError> {
        match self {
            ScriptedGeolocator::At(c) => Ok(*c),
            ScriptedGeolocator::Denied => Err(LocationError::PermissionDenied),
            ScriptedGeolocator::TimedOut => Err(LocationError::Timeout),
            ScriptedGeolocator::Unavailable => Err(LocationError::Unavailable("no fix".into())),
        }
    }
}

pub fn reading(city: &str, condition: &str, raw_celsius: f64) -> WeatherReading {
    WeatherReading {
        city: city.to_string(),
        country_code: "XX".to_string(),
        temperature: Temperature::from_celsius(raw_celsius),
        humidity_pct: 50,
        condition_main: condition.to_string(),
        icon: IconCode::from_condition(condition),
        provider_icon: "01d".to_string(),
        visibility_km: Some(10),
        wind_speed_mps: Some(3),
    }
}

fn server_error() -> FetchError {
    FetchError::Status { status: 500, body: "boom".to_string() }
}

/// Provider answering from scripted data.
///
/// Coordinate lookups pop `coordinate_script` (`None` = failure) and fall back
/// to a fixed reading once the script is exhausted. City lookups succeed only
/// for cities registered with [`FakeProvider::with_city`].
#[derive(Debug, Default)]
pub struct FakeProvider {
    coordinate_script: Mutex<VecDeque<Option<WeatherReading>>>,
    coordinate_calls: Mutex<Vec<Coordinates>>,
    coordinate_delay: Option<Duration>,
    cities: HashMap<String, (WeatherReading, Duration)>,
    city_calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(self, script: impl IntoIterator<Item = Option<WeatherReading>>) -> Self {
        *self.coordinate_script.lock().expect("lock") = script.into_iter().collect();
        self
    }

    pub fn with_coordinate_delay(mut self, delay: Duration) -> Self {
        self.coordinate_delay = Some(delay);
        self
    }

    pub fn with_city(mut self, reading: WeatherReading, delay: Duration) -> Self {
        self.cities.insert(reading.city.clone(), (reading, delay));
        self
    }

    pub fn coordinate_calls(&self) -> Vec<Coordinates> {
        self.coordinate_calls.lock().expect("lock").clone()
    }

    pub fn city_calls(&self) -> Vec<String> {
        self.city_calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch_by_coordinates(&self, at: Coordinates) -> Result<WeatherReading, FetchError> {
        self.coordinate_calls.lock().expect("lock").push(at);
        let next = self.coordinate_script.lock().expect("lock").pop_front();

        if let Some(delay) = self.coordinate_delay {
            tokio::time::sleep(delay).await;
        }

        match next {
            Some(Some(reading)) => Ok(reading),
            Some(None) => Err(server_error()),
            None => Ok(reading("Delhi", "Haze", 30.0)),
        }
    }

    async fn fetch_by_city(&self, name: &str) -> Result<WeatherReading, FetchError> {
        self.city_calls.lock().expect("lock").push(name.to_string());

        match self.cities.get(name) {
            Some((reading, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(reading.clone())
            }
            None => Err(FetchError::Status { status: 404, body: "city not found".to_string() }),
        }
    }
}
