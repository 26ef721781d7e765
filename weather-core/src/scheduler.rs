//! Periodic weather refresh for the device position.
//!
//! The scheduler locates the device once, then fetches weather for that
//! position immediately and on every tick of a fixed interval. Position is
//! never re-read; only the weather is refreshed.
//!
//! State is published through a [`watch`] channel. Each successful fetch
//! replaces the whole [`DisplayState`]; a failed fetch publishes nothing.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    icon::IconCode,
    location::LocationProbe,
    model::{Coordinates, WeatherReading},
    provider::WeatherProvider,
};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(600_000);
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// What the primary weather display shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DisplayState {
    /// No coordinates yet; a loading placeholder is shown.
    #[default]
    Uninitialized,
    /// Coordinates known and periodic refresh running.
    Active {
        coordinates: Coordinates,
        /// `None` until the first fetch succeeds.
        reading: Option<Arc<WeatherReading>>,
    },
}

impl DisplayState {
    pub fn reading(&self) -> Option<&WeatherReading> {
        match self {
            DisplayState::Active { reading: Some(reading), .. } => Some(reading),
            _ => None,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            DisplayState::Active { coordinates, .. } => Some(*coordinates),
            DisplayState::Uninitialized => None,
        }
    }

    pub fn icon(&self) -> IconCode {
        self.reading().map(|r| r.icon).unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DisplayState::Active { .. })
    }
}

#[derive(Debug)]
pub struct RefreshScheduler {
    probe: LocationProbe,
    provider: Arc<dyn WeatherProvider>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(probe: LocationProbe, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { probe, provider, interval: DEFAULT_REFRESH_INTERVAL }
    }

    /// Periods shorter than [`MIN_REFRESH_INTERVAL`] are raised to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_REFRESH_INTERVAL);
        self
    }

    /// Spawn the refresh task on the current tokio runtime.
    pub fn start(self) -> RefreshHandle {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(DisplayState::Uninitialized);

        let task = tokio::spawn(self.run(cancel.clone(), tx));

        RefreshHandle { cancel, state: rx, task: Some(task) }
    }

    async fn run(self, cancel: CancellationToken, tx: watch::Sender<DisplayState>) {
        let acquired = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            acquired = self.probe.acquire() => acquired,
        };

        let coordinates = match acquired {
            Ok(acquisition) => acquisition.coordinates(),
            Err(err) => {
                warn!(error = %err, "refresh cycle not started");
                return;
            }
        };

        info!(%coordinates, interval_secs = self.interval.as_secs(), "refresh cycle started");
        tx.send_replace(DisplayState::Active { coordinates, reading: None });

        // First tick completes immediately.
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                fetched = self.provider.fetch_by_coordinates(coordinates) => fetched,
            };

            match fetched {
                Ok(reading) => {
                    debug!(city = %reading.city, icon = %reading.icon, "weather refreshed");
                    tx.send_replace(DisplayState::Active {
                        coordinates,
                        reading: Some(Arc::new(reading)),
                    });
                }
                Err(err) => {
                    warn!(error = %err, status = ?err.status(), "failed to fetch weather data");
                }
            }
        }

        debug!("refresh cycle stopped");
    }
}

/// Owner of a running refresh task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct RefreshHandle {
    cancel: CancellationToken,
    state: watch::Receiver<DisplayState>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.clone()
    }

    /// Snapshot of the current display state.
    pub fn state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// True once the task has exited, either by teardown or because
    /// geolocation is unsupported.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Cancel the timer and wait for the task to exit. A fetch still in
    /// flight is abandoned and never reaches the display state.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "refresh task ended abnormally");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
