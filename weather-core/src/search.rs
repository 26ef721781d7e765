use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    model::{ErrorState, SearchResult},
    provider::WeatherProvider,
};

/// Keystrokes the search input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

/// City search box plus the result of the last lookup.
///
/// Overlapping searches are not sequenced: whichever response resolves last
/// is the one left on display.
#[derive(Debug)]
pub struct SearchPanel {
    provider: Arc<dyn WeatherProvider>,
    query: watch::Sender<String>,
    result: watch::Sender<Option<SearchResult>>,
}

impl SearchPanel {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (query, _) = watch::channel(String::new());
        let (result, _) = watch::channel(None);
        Self { provider, query, result }
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.query.send_replace(text.into());
    }

    pub fn result(&self) -> Option<SearchResult> {
        self.result.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SearchResult>> {
        self.result.subscribe()
    }

    /// Edit the query; `Enter` submits it and returns the outcome.
    pub async fn handle_key(&self, key: Key) -> Option<SearchResult> {
        match key {
            Key::Enter => Some(self.submit().await),
            Key::Backspace => {
                self.query.send_modify(|q| {
                    q.pop();
                });
                None
            }
            Key::Char(c) => {
                self.query.send_modify(|q| q.push(c));
                None
            }
        }
    }

    /// Search for whatever is currently typed.
    pub async fn submit(&self) -> SearchResult {
        let text = self.query();
        self.search(&text).await
    }

    /// Look up `city` and replace the displayed result with the outcome.
    ///
    /// The query box is cleared once the lookup resolves, whether or not it
    /// succeeded.
    pub async fn search(&self, city: &str) -> SearchResult {
        let outcome = match self.provider.fetch_by_city(city).await {
            Ok(reading) => {
                info!(query = city, city = %reading.city, "city search succeeded");
                SearchResult::Found(reading)
            }
            Err(err) => {
                warn!(query = city, error = %err, "city search failed");
                SearchResult::Failed(ErrorState::not_found(city))
            }
        };

        self.result.send_replace(Some(outcome.clone()));
        self.query.send_replace(String::new());
        outcome
    }

    /// Initial lookup performed when the panel is first shown.
    pub async fn startup(&self, initial_city: Option<&str>) -> Option<SearchResult> {
        match initial_city {
            Some(city) => Some(self.search(city).await),
            None => None,
        }
    }
}
