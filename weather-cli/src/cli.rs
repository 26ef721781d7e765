use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{
    Config, GeolocationMode, Geolocator, LocationProbe, Notifier, PositionOptions,
    RefreshScheduler, SearchPanel, SearchResult,
    location::{DisabledGeolocator, IpGeolocator},
    provider_from_config,
};

use crate::{notify::ConsoleNotifier, render};

const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather widget for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and base URL in the config file.
    Configure,

    /// Show weather for the current location and refresh it periodically.
    Watch {
        /// Refresh interval in seconds; defaults to the configured value.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Skip geolocation entirely.
        #[arg(long)]
        no_geolocation: bool,
    },

    /// Look up weather by city name. Without arguments, prompts for cities.
    Search {
        /// City names to look up in order.
        cities: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Watch { interval, no_geolocation } => {
                let config = Config::load()?;
                watch(&config, interval.map(Duration::from_secs), no_geolocation).await
            }
            Command::Search { cities } => {
                let config = Config::load()?;
                search(&config, cities).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    // Only the file is edited here; environment overrides stay out of it.
    let mut config = Config::load_from(&Config::config_file_path()?)?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let base_url = inquire::Text::new("API base URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    config.api_key = Some(api_key.trim().to_string());
    config.base_url = base_url.trim().to_string();

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn watch(
    config: &Config,
    interval: Option<Duration>,
    no_geolocation: bool,
) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    let geolocator: Arc<dyn Geolocator> = match config.geolocation {
        _ if no_geolocation => Arc::new(DisabledGeolocator),
        GeolocationMode::Disabled => Arc::new(DisabledGeolocator),
        GeolocationMode::Ip => Arc::new(IpGeolocator::new()),
    };

    let probe = LocationProbe::new(geolocator, notifier)
        .with_fallback(config.fallback)
        .with_options(PositionOptions { timeout: Some(GEOLOCATION_TIMEOUT), ..Default::default() });

    let mut handle = RefreshScheduler::new(probe, provider)
        .with_interval(interval.unwrap_or_else(|| config.refresh_interval()))
        .start();
    let mut rx = handle.subscribe();

    println!("{}", render::LOADING);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = rx.changed() => {
                // Sender gone: the cycle never started.
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                if let Some(reading) = state.reading() {
                    println!("\n{}", render::current(reading, &chrono::Local::now()));
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn search(config: &Config, cities: Vec<String>) -> anyhow::Result<()> {
    let panel = SearchPanel::new(provider_from_config(config)?);

    if !cities.is_empty() {
        for city in cities {
            panel.set_query(city);
            print_result(&panel.submit().await);
        }
        return Ok(());
    }

    if let Some(result) = panel.startup(config.initial_search_city()).await {
        print_result(&result);
    }

    loop {
        let input = tokio::task::spawn_blocking(|| {
            inquire::Text::new("Search any city:")
                .with_help_message("empty input or Esc to quit")
                .prompt_skippable()
        })
        .await
        .context("Prompt task failed")?
        .context("Failed to read city name")?;

        match input {
            Some(text) if !text.trim().is_empty() => {
                panel.set_query(text.trim());
                print_result(&panel.submit().await);
            }
            _ => break,
        }
    }

    Ok(())
}

fn print_result(result: &SearchResult) {
    println!("\n{}\n", render::search_result(result));
}
