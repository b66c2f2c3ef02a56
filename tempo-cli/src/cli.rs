use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use tempo_core::{
    CitySuggestionIndex, Config, Coordinates, ExtendedForecastScreen, FixedLocation,
    HistoryScreen, HomeScreen, ScreenState, SearchScreen, provider_from_config,
};
use tracing::warn;

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tempo", version, about = "Weather lookup for Brazilian cities")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the HG Brasil API key.
    Configure {
        /// Only print where the config file lives.
        #[arg(long)]
        show_path: bool,
    },

    /// Current conditions for your location.
    Home {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Let the provider locate you by IP address.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        ip: bool,
    },

    /// Current conditions for a city; prompts with suggestions when omitted.
    Search { city: Option<String> },

    /// Multi-day forecast for a city.
    Forecast { city: String },

    /// Aggregated past weather for a city.
    History {
        city: String,

        /// First day, YYYY-MM-DD (default: today).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day, YYYY-MM-DD (default: today).
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// List municipality suggestions for a prefix.
    Cities { prefix: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        config.apply_env();

        match self.command {
            Command::Configure { show_path } => configure(config, show_path),
            Command::Home { lat, lon, ip } => home(&config, lat.zip(lon), ip).await,
            Command::Search { city } => search(&config, city).await,
            Command::Forecast { city } => forecast(&config, city).await,
            Command::History { city, start, end } => history(&config, city, start, end).await,
            Command::Cities { prefix } => cities(&config, &prefix).await,
        }
    }
}

fn configure(mut config: Config, show_path: bool) -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    if show_path {
        println!("{}", path.display());
        return Ok(());
    }

    let key = prompt::api_key()?;
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(key);
    config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn home(config: &Config, coords: Option<(f64, f64)>, ip: bool) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;

    let screen = if ip {
        HomeScreen::by_user_ip(provider)
    } else {
        let coords = coords.map(|(lat, lon)| Coordinates::new(lat, lon)).or(config.location);
        HomeScreen::new(provider, Arc::new(FixedLocation(coords)))
    };

    screen.mount().await;
    show(screen.state(), |s| render::snapshot(s, &config.icon_base_url))
}

async fn search(config: &Config, city: Option<String>) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let mut screen = SearchScreen::new(provider);

    match city {
        Some(city) => {
            screen.set_query(city);
            screen.submit().await;
        }
        None => {
            let index = Arc::new(
                CitySuggestionIndex::from_config(config)
                    .await
                    .context("Failed to load municipality list")?,
            );
            screen = screen.with_suggestions(Arc::clone(&index));

            let answer = prompt::city(Arc::clone(&index), config.default_city.as_deref())?;

            match index.find_label(&answer) {
                Some(m) => {
                    screen.select(m).await;
                }
                None => {
                    screen.set_query(answer);
                    screen.submit().await;
                }
            }
        }
    }

    show(screen.state(), |s| render::snapshot(s, &config.icon_base_url))
}

async fn forecast(config: &Config, city: String) -> anyhow::Result<()> {
    let screen = ExtendedForecastScreen::new(provider_from_config(config)?, city);
    screen.mount().await;
    show(screen.state(), |days| render::forecast(screen.city(), days))
}

async fn history(
    config: &Config,
    city: String,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let mut screen = HistoryScreen::new(provider_from_config(config)?, city);
    if let Some(start) = start {
        screen.set_start(start);
    }
    if let Some(end) = end {
        screen.set_end(end);
    }

    let range = screen.range();
    if range.start > range.end {
        warn!(start = %range.start, end = %range.end, "start date is after end date");
    }

    screen.mount().await;
    show(screen.state(), |days| render::history(screen.city(), days))
}

async fn cities(config: &Config, prefix: &str) -> anyhow::Result<()> {
    let index = CitySuggestionIndex::from_config(config)
        .await
        .context("Failed to load municipality list")?;

    print!("{}", render::suggestions(&index.filter(prefix)));
    Ok(())
}

/// Print a settled screen state; a failed state becomes the process error.
fn show<T>(state: ScreenState<T>, card: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    match state {
        ScreenState::Ready(data) => {
            print!("{}", card(&data));
            Ok(())
        }
        ScreenState::Failed(msg) => bail!(msg),
        ScreenState::Idle | ScreenState::Loading => bail!("screen did not settle"),
    }
}
