//! Core library for the `tempo` weather lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The HG Brasil weather client behind the [`WeatherProvider`] trait
//! - City autocomplete over the IBGE municipality list
//! - Screen view models (Home, Search, ExtendedForecast, History)
//!
//! It is used by `tempo-cli`, but any other front end can drive the screens.

pub mod cities;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod screen;

pub use cities::CitySuggestionIndex;
pub use config::Config;
pub use error::WeatherError;
pub use location::{FixedLocation, LocationResolver};
pub use model::{
    Coordinates, DateRange, DayPeriod, ForecastDay, HistoricalDay, Municipality, WeatherSnapshot,
    icon_url,
};
pub use provider::{WeatherProvider, hgbrasil::HgBrasilClient, provider_from_config};
pub use screen::{
    ExtendedForecastScreen, HistoryScreen, HomeScreen, ScreenModel, ScreenState, SearchScreen,
};
