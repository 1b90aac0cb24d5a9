//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The gateway to the remote weather service (OpenWeather)
//! - Grouping of 3-hour forecasts into daily summaries
//! - Lookup orchestration: city search, current location, unit replay
//! - Favorites persisted through a small key-value store
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod geolocation;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod store;

pub use config::{ApiSettings, Config};
pub use error::{GeolocationError, WeatherError};
pub use favorites::FavoritesStore;
pub use forecast::{DayBoundary, aggregate_daily};
pub use geolocation::{FixedLocator, Locator};
pub use model::{
    Condition, Coordinates, CurrentConditions, DailyForecastSummary, ForecastSample,
    LookupRequest, Units, WeatherReport,
};
pub use orchestrator::{DisplayState, LookupState, Orchestrator};
pub use provider::{WeatherGateway, openweather::OpenWeatherGateway};
pub use store::{FileStore, KeyValueStore, MemoryStore};
