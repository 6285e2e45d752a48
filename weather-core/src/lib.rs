//! Core library for the `weather` viewer.
//!
//! This crate defines:
//! - Configuration handling
//! - The OpenWeatherMap client behind the `WeatherProvider` abstraction
//! - Shared domain models (locations, daily and hourly forecasts)
//! - Bounded history/favourites lists and the persisted application state
//!
//! It is used by `weather-cli`, but can also back other front-ends.

pub mod city_list;
pub mod config;
pub mod error_log;
pub mod icons;
pub mod model;
pub mod provider;
pub mod service;
pub mod session;
pub mod state;

pub use city_list::{CITY_LIST_CAPACITY, CityList};
pub use config::{Config, Endpoints};
pub use error_log::ErrorLog;
pub use model::{
    Coordinate, DailyForecast, DailyWeather, Forecast, HourlyForecast, HourlyWeather, Location,
    UnitSystem,
};
pub use provider::{ProviderError, WeatherProvider, openweather::OpenWeatherProvider};
pub use service::{ForecastOutcome, SearchOutcome, WeatherService};
pub use session::{Session, StateChange};
pub use state::{AppState, StateStore};
