use crate::{
    Config,
    model::{Coordinate, DailyForecast, HourlyForecast, Location, UnitSystem},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// First geocoding hit for `query`, or `None` when nothing matches.
    async fn geocode(&self, query: &str) -> Result<Option<Location>, ProviderError>;

    async fn daily_forecast(
        &self,
        coordinate: Coordinate,
        units: UnitSystem,
    ) -> Result<DailyForecast, ProviderError>;

    async fn hourly_forecast(
        &self,
        coordinate: Coordinate,
        units: UnitSystem,
    ) -> Result<HourlyForecast, ProviderError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `weather configure` and enter your API key."
        )
    })?;

    OpenWeatherProvider::new(api_key.to_owned(), config.endpoints(), config.request_timeout())
}
