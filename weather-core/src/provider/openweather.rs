use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::{
    config::Endpoints,
    icons::{icon_glyph, is_daytime_icon},
    model::{
        Coordinate, DailyForecast, DailyWeather, HourlyForecast, HourlyWeather, Location,
        UnitSystem,
    },
};

use super::{ProviderError, WeatherProvider};

/// Number of days requested from the daily endpoint.
pub const DAILY_FORECAST_DAYS: u8 = 6;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, endpoints: Endpoints, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeatherMap")?;

        Ok(Self {
            api_key,
            endpoints,
            http,
        })
    }

    async fn fetch(
        &self,
        what: &'static str,
        request: RequestBuilder,
    ) -> Result<String, ProviderError> {
        tracing::debug!(request = what, "Calling OpenWeatherMap");

        let res = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("{what}: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("{what}: failed to read body: {e}")))?;

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| truncate_body(&body));
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: format!("{what}: {message}"),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &str) -> Result<Option<Location>, ProviderError> {
        let request = self.http.get(self.endpoints.geocoding.as_str()).query(&[
            ("q", query),
            ("limit", "1"),
            ("appid", self.api_key.as_str()),
        ]);

        let body = self.fetch("geocoding", request).await?;
        parse_geocoding(&body)
    }

    async fn daily_forecast(
        &self,
        coordinate: Coordinate,
        units: UnitSystem,
    ) -> Result<DailyForecast, ProviderError> {
        let request = self.http.get(self.endpoints.daily.as_str()).query(&[
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", units.as_str().to_string()),
            ("cnt", DAILY_FORECAST_DAYS.to_string()),
        ]);

        let body = self.fetch("daily forecast", request).await?;
        parse_daily_forecast(&body, units)
    }

    async fn hourly_forecast(
        &self,
        coordinate: Coordinate,
        units: UnitSystem,
    ) -> Result<HourlyForecast, ProviderError> {
        let request = self.http.get(self.endpoints.hourly.as_str()).query(&[
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", units.as_str().to_string()),
        ]);

        let body = self.fetch("hourly forecast", request).await?;
        parse_hourly_forecast(&body, units)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocodingHit {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    id: u16,
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyFeelsLike {
    day: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyEntry {
    dt: i64,
    temp: OwDailyTemp,
    feels_like: OwDailyFeelsLike,
    speed: f64,
    #[serde(default)]
    rain: Option<f64>,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwHourlyMain {
    temp: f64,
    feels_like: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwHourlyEntry {
    dt: i64,
    main: OwHourlyMain,
    wind: OwWind,
    weather: Vec<OwCondition>,
    #[serde(default)]
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwListResponse<T> {
    list: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

pub(crate) fn parse_geocoding(body: &str) -> Result<Option<Location>, ProviderError> {
    let hits: Vec<OwGeocodingHit> = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("geocoding payload: {e}")))?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    if hit.name.trim().is_empty() {
        return Err(ProviderError::InvalidResponse(
            "geocoding payload: empty city name".to_string(),
        ));
    }

    Ok(Some(Location {
        name: hit.name,
        country: hit.country.filter(|c| !c.trim().is_empty()),
        coordinate: Coordinate::new(hit.lat, hit.lon),
    }))
}

pub(crate) fn parse_daily_forecast(
    body: &str,
    units: UnitSystem,
) -> Result<DailyForecast, ProviderError> {
    let payload: OwListResponse<OwDailyEntry> = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("daily forecast payload: {e}")))?;

    payload
        .list
        .into_iter()
        .map(|entry| -> Result<_, ProviderError> {
            let date = unix_to_utc(entry.dt)?;
            let condition = first_condition(entry.weather, date)?;

            let weather = DailyWeather {
                date,
                day_temp: entry.temp.day,
                min_temp: entry.temp.min,
                max_temp: entry.temp.max,
                day_feels_like: entry.feels_like.day,
                wind_speed: entry.speed,
                rain_volume: entry.rain.unwrap_or(0.0),
                description: condition.description,
                condition_id: condition.id,
                glyph: icon_glyph(condition.id, true),
                units,
            };
            Ok((date, weather))
        })
        .collect()
}

pub(crate) fn parse_hourly_forecast(
    body: &str,
    units: UnitSystem,
) -> Result<HourlyForecast, ProviderError> {
    let payload: OwListResponse<OwHourlyEntry> = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("hourly forecast payload: {e}")))?;

    payload
        .list
        .into_iter()
        .map(|entry| -> Result<_, ProviderError> {
            let date = unix_to_utc(entry.dt)?;
            let condition = first_condition(entry.weather, date)?;
            let daytime = is_daytime_icon(&condition.icon);

            let weather = HourlyWeather {
                date,
                temperature: entry.main.temp,
                feels_like: entry.main.feels_like,
                pressure: entry.main.pressure,
                humidity: entry.main.humidity,
                wind_speed: entry.wind.speed,
                wind_direction: entry.wind.deg,
                description: condition.description,
                glyph: icon_glyph(condition.id, daytime),
                icon: condition.icon,
                condition_id: condition.id,
                rain_1h: entry.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
                units,
            };
            Ok((date, weather))
        })
        .collect()
}

fn first_condition(
    weather: Vec<OwCondition>,
    date: DateTime<Utc>,
) -> Result<OwCondition, ProviderError> {
    weather.into_iter().next().ok_or_else(|| {
        ProviderError::InvalidResponse(format!("forecast entry {date} has no weather condition"))
    })
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, ProviderError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| ProviderError::InvalidResponse(format!("timestamp out of range: {ts}")))
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
