use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measurement system requested from the provider and shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn wind_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }

    /// OpenWeatherMap reports rain in millimetres for both systems.
    pub fn rain_unit(&self) -> &'static str {
        "mm"
    }

    pub fn toggled(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A geocoding hit: the canonical city name and where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: Option<String>,
    pub coordinate: Coordinate,
}

impl Location {
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: DateTime<Utc>,
    pub day_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub day_feels_like: f64,
    pub wind_speed: f64,
    pub rain_volume: f64,
    pub description: String,
    pub condition_id: u16,
    pub glyph: char,
    pub units: UnitSystem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub date: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub pressure: u32,
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_direction: u16,
    pub description: String,
    /// Provider icon code such as `10d` or `01n`.
    pub icon: String,
    pub condition_id: u16,
    pub glyph: char,
    pub rain_1h: f64,
    pub units: UnitSystem,
}

pub type DailyForecast = BTreeMap<DateTime<Utc>, DailyWeather>;
pub type HourlyForecast = BTreeMap<DateTime<Utc>, HourlyWeather>;

/// Everything shown for one city. A part that could not be fetched is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub location: Location,
    pub units: UnitSystem,
    pub daily: Option<DailyForecast>,
    pub hourly: Option<HourlyForecast>,
}

impl Forecast {
    /// The hourly entry closest to `now`, standing in for "current weather".
    pub fn current(&self, now: DateTime<Utc>) -> Option<&HourlyWeather> {
        self.hourly
            .as_ref()?
            .values()
            .min_by_key(|h| (h.date - now).num_seconds().abs())
    }
}
