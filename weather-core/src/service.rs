use crate::{
    error_log::ErrorLog,
    model::{Forecast, Location, UnitSystem},
    provider::{ProviderError, WeatherProvider},
};

/// Result of resolving a free-text city query.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Location),
    /// The provider answered, but nothing matched.
    NotFound,
    /// The provider could not be reached or sent something unusable.
    Unavailable,
}

/// Result of asking for the forecast of a city by name.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    Ready(Forecast),
    NotFound,
    Unavailable,
}

/// Front door for the UI: provider errors are logged here and never returned.
#[derive(Debug)]
pub struct WeatherService<P> {
    provider: P,
    errors: ErrorLog,
}

impl<P: WeatherProvider> WeatherService<P> {
    pub fn new(provider: P, errors: ErrorLog) -> Self {
        Self { provider, errors }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::NotFound;
        }

        match self.provider.geocode(query).await {
            Ok(Some(location)) => {
                tracing::info!(query, city = %location.name, "Resolved city");
                SearchOutcome::Found(location)
            }
            Ok(None) => {
                tracing::info!(query, "No city matches query");
                SearchOutcome::NotFound
            }
            Err(err) => {
                self.report(&format!("Failed to look up city '{query}'"), err);
                SearchOutcome::Unavailable
            }
        }
    }

    /// Daily and hourly forecasts for `city`. A part that fails to load is
    /// `None` inside the forecast.
    pub async fn forecast(&self, city: &str, units: UnitSystem) -> ForecastOutcome {
        match self.search(city).await {
            SearchOutcome::Found(location) => {
                ForecastOutcome::Ready(self.forecast_for(location, units).await)
            }
            SearchOutcome::NotFound => ForecastOutcome::NotFound,
            SearchOutcome::Unavailable => ForecastOutcome::Unavailable,
        }
    }

    /// Forecasts for an already resolved location.
    pub async fn forecast_for(&self, location: Location, units: UnitSystem) -> Forecast {
        let city = location.name.as_str();
        let coordinate = location.coordinate;
        let (daily, hourly) = tokio::join!(
            self.provider.daily_forecast(coordinate, units),
            self.provider.hourly_forecast(coordinate, units),
        );

        let daily = daily
            .map_err(|err| self.report(&format!("Failed to fetch daily forecast for {city}"), err))
            .ok();
        let hourly = hourly
            .map_err(|err| self.report(&format!("Failed to fetch hourly forecast for {city}"), err))
            .ok();

        Forecast {
            location,
            units,
            daily,
            hourly,
        }
    }

    fn report(&self, message: &str, err: ProviderError) {
        tracing::error!(error = %err, "{message}");
        self.errors.record(message, &anyhow::Error::new(err));
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use chrono::DateTime;

    use super::*;
    use crate::{
        icons::icon_glyph,
        model::{Coordinate, DailyForecast, DailyWeather, HourlyForecast},
    };

    #[derive(Debug, Default)]
    struct StubProvider {
        geocode_calls: AtomicUsize,
        fail_geocode: bool,
        fail_hourly: bool,
    }

    fn helsinki() -> Location {
        Location {
            name: "Helsinki".to_string(),
            country: Some("FI".to_string()),
            coordinate: Coordinate::new(60.1675, 24.9427),
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn geocode(&self, query: &str) -> Result<Option<Location>, ProviderError> {
            self.geocode_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_geocode {
                return Err(ProviderError::Transport("connection refused".into()));
            }
            Ok((query == "Helsinki").then(helsinki))
        }

        async fn daily_forecast(
            &self,
            _coordinate: Coordinate,
            units: UnitSystem,
        ) -> Result<DailyForecast, ProviderError> {
            let date = DateTime::from_timestamp(1714125600, 0).unwrap();
            let day = DailyWeather {
                date,
                day_temp: 8.0,
                min_temp: 2.0,
                max_temp: 9.0,
                day_feels_like: 6.0,
                wind_speed: 4.0,
                rain_volume: 0.0,
                description: "sky is clear".into(),
                condition_id: 800,
                glyph: icon_glyph(800, true),
                units,
            };
            Ok(BTreeMap::from([(date, day)]))
        }

        async fn hourly_forecast(
            &self,
            _coordinate: Coordinate,
            _units: UnitSystem,
        ) -> Result<HourlyForecast, ProviderError> {
            if self.fail_hourly {
                return Err(ProviderError::Http {
                    status: 401,
                    message: "hourly forecast: Invalid API key".into(),
                });
            }
            Ok(BTreeMap::new())
        }
    }

    fn service(provider: StubProvider) -> (WeatherService<StubProvider>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let errors = ErrorLog::new(tmp.path().join("errors"));
        (WeatherService::new(provider, errors), tmp)
    }

    fn logged_errors(tmp: &tempfile::TempDir) -> usize {
        std::fs::read_dir(tmp.path().join("errors"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn search_finds_city() {
        let (svc, _tmp) = service(StubProvider::default());
        assert_eq!(svc.search("Helsinki").await, SearchOutcome::Found(helsinki()));
    }

    #[tokio::test]
    async fn unknown_city_is_not_found_and_not_logged() {
        let (svc, tmp) = service(StubProvider::default());
        assert_eq!(svc.search("NowhereCity").await, SearchOutcome::NotFound);
        assert_eq!(logged_errors(&tmp), 0);
    }

    #[tokio::test]
    async fn blank_query_skips_the_provider() {
        let (svc, _tmp) = service(StubProvider::default());
        assert_eq!(svc.search("   ").await, SearchOutcome::NotFound);
        assert_eq!(svc.provider().geocode_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable_and_logged() {
        let (svc, tmp) = service(StubProvider {
            fail_geocode: true,
            ..StubProvider::default()
        });

        assert_eq!(svc.search("Helsinki").await, SearchOutcome::Unavailable);
        assert_eq!(
            svc.forecast("Helsinki", UnitSystem::Metric).await,
            ForecastOutcome::Unavailable
        );
        assert_eq!(logged_errors(&tmp), 2);
    }

    #[tokio::test]
    async fn forecast_keeps_daily_when_hourly_fails() {
        let (svc, tmp) = service(StubProvider {
            fail_hourly: true,
            ..StubProvider::default()
        });

        let ForecastOutcome::Ready(forecast) = svc.forecast("Helsinki", UnitSystem::Imperial).await
        else {
            panic!("expected a forecast");
        };

        assert_eq!(forecast.location.name, "Helsinki");
        assert_eq!(forecast.units, UnitSystem::Imperial);
        assert!(forecast.hourly.is_none());

        let daily = forecast.daily.expect("daily");
        assert_eq!(daily.len(), 1);
        assert!(daily.values().all(|d| d.units == UnitSystem::Imperial));
        assert_eq!(logged_errors(&tmp), 1);
    }

    #[tokio::test]
    async fn forecast_for_unknown_city_is_not_found() {
        let (svc, tmp) = service(StubProvider::default());
        assert_eq!(
            svc.forecast("NowhereCity", UnitSystem::Metric).await,
            ForecastOutcome::NotFound
        );
        assert_eq!(logged_errors(&tmp), 0);
    }

    #[tokio::test]
    async fn unknown_city_and_outage_are_reported_differently() {
        let (healthy, _tmp) = service(StubProvider::default());
        let (down, _tmp_down) = service(StubProvider {
            fail_geocode: true,
            ..StubProvider::default()
        });

        let not_found = healthy.forecast("NowhereCity", UnitSystem::Metric).await;
        let unavailable = down.forecast("Helsinki", UnitSystem::Metric).await;

        assert_eq!(not_found, ForecastOutcome::NotFound);
        assert_eq!(unavailable, ForecastOutcome::Unavailable);
        assert_ne!(not_found, unavailable);
    }
}
