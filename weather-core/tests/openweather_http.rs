use std::time::Duration;

use weather_core::{
    Coordinate, Endpoints, ErrorLog, ForecastOutcome, OpenWeatherProvider, ProviderError,
    SearchOutcome, UnitSystem, WeatherProvider, WeatherService,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const HELSINKI: &str = r#"[{"name":"Helsinki","lat":60.1675,"lon":24.9427,"country":"FI"}]"#;

const DAILY: &str = r#"{"list":[
    {"dt":1714125600,"temp":{"day":47.3,"min":35.8,"max":48.9},"feels_like":{"day":43.2},"speed":9.6,
     "weather":[{"id":803,"main":"Clouds","description":"broken clouds","icon":"04d"}]},
    {"dt":1714212000,"temp":{"day":44.6,"min":37.8,"max":46.6},"feels_like":{"day":41.0},"speed":13.6,"rain":3.1,
     "weather":[{"id":501,"main":"Rain","description":"moderate rain","icon":"10d"}]}
]}"#;

const HOURLY: &str = r#"{"list":[
    {"dt":1714125600,"main":{"temp":5.4,"feels_like":2.9,"pressure":1015,"humidity":71},
     "wind":{"speed":3.6,"deg":250},"weather":[{"id":801,"description":"few clouds","icon":"02n"}]}
]}"#;

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    let endpoints = Endpoints {
        geocoding: format!("{}/geo/1.0/direct", server.uri()),
        daily: format!("{}/data/2.5/forecast/daily", server.uri()),
        hourly: format!("{}/data/2.5/forecast/hourly", server.uri()),
    };
    OpenWeatherProvider::new("TEST_KEY".to_string(), endpoints, Duration::from_secs(5))
        .expect("provider")
}

#[tokio::test]
async fn geocoding_resolves_helsinki() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Helsinki"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HELSINKI))
        .expect(1)
        .mount(&server)
        .await;

    let location = provider_for(&server)
        .geocode("Helsinki")
        .await
        .expect("geocode")
        .expect("location");

    assert_eq!(location.name, "Helsinki");
    assert!((location.coordinate.latitude - 60.1675).abs() < 0.01);
    assert!((location.coordinate.longitude - 24.9427).abs() < 0.01);
}

#[tokio::test]
async fn geocoding_empty_result_is_none() {
    let server = MockServer::start().await;
    Mock::given(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let result = provider_for(&server).geocode("NowhereCity").await.expect("geocode");
    assert_eq!(result, None);
}

#[tokio::test]
async fn http_error_carries_status_and_provider_message() {
    let server = MockServer::start().await;
    Mock::given(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"cod":401,"message":"Invalid API key."}"#),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server).geocode("Helsinki").await.unwrap_err();
    assert_eq!(
        err,
        ProviderError::Http {
            status: 401,
            message: "geocoding: Invalid API key.".to_string(),
        }
    );
}

#[tokio::test]
async fn daily_request_uses_callers_unit_system() {
    let server = MockServer::start().await;
    Mock::given(path("/data/2.5/forecast/daily"))
        .and(query_param("units", "imperial"))
        .and(query_param("cnt", "6"))
        .and(query_param("lat", "60.1675"))
        .and(query_param("lon", "24.9427"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = provider_for(&server)
        .daily_forecast(Coordinate::new(60.1675, 24.9427), UnitSystem::Imperial)
        .await
        .expect("daily");

    let days: Vec<_> = forecast.values().collect();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].rain_volume, 0.0);
    assert_eq!(days[1].rain_volume, 3.1);
    assert!(days.iter().all(|d| d.units == UnitSystem::Imperial));
}

#[tokio::test]
async fn malformed_hourly_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(path("/data/2.5/forecast/hourly"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .hourly_forecast(Coordinate::new(0.0, 0.0), UnitSystem::Metric)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn slow_server_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(HELSINKI)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let endpoints = Endpoints {
        geocoding: format!("{}/geo/1.0/direct", server.uri()),
        ..Endpoints::default()
    };
    let provider =
        OpenWeatherProvider::new("TEST_KEY".into(), endpoints, Duration::from_millis(200))
            .expect("provider");

    let err = provider.geocode("Helsinki").await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport(_)));
}

#[tokio::test]
async fn service_builds_full_forecast_over_http() {
    let server = MockServer::start().await;
    Mock::given(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HELSINKI))
        .mount(&server)
        .await;
    Mock::given(path("/data/2.5/forecast/daily"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DAILY))
        .mount(&server)
        .await;
    Mock::given(path("/data/2.5/forecast/hourly"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOURLY))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().expect("tempdir");
    let service = WeatherService::new(provider_for(&server), ErrorLog::new(tmp.path().join("errors")));

    assert!(matches!(
        service.search("Helsinki").await,
        SearchOutcome::Found(ref l) if l.name == "Helsinki"
    ));

    let ForecastOutcome::Ready(forecast) = service.forecast("Helsinki", UnitSystem::Metric).await
    else {
        panic!("expected a forecast");
    };

    assert_eq!(forecast.daily.as_ref().map(|d| d.len()), Some(2));
    let hourly = forecast.hourly.as_ref().expect("hourly");
    assert_eq!(hourly.len(), 1);
    assert_eq!(hourly.values().next().unwrap().glyph, weather_core::icons::icon_glyph(801, false));
    assert!(!tmp.path().join("errors").exists());
}

#[tokio::test]
async fn forecast_separates_unknown_city_from_server_failure() {
    let server = MockServer::start().await;
    Mock::given(path("/geo/1.0/direct"))
        .and(query_param("q", "NowhereCity"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;
    Mock::given(path("/geo/1.0/direct"))
        .and(query_param("q", "Helsinki"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().expect("tempdir");
    let service = WeatherService::new(provider_for(&server), ErrorLog::new(tmp.path().join("errors")));

    assert_eq!(
        service.forecast("NowhereCity", UnitSystem::Metric).await,
        ForecastOutcome::NotFound
    );
    assert_eq!(
        service.forecast("Helsinki", UnitSystem::Metric).await,
        ForecastOutcome::Unavailable
    );
}
