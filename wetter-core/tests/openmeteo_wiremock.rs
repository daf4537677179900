//! Search flow against a mocked Open-Meteo.
//!
//! Both the geocoding and the forecast endpoint are served by one wiremock
//! server, so the tests cover query parameters, response parsing and the
//! state transitions of the controller in one pass.

use wetter_core::{
    Config, ForecastService, GeocodeMatch, LookupError, OpenMeteoProvider, SearchController,
    SearchState,
};
use std::time::Duration;

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config(server: &MockServer) -> Config {
    Config {
        geocoding_url: format!("{}/v1/search", server.uri()),
        forecast_url: format!("{}/v1/forecast", server.uri()),
        timeout_secs: Some(5),
        ..Config::default()
    }
}

#[allow(clippy::expect_used)]
fn provider(server: &MockServer) -> OpenMeteoProvider {
    OpenMeteoProvider::from_config(&test_config(server)).expect("Failed to create provider")
}

fn berlin_geocoding() -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "id": 2950159,
            "name": "Berlin",
            "latitude": 52.52437,
            "longitude": 13.41053,
            "country_code": "DE",
            "timezone": "Europe/Berlin",
            "country": "Deutschland",
            "admin1": "Land Berlin"
        }],
        "generationtime_ms": 0.7
    })
}

fn berlin_forecast() -> serde_json::Value {
    serde_json::json!({
        "latitude": 52.52,
        "longitude": 13.419998,
        "generationtime_ms": 0.05,
        "utc_offset_seconds": 3600,
        "timezone": "Europe/Berlin",
        "timezone_abbreviation": "CET",
        "elevation": 38.0,
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "precipitation_sum": "mm",
            "windspeed_10m_max": "km/h"
        },
        "daily": {
            "time": ["2024-01-15", "2024-01-16", "2024-01-17"],
            "temperature_2m_max": [8.0, 6.0, 10.0],
            "temperature_2m_min": [2.0, 1.0, 3.0],
            "precipitation_sum": [0.0, 5.5, 0.0],
            "windspeed_10m_max": [15.0, 20.0, 12.0]
        }
    })
}

async fn mount_geocoding(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(response)
        .mount(server)
        .await;
}

// =============================================================================
// Provider
// =============================================================================

#[tokio::test]
async fn geocode_sends_fixed_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Frankfurt am Main"))
        .and(query_param("count", "1"))
        .and(query_param("language", "de"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_geocoding()))
        .expect(1)
        .mount(&server)
        .await;

    let place = provider(&server)
        .geocode("Frankfurt am Main")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(place.name, "Berlin");
    assert!((place.latitude - 52.52437).abs() < 1e-9);
    assert!((place.longitude - 13.41053).abs() < 1e-9);
}

#[tokio::test]
async fn geocode_without_results_is_none() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"generationtime_ms": 0.3})),
    )
    .await;

    let place = provider(&server).geocode("Xyzzy").await.unwrap();
    assert!(place.is_none());
}

#[tokio::test]
async fn forecast_sends_coordinates_and_daily_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "52.52437"))
        .and(query_param("longitude", "13.41053"))
        .and(query_param(
            "daily",
            "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max",
        ))
        .and(query_param("timezone", "Europe/Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let place = GeocodeMatch {
        name: "Berlin".into(),
        latitude: 52.52437,
        longitude: 13.41053,
    };
    let days = provider(&server).daily_forecast(&place).await.unwrap();

    assert_eq!(days.len(), 3);
    assert_eq!(days[1].date.to_string(), "2024-01-16");
    assert_eq!(days[1].temp_max, Some(6.0));
    assert_eq!(days[1].temp_min, Some(1.0));
    assert_eq!(days[1].precipitation_mm, Some(5.5));
    assert_eq!(days[1].wind_speed_kmh, Some(20.0));
}

#[tokio::test]
async fn forecast_days_from_config_are_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("forecast_days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        forecast_days: Some(3),
        ..test_config(&server)
    };
    let provider = OpenMeteoProvider::from_config(&config).unwrap();
    let place = GeocodeMatch {
        name: "Berlin".into(),
        latitude: 52.52,
        longitude: 13.41,
    };

    assert_eq!(provider.daily_forecast(&place).await.unwrap().len(), 3);
}

#[tokio::test]
async fn server_error_becomes_status_error() {
    let server = MockServer::start().await;
    mount_geocoding(&server, ResponseTemplate::new(503).set_body_string("wartung")).await;

    let err = provider(&server).geocode("Berlin").await.unwrap_err();

    match err {
        LookupError::Status { status, ref body, .. } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "wartung");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_forecast_is_parse_error() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"latitude": 52.5})),
    )
    .await;

    let place = GeocodeMatch {
        name: "Berlin".into(),
        latitude: 52.52,
        longitude: 13.41,
    };
    let err = provider(&server).daily_forecast(&place).await.unwrap_err();
    assert!(matches!(err, LookupError::Parse { .. }));
}

// =============================================================================
// Controller
// =============================================================================

#[tokio::test]
async fn submit_known_city_fills_state() {
    let server = MockServer::start().await;
    mount_geocoding(&server, ResponseTemplate::new(200).set_body_json(berlin_geocoding())).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(berlin_forecast())).await;

    let mut ctl = SearchController::new(provider(&server));
    ctl.set_city_text("berlin");
    ctl.submit_current().await;

    let state = ctl.state();
    assert_eq!(state.city_text, "Berlin");
    assert_eq!(state.forecast.len(), 3);
    assert_eq!(state.error_message, None);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn submit_unknown_city_reports_not_found() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"generationtime_ms": 0.3})),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(berlin_forecast()))
        .expect(0)
        .mount(&server)
        .await;

    let mut ctl = SearchController::new(provider(&server));
    ctl.submit("Blubberhausen").await;

    let state = ctl.state();
    assert_eq!(state.error_message.as_deref(), Some("Ort nicht gefunden"));
    assert!(state.forecast.is_empty());
    assert!(state.city_text.is_empty());
    assert!(!state.is_loading);
}

#[tokio::test]
async fn mismatched_daily_arrays_fail_the_search() {
    let server = MockServer::start().await;
    let mut forecast = berlin_forecast();
    forecast["daily"]["precipitation_sum"] = serde_json::json!([0.0, 5.5]);

    mount_geocoding(&server, ResponseTemplate::new(200).set_body_json(berlin_geocoding())).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast)).await;

    let mut ctl = SearchController::new(provider(&server));
    ctl.submit("Berlin").await;

    let state = ctl.state();
    let msg = state.error_message.as_deref().unwrap_or_default();
    assert!(msg.contains("precipitation_sum"), "unexpected message: {msg}");
    assert!(state.forecast.is_empty());
    assert!(state.city_text.is_empty());
}

#[tokio::test]
async fn unmatched_request_surfaces_error_and_clear_resets() {
    // No mocks mounted: wiremock answers 404.
    let server = MockServer::start().await;

    let mut ctl = SearchController::new(provider(&server));
    ctl.submit("Hamburg").await;

    let state = ctl.state();
    let msg = state.error_message.as_deref().unwrap_or_default();
    assert!(msg.contains("404"), "unexpected message: {msg}");
    assert!(state.forecast.is_empty());
    assert!(state.city_text.is_empty());
    assert!(!state.is_loading);

    ctl.clear();
    assert_eq!(ctl.state(), &SearchState::default());
}

#[tokio::test]
async fn refused_connection_is_request_error() {
    // Bind and release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = Config {
        geocoding_url: format!("http://127.0.0.1:{port}/v1/search"),
        forecast_url: format!("http://127.0.0.1:{port}/v1/forecast"),
        ..Config::default()
    };
    let provider = OpenMeteoProvider::from_config(&config).unwrap();

    let err = provider.geocode("Berlin").await.unwrap_err();
    assert!(matches!(err, LookupError::Request(_)), "got {err:?}");

    let mut ctl = SearchController::new(provider);
    ctl.set_city_text("Berlin");
    ctl.submit_current().await;

    let state = ctl.state();
    let msg = state.error_message.as_deref().unwrap_or_default();
    assert!(!msg.trim().is_empty());
    assert!(state.forecast.is_empty());
    assert!(state.city_text.is_empty());
    assert!(!state.is_loading);
}

#[tokio::test]
async fn slow_service_hits_configured_timeout() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(berlin_geocoding())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = Config {
        timeout_secs: Some(1),
        ..test_config(&server)
    };
    let mut ctl = SearchController::new(OpenMeteoProvider::from_config(&config).unwrap());
    ctl.submit("Berlin").await;

    let state = ctl.state();
    let msg = state.error_message.as_deref().unwrap_or_default();
    assert!(msg.starts_with("Netzwerkfehler"), "unexpected message: {msg}");
    assert!(state.forecast.is_empty());
    assert!(state.city_text.is_empty());
}

#[tokio::test]
async fn null_daily_values_keep_the_search_alive() {
    let server = MockServer::start().await;
    let mut forecast = berlin_forecast();
    forecast["daily"]["temperature_2m_max"] = serde_json::json!([8.0, 6.0, null]);
    forecast["daily"]["windspeed_10m_max"] = serde_json::json!([null, 20.0, 12.0]);

    mount_geocoding(&server, ResponseTemplate::new(200).set_body_json(berlin_geocoding())).await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(forecast)).await;

    let mut ctl = SearchController::new(provider(&server));
    ctl.submit("Berlin").await;

    let state = ctl.state();
    assert_eq!(state.error_message, None);
    assert_eq!(state.forecast.len(), 3);
    assert_eq!(state.forecast[2].temp_max, None);
    assert_eq!(state.forecast[2].temp_min, Some(3.0));
    assert_eq!(state.forecast[0].wind_speed_kmh, None);
}
