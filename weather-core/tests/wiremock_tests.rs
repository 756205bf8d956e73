//! Integration tests for the RapidAPI client using wiremock.
//!
//! These exercise the request shape (headers, query, path) and the mapping of
//! every HTTP outcome to a normalized error.

use weather_core::{ProviderConfig, RapidApiClient, WeatherClient, WeatherError, WeatherReading};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "location": "Paris",
        "temperature": 18,
        "description": "clear sky",
        "humidity": 60,
        "wind_speed": 3.1,
        "units": "metric"
    })
}

fn forecast_body() -> serde_json::Value {
    let entry = |dt: i64, dt_txt: &str, temp: f64, icon: &str, description: &str| {
        serde_json::json!({
            "dt": dt,
            "main": { "temp": temp, "temp_min": temp - 1.0, "temp_max": temp + 1.0 },
            "weather": [{ "icon": icon, "description": description }],
            "dt_txt": dt_txt
        })
    };

    serde_json::json!({
        "list": [
            entry(1705309200, "2024-01-15 09:00:00", 4.6, "50d", "mist"),
            entry(1705320000, "2024-01-15 12:00:00", 7.0, "10d", "rain"),
            entry(1705363200, "2024-01-16 00:00:00", -0.4, "13n", "snow"),
        ]
    })
}

fn provider_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        api_key: Some("TEST_KEY".to_string()),
        api_host: "weather.test".to_string(),
        current_url: format!("{}/current", server.uri()),
        forecast_url: format!("{}/fivedaysforcast", server.uri()),
        ..Default::default()
    }
}

fn create_test_client(server: &MockServer) -> RapidApiClient {
    #[allow(clippy::expect_used)]
    RapidApiClient::new(&provider_config(server)).expect("Failed to create client")
}

async fn mount_current(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn current_error(response: ResponseTemplate) -> WeatherError {
    let server = MockServer::start().await;
    mount_current(&server, response).await;

    create_test_client(&server)
        .fetch_current("Paris")
        .await
        .expect_err("request should fail")
}

// ============================================================================
// Current weather
// ============================================================================

#[tokio::test]
async fn fetch_current_sends_headers_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current"))
        .and(query_param("units", "metric"))
        .and(query_param("location", "Paris"))
        .and(header("x-rapidapi-key", "TEST_KEY"))
        .and(header("x-rapidapi-host", "weather.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let reading = create_test_client(&server)
        .fetch_current("  Paris ")
        .await
        .expect("lookup should succeed");

    assert_eq!(
        reading,
        WeatherReading {
            location: "Paris".to_string(),
            temperature: 18.0,
            description: "clear sky".to_string(),
            humidity: 60.0,
            wind_speed: 3.1,
            units: "metric".to_string(),
            coordinates: None,
        }
    );
}

#[tokio::test]
async fn fetch_current_reads_optional_coordinates() {
    let server = MockServer::start().await;
    let mut body = paris_body();
    body["lat"] = serde_json::json!(48.85);
    body["lon"] = serde_json::json!(2.35);
    mount_current(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let reading = create_test_client(&server).fetch_current("Paris").await.expect("success");

    let coordinates = reading.coordinates.expect("coordinates present");
    assert!((coordinates.lat - 48.85).abs() < f64::EPSILON);
    assert!((coordinates.lon - 2.35).abs() < f64::EPSILON);
}

#[tokio::test]
async fn empty_city_fails_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = create_test_client(&server).fetch_current("   ").await.unwrap_err();

    assert_eq!(err, WeatherError::InvalidInput("City name cannot be empty".to_string()));
}

#[tokio::test]
async fn not_found_maps_to_city_not_found() {
    let err = current_error(ResponseTemplate::new(404)).await;
    assert_eq!(err, WeatherError::NotFound);
    assert_eq!(err.to_string(), "City not found. Please try another location.");
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_api_key() {
    let err = current_error(
        ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "bad key"})),
    )
    .await;
    assert_eq!(err.to_string(), "Invalid API key. Please check your configuration.");
}

#[tokio::test]
async fn rate_limit_maps_to_too_many_requests() {
    let err = current_error(ResponseTemplate::new(429)).await;
    assert_eq!(err.to_string(), "Too many requests. Please wait and try again later.");
}

#[tokio::test]
async fn provider_message_is_passed_through() {
    let err = current_error(
        ResponseTemplate::new(403)
            .set_body_json(serde_json::json!({"message": "You are not subscribed to this API."})),
    )
    .await;

    assert_eq!(err.kind(), "provider_error");
    assert_eq!(err.to_string(), "You are not subscribed to this API.");
}

#[tokio::test]
async fn server_error_without_message_is_unknown() {
    let err = current_error(ResponseTemplate::new(503).set_body_string("upstream down")).await;
    assert_eq!(err, WeatherError::Unknown { status: Some(503) });
    assert_eq!(err.to_string(), "Failed to fetch weather data");
}

#[tokio::test]
async fn missing_field_is_malformed_response() {
    let mut body = paris_body();
    body.as_object_mut().expect("object").remove("humidity");

    let err = current_error(ResponseTemplate::new(200).set_body_json(body)).await;
    assert_eq!(err.kind(), "malformed_response");
}

#[tokio::test]
async fn invalid_json_is_malformed_response() {
    let err = current_error(ResponseTemplate::new(200).set_body_string("<html>")).await;
    assert_eq!(err.kind(), "malformed_response");
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    let server = MockServer::start().await;
    let config = provider_config(&server);
    // Shut the server down so the port refuses connections.
    drop(server);

    let client = RapidApiClient::new(&config).expect("client");
    let err = client.fetch_current("Paris").await.unwrap_err();

    assert_eq!(err.kind(), "network_error");
    assert_eq!(err.to_string(), "Network error. Please check your connection.");
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn fetch_forecast_uses_coordinate_path_and_groups_days() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fivedaysforcast/48.85/2.35"))
        .and(header("x-rapidapi-key", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let items = create_test_client(&server)
        .fetch_forecast(48.85, 2.35)
        .await
        .expect("forecast should succeed");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].description, "mist");
    assert_eq!(items[0].icon, "50d");
    assert_eq!(items[0].temperature, 5);
    assert_eq!(items[0].day, "Monday");
    assert_eq!(items[1].description, "snow");
    assert_eq!(items[1].temperature, 0);
}

#[tokio::test]
async fn fetch_forecast_maps_errors_like_current() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fivedaysforcast/0/0"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = create_test_client(&server).fetch_forecast(0.0, 0.0).await.unwrap_err();
    assert_eq!(err, WeatherError::RateLimited);
}
