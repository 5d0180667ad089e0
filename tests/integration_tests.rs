//! End-to-end tests: full router, JSON history file, OpenWeather mocked with wiremock

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use tempfile::TempDir;
use tower::ServiceExt;
use weather_dashboard::{
    AppState, City, JsonHistoryStore, OpenWeatherClient,
    config::{ServerConfig, WeatherConfig},
    web,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// 2024-06-01T00:00:00Z
const FEED_START: i64 = 1_717_200_000;

/// Five days of 3-hourly readings, as returned by /data/2.5/forecast
fn forecast_feed(timezone: i32) -> serde_json::Value {
    let list: Vec<_> = (0..40)
        .map(|i| {
            serde_json::json!({
                "dt": FEED_START + i * 3 * 3600,
                "main": { "temp": 60.0 + i as f64, "humidity": 50 },
                "wind": { "speed": 5.5 },
                "weather": [{ "description": "light rain", "icon": "10d" }]
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "cnt": 40,
        "list": list,
        "city": { "name": "Paris", "timezone": timezone }
    })
}

async fn mount_geocoding(server: &MockServer, query: &str, response: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", query))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "test_api_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .and(query_param("units", "imperial"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn build_app(server: &MockServer, history_file: &Path) -> Router {
    let config = WeatherConfig {
        api_key: Some("test_api_key".to_string()),
        base_url: format!("{}/data/2.5", server.uri()),
        geocoding_url: format!("{}/geo/1.0", server.uri()),
        timeout_seconds: 5,
        ..WeatherConfig::default()
    };
    #[allow(clippy::expect_used)]
    let weather = OpenWeatherClient::new(&config).expect("Failed to create client");
    let history = JsonHistoryStore::new(history_file);

    web::app(
        AppState::new(Arc::new(weather), Arc::new(history)),
        &ServerConfig::default(),
    )
}

fn submit(city_body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/weather")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(city_body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_submit_city_returns_forecast_and_records_history() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let history_file = dir.path().join("searchHistory.json");

    mount_geocoding(
        &server,
        "paris",
        serde_json::json!([{ "name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR" }]),
    )
    .await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_json(forecast_feed(7200)),
    )
    .await;

    let response = build_app(&server, &history_file)
        .oneshot(submit(r#"{"city": "paris"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["city"]["name"], "Paris");

    let weather = body["weather"].as_array().unwrap();
    assert!((1..=5).contains(&weather.len()));
    assert_eq!(weather[0]["date"], "2024-06-01T00:00:00Z");
    assert_eq!(weather[0]["temperature"], 60.0);
    assert_eq!(weather[0]["description"], "light rain");

    // Paris is UTC+2 here, so the noon window picks the 09:00Z / 12:00Z readings
    for point in &weather[1..] {
        let date = point["date"].as_str().unwrap();
        assert!(date.ends_with("T09:00:00Z") || date.ends_with("T12:00:00Z"), "{date}");
    }

    let stored: Vec<City> =
        serde_json::from_str(&std::fs::read_to_string(&history_file).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Paris");
    assert_eq!(stored[0].id, body["city"]["id"]);
}

#[tokio::test]
async fn test_geocoding_miss_is_reported_as_city_not_found() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let history_file = dir.path().join("searchHistory.json");

    mount_geocoding(&server, "Atlantis", serde_json::json!([])).await;

    let response = build_app(&server, &history_file)
        .oneshot(submit(r#"{"city": "Atlantis"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["message"], "City not found");
    assert!(!history_file.exists());
}

#[tokio::test]
async fn test_forecast_http_error_propagates_as_internal_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let history_file = dir.path().join("searchHistory.json");

    mount_geocoding(
        &server,
        "paris",
        serde_json::json!([{ "name": "Paris", "lat": 48.85, "lon": 2.35 }]),
    )
    .await;
    mount_forecast(
        &server,
        ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })),
    )
    .await;

    let response = build_app(&server, &history_file)
        .oneshot(submit(r#"{"city": "paris"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = json_body(response).await["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.contains("401"), "{message}");
    assert!(!message.contains("test_api_key"), "{message}");
    assert!(!history_file.exists());
}

#[tokio::test]
async fn test_malformed_forecast_is_internal_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let history_file = dir.path().join("searchHistory.json");

    mount_geocoding(
        &server,
        "paris",
        serde_json::json!([{ "name": "Paris", "lat": 48.85, "lon": 2.35 }]),
    )
    .await;
    mount_forecast(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": [{ "dt": 1 }] })),
    )
    .await;

    let response = build_app(&server, &history_file)
        .oneshot(submit(r#"{"city": "paris"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!history_file.exists());
}

#[tokio::test]
async fn test_missing_city_is_bad_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let response = build_app(&server, &dir.path().join("searchHistory.json"))
        .oneshot(submit("{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "City name is required"
    );
}

#[tokio::test]
async fn test_history_listing_and_deletion() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let history_file = dir.path().join("searchHistory.json");
    std::fs::write(
        &history_file,
        r#"[
  { "id": "11111111-1111-4111-8111-111111111111", "name": "Paris" },
  { "id": "22222222-2222-4222-8222-222222222222", "name": "Lima" }
]"#,
    )
    .unwrap();
    let app = build_app(&server, &history_file);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/weather/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<City> = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(
        listed.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["Paris", "Lima"]
    );

    let response = app
        .clone()
        .oneshot(
            Request::delete("/api/weather/history/unknown-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::delete("/api/weather/history/11111111-1111-4111-8111-111111111111")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let remaining: Vec<City> =
        serde_json::from_str(&std::fs::read_to_string(&history_file).unwrap()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Lima");
}
