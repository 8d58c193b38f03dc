//! The default transport against a local mock server.

use chrono::DateTime;
use owm_core::measurement::TemperatureUnit;
use owm_core::model::road_risk::TrackPoint;
use owm_core::{Coordinates, Language, OpenWeatherMapClient, OwmError, UnitSystem};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> OpenWeatherMapClient {
    OpenWeatherMapClient::new("TEST_KEY")
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap()
}

#[tokio::test]
async fn fetches_current_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "fr"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "weather": [{"id": 500, "main": "Rain", "description": "légère pluie", "icon": "10d"}],
            "main": {"temp": 12.5, "pressure": 1012, "humidity": 76},
            "wind": {"speed": 4.63, "deg": 240},
            "dt": 1697550000,
            "name": "London"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let weather = client_for(&server)
        .await
        .current_weather()
        .by_city_name("London")
        .unwrap()
        .unit_system(UnitSystem::Metric)
        .language(Language::French)
        .retrieve_async()
        .as_model()
        .await
        .unwrap();

    assert_eq!(weather.location.name.as_deref(), Some("London"));
    assert_eq!(
        weather.temperature.value.convert_to(TemperatureUnit::Celsius),
        Decimal::new(1250, 2)
    );
    assert_eq!(weather.states[0].description, "légère pluie");
}

#[tokio::test]
async fn maps_status_codes_onto_errors() {
    let server = MockServer::start().await;
    Mock::given(path("/data/2.5/weather"))
        .and(query_param("q", "Nowhere"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;
    Mock::given(path("/data/2.5/weather"))
        .and(query_param("q", "Locked"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"cod": 401, "message": "Invalid API key"})))
        .mount(&server)
        .await;
    Mock::given(path("/data/2.5/weather"))
        .and(query_param("q", "Busy"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let fetch = |city: &'static str| {
        let client = client.clone();
        async move {
            client
                .current_weather()
                .by_city_name(city)
                .unwrap()
                .retrieve_async()
                .as_model()
                .await
        }
    };

    assert_eq!(fetch("Nowhere").await.unwrap_err(), OwmError::NotFound("city not found".into()));
    assert_eq!(fetch("Locked").await.unwrap_err(), OwmError::Unauthorized("Invalid API key".into()));
    assert!(matches!(fetch("Busy").await.unwrap_err(), OwmError::Transport(_)));
}

#[tokio::test]
async fn posts_road_risk_track() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/data/2.5/roadrisk"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"track": [{"lat": 7.27, "lon": 44.04, "dt": 1602702000}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "dt": 1602702000,
            "coord": [7.27, 44.04],
            "weather": {"temp": 278.44, "wind_speed": 2.27},
            "alerts": []
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let point = TrackPoint::new(
        Coordinates::new(7.27, 44.04).unwrap(),
        DateTime::from_timestamp(1602702000, 0).unwrap(),
    );
    let records = client_for(&server)
        .await
        .road_risk()
        .by_track_points(vec![point])
        .unwrap()
        .retrieve_async()
        .as_model()
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].alerts.is_empty());
    assert_eq!(records[0].coordinates.map(|c| c.latitude()), Some(7.27));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let client = OpenWeatherMapClient::new("TEST_KEY")
        .unwrap()
        .with_base_url("http://127.0.0.1:1")
        .unwrap();

    let err = client
        .geocoding()
        .direct()
        .by_location_name("London")
        .unwrap()
        .retrieve_async()
        .as_json()
        .await
        .unwrap_err();

    match err {
        OwmError::Transport(message) => assert!(!message.contains("TEST_KEY")),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_terminal_fetches_through_reqwest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Minsk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": {"temp": 278.44, "pressure": 1020, "humidity": 60},
            "wind": {"speed": 2.27},
            "dt": 1602702000,
            "name": "Minsk"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let weather = tokio::task::spawn_blocking(move || {
        client.current_weather().by_city_name("Minsk")?.retrieve().as_model()
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(weather.location.name.as_deref(), Some("Minsk"));
    assert_eq!(
        weather.temperature.value.convert_to(TemperatureUnit::Celsius),
        Decimal::new(529, 2)
    );
}

#[tokio::test]
async fn blocking_terminal_on_a_runtime_thread_returns_an_error() {
    let client = OpenWeatherMapClient::new("TEST_KEY")
        .unwrap()
        .with_base_url("http://127.0.0.1:1")
        .unwrap();

    let err = client
        .current_weather()
        .by_city_name("Minsk")
        .unwrap()
        .retrieve()
        .as_model()
        .unwrap_err();

    match err {
        OwmError::Transport(message) => assert!(!message.contains("TEST_KEY")),
        other => panic!("expected Transport, got {other:?}"),
    }
}
