//! Request chains driven end to end through a recording transport.

use async_trait::async_trait;
use chrono::DateTime;
use owm_core::measurement::{SpeedUnit, TemperatureUnit};
use owm_core::model::road_risk::TrackPoint;
use owm_core::{
    Coordinates, HttpMethod, HttpRequest, HttpResponse, HttpTransport, Language,
    OpenWeatherMapClient, OwmError, UnitSystem,
};
use reqwest::Url;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replies with a canned response and remembers every request it was given.
#[derive(Debug)]
struct RecordingTransport {
    response: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    fn replying(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: HttpResponse::new(status, body),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("a request was sent")
    }

    fn record(&self, request: HttpRequest) -> Result<HttpResponse, OwmError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OwmError> {
        self.record(request)
    }

    async fn execute_async(&self, request: HttpRequest) -> Result<HttpResponse, OwmError> {
        self.record(request)
    }
}

fn client(transport: &Arc<RecordingTransport>) -> OpenWeatherMapClient {
    OpenWeatherMapClient::with_transport("TEST_KEY", transport.clone()).unwrap()
}

fn query(request: &HttpRequest) -> (String, HashMap<String, String>) {
    let url = Url::parse(&request.url).unwrap();
    let params = url.query_pairs().into_owned().collect();
    (url.path().to_string(), params)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const CURRENT_METRIC: &str = r#"{
    "coord": {"lon": 27.5667, "lat": 53.9},
    "weather": [{"id": 800, "main": "Clear", "description": "klarer Himmel", "icon": "01d"}],
    "main": {"temp": 5.29, "feels_like": 3.1, "temp_min": 4.0, "temp_max": 6.0, "pressure": 1020, "humidity": 60},
    "visibility": 10000,
    "wind": {"speed": 2.27, "deg": 7},
    "clouds": {"all": 0},
    "dt": 1602702000,
    "sys": {"country": "BY", "sunrise": 1602650000, "sunset": 1602690000},
    "timezone": 10800,
    "id": 625144,
    "name": "Minsk",
    "cod": 200
}"#;

const ROAD_RISK: &str = r#"[{"dt":1602702000,"weather":{"temp":278.44,"wind_speed":2.27,"wind_deg":7,"dew_point":276.13},"road":{"state":2,"temp":293.85},"alerts":[{"sender_name":"METEO-FRANCE","event":"Moderate thunderstorm warning","event_level":2}]}]"#;

#[test]
fn out_of_range_latitude_never_reaches_the_transport() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);
    let client = client(&transport);

    let result = Coordinates::new(95.0, 27.5)
        .and_then(|c| client.current_weather().by_coordinates(c).retrieve().as_model());

    assert!(matches!(result, Err(OwmError::InvalidParameter(_))));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn blank_city_name_never_reaches_the_transport() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);

    let err = client(&transport).current_weather().by_city_name("  ").err();

    assert!(matches!(err, Some(OwmError::InvalidParameter(_))));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn current_weather_by_city_and_country() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);

    let weather = client(&transport)
        .current_weather()
        .by_city_name_and_country("Minsk", "by")
        .unwrap()
        .language(Language::German)
        .unit_system(UnitSystem::Metric)
        .retrieve()
        .as_model()
        .unwrap();

    let request = transport.last_request();
    let (path, params) = query(&request);
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(path, "/data/2.5/weather");
    assert_eq!(params["q"], "Minsk,BY");
    assert_eq!(params["units"], "metric");
    assert_eq!(params["lang"], "de");
    assert_eq!(params["appid"], "TEST_KEY");

    assert_eq!(weather.location.name.as_deref(), Some("Minsk"));
    assert_eq!(weather.clouds, Some(0));
    assert_eq!(weather.states[0].description, "klarer Himmel");
    assert_eq!(weather.temperature.value.canonical_value(), dec("278.44"));
    assert_eq!(weather.temperature.value.convert_to(TemperatureUnit::Celsius), dec("5.29"));
    assert_eq!(weather.wind.speed.convert_to(SpeedUnit::KilometersPerHour), dec("8.17"));
}

#[test]
fn modifiers_can_be_applied_in_any_order_and_last_one_wins() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);

    client(&transport)
        .current_weather()
        .by_city_id(625144)
        .unit_system(UnitSystem::Imperial)
        .timeout(Duration::from_secs(2))
        .unwrap()
        .unit_system(UnitSystem::Metric)
        .retrieve()
        .as_model()
        .unwrap();

    let request = transport.last_request();
    let (_, params) = query(&request);
    assert_eq!(params["id"], "625144");
    assert_eq!(params["units"], "metric");
    assert_eq!(request.timeout, Duration::from_secs(2));
}

#[test]
fn unauthorized_surfaces_without_a_model() {
    let transport = RecordingTransport::replying(
        401,
        r#"{"cod":401,"message":"Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."}"#,
    );

    let result = client(&transport)
        .current_weather()
        .by_city_name("Minsk")
        .unwrap()
        .retrieve()
        .as_model();

    match result {
        Err(OwmError::Unauthorized(message)) => assert!(message.contains("Invalid API key")),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert_eq!(transport.calls(), 1);
}

#[test]
fn not_found_surfaces_for_unknown_city() {
    let transport = RecordingTransport::replying(404, r#"{"cod":"404","message":"city not found"}"#);

    let err = client(&transport)
        .forecast_5day_3hour()
        .by_city_name("Atlantis")
        .unwrap()
        .retrieve()
        .as_model()
        .unwrap_err();

    assert_eq!(err, OwmError::NotFound("city not found".into()));
}

#[test]
fn as_json_returns_the_raw_body() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);

    let json = client(&transport)
        .current_weather()
        .by_zip_code_and_country("220004", "BY")
        .unwrap()
        .retrieve()
        .as_json()
        .unwrap();

    assert_eq!(json, CURRENT_METRIC);
    let (_, params) = query(&transport.last_request());
    assert_eq!(params["zip"], "220004,BY");
}

#[test]
fn malformed_body_is_reported_with_its_path() {
    let transport = RecordingTransport::replying(200, r#"{"main": {}, "wind": {"speed": 1}, "dt": 0}"#);

    let err = client(&transport)
        .current_weather()
        .by_city_name("Minsk")
        .unwrap()
        .retrieve()
        .as_model()
        .unwrap_err();

    match err {
        OwmError::MalformedResponse { path, .. } => assert_eq!(path, "main.temp"),
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[test]
fn forecast_count_is_validated_before_sending() {
    let transport = RecordingTransport::replying(200, "{}");

    let err = client(&transport)
        .forecast_5day_3hour()
        .by_coordinates(Coordinates::new(53.9, 27.56).unwrap())
        .count(0)
        .err();

    assert!(matches!(err, Some(OwmError::InvalidParameter(_))));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn zero_timeout_is_rejected_before_sending() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);

    let err = client(&transport)
        .current_weather()
        .by_city_id(625144)
        .timeout(Duration::ZERO)
        .err();

    assert!(matches!(err, Some(OwmError::InvalidParameter(_))));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn forecast_sends_count_and_coordinates() {
    let body = r#"{"list": [], "city": {"id": 1, "name": "Minsk"}}"#;
    let transport = RecordingTransport::replying(200, body);

    let forecast = client(&transport)
        .forecast_5day_3hour()
        .by_coordinates(Coordinates::new(53.9, 27.56).unwrap())
        .count(8)
        .unwrap()
        .retrieve()
        .as_model()
        .unwrap();

    let (path, params) = query(&transport.last_request());
    assert_eq!(path, "/data/2.5/forecast");
    assert_eq!(params["lat"], "53.9");
    assert_eq!(params["lon"], "27.56");
    assert_eq!(params["cnt"], "8");
    assert!(forecast.entries.is_empty());
}

#[test]
fn road_risk_posts_the_track_and_maps_records() {
    let transport = RecordingTransport::replying(200, ROAD_RISK);
    let point = TrackPoint::new(
        Coordinates::new(7.27, 44.04).unwrap(),
        DateTime::from_timestamp(1602702000, 0).unwrap(),
    );

    let records = client(&transport)
        .road_risk()
        .by_track_points(vec![point])
        .unwrap()
        .retrieve()
        .as_model()
        .unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(query(&request).0, "/data/2.5/roadrisk");
    assert_eq!(
        request.body.as_deref(),
        Some(r#"{"track":[{"lat":7.27,"lon":44.04,"dt":1602702000}]}"#)
    );

    assert_eq!(records.len(), 1);
    let weather = records[0].weather.unwrap();
    assert_eq!(weather.temperature.convert_to(TemperatureUnit::Celsius), dec("5.29"));
    assert_eq!(weather.wind_speed.convert_to(SpeedUnit::KilometersPerHour), dec("8.17"));
    assert_eq!(records[0].alerts.len(), 1);
}

#[test]
fn empty_track_is_rejected() {
    let transport = RecordingTransport::replying(200, "[]");

    let err = client(&transport).road_risk().by_track_points(Vec::new()).err();

    assert!(matches!(err, Some(OwmError::InvalidParameter(_))));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn historical_air_pollution_sends_unix_period() {
    let body = r#"{"coord": {"lon": 27.56, "lat": 53.9}, "list": []}"#;
    let transport = RecordingTransport::replying(200, body);
    let start = DateTime::from_timestamp(1606223802, 0).unwrap();
    let end = DateTime::from_timestamp(1606482999, 0).unwrap();

    client(&transport)
        .air_pollution()
        .historical()
        .by_coordinates_and_period(Coordinates::new(53.9, 27.56).unwrap(), start, end)
        .unwrap()
        .retrieve()
        .as_model()
        .unwrap();

    let (path, params) = query(&transport.last_request());
    assert_eq!(path, "/data/2.5/air_pollution/history");
    assert_eq!(params["start"], "1606223802");
    assert_eq!(params["end"], "1606482999");
}

#[test]
fn inverted_period_is_rejected() {
    let transport = RecordingTransport::replying(200, "{}");
    let start = DateTime::from_timestamp(1606482999, 0).unwrap();
    let end = DateTime::from_timestamp(1606223802, 0).unwrap();

    let err = client(&transport)
        .air_pollution()
        .historical()
        .by_coordinates_and_period(Coordinates::new(53.9, 27.56).unwrap(), start, end)
        .err();

    assert!(matches!(err, Some(OwmError::InvalidParameter(_))));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn air_pollution_modes_use_their_own_paths() {
    let body = r#"{"coord": {"lon": 27.56, "lat": 53.9}, "list": []}"#;
    let transport = RecordingTransport::replying(200, body);
    let coords = Coordinates::new(53.9, 27.56).unwrap();

    client(&transport).air_pollution().current().by_coordinates(coords).retrieve().as_model().unwrap();
    assert_eq!(query(&transport.last_request()).0, "/data/2.5/air_pollution");

    client(&transport).air_pollution().forecast().by_coordinates(coords).retrieve().as_model().unwrap();
    assert_eq!(query(&transport.last_request()).0, "/data/2.5/air_pollution/forecast");
}

#[test]
fn geocoding_families() {
    let transport = RecordingTransport::replying(
        200,
        r#"[{"name": "Minsk", "lat": 53.9, "lon": 27.56, "country": "BY"}]"#,
    );

    let places = client(&transport)
        .geocoding()
        .direct()
        .by_location_name("Minsk,BY")
        .unwrap()
        .limit(3)
        .unwrap()
        .retrieve()
        .as_model()
        .unwrap();

    let (path, params) = query(&transport.last_request());
    assert_eq!(path, "/geo/1.0/direct");
    assert_eq!(params["q"], "Minsk,BY");
    assert_eq!(params["limit"], "3");
    assert_eq!(places[0].country_code, "BY");

    client(&transport)
        .geocoding()
        .reverse()
        .by_coordinates(Coordinates::new(53.9, 27.56).unwrap())
        .retrieve()
        .as_model()
        .unwrap();
    assert_eq!(query(&transport.last_request()).0, "/geo/1.0/reverse");

    let err = client(&transport)
        .geocoding()
        .reverse()
        .by_coordinates(Coordinates::new(53.9, 27.56).unwrap())
        .limit(6)
        .err();
    assert!(matches!(err, Some(OwmError::InvalidParameter(_))));
}

#[tokio::test]
async fn async_terminal_yields_the_same_model() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);

    let weather = client(&transport)
        .current_weather()
        .by_city_name("Minsk")
        .unwrap()
        .unit_system(UnitSystem::Metric)
        .retrieve_async()
        .as_model()
        .await
        .unwrap();

    assert_eq!(weather.temperature.value.convert_to(TemperatureUnit::Kelvin), dec("278.44"));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn concurrent_requests_share_one_client() {
    let transport = RecordingTransport::replying(200, CURRENT_METRIC);
    let client = client(&transport);

    let minsk = client.current_weather().by_city_name("Minsk").unwrap().retrieve_async();
    let grodno = client.current_weather().by_city_name("Grodno").unwrap().retrieve_async();
    let (a, b) = tokio::join!(minsk.as_json(), grodno.as_json());

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(transport.calls(), 2);
}
