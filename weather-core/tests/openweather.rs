//! Integration tests for OpenWeatherGateway using wiremock.

use weather_core::{
    ApiSettings, LookupRequest, OpenWeatherGateway, Units, WeatherError, WeatherGateway,
};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> OpenWeatherGateway {
    let settings = ApiSettings::new("TEST_KEY").with_base_url(&server.uri());
    OpenWeatherGateway::new(settings).unwrap()
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "base": "stations",
        "main": {
            "temp": 14.62, "feels_like": 13.9, "temp_min": 13.1, "temp_max": 15.8,
            "pressure": 1016, "humidity": 72
        },
        "visibility": 10000,
        "wind": { "speed": 4.12, "deg": 250 },
        "clouds": { "all": 75 },
        "dt": 1714561200,
        "sys": { "country": "GB", "sunrise": 1714537552, "sunset": 1714591740 },
        "timezone": 3600,
        "id": 2643743,
        "name": "London",
        "cod": 200
    })
}

fn forecast_entry(dt: i64, temp: f64, id: u32, description: &str) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": { "temp": temp, "feels_like": temp, "pressure": 1015, "humidity": 60 },
        "weather": [{ "id": id, "main": "X", "description": description, "icon": "01d" }],
        "dt_txt": "ignored"
    })
}

#[tokio::test]
async fn current_conditions_by_city() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let current = gateway(&server)
        .current_conditions(&LookupRequest::city("London"), Units::Metric)
        .await
        .unwrap();

    assert_eq!(current.location_name, "London");
    assert_eq!(current.country.as_deref(), Some("GB"));
    assert_eq!(current.temperature, 14.62);
    assert_eq!(current.humidity_pct, 72);
    assert_eq!(current.pressure_hpa, 1016.0);
    assert_eq!(current.wind_direction_deg, Some(250.0));
    assert_eq!(current.cloudiness_pct, 75);
    assert_eq!(current.visibility_m, Some(10000));
    assert_eq!(current.condition.id, 803);
    assert_eq!(current.condition.icon, "04d");
    assert_eq!(current.utc_offset.local_minus_utc(), 3600);
    assert_eq!(current.sunrise.map(|t| t.timestamp()), Some(1714537552));
}

#[tokio::test]
async fn current_conditions_by_coordinates_in_imperial() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let request = LookupRequest::Coordinates { lat: 51.5, lon: -0.12 };
    let current = gateway(&server)
        .current_conditions(&request, Units::Imperial)
        .await
        .unwrap();

    assert_eq!(current.location_name, "London");
}

#[tokio::test]
async fn api_error_carries_body_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = gateway(&server)
        .current_conditions(&LookupRequest::city("Nowhere"), Units::Metric)
        .await
        .unwrap_err();

    match &err {
        WeatherError::Api { status, message } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "API error: city not found");
}

#[tokio::test]
async fn api_error_without_message_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .forecast(&LookupRequest::city("London"), Units::Metric)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API error: request failed with status 503");
}

#[tokio::test]
async fn malformed_success_body_is_a_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .current_conditions(&LookupRequest::city("London"), Units::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Network(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let settings = ApiSettings::new("TEST_KEY").with_base_url("http://127.0.0.1:9");
    let gateway = OpenWeatherGateway::new(settings).unwrap();

    let err = gateway
        .current_conditions(&LookupRequest::city("London"), Units::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Network(_)));
}

#[tokio::test]
async fn forecast_keeps_sample_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": "200",
            "message": 0,
            "cnt": 3,
            "list": [
                forecast_entry(1714521600, 9.5, 800, "clear sky"),
                forecast_entry(1714532400, 11.0, 500, "light rain"),
                { "dt": 1714543200, "main": { "temp": 13.25 }, "weather": [] },
            ],
            "city": { "name": "London", "country": "GB", "timezone": 3600 }
        })))
        .mount(&server)
        .await;

    let samples = gateway(&server)
        .forecast(&LookupRequest::city("London"), Units::Metric)
        .await
        .unwrap();

    let temps: Vec<f64> = samples.iter().map(|s| s.temperature).collect();
    assert_eq!(temps, vec![9.5, 11.0, 13.25]);
    assert_eq!(samples[0].timestamp.timestamp(), 1714521600);
    assert_eq!(samples[1].condition.as_ref().map(|c| c.id), Some(500));
    assert!(samples[2].condition.is_none());
}

#[tokio::test]
async fn short_suggestion_query_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let suggestions = gateway(&server).suggestions("Pa").await;
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn suggestions_are_formatted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Spri"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Springfield", "state": "Illinois", "country": "US", "lat": 39.8, "lon": -89.6 },
            { "name": "Springfield", "country": "US", "lat": 37.2, "lon": -93.3 },
            { "name": "Springs", "state": "Gauteng", "country": "ZA", "lat": -26.2, "lon": 28.4 },
        ])))
        .mount(&server)
        .await;

    let suggestions = gateway(&server).suggestions("Spri").await;

    assert_eq!(
        suggestions,
        vec!["Springfield, Illinois", "Springfield, US", "Springs, Gauteng, ZA"]
    );
}

#[tokio::test]
async fn suggestion_failure_yields_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401, "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    assert!(gateway(&server).suggestions("Paris").await.is_empty());
}
