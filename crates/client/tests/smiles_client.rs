//! Integration tests for `SmilesClient` and `FlightService` using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use milesfare_client::{
    DeepLinkBuilder, FlightService, SearchQuery, SmilesClient, SmilesConfig, TransportError, search_all,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/v1/airlines/search";

fn test_client(server: &MockServer) -> SmilesClient {
    SmilesClient::new(SmilesConfig {
        api_key: "test-key".into(),
        telemetry: "test-telemetry".into(),
        base_url: format!("{}{}", server.uri(), SEARCH_PATH),
        timeout: Duration::from_secs(2),
        ..Default::default()
    })
    .expect("client construction should not fail")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn response_with(airline: &str, miles: i64) -> serde_json::Value {
    serde_json::json!({
        "requestedFlightSegmentList": [{
            "flightList": [{
                "airline": { "name": airline },
                "duration": { "hours": 11, "minutes": 50 },
                "fareList": [
                    { "type": "SMILES_CLUB", "miles": miles + 5000 },
                    { "type": "SMILES", "miles": miles },
                    { "type": "SMILES_MONEY", "miles": 1000 }
                ],
                "departure": { "date": "2025-03-26T22:10:00", "airport": { "code": "GIG" } },
                "arrival": { "date": "2025-03-27T14:00:00", "airport": { "code": "MXP" } },
                "stops": 1
            }]
        }]
    })
}

#[tokio::test]
async fn search_sends_headers_and_encoded_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(header("x-api-key", "test-key"))
        .and(header("akamai-bm-telemetry", "test-telemetry"))
        .and(header("channel", "WEB"))
        .and(query_param("cabin", "ALL"))
        .and(query_param("originAirportCode", "GIG"))
        .and(query_param("destinationAirportCode", "MXP"))
        .and(query_param("departureDate", "2025-03-26"))
        .and(query_param("adults", "1"))
        .and(query_param("children", "0"))
        .and(query_param("infants", "0"))
        .and(query_param("forceCongener", "false"))
        .and(query_param("cookies", "_gid=undefined;"))
        .and(query_param("memberNumber", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_with("TAP", 80000)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = SearchQuery::one_way("GIG", "MXP", date(2025, 3, 26));
    let raw = client.fetch(&query).await.expect("search should succeed");

    assert_eq!(raw.flight_options().count(), 1);
}

#[tokio::test]
async fn search_sends_return_date_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("returnDate", "2025-04-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = SearchQuery::one_way("GIG", "MXP", date(2025, 3, 26)).with_return_date(date(2025, 4, 10));
    assert!(client.fetch(&query).await.is_ok());
}

#[tokio::test]
async fn search_maps_server_error_to_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch(&SearchQuery::one_way("GIG", "MXP", date(2025, 3, 26))).await;
    assert!(matches!(result, Err(TransportError::Http { status: 503 })));
}

#[tokio::test]
async fn search_maps_non_json_body_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch(&SearchQuery::one_way("GIG", "MXP", date(2025, 3, 26))).await;
    assert!(matches!(result, Err(TransportError::Parse(_))));
}

#[tokio::test]
async fn search_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = SmilesClient::new(SmilesConfig {
        api_key: "test-key".into(),
        telemetry: "test-telemetry".into(),
        base_url: format!("{}{}", server.uri(), SEARCH_PATH),
        timeout: Duration::from_millis(200),
        ..Default::default()
    })
    .unwrap();

    let result = client.fetch(&SearchQuery::one_way("GIG", "MXP", date(2025, 3, 26))).await;
    assert!(matches!(result, Err(TransportError::Timeout)));
}

#[tokio::test]
async fn bulk_dispatch_pairs_results_with_queries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("departureDate", "2025-03-26"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_with("TAP", 15000)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("departureDate", "2025-03-27"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("departureDate", "2025-03-28"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(response_with("GOL", 9000))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let queries = vec![
        SearchQuery::one_way("GIG", "MXP", date(2025, 3, 26)),
        SearchQuery::one_way("GIG", "MXP", date(2025, 3, 27)),
        SearchQuery::one_way("GIG", "MXP", date(2025, 3, 28)),
    ];

    let entries = search_all(Arc::new(test_client(&server)), queries).await;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].query.departure_date, date(2025, 3, 26));
    assert!(entries[0].result.is_ok());
    assert!(matches!(entries[1].result, Err(TransportError::Http { status: 500 })));
    assert_eq!(entries[2].query.departure_date, date(2025, 3, 28));
    assert!(entries[2].result.is_ok());
}

#[tokio::test]
async fn flight_service_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("departureDate", "2025-03-26"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_with("TAP", 15000)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("departureDate", "2025-03-27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_with("GOL", 10000)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("departureDate", "2025-03-28"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let deeplinks = DeepLinkBuilder::new("https://www.smiles.com.br/mfe/emissao-passagem/", -180).unwrap();
    let service = FlightService::new(Arc::new(test_client(&server)), deeplinks);

    let flights = service.get_flights("GIG", "MXP", date(2025, 3, 26), 3).await.unwrap();

    assert_eq!(flights.len(), 2);
    assert_eq!(flights[0].airline.as_deref(), Some("GOL"));
    assert_eq!(flights[0].miles_cost, 10000);
    assert_eq!(flights[1].airline.as_deref(), Some("TAP"));
    assert_eq!(flights[1].miles_cost, 15000);
    assert_eq!(flights[1].number_of_stops, 1);
    assert!(flights[1].booking_url.contains("departureDate=1743012000000"));
}
