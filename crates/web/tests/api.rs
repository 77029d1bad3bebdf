use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use directions::{
    response::DirectionsResponse, route_from_response, DirectionsError,
    DirectionsProvider, DirectionsResult,
};
use http_body_util::BodyExt;
use model::{Coordinate, Route, TrafficLights};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot
use web::{app, WebState};

/// Answers every lookup with the same provider response and remembers the
/// requested endpoints.
struct StubDirections {
    response: Value,
    requests: Arc<Mutex<Vec<(Coordinate, Coordinate)>>>,
}

impl StubDirections {
    fn new(response: Value) -> Self {
        Self {
            response,
            requests: Arc::new(Mutex::new(vec![])),
        }
    }
}

#[async_trait]
impl DirectionsProvider for StubDirections {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> DirectionsResult<Route> {
        self.requests.lock().unwrap().push((origin, destination));
        let response: DirectionsResponse = serde_json::from_value(self.response.clone())?;
        route_from_response(response, origin, destination)
    }
}

struct FailingDirections(fn() -> DirectionsError);

#[async_trait]
impl DirectionsProvider for FailingDirections {
    async fn fetch_route(&self, _: Coordinate, _: Coordinate) -> DirectionsResult<Route> {
        Err((self.0)())
    }
}

fn two_step_response() -> Value {
    json!({
        "status": "OK",
        "routes": [{
            "legs": [{
                "steps": [
                    { "start_location": { "lat": 30.0, "lng": -97.0 } },
                    { "start_location": { "lat": 30.1, "lng": -97.1 } }
                ]
            }]
        }]
    })
}

fn app_with<D: DirectionsProvider + 'static>(directions: D) -> Router {
    app(WebState::new(TrafficLights::builtin(), directions, 0.05))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!(
            "response is not json: status={} body={}",
            status,
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, body)
}

#[tokio::test]
async fn route_ends_at_destination() {
    let stub = StubDirections::new(two_step_response());
    let requests = stub.requests.clone();
    let app = app_with(stub);

    let (status, body) = get(
        app,
        "/api/v1/route?lat=30.26815&lon=-97.74491&destLat=30.3&destLon=-97.3",
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(
        body["waypoints"],
        json!([
            { "latitude": 30.0, "longitude": -97.0 },
            { "latitude": 30.1, "longitude": -97.1 },
            { "latitude": 30.3, "longitude": -97.3 }
        ])
    );
    assert_eq!(body["origin"], json!({ "latitude": 30.26815, "longitude": -97.74491 }));
    assert_eq!(body["destination"], json!({ "latitude": 30.3, "longitude": -97.3 }));
    assert_eq!(body["trafficLightsOnRoute"], json!([]));
    assert!(body.get("nearestTrafficLight").is_none());
    assert!(body["lengthKm"].as_f64().unwrap() > 0.0);

    assert_eq!(
        requests.lock().unwrap().as_slice(),
        &[(Coordinate::new(30.26815, -97.74491), Coordinate::new(30.3, -97.3))]
    );
}

#[tokio::test]
async fn route_reports_nearest_traffic_light() {
    let response = json!({
        "routes": [{
            "legs": [{
                "steps": [
                    { "start_location": { "lat": 30.26815, "lng": -97.74491 } },
                    { "start_location": { "lat": 30.26644, "lng": -97.74295 } }
                ]
            }]
        }]
    });
    let app = app_with(StubDirections::new(response));

    let (status, body) = get(
        app,
        "/api/v1/route?lat=30.2665&lon=-97.7430&destLat=30.2705&destLon=-97.7380",
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["trafficLightsOnRoute"], json!(["TL1", "TL2", "TL5"]));
    assert_eq!(body["nearestTrafficLight"]["name"], "TL2");
    assert!(body["nearestTrafficLight"]["distanceKm"].as_f64().unwrap() < 0.01);
}

#[tokio::test]
async fn missing_lon_is_a_bad_request() {
    let stub = StubDirections::new(two_step_response());
    let requests = stub.requests.clone();
    let app = app_with(stub);

    let (status, body) = get(app, "/api/v1/route?lat=30.26815&destLat=30.3&destLon=-97.3").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detailedInformation"], "query parameter `lon` is missing");
    assert_eq!(body["requestedUri"], "/api/v1/route");
    assert_eq!(body["httpMethod"], "GET");
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_numeric_and_missing_destination_are_bad_requests() {
    let (status, body) = get(
        app_with(StubDirections::new(two_step_response())),
        "/api/v1/route?lat=abc&lon=-97.7&destLat=30.3&destLon=-97.3",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detailedInformation"],
        "query parameter `lat` is not a number: \"abc\""
    );

    let (status, body) = get(
        app_with(StubDirections::new(two_step_response())),
        "/api/v1/route?lat=30.2&lon=-97.7",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detailedInformation"], "query parameter `destLat` is missing");
}

#[tokio::test]
async fn zero_routes_is_not_found() {
    let app = app_with(StubDirections::new(json!({
        "status": "ZERO_RESULTS",
        "routes": []
    })));

    let (status, body) = get(
        app,
        "/api/v1/route?lat=30.26815&lon=-97.74491&destLat=0&destLon=0",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "No route available between the requested locations."
    );
}

#[tokio::test]
async fn upstream_failures_are_gateway_errors() {
    let uri = "/api/v1/route?lat=30.26815&lon=-97.74491&destLat=30.3&destLon=-97.3";

    let (status, _) = get(
        app_with(FailingDirections(|| {
            DirectionsError::Timeout(Duration::from_secs(5))
        })),
        uri,
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    let (status, body) = get(
        app_with(FailingDirections(|| DirectionsError::Provider {
            status: "REQUEST_DENIED".to_owned(),
            message: Some("The provided API key is invalid.".to_owned()),
        })),
        uri,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "The directions provider could not be queried.");

    let (status, _) = get(app_with(FailingDirections(|| DirectionsError::MissingLeg)), uri).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn traffic_lights_are_stable_across_reads() {
    let app = app_with(StubDirections::new(two_step_response()));

    let (status, first) = get(app.clone(), "/api/v1/traffic-lights").await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = get(app, "/api/v1/traffic-lights").await;

    assert_eq!(first, second);
    assert_eq!(first["data"].as_array().unwrap().len(), 5);
    assert_eq!(
        first["data"][0],
        json!({ "name": "TL1", "latitude": 30.26815, "longitude": -97.74491 })
    );
}

#[tokio::test]
async fn single_traffic_light_lookup() {
    let app = app_with(StubDirections::new(two_step_response()));

    let (status, body) = get(app.clone(), "/api/v1/traffic-lights/TL4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latitude"], 30.26990);

    let (status, body) = get(app, "/api/v1/traffic-lights/TL9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Traffic light TL9 does not exist.");
}

#[tokio::test]
async fn nearby_traffic_lights() {
    let app = app_with(StubDirections::new(two_step_response()));

    let (status, body) = get(
        app.clone(),
        "/api/v1/traffic-lights/nearby?lat=30.26815&lon=-97.74491&radius=0.3",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|light| light["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, ["TL1", "TL2"]);
    assert_eq!(body["data"][0]["distanceKm"], 0.0);

    let (status, _) = get(app, "/api/v1/traffic-lights/nearby?lat=30.2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_query_strings_get_json_errors() {
    let app = app_with(StubDirections::new(two_step_response()));

    let (status, body) = get(
        app.clone(),
        "/api/v1/traffic-lights/nearby?lat=1&lat=2&lon=3",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["requestedUri"], "/api/v1/traffic-lights/nearby");
    assert!(body["detailedInformation"]
        .as_str()
        .unwrap()
        .contains("duplicate field `lat`"));

    let (status, body) = get(
        app,
        "/api/v1/route?lat=1&lat=2&lon=3&destLat=30.3&destLon=-97.3",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["httpMethod"], "GET");
}

#[tokio::test]
async fn undecodable_traffic_light_name_gets_json_error() {
    let app = app_with(StubDirections::new(two_step_response()));

    // %FF is not valid UTF-8 once percent-decoded
    let (status, body) = get(app, "/api/v1/traffic-lights/TL%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");
    assert_eq!(body["requestedUri"], "/api/v1/traffic-lights/TL%FF");
}

#[tokio::test]
async fn schemas_and_fallbacks() {
    let app = app_with(StubDirections::new(two_step_response()));

    let (status, body) = get(app.clone(), "/api/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong!");

    let (status, body) = get(app.clone(), "/api/v1/route/schema").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["properties"].get("waypoints").is_some(), "schema: {body}");

    let (status, body) = get(app.clone(), "/api/v1/traffic-lights/schema").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "TrafficLight");

    let (status, body) = get(app, "/api/v2/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["requestedUri"], "/api/v2/nothing");
}
