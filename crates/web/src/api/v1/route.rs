use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, State},
    http::Method,
    Json,
};
use model::{ExampleData, Route, TrafficLight, TrafficLights, WithDistance};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{
    common::{RouteErrorResponse, RouteResult},
    query::RouteQuery,
    WebState,
};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    #[serde(flatten)]
    pub route: Route,
    pub length_km: f64,
    pub traffic_lights_on_route: Vec<String>,
    pub nearest_traffic_light: Option<WithDistance<TrafficLight>>,
}

impl RouteDto {
    pub fn new(route: Route, traffic_lights: &TrafficLights, threshold_km: f64) -> Self {
        let traffic_lights_on_route = traffic_lights
            .along_route(&route, threshold_km)
            .map(|light| light.name.clone())
            .collect();
        let nearest_traffic_light =
            traffic_lights.nearest_on_route(&route.origin, &route, threshold_km);
        Self {
            length_km: route.length_km(),
            traffic_lights_on_route,
            nearest_traffic_light,
            route,
        }
    }
}

impl ExampleData for RouteDto {
    fn example_data() -> Self {
        Self::new(Route::example_data(), &TrafficLights::builtin(), 0.05)
    }
}

/// Looks up the driving route from the current location (`lat`, `lon`) to the
/// destination (`destLat`, `destLon`).
pub(super) async fn get_route(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        traffic_lights,
        directions,
        proximity_threshold_km,
    }): State<WebState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> RouteResult<Json<RouteDto>> {
    let located = |why: RouteErrorResponse| {
        why.with_method(&Method::GET).with_uri(original_uri.path())
    };

    let Query(params) = query
        .map_err(|why| located(RouteErrorResponse::bad_request(why.body_text())))?;
    let origin = params
        .current_location()
        .map_err(|why| located(why.into()))?;
    let destination = params.destination().map_err(|why| located(why.into()))?;

    let route = directions
        .fetch_route(origin, destination)
        .await
        .map_err(|why| {
            log::warn!("route lookup from {origin} to {destination} failed: {why}");
            located(why.into())
        })?;

    Ok(Json(RouteDto::new(
        route,
        &traffic_lights,
        proximity_threshold_km,
    )))
}
