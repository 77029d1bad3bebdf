use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::Method,
    routing::{get, on},
    Json, Router,
};
use model::{TrafficLight, TrafficLights, WithDistance};

use crate::{
    common::{
        route_not_found, schema, RouteErrorResponse, RouteResult, VecResponse,
        METHOD_FILTER_ALL,
    },
    query::{LocationError, NearbyQuery},
    WebState,
};

const DEFAULT_NEARBY_RADIUS_KM: f64 = 0.05;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_traffic_lights))
        .route("/schema", get(schema::<TrafficLight>))
        .route("/nearby", get(nearby))
        .route("/:name", get(get_traffic_light))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_traffic_lights(
    State(traffic_lights): State<Arc<TrafficLights>>,
) -> Json<VecResponse<TrafficLight>> {
    VecResponse::new(traffic_lights.all().cloned().collect()).json()
}

async fn get_traffic_light(
    OriginalUri(original_uri): OriginalUri,
    State(traffic_lights): State<Arc<TrafficLights>>,
    name: Result<Path<String>, PathRejection>,
) -> RouteResult<Json<TrafficLight>> {
    let Path(name) = name.map_err(|why| {
        RouteErrorResponse::bad_request(why.body_text())
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    traffic_lights.get(&name).cloned().map(Json).ok_or_else(|| {
        RouteErrorResponse::not_found(&Method::GET, original_uri.path())
            .with_message(format!("Traffic light {name} does not exist."))
    })
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(traffic_lights): State<Arc<TrafficLights>>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> RouteResult<Json<VecResponse<WithDistance<TrafficLight>>>> {
    let located = |why: RouteErrorResponse| {
        why.with_method(&Method::GET).with_uri(original_uri.path())
    };
    let invalid = |why: LocationError| located(why.into());

    let Query(params) = query
        .map_err(|why| located(RouteErrorResponse::bad_request(why.body_text())))?;
    let center = params.center().map_err(invalid)?;
    let radius = params
        .radius_km(DEFAULT_NEARBY_RADIUS_KM)
        .map_err(invalid)?;

    Ok(VecResponse::new(traffic_lights.nearby(&center, radius)).json())
}
