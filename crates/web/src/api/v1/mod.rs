use axum::{
    routing::{get, on},
    Router,
};

use crate::{
    common::{route_not_found, schema, METHOD_FILTER_ALL},
    WebState,
};

mod route;
mod traffic_lights;

pub use route::RouteDto;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/route", get(route::get_route))
        .route("/route/schema", get(schema::<RouteDto>))
        .nest_service("/traffic-lights", traffic_lights::routes(state.clone()))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
