pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{
    extract::{FromRef, Request},
    routing::on,
    Router,
};
use directions::DirectionsProvider;
use model::TrafficLights;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::common::{route_not_found, METHOD_FILTER_ALL};

pub mod api;
pub mod common;
pub mod config;
pub mod query;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub traffic_lights: Arc<TrafficLights>,
    pub directions: Arc<dyn DirectionsProvider>,
    #[from_ref(skip)]
    pub proximity_threshold_km: f64,
}

impl WebState {
    pub fn new<D>(
        traffic_lights: TrafficLights,
        directions: D,
        proximity_threshold_km: f64,
    ) -> Self
    where
        D: DirectionsProvider + 'static,
    {
        Self {
            traffic_lights: Arc::new(traffic_lights),
            directions: Arc::new(directions),
            proximity_threshold_km,
        }
    }
}

pub fn app(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri().path()
            )
        }))
}

pub async fn start_web_server(state: WebState, listen_addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        log::error!("could not listen for shutdown signal: {why}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}
