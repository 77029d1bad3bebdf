use std::time::Duration;

use async_trait::async_trait;
use model::{Coordinate, Route};
use thiserror::Error;

pub mod client;
pub mod response;

pub use client::{DirectionsClient, DirectionsConfig};

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("directions request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid Response ({status_code}) {url}")]
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("directions provider answered {status}")]
    Provider {
        status: String,
        message: Option<String>,
    },
    #[error("no route found")]
    NoRoute,
    #[error("route has no legs")]
    MissingLeg,
}

impl DirectionsError {
    /// `true` when the provider answered but knows no route between the points.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoRoute)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<reqwest::Error> for DirectionsError {
    fn from(why: reqwest::Error) -> Self {
        // reqwest errors carry the full request url, which includes the api key
        Self::Request(why.without_url())
    }
}

pub type DirectionsResult<O> = Result<O, DirectionsError>;

/// Anything that can turn an origin and a destination into a [`Route`].
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> DirectionsResult<Route>;
}

/// Builds a [`Route`] from the first leg of the first route of a provider
/// response: the start location of every step, then `destination`.
pub fn route_from_response(
    response: response::DirectionsResponse,
    origin: Coordinate,
    destination: Coordinate,
) -> DirectionsResult<Route> {
    match response.status.as_deref() {
        None | Some("OK") => {}
        Some("ZERO_RESULTS") | Some("NOT_FOUND") => return Err(DirectionsError::NoRoute),
        Some(status) => {
            return Err(DirectionsError::Provider {
                status: status.to_owned(),
                message: response.error_message,
            })
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoute)?;
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or(DirectionsError::MissingLeg)?;

    Ok(Route::from_steps(
        origin,
        destination,
        leg.steps.into_iter().map(|step| step.start_location.into()),
    ))
}
