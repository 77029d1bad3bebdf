use std::{fmt, time::Duration};

use async_trait::async_trait;
use model::{Coordinate, Route};

use crate::{
    response::DirectionsResponse, route_from_response, DirectionsError,
    DirectionsProvider, DirectionsResult,
};

pub const GOOGLE_DIRECTIONS_API_URL: &str = "https://maps.googleapis.com/maps/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the directions provider.
#[derive(Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl DirectionsConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            base_url: GOOGLE_DIRECTIONS_API_URL.to_owned(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for DirectionsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectionsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Directions API client. Cheap to share, the underlying connection pool is
/// reused across requests.
pub struct DirectionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl DirectionsClient {
    pub fn new(config: &DirectionsConfig) -> DirectionsResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/directions/json",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    /// The request url without query parameters, safe to log.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> DirectionsResult<DirectionsResponse> {
        log::debug!(
            "Requesting directions from {origin} to {destination} at '{}'.",
            self.endpoint
        );

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|why| self.convert_error(why))?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await.map_err(|why| self.convert_error(why))?;
                Ok(serde_json::from_str(&body)?)
            }
            status_code => Err(DirectionsError::InvalidResponse {
                status_code,
                url: self.endpoint.clone(),
                response: response.text().await.ok(),
            }),
        }
    }

    fn convert_error(&self, why: reqwest::Error) -> DirectionsError {
        if why.is_timeout() {
            DirectionsError::Timeout(self.timeout)
        } else {
            DirectionsError::from(why)
        }
    }
}

#[async_trait]
impl DirectionsProvider for DirectionsClient {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> DirectionsResult<Route> {
        let response = self.get(origin, destination).await?;
        let route = route_from_response(response, origin, destination)?;
        log::debug!(
            "Received route from {origin} to {destination} with {} waypoints.",
            route.waypoints().len()
        );
        Ok(route)
    }
}
