//! The subset of the Google Directions JSON response this crate consumes.
//!
//! Only `routes[*].legs[*].steps[*].start_location` is required; everything
//! else the provider sends is ignored.

use model::Coordinate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub start_location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}
