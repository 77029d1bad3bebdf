use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use serde_with;

pub mod coordinate;
pub mod route;
pub mod traffic_light;

pub use coordinate::{Coordinate, CoordinateError};
pub use route::Route;
pub use traffic_light::{TrafficLight, TrafficLightError, TrafficLights};

pub trait ExampleData {
    fn example_data() -> Self;
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: f64, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }
}
