use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Coordinate, ExampleData};

/// Ordered waypoints from `origin` to `destination`.
///
/// A route built with [`Route::from_steps`] always ends with the exact
/// destination coordinate, whether or not the provider returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub waypoints: Vec<Coordinate>,
}

impl Route {
    pub fn from_steps<I>(origin: Coordinate, destination: Coordinate, steps: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut waypoints = steps.into_iter().collect::<Vec<_>>();
        waypoints.push(destination);
        Self {
            origin,
            destination,
            waypoints,
        }
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    /// Sum of the great-circle distances between consecutive waypoints.
    pub fn length_km(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_km(&pair[1]))
            .sum()
    }
}

impl ExampleData for Route {
    fn example_data() -> Self {
        Route::from_steps(
            Coordinate::new(30.26815, -97.74491),
            Coordinate::new(30.3, -97.3),
            [Coordinate::new(30.0, -97.0), Coordinate::new(30.1, -97.1)],
        )
    }
}
