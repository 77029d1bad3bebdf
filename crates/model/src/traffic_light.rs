use std::{fs, path::Path};

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Coordinate, CoordinateError, ExampleData, Route, WithDistance};

/// Traffic lights around downtown Austin, used when no seed file is configured.
const BUILTIN_TRAFFIC_LIGHTS: [(&str, f64, f64); 5] = [
    ("TL1", 30.26815, -97.74491), // Austin Convention Center
    ("TL2", 30.26644, -97.74295), // 6th Street
    ("TL3", 30.26720, -97.73950), // Republic Square
    ("TL4", 30.26990, -97.74180), // State Capitol
    ("TL5", 30.27050, -97.73800), // Waterloo Park
];

#[derive(Debug, Error)]
pub enum TrafficLightError {
    #[error("could not read traffic lights from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid traffic light data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("traffic light {name}: {source}")]
    InvalidCoordinate {
        name: String,
        #[source]
        source: CoordinateError,
    },
    #[error("traffic light {0} is defined more than once")]
    DuplicateName(String),
}

/// A static, named reference point. Not a live signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrafficLight {
    pub name: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl TrafficLight {
    pub fn new<S: Into<String>>(name: S, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn with_distance_to(self, coordinate: &Coordinate) -> WithDistance<Self> {
        let distance = self.location().distance_km(coordinate);
        WithDistance::new(distance, self)
    }
}

impl ExampleData for TrafficLight {
    fn example_data() -> Self {
        let (name, latitude, longitude) = BUILTIN_TRAFFIC_LIGHTS[0];
        Self::new(name, latitude, longitude)
    }
}

/// The process-wide traffic light reference set.
///
/// Built once at startup and shared read-only afterwards; there is no way to
/// mutate it once constructed. Iteration order is the order of the seed data.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLights {
    by_name: IndexMap<String, TrafficLight>,
}

impl TrafficLights {
    pub fn new<I>(lights: I) -> Result<Self, TrafficLightError>
    where
        I: IntoIterator<Item = TrafficLight>,
    {
        let mut by_name = IndexMap::new();
        for light in lights {
            light.location().validate().map_err(|source| {
                TrafficLightError::InvalidCoordinate {
                    name: light.name.clone(),
                    source,
                }
            })?;
            if by_name.contains_key(&light.name) {
                return Err(TrafficLightError::DuplicateName(light.name));
            }
            by_name.insert(light.name.clone(), light);
        }
        Ok(Self { by_name })
    }

    pub fn builtin() -> Self {
        Self {
            by_name: BUILTIN_TRAFFIC_LIGHTS
                .iter()
                .map(|&(name, latitude, longitude)| {
                    (name.to_owned(), TrafficLight::new(name, latitude, longitude))
                })
                .collect(),
        }
    }

    /// Parses a JSON array of `{ "name", "lat", "lon" }` objects.
    pub fn from_json_str(json: &str) -> Result<Self, TrafficLightError> {
        let lights: Vec<TrafficLight> = serde_json::from_str(json)?;
        Self::new(lights)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrafficLightError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TrafficLightError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lights = Self::from_json_str(&json)?;
        log::info!("loaded {} traffic lights from {}", lights.len(), path.display());
        Ok(lights)
    }

    pub fn all(&self) -> impl Iterator<Item = &TrafficLight> {
        self.by_name.values()
    }

    pub fn get(&self, name: &str) -> Option<&TrafficLight> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// All lights within `radius_km` of `center`, nearest first.
    pub fn nearby(
        &self,
        center: &Coordinate,
        radius_km: f64,
    ) -> Vec<WithDistance<TrafficLight>> {
        let mut nearby = self
            .all()
            .map(|light| light.clone().with_distance_to(center))
            .filter(|light| light.distance_km <= radius_km)
            .collect::<Vec<_>>();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby
    }

    /// Lights that lie within `threshold_km` of at least one waypoint.
    pub fn along_route<'a>(
        &'a self,
        route: &'a Route,
        threshold_km: f64,
    ) -> impl Iterator<Item = &'a TrafficLight> + 'a {
        self.all().filter(move |light| {
            let location = light.location();
            route
                .waypoints()
                .iter()
                .any(|waypoint| waypoint.distance_km(&location) <= threshold_km)
        })
    }

    /// The light on `route` closest to `current`, with its distance from
    /// `current`. `None` when the route is empty or no light is on it.
    pub fn nearest_on_route(
        &self,
        current: &Coordinate,
        route: &Route,
        threshold_km: f64,
    ) -> Option<WithDistance<TrafficLight>> {
        self.along_route(route, threshold_km)
            .map(|light| light.clone().with_distance_to(current))
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }
}
