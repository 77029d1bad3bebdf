use model::{Coordinate, CoordinateError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("query parameter `{0}` is missing")]
    Missing(&'static str),
    #[error("query parameter `{name}` is not a number: {value:?}")]
    NotANumber { name: &'static str, value: String },
    #[error("query parameters `{latitude}`/`{longitude}` are not a valid position: {source}")]
    OutOfRange {
        latitude: &'static str,
        longitude: &'static str,
        #[source]
        source: CoordinateError,
    },
}

/// Raw location query parameters. Everything is kept as text so that missing
/// and malformed values can be reported precisely instead of by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub dest_lat: Option<String>,
    pub dest_lon: Option<String>,
}

impl RouteQuery {
    /// The vehicle's current location from `lat` and `lon`.
    pub fn current_location(&self) -> Result<Coordinate, LocationError> {
        read_coordinate(("lat", &self.lat), ("lon", &self.lon))
    }

    /// The destination from `destLat` and `destLon`.
    pub fn destination(&self) -> Result<Coordinate, LocationError> {
        read_coordinate(("destLat", &self.dest_lat), ("destLon", &self.dest_lon))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
}

impl NearbyQuery {
    pub fn center(&self) -> Result<Coordinate, LocationError> {
        read_coordinate(("lat", &self.lat), ("lon", &self.lon))
    }

    pub fn radius_km(&self, default: f64) -> Result<f64, LocationError> {
        match &self.radius {
            None => Ok(default),
            Some(value) => match read_number("radius", value)? {
                radius if radius >= 0.0 => Ok(radius),
                _ => Err(LocationError::NotANumber {
                    name: "radius",
                    value: value.clone(),
                }),
            },
        }
    }
}

fn read_coordinate(
    (latitude_name, latitude): (&'static str, &Option<String>),
    (longitude_name, longitude): (&'static str, &Option<String>),
) -> Result<Coordinate, LocationError> {
    let latitude = latitude
        .as_deref()
        .ok_or(LocationError::Missing(latitude_name))?;
    let longitude = longitude
        .as_deref()
        .ok_or(LocationError::Missing(longitude_name))?;

    Coordinate::new(
        read_number(latitude_name, latitude)?,
        read_number(longitude_name, longitude)?,
    )
    .validate()
    .map_err(|source| LocationError::OutOfRange {
        latitude: latitude_name,
        longitude: longitude_name,
        source,
    })
}

fn read_number(name: &'static str, value: &str) -> Result<f64, LocationError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| LocationError::NotANumber {
            name,
            value: value.to_owned(),
        })
}
