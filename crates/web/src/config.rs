use std::{env, path::PathBuf, str::FromStr, time::Duration};

use directions::{client::GOOGLE_DIRECTIONS_API_URL, DirectionsConfig};
use thiserror::Error;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PROXIMITY_THRESHOLD_KM: f64 = 0.05;

pub const REQUIRED_VARIABLES: [&str; 1] = ["DIRECTIONS_API_KEY"];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name}={value:?} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the service needs at startup, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub directions: DirectionsConfig,
    pub traffic_lights_file: Option<PathBuf>,
    pub proximity_threshold_km: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("DIRECTIONS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("DIRECTIONS_API_KEY"))?;

        let base_url = lookup("DIRECTIONS_API_URL")
            .unwrap_or_else(|| GOOGLE_DIRECTIONS_API_URL.to_owned());

        let timeout_secs: u64 =
            parse_or(&lookup, "DIRECTIONS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "DIRECTIONS_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be at least one second".to_owned(),
            });
        }

        let proximity_threshold_km: f64 = parse_or(
            &lookup,
            "PROXIMITY_THRESHOLD_KM",
            DEFAULT_PROXIMITY_THRESHOLD_KM,
        )?;
        if !proximity_threshold_km.is_finite() || proximity_threshold_km < 0.0 {
            return Err(ConfigError::Invalid {
                name: "PROXIMITY_THRESHOLD_KM",
                value: proximity_threshold_km.to_string(),
                reason: "must be a non-negative distance".to_owned(),
            });
        }

        Ok(Self {
            listen_addr: lookup("LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned()),
            directions: DirectionsConfig::new(api_key)
                .with_base_url(base_url)
                .with_timeout(Duration::from_secs(timeout_secs)),
            traffic_lights_file: lookup("TRAFFIC_LIGHTS_FILE").map(PathBuf::from),
            proximity_threshold_km,
        })
    }

    pub fn log(&self) {
        log::info!("listen address: {}", self.listen_addr);
        log::info!("directions api: {}", self.directions.base_url);
        log::info!("directions timeout: {:?}", self.directions.timeout);
        match &self.traffic_lights_file {
            Some(path) => log::info!("traffic lights: {}", path.display()),
            None => log::info!("traffic lights: built-in"),
        }
        log::info!("proximity threshold: {} km", self.proximity_threshold_km);
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|why: T::Err| ConfigError::Invalid {
            name,
            reason: why.to_string(),
            value,
        }),
    }
}
