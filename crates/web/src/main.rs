use std::{error::Error, process::ExitCode};

use directions::DirectionsClient;
use model::TrafficLights;
use web::{
    config::{Config, REQUIRED_VARIABLES},
    start_web_server, WebState,
};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            log::error!("{why}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env().inspect_err(|why| {
        log::error!(
            "config: {why}. Check all required environment variables ({}) are set.",
            REQUIRED_VARIABLES.join(", ")
        );
    })?;
    config.log();

    // traffic lights
    let traffic_lights = match &config.traffic_lights_file {
        Some(path) => TrafficLights::from_file(path)?,
        None => TrafficLights::builtin(),
    };

    // directions
    let directions = DirectionsClient::new(&config.directions)?;
    log::info!("Using directions endpoint {}", directions.endpoint());

    // web server
    let state = WebState::new(traffic_lights, directions, config.proximity_threshold_km);
    start_web_server(state, &config.listen_addr).await?;

    Ok(())
}
