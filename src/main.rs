mod actor_framework;
mod app_system;
mod clients;
mod dish_actor;
mod domain;
mod error;
mod order_actor;
mod repository;
mod server;
mod validation;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use crate::app_system::{setup_tracing, CliArgs, RestaurantSystem, ServerConfig};
use crate::server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_args(CliArgs::parse())?;
    setup_tracing(&config.log_filter);

    // Fail fast on bad configuration before any actor starts
    config.validate()?;

    info!(bind = %config.bind_address, "Starting restaurant order service");

    let system = RestaurantSystem::new(config.channel_capacity, config.seed);
    let state = AppState {
        dishes: system.dish_client.clone(),
        orders: system.order_client.clone(),
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
    };

    // `serve` consumes the router, so its client clones are gone once it returns
    let served = server::serve(config.bind_address, state, shutdown).await;

    system
        .shutdown()
        .await
        .map_err(anyhow::Error::msg)
        .context("actor shutdown failed")?;

    served
}
