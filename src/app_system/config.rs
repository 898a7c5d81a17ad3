use anyhow::{ensure, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::{Dish, Order};

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_CHANNEL_CAPACITY: usize = 32;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Parser)]
#[command(name = "restaurant_orders", about = "Dish and order management service")]
pub struct CliArgs {
    /// Address the HTTP server listens on.
    #[arg(long, env = "RESTAURANT_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// JSON file with initial `dishes` and `orders`.
    #[arg(long, env = "RESTAURANT_SEED")]
    pub seed: Option<PathBuf>,

    /// Request queue depth of each resource actor.
    #[arg(long, env = "RESTAURANT_CHANNEL_CAPACITY", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "RESTAURANT_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

/// Initial collection contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse seed file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        check_ids("dish", self.dishes.iter().map(|d| d.id))?;
        check_ids("order", self.orders.iter().map(|o| o.id))?;
        for dish in &self.dishes {
            ensure!(dish.price > 0, "seed dish {} must have a positive price", dish.id);
        }
        for order in &self.orders {
            ensure!(!order.dishes.is_empty(), "seed order {} has no dishes", order.id);
            ensure!(
                order.dishes.iter().all(|item| item.quantity > 0),
                "seed order {} has a line item without a positive quantity",
                order.id
            );
        }
        Ok(())
    }
}

fn check_ids(kind: &str, ids: impl Iterator<Item = u64>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        ensure!(id > 0, "seed {kind} ids must be positive");
        ensure!(seen.insert(id), "duplicate seed {kind} id {id}");
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub channel_capacity: usize,
    pub log_filter: String,
    pub seed: SeedData,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            bind,
            seed,
            channel_capacity,
            log_filter,
        } = args;

        let seed = match seed.as_deref() {
            Some(path) => SeedData::load(path)?,
            None => SeedData::default(),
        };

        Ok(Self {
            bind_address: bind,
            channel_capacity,
            log_filter,
            seed,
        })
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.channel_capacity > 0, "channel capacity must be at least 1");
        self.seed.validate().context("invalid seed data")
    }
}
