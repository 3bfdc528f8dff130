mod aggregate;
mod budget;
mod config;
mod db;
mod error;
mod forecast;
mod input;
mod logging;
mod models;
mod report;
mod run;
mod schedule;
mod store;
mod tracker;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    logging::init(&config.log_filter);

    let stores = store::open(&config)
        .with_context(|| format!("Failed to open data in {}", config.data_dir.display()))?;
    let mut tracker = tracker::Tracker::new(stores);
    run::as_cli(&args, &mut tracker, &config)
}
