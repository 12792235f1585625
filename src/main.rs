use anyhow::Result;
use clap::Parser;
use log::info;

mod app;
mod config;
mod core;
mod engine;
mod game;

use config::{Args, GameConfig};

fn main() -> Result<()> {
    let config = GameConfig::try_from(Args::parse())?;

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(config.log_level)
        .init();

    info!("Starting Flight Club...");

    app::run(config)
}
