pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Commands that operate on the holdings store.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Import { file: PathBuf, period: String },
    Compare {
        fund: String,
        start: String,
        end: String,
        json: bool,
    },
    Periods,
    Show { period: String },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Holdings tracker starting...");

    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut store = store::HoldingsStore::load(config.holdings_path()?)?;

    match command {
        AppCommand::Import { file, period } => {
            cli::import::run(&mut store, &file, &period, &config.import)
        }
        AppCommand::Compare {
            fund,
            start,
            end,
            json,
        } => cli::compare::run(&store, &fund, &start, &end, json),
        AppCommand::Periods => cli::periods::list(&store),
        AppCommand::Show { period } => cli::periods::show(&store, &period),
    }
}
