use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mfdelta::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for mfdelta::AppCommand {
    fn from(cmd: Commands) -> mfdelta::AppCommand {
        match cmd {
            Commands::Import { file, period } => mfdelta::AppCommand::Import { file, period },
            Commands::Compare {
                fund,
                start,
                end,
                json,
            } => mfdelta::AppCommand::Compare {
                fund,
                start,
                end,
                json,
            },
            Commands::Periods => mfdelta::AppCommand::Periods,
            Commands::Show { period } => mfdelta::AppCommand::Show { period },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Import a monthly portfolio export (CSV)
    Import {
        /// Path to the exported holdings sheet
        file: PathBuf,
        /// Month of the holdings, e.g. "September 2024"
        period: String,
    },
    /// Compare a fund's holding between two months
    Compare {
        /// Fund ISIN or part of its name
        fund: String,
        /// Start month, e.g. "September 2024"
        start: String,
        /// End month, e.g. "October 2024"
        end: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List imported months
    Periods,
    /// Display all holdings of a month
    Show {
        /// Month to display, e.g. "September 2024"
        period: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => mfdelta::cli::setup::setup(),
        Some(cmd) => mfdelta::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
