mod cli;
mod config;
mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use guard_logging::{guard_info, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

use cli::Cli;
use config::AppConfig;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let (destination, level) = if cli.verbose {
        (LogDestination::Both(log_file), LevelFilter::Debug)
    } else {
        (LogDestination::File(log_file), LevelFilter::Info)
    };
    guard_logging::initialize(destination, level);

    let config = AppConfig::from_cli(&cli);
    guard_info!("Starting truthguard {:?}", cli.command);
    platform::run(cli.command, &config)
}
