pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::holdings::HoldingsRequest;
use crate::cli::render::OutputFormat;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Holdings(HoldingsRequest),
    ListFunds,
}

/// Runs a command and returns its complete output.
///
/// Nothing is printed here, so a failed run never leaves a partial report.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    info!("Fund tracker starting...");

    match command {
        AppCommand::ListFunds => cli::funds::run(format),
        AppCommand::Holdings(request) => {
            let config = match config_path {
                Some(path) => AppConfig::load_from_path(path)?,
                None => AppConfig::load()?,
            };
            debug!("Loaded config: {:?}", config.provider);

            cli::holdings::run(&request, &config, format).await
        }
    }
}
