use super::render::{self, OutputFormat};
use crate::core::directory;
use anyhow::{Context, Result};

/// Lists the built-in fund aliases. Never touches the network.
pub fn run(format: OutputFormat) -> Result<String> {
    let funds = directory::list_all();
    match format {
        OutputFormat::Text => Ok(render::render_fund_list_text(funds)),
        OutputFormat::Json => {
            render::render_fund_list_json(funds).context("Failed to serialize fund list")
        }
    }
}
