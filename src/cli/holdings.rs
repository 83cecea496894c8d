use super::render::{self, OutputFormat};
use super::ui;
use crate::core::config::{AppConfig, discover_api_key};
use crate::core::holdings::{self, Portfolio};
use crate::core::{FilerResolver, FilingProvider, TrackerError};
use crate::providers::EdgarProvider;
use anyhow::{Context, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct HoldingsRequest {
    /// Fund alias, CIK or free-text filer name.
    pub query: String,
    pub top: Option<i64>,
    pub api_key: Option<String>,
}

/// Resolves `query`, fetches the latest filing and ranks its positions.
pub async fn fetch_report(
    provider: &dyn FilingProvider,
    query: &str,
    top: Option<i64>,
) -> Result<Portfolio, TrackerError> {
    let resolved = FilerResolver::new(provider).resolve(query).await?;
    info!(cik = %resolved.cik, "Fetching latest 13F holdings");

    let mut portfolio = provider.latest_holdings(&resolved.cik).await?;
    if let Some(name) = resolved.display_name {
        portfolio.filer_name = name;
    }
    if portfolio.manager_name.is_none() {
        portfolio.manager_name = resolved.manager_name;
    }
    holdings::process(portfolio, top)
}

/// Runs the holdings command and returns the complete rendered report.
///
/// Local validation (top-N, query, API key) happens before any request.
pub async fn run(
    request: &HoldingsRequest,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<String> {
    let top = request.top.or(config.default_top);
    holdings::validate_top(top)?;
    if request.query.trim().is_empty() {
        return Err(TrackerError::InvalidQuery("fund identifier is empty".to_string()).into());
    }
    let api_key = discover_api_key(request.api_key.as_deref(), config)?;
    debug!(query = %request.query, ?top, "Running holdings command");

    let provider = EdgarProvider::new(&config.provider, &api_key)?;
    let portfolio = match format {
        OutputFormat::Text => {
            let spinner = ui::new_spinner("Fetching latest 13F filing...");
            let result = fetch_report(&provider, &request.query, top).await;
            spinner.finish_and_clear();
            result?
        }
        OutputFormat::Json => fetch_report(&provider, &request.query, top).await?,
    };

    match format {
        OutputFormat::Text => Ok(render::render_text(&portfolio)),
        OutputFormat::Json => render::render_json(&portfolio).context("Failed to serialize holdings"),
    }
}
