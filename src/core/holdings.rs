//! Portfolio model and the ranking applied before rendering.
use crate::core::error::TrackerError;
use serde::Serialize;
use tracing::debug;

/// A single equity line item from a 13F filing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub issuer_name: String,
    pub shares: u64,
    pub value_usd: u64,
    pub percent_of_portfolio: f64,
}

impl Position {
    pub fn new(issuer_name: impl Into<String>, shares: u64, value_usd: u64) -> Self {
        Self {
            issuer_name: issuer_name.into(),
            shares,
            value_usd,
            percent_of_portfolio: 0.0,
        }
    }
}

/// Holdings of one filer as reported in its latest 13F filing.
///
/// `total_value_usd` and `position_count` always describe the full filing,
/// even after `positions` has been cut down to a top-N view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub cik: String,
    #[serde(rename = "fundName")]
    pub filer_name: String,
    pub manager_name: Option<String>,
    pub filing_period: Option<String>,
    pub total_value_usd: u64,
    pub positions: Vec<Position>,
    #[serde(skip)]
    pub position_count: usize,
}

impl Portfolio {
    pub fn new(cik: impl Into<String>, filer_name: impl Into<String>, positions: Vec<Position>) -> Self {
        let mut portfolio = Self {
            cik: cik.into(),
            filer_name: filer_name.into(),
            manager_name: None,
            filing_period: None,
            total_value_usd: 0,
            position_count: positions.len(),
            positions,
        };
        portfolio.recompute_totals();
        portfolio
    }

    /// Number of positions left out of `positions` by truncation.
    pub fn hidden_positions(&self) -> usize {
        self.position_count.saturating_sub(self.positions.len())
    }

    /// Recomputes the total and every position's share of it.
    ///
    /// Only meaningful on the full position list.
    fn recompute_totals(&mut self) {
        self.position_count = self.positions.len();
        self.total_value_usd = self
            .positions
            .iter()
            .fold(0u64, |total, p| total.saturating_add(p.value_usd));
        let total = self.total_value_usd;
        for position in &mut self.positions {
            position.percent_of_portfolio = if total > 0 {
                position.value_usd as f64 / total as f64 * 100.0
            } else {
                0.0
            };
        }
    }
}

/// Checks a requested top-N count, returning it as a usable length.
pub fn validate_top(top: Option<i64>) -> Result<Option<usize>, TrackerError> {
    match top {
        None => Ok(None),
        Some(n) if n <= 0 => Err(TrackerError::InvalidArgument(format!(
            "top must be a positive number of positions, got {n}"
        ))),
        Some(n) => Ok(Some(usize::try_from(n).unwrap_or(usize::MAX))),
    }
}

/// Ranks positions by value and keeps the largest `top` of them.
///
/// Percentages and the portfolio total are computed against every position,
/// so truncating never shrinks the reported total.
pub fn process(mut portfolio: Portfolio, top: Option<i64>) -> Result<Portfolio, TrackerError> {
    let top = validate_top(top)?;

    portfolio.recompute_totals();
    // sort_by is stable, ties keep response order
    portfolio
        .positions
        .sort_by(|a, b| b.value_usd.cmp(&a.value_usd));

    if let Some(n) = top {
        portfolio.positions.truncate(n);
    }
    debug!(
        cik = %portfolio.cik,
        total = portfolio.total_value_usd,
        shown = portfolio.positions.len(),
        hidden = portfolio.hidden_positions(),
        "Processed holdings"
    );
    Ok(portfolio)
}
