//! Text and JSON rendering of processed holdings. Pure formatting, no I/O.

use super::ui;
use crate::core::directory::FundAlias;
use crate::core::holdings::Portfolio;
use comfy_table::Cell;
use serde_json::json;

pub const BAR_WIDTH: usize = 20;
const NAME_WIDTH: usize = 30;
const RULE_WIDTH: usize = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Structured JSON document
    Json,
}

/// Abbreviates a dollar amount: `$999`, `$12.3K`, `$345.6M`, `$1.2B`.
pub fn format_value(value: u64) -> String {
    let v = value as f64;
    // Thresholds sit where one-decimal rounding would roll over to the next unit.
    if v >= 999_950_000.0 {
        format!("${:.1}B", v / 1e9)
    } else if v >= 999_950.0 {
        format!("${:.1}M", v / 1e6)
    } else if v >= 1_000.0 {
        format!("${:.1}K", v / 1e3)
    } else {
        format!("${value}")
    }
}

/// Groups digits in threes: `1032852006` becomes `1,032,852,006`.
pub fn format_shares(shares: u64) -> String {
    let digits = shares.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Cuts `name` to `width` characters, marking the cut with an ellipsis.
pub fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut cut: String = name.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

pub fn filled_cells(percent: f64, width: usize) -> usize {
    let filled = (percent / 100.0 * width as f64).round();
    if filled.is_nan() || filled <= 0.0 {
        0
    } else {
        (filled as usize).min(width)
    }
}

pub fn bar(percent: f64, width: usize) -> String {
    let filled = filled_cells(percent, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn header_line(label: &str, value: &str) -> String {
    format!("  {:<9} {value}\n", format!("{label}:"))
}

/// Renders the bordered report with one ranked line per shown position.
pub fn render_text(portfolio: &Portfolio) -> String {
    let double_rule = "═".repeat(RULE_WIDTH);
    let single_rule = "─".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{double_rule}\n"));
    out.push_str(&format!(
        "  {}\n",
        ui::style_text("Hedge Fund Tracker · Latest 13F Holdings", ui::StyleType::Title)
    ));
    out.push_str(&format!("{double_rule}\n"));
    out.push_str(&header_line("Fund", &portfolio.filer_name));
    out.push_str(&header_line(
        "Manager",
        portfolio.manager_name.as_deref().unwrap_or("unknown"),
    ));
    out.push_str(&header_line("CIK", &portfolio.cik));
    out.push_str(&header_line(
        "Period",
        portfolio.filing_period.as_deref().unwrap_or("unknown"),
    ));
    out.push_str(&format!(
        "  {} {} ({} positions)\n",
        ui::style_text("Total portfolio value:", ui::StyleType::TotalLabel),
        ui::style_text(
            &format_value(portfolio.total_value_usd),
            ui::StyleType::TotalValue
        ),
        portfolio.position_count
    ));
    out.push_str(&format!("{single_rule}\n"));

    if portfolio.positions.is_empty() {
        out.push_str("  No holdings data available.\n");
        return out;
    }

    out.push_str(&format!(
        "  {:>3}  {:<NAME_WIDTH$} {:>15} {:>9}  {:<BAR_WIDTH$} {:>6}\n",
        "#", "Issuer", "Shares", "Value", "Weight", "%"
    ));
    for (rank, position) in portfolio.positions.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}  {:<NAME_WIDTH$} {:>15} {:>9}  {} {:>6}\n",
            rank + 1,
            truncate_name(&position.issuer_name, NAME_WIDTH),
            format_shares(position.shares),
            format_value(position.value_usd),
            bar(position.percent_of_portfolio, BAR_WIDTH),
            format!("{:.1}%", position.percent_of_portfolio),
        ));
    }

    let hidden = portfolio.hidden_positions();
    if hidden > 0 {
        let noun = if hidden == 1 { "position" } else { "positions" };
        out.push_str(&format!(
            "\n  {}\n",
            ui::style_text(
                &format!("... and {hidden} more {noun}"),
                ui::StyleType::Subtle
            )
        ));
    }
    out
}

pub fn render_json(portfolio: &Portfolio) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(portfolio)?;
    out.push('\n');
    Ok(out)
}

pub fn render_fund_list_text(funds: &[FundAlias]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Alias"),
        ui::header_cell("Fund"),
        ui::header_cell("Manager"),
        ui::header_cell("CIK"),
    ]);
    for fund in funds {
        table.add_row(vec![
            Cell::new(fund.alias),
            Cell::new(fund.fund_name),
            Cell::new(fund.manager_name),
            Cell::new(fund.cik),
        ]);
    }

    let mut out = format!(
        "{}\n\n{table}\n",
        ui::style_text("Available fund aliases", ui::StyleType::Title)
    );
    if let Some(first) = funds.first() {
        out.push_str(&format!(
            "\n{}\n",
            ui::style_text(
                &format!("Usage: fundtrack holdings {}", first.alias),
                ui::StyleType::Subtle
            )
        ));
    }
    out
}

pub fn render_fund_list_json(funds: &[FundAlias]) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(&json!({ "funds": funds }))?;
    out.push('\n');
    Ok(out)
}
