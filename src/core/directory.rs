//! Built-in table of well-known funds and their SEC filer identifiers.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundAlias {
    pub alias: &'static str,
    pub cik: &'static str,
    pub fund_name: &'static str,
    pub manager_name: &'static str,
}

const fn fund(
    alias: &'static str,
    cik: &'static str,
    fund_name: &'static str,
    manager_name: &'static str,
) -> FundAlias {
    FundAlias {
        alias,
        cik,
        fund_name,
        manager_name,
    }
}

// Listing order follows this table.
static KNOWN_FUNDS: &[FundAlias] = &[
    fund("berkshire", "0001067983", "Berkshire Hathaway", "Warren Buffett"),
    fund("bridgewater", "0001350694", "Bridgewater Associates", "Ray Dalio"),
    fund("renaissance", "0001037389", "Renaissance Technologies", "Jim Simons"),
    fund("citadel", "0001423053", "Citadel Advisors", "Ken Griffin"),
    fund("soros", "0001029160", "Soros Fund Management", "George Soros"),
    fund("appaloosa", "0001656456", "Appaloosa Management", "David Tepper"),
    fund("pershing", "0001336528", "Pershing Square", "Bill Ackman"),
    fund("third-point", "0001040273", "Third Point", "Dan Loeb"),
    fund("elliott", "0001048445", "Elliott Management", "Paul Singer"),
    fund("two-sigma", "0001179392", "Two Sigma Investments", "John Overdeck & David Siegel"),
    fund("tiger-global", "0001167483", "Tiger Global Management", "Chase Coleman"),
    fund("dragoneer", "0001571052", "Dragoneer Investment Group", "Marc Stad"),
    fund("millennium", "0001273087", "Millennium Management", "Israel Englander"),
    fund("point72", "0001603466", "Point72", "Steve Cohen"),
    fund("de-shaw", "0001009207", "D.E. Shaw & Co", "David E. Shaw"),
];

/// Looks up a fund by alias, ignoring case and surrounding whitespace.
pub fn lookup(alias: &str) -> Option<&'static FundAlias> {
    let alias = alias.trim();
    KNOWN_FUNDS
        .iter()
        .find(|f| f.alias.eq_ignore_ascii_case(alias))
}

pub fn list_all() -> &'static [FundAlias] {
    KNOWN_FUNDS
}
