//! SEC EDGAR Financial Data API client (served through RapidAPI).

use crate::core::config::EdgarProviderConfig;
use crate::core::error::TrackerError;
use crate::core::filing::{FilerMatch, FilingProvider, pad_cik};
use crate::core::holdings::{Portfolio, Position};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

const HOLDINGS_PATH: &str = "/api/v1/holdings/13f";
const SEARCH_PATH: &str = "/api/v1/companies/search";
const ERROR_BODY_LIMIT: usize = 300;

pub struct EdgarProvider {
    base_url: String,
    host: String,
    api_key: String,
    client: reqwest::Client,
}

impl EdgarProvider {
    pub fn new(config: &EdgarProviderConfig, api_key: &str) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fundtrack/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host: config.host.clone(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Issues an authenticated GET and decodes the JSON body.
    ///
    /// `subject` names what was asked for, for not-found reports.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        subject: &str,
    ) -> Result<T, TrackerError> {
        let url = Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|e| TrackerError::upstream(format!("invalid provider URL: {e}")))?;
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Received provider response");
        let text = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &text, subject));
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse provider response");
            TrackerError::upstream(format!("failed to parse response for {subject}: {e}"))
        })
    }
}

fn status_error(status: StatusCode, body: &str, subject: &str) -> TrackerError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TrackerError::Auth(format!("provider rejected the API key (HTTP {status})"))
        }
        StatusCode::NOT_FOUND => TrackerError::NotFound(format!("no {subject} on record")),
        _ => TrackerError::Upstream {
            status: Some(status.as_u16()),
            message: body.trim().chars().take(ERROR_BODY_LIMIT).collect(),
        },
    }
}

/// A number the provider may send either as JSON number or numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Rounds to a non-negative whole quantity; unparseable input counts as 0.
    fn whole(&self) -> u64 {
        let n = match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        };
        if n.is_finite() && n > 0.0 {
            n.round() as u64
        } else {
            0
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShareAmount {
    #[serde(rename = "sshPrnamt", default)]
    amount: Option<Amount>,
}

/// Each name key is its own field: responses may carry several of them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHolding {
    #[serde(default)]
    name_of_issuer: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    shrs_or_prn_amt: Option<ShareAmount>,
    #[serde(default)]
    shares: Option<Amount>,
    #[serde(default)]
    value: Option<Amount>,
}

impl From<RawHolding> for Position {
    fn from(raw: RawHolding) -> Self {
        let shares = raw
            .shrs_or_prn_amt
            .and_then(|s| s.amount)
            .or(raw.shares)
            .map_or(0, |a| a.whole());
        let value = raw.value.map_or(0, |a| a.whole());
        let name = first_non_blank([raw.name_of_issuer, raw.name, raw.company])
            .unwrap_or_else(|| "Unknown".to_string());
        Position::new(name, shares, value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilingEnvelope {
    #[serde(default)]
    holdings: Option<Vec<RawHolding>>,
    #[serde(default)]
    results: Option<Vec<RawHolding>>,
    #[serde(default)]
    filer_name: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    manager_name: Option<String>,
    #[serde(default)]
    period_of_report: Option<String>,
    #[serde(default)]
    report_date: Option<String>,
    #[serde(default)]
    filing_period: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HoldingsResponse {
    List(Vec<RawHolding>),
    Filing(FilingEnvelope),
}

/// A 13F response with its key alternatives settled.
struct Filing {
    holdings: Vec<RawHolding>,
    filer_name: Option<String>,
    manager_name: Option<String>,
    period: Option<String>,
}

impl From<HoldingsResponse> for Filing {
    fn from(response: HoldingsResponse) -> Self {
        match response {
            HoldingsResponse::List(holdings) => Filing {
                holdings,
                filer_name: None,
                manager_name: None,
                period: None,
            },
            HoldingsResponse::Filing(envelope) => Filing {
                holdings: [envelope.holdings, envelope.results]
                    .into_iter()
                    .flatten()
                    .find(|list| !list.is_empty())
                    .unwrap_or_default(),
                filer_name: first_non_blank([
                    envelope.filer_name,
                    envelope.company_name,
                    envelope.name,
                ]),
                manager_name: non_blank(envelope.manager_name),
                period: first_non_blank([
                    envelope.period_of_report,
                    envelope.report_date,
                    envelope.filing_period,
                ]),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CikValue {
    Number(u64),
    Text(String),
}

impl CikValue {
    fn normalized(&self) -> Option<String> {
        let digits: String = match self {
            CikValue::Number(n) => n.to_string(),
            CikValue::Text(s) => s.chars().filter(|c| c.is_ascii_digit()).collect(),
        };
        (1..=10).contains(&digits.len()).then(|| pad_cik(&digits))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFiler {
    cik: CikValue,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    List(Vec<RawFiler>),
    Wrapped {
        #[serde(default)]
        results: Option<Vec<RawFiler>>,
        #[serde(default)]
        companies: Option<Vec<RawFiler>>,
    },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_non_blank<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().find_map(non_blank)
}

#[async_trait]
impl FilingProvider for EdgarProvider {
    #[instrument(name = "EdgarHoldingsFetch", skip(self), fields(cik = %cik))]
    async fn latest_holdings(&self, cik: &str) -> Result<Portfolio, TrackerError> {
        let subject = format!("13F filing for CIK {cik}");
        let response: HoldingsResponse = self
            .get_json(HOLDINGS_PATH, &[("cik", cik)], &subject)
            .await?;
        let filing = Filing::from(response);

        if filing.holdings.is_empty() {
            return Err(TrackerError::NotFound(format!("no {subject} on record")));
        }
        debug!(count = filing.holdings.len(), "Parsed 13F holdings");

        let positions = filing.holdings.into_iter().map(Position::from).collect();
        let filer_name = filing.filer_name.unwrap_or_else(|| format!("CIK {cik}"));
        let mut portfolio = Portfolio::new(cik, filer_name, positions);
        portfolio.manager_name = filing.manager_name;
        portfolio.filing_period = filing.period;
        Ok(portfolio)
    }

    #[instrument(name = "EdgarFilerSearch", skip(self), fields(name = %name))]
    async fn search_filers(&self, name: &str) -> Result<Vec<FilerMatch>, TrackerError> {
        let subject = format!("filer named '{name}'");
        let response: SearchResponse = self
            .get_json(SEARCH_PATH, &[("query", name)], &subject)
            .await?;
        let filers = match response {
            SearchResponse::List(filers) => filers,
            SearchResponse::Wrapped { results, companies } => {
                results.or(companies).unwrap_or_default()
            }
        };

        Ok(filers
            .into_iter()
            .filter_map(|raw| {
                let cik = raw.cik.normalized()?;
                let name = first_non_blank([raw.name, raw.company_name, raw.title])
                    .unwrap_or_else(|| format!("CIK {cik}"));
                Some(FilerMatch { cik, name })
            })
            .collect())
    }
}
