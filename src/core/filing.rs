use crate::core::error::TrackerError;
use crate::core::holdings::Portfolio;
use async_trait::async_trait;

/// A filer candidate returned by a name search, best match first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilerMatch {
    pub cik: String,
    pub name: String,
}

#[async_trait]
pub trait FilingProvider: Send + Sync {
    /// Holdings from the most recent 13F filing of `cik`, unsorted.
    async fn latest_holdings(&self, cik: &str) -> Result<Portfolio, TrackerError>;

    async fn search_filers(&self, name: &str) -> Result<Vec<FilerMatch>, TrackerError>;
}

/// Zero-pads a numeric CIK to the 10 digits EDGAR uses.
pub fn pad_cik(digits: &str) -> String {
    format!("{digits:0>10}")
}
