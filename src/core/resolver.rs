//! Turns a user-supplied fund identifier into a canonical CIK.
//!
//! Resolution runs an ordered chain of rules and stops at the first one that
//! claims the query:
//! 1. [`AliasRule`]: a fund from the built-in directory
//! 2. [`CikRule`]: a literal CIK such as `1067983` or `CIK 0001067983`
//! 3. [`NameSearchRule`]: free text, handed to the provider's name search
//!
//! A rule returning `None` passes the query on to the next rule.

use crate::core::directory;
use crate::core::error::TrackerError;
use crate::core::filing::{FilingProvider, pad_cik};
use async_trait::async_trait;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFiler {
    pub cik: String,
    /// Unset when only the CIK is known; the filing response fills it in.
    pub display_name: Option<String>,
    pub manager_name: Option<String>,
}

#[async_trait]
pub trait ResolveRule: Send + Sync {
    /// `query` is trimmed and never empty.
    async fn resolve(&self, query: &str) -> Option<Result<ResolvedFiler, TrackerError>>;
}

pub struct AliasRule;

#[async_trait]
impl ResolveRule for AliasRule {
    async fn resolve(&self, query: &str) -> Option<Result<ResolvedFiler, TrackerError>> {
        let fund = directory::lookup(&query.to_lowercase())?;
        debug!(alias = fund.alias, cik = fund.cik, "Resolved fund alias");
        Some(Ok(ResolvedFiler {
            cik: fund.cik.to_string(),
            display_name: Some(fund.fund_name.to_string()),
            manager_name: Some(fund.manager_name.to_string()),
        }))
    }
}

pub struct CikRule;

impl CikRule {
    /// Digits of `query` when it looks like a CIK rather than a name.
    fn cik_digits(query: &str) -> Option<String> {
        let lower = query.to_lowercase();
        let rest = lower.strip_prefix("cik").unwrap_or(&lower);
        if rest.chars().any(char::is_alphabetic) {
            return None;
        }
        let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();
        (1..=10).contains(&digits.len()).then_some(digits)
    }
}

#[async_trait]
impl ResolveRule for CikRule {
    async fn resolve(&self, query: &str) -> Option<Result<ResolvedFiler, TrackerError>> {
        let digits = Self::cik_digits(query)?;
        let cik = pad_cik(&digits);
        debug!(%cik, "Treating query as literal CIK");
        Some(Ok(ResolvedFiler {
            cik,
            display_name: None,
            manager_name: None,
        }))
    }
}

pub struct NameSearchRule<'a> {
    provider: &'a dyn FilingProvider,
}

impl<'a> NameSearchRule<'a> {
    pub fn new(provider: &'a dyn FilingProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<'a> ResolveRule for NameSearchRule<'a> {
    async fn resolve(&self, query: &str) -> Option<Result<ResolvedFiler, TrackerError>> {
        let result = self.provider.search_filers(query).await.and_then(|matches| {
            debug!(query, candidates = matches.len(), "Name search finished");
            // Best effort: the provider's first-ranked candidate wins.
            matches
                .into_iter()
                .next()
                .map(|m| ResolvedFiler {
                    cik: m.cik,
                    display_name: Some(m.name),
                    manager_name: None,
                })
                .ok_or_else(|| TrackerError::NotFound(format!("no filer matches '{query}'")))
        });
        Some(result)
    }
}

pub struct FilerResolver<'a> {
    rules: Vec<Box<dyn ResolveRule + 'a>>,
}

impl<'a> FilerResolver<'a> {
    /// Alias, then CIK, then a name search against `provider`.
    pub fn new(provider: &'a dyn FilingProvider) -> Self {
        Self::with_rules(vec![
            Box::new(AliasRule),
            Box::new(CikRule),
            Box::new(NameSearchRule::new(provider)),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn ResolveRule + 'a>>) -> Self {
        Self { rules }
    }

    pub async fn resolve(&self, query: &str) -> Result<ResolvedFiler, TrackerError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TrackerError::InvalidQuery(
                "fund identifier is empty".to_string(),
            ));
        }

        for rule in &self.rules {
            if let Some(result) = rule.resolve(query).await {
                return result;
            }
        }
        Err(TrackerError::NotFound(format!("no filer matches '{query}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filing::FilerMatch;
    use crate::core::holdings::Portfolio;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSearch {
        matches: Vec<FilerMatch>,
        calls: AtomicUsize,
    }

    impl MockSearch {
        fn new(matches: &[(&str, &str)]) -> Self {
            Self {
                matches: matches
                    .iter()
                    .map(|(cik, name)| FilerMatch {
                        cik: cik.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FilingProvider for MockSearch {
        async fn latest_holdings(&self, _cik: &str) -> Result<Portfolio, TrackerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(TrackerError::NotFound("unused".to_string()))
        }

        async fn search_filers(&self, _name: &str) -> Result<Vec<FilerMatch>, TrackerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.matches.clone())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl FilingProvider for FailingSearch {
        async fn latest_holdings(&self, _cik: &str) -> Result<Portfolio, TrackerError> {
            unreachable!("resolution never fetches holdings")
        }

        async fn search_filers(&self, _name: &str) -> Result<Vec<FilerMatch>, TrackerError> {
            Err(TrackerError::Upstream {
                status: Some(502),
                message: "bad gateway".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_every_alias_resolves_regardless_of_case() {
        let provider = MockSearch::new(&[]);
        let resolver = FilerResolver::new(&provider);

        for fund in directory::list_all() {
            for query in [
                fund.alias.to_string(),
                fund.alias.to_uppercase(),
                format!("  {}\t", fund.alias),
            ] {
                let resolved = resolver.resolve(&query).await.unwrap();
                assert_eq!(resolved.cik, fund.cik);
                assert_eq!(resolved.display_name.as_deref(), Some(fund.fund_name));
                assert_eq!(resolved.manager_name.as_deref(), Some(fund.manager_name));
            }
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_numeric_queries_are_padded_ciks() {
        let provider = MockSearch::new(&[]);
        let resolver = FilerResolver::new(&provider);

        let resolved = resolver.resolve("1067983").await.unwrap();
        assert_eq!(resolved.cik, "0001067983");
        assert!(resolved.display_name.is_none());

        for digits in ["1", "12", "12345", "123456789", "1234567890"] {
            let resolved = resolver.resolve(digits).await.unwrap();
            assert_eq!(resolved.cik.len(), 10);
            assert!(resolved.cik.ends_with(digits));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_cik_with_separators_and_prefix() {
        let provider = MockSearch::new(&[]);
        let resolver = FilerResolver::new(&provider);

        assert_eq!(resolver.resolve("CIK 1067983").await.unwrap().cik, "0001067983");
        assert_eq!(resolver.resolve("0001-067983").await.unwrap().cik, "0001067983");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_query_never_reaches_provider() {
        let provider = MockSearch::new(&[("0000000001", "Anything")]);
        let resolver = FilerResolver::new(&provider);

        for query in ["", "   ", "\t\n"] {
            let err = resolver.resolve(query).await.unwrap_err();
            assert!(matches!(err, TrackerError::InvalidQuery(_)), "{err:?}");
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_name_search_without_matches_is_not_found() {
        let provider = MockSearch::new(&[]);
        let resolver = FilerResolver::new(&provider);

        let err = resolver.resolve("Nonexistent Capital").await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)), "{err:?}");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_name_search_picks_first_candidate() {
        let provider = MockSearch::new(&[
            ("0001336528", "Pershing Square Capital Management"),
            ("0001111111", "Pershing Square Holdings"),
        ]);
        let resolver = FilerResolver::new(&provider);

        for _ in 0..3 {
            let resolved = resolver.resolve("Pershing Square Capital").await.unwrap();
            assert_eq!(resolved.cik, "0001336528");
            assert_eq!(
                resolved.display_name.as_deref(),
                Some("Pershing Square Capital Management")
            );
        }
    }

    #[tokio::test]
    async fn test_names_with_digits_are_searched() {
        let provider = MockSearch::new(&[("0001234567", "Fund 13 Partners")]);
        let resolver = FilerResolver::new(&provider);

        let resolved = resolver.resolve("Fund 13").await.unwrap();
        assert_eq!(resolved.cik, "0001234567");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_overlong_number_falls_through_to_search() {
        let provider = MockSearch::new(&[]);
        let resolver = FilerResolver::new(&provider);

        let err = resolver.resolve("12345678901").await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let resolver = FilerResolver::new(&FailingSearch);
        let err = resolver.resolve("Some Fund").await.unwrap_err();
        assert!(matches!(err, TrackerError::Upstream { status: Some(502), .. }));
    }

    #[tokio::test]
    async fn test_rules_are_independent() {
        assert!(AliasRule.resolve("1067983").await.is_none());
        assert!(CikRule.resolve("berkshire").await.is_none());
        assert!(CikRule.resolve("point72").await.is_none());

        let resolver = FilerResolver::with_rules(vec![Box::new(CikRule)]);
        let err = resolver.resolve("berkshire").await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }
}
