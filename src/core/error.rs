//! Error taxonomy for the holdings pipeline.

use thiserror::Error;

/// Errors surfaced by resolution, fetching and processing of holdings.
///
/// Every variant is terminal for a single invocation; nothing here is retried.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The fund identifier was empty or unusable. Raised before any request.
    #[error("invalid fund query: {0}")]
    InvalidQuery(String),

    /// A command-line option carried a malformed value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No filer matched, or the filer has no 13F filing on record.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API key is missing or was rejected by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Any other failure talking to the provider.
    #[error("upstream error{}: {message}", http_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

fn http_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl TrackerError {
    pub fn upstream(message: impl Into<String>) -> Self {
        TrackerError::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Stable label used in error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::InvalidQuery(_) => "invalid_query",
            TrackerError::InvalidArgument(_) => "invalid_argument",
            TrackerError::NotFound(_) => "not_found",
            TrackerError::Auth(_) => "auth",
            TrackerError::Upstream { .. } => "upstream",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            TrackerError::InvalidQuery(_) | TrackerError::InvalidArgument(_) => 2,
            TrackerError::NotFound(_) => 3,
            TrackerError::Auth(_) => 4,
            TrackerError::Upstream { .. } => 5,
        }
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "request timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_decode() {
            "malformed response"
        } else {
            "request failed"
        };
        TrackerError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: format!("{kind}: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_includes_status() {
        let err = TrackerError::Upstream {
            status: Some(503),
            message: "service unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream error (HTTP 503): service unavailable"
        );

        let err = TrackerError::upstream("connection reset");
        assert_eq!(err.to_string(), "upstream error: connection reset");
    }

    #[test]
    fn test_kinds_and_exit_codes_are_distinct_per_category() {
        let cases = [
            (TrackerError::InvalidQuery("".into()), "invalid_query", 2),
            (TrackerError::InvalidArgument("".into()), "invalid_argument", 2),
            (TrackerError::NotFound("".into()), "not_found", 3),
            (TrackerError::Auth("".into()), "auth", 4),
            (TrackerError::upstream(""), "upstream", 5),
        ];
        for (err, kind, code) in cases {
            assert_eq!(err.kind(), kind);
            assert_eq!(err.exit_code(), code);
            assert_ne!(err.exit_code(), 0);
        }
    }
}
