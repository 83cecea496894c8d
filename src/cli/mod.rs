pub mod funds;
pub mod holdings;
pub mod render;
pub mod setup;
pub mod ui;

use crate::core::TrackerError;
use render::OutputFormat;
use serde_json::json;

/// How a failed run is reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub exit_code: u8,
    /// Written to stdout; only set in JSON mode.
    pub stdout: Option<String>,
    /// Written to stderr; only set in text mode.
    pub stderr: Option<String>,
}

/// Text mode reports `error: ...` on stderr. JSON mode prints an error
/// object on stdout instead and leaves stderr alone.
pub fn error_report(err: &anyhow::Error, format: OutputFormat) -> ErrorReport {
    let (kind, message, exit_code) = match err.downcast_ref::<TrackerError>() {
        Some(e) => (e.kind(), e.to_string(), e.exit_code()),
        None => ("internal", format!("{err:#}"), 1),
    };

    match format {
        OutputFormat::Text => ErrorReport {
            exit_code,
            stdout: None,
            stderr: Some(format!("error: {message}\n")),
        },
        OutputFormat::Json => {
            let body = json!({ "error": { "kind": kind, "message": message } });
            ErrorReport {
                exit_code,
                stdout: Some(format!("{body:#}\n")),
                stderr: None,
            }
        }
    }
}
