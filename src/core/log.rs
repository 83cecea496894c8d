use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Picks the filters for a run. A valid `RUST_LOG` takes over completely;
/// otherwise only `fundtrack` logs, and only when verbose.
fn build_filters(verbose: bool, rust_log: Option<&str>) -> (Option<Targets>, EnvFilter) {
    if let Some(env_filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return (None, env_filter);
    }

    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    };
    let app_filter = Targets::new().with_target("fundtrack", level_filter);
    (Some(app_filter), EnvFilter::new(level))
}

/// Installs the global subscriber. Logs go to stderr so that stdout only
/// carries the report.
pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (app_filter, env_filter) = build_filters(verbose, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_quiet_by_default() {
        let (app_filter, _) = build_filters(false, None);
        let app_filter = app_filter.unwrap();
        assert!(!app_filter.would_enable("fundtrack", &Level::ERROR));
    }

    #[test]
    fn test_verbose_enables_app_debug() {
        let (app_filter, _) = build_filters(true, None);
        let app_filter = app_filter.unwrap();
        assert!(app_filter.would_enable("fundtrack::providers::edgar", &Level::DEBUG));
        assert!(!app_filter.would_enable("reqwest", &Level::DEBUG));
    }

    #[test]
    fn test_rust_log_alone_enables_output() {
        let (app_filter, env_filter) = build_filters(false, Some("fundtrack=info"));
        assert!(app_filter.is_none());
        assert_eq!(env_filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let (app_filter, _) = build_filters(true, Some("fundtrack=notalevel"));
        assert!(app_filter.is_some());
    }
}
