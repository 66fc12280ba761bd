//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured level is applied to
//! the library crates while dependencies stay at `warn`.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Builds the fallback filter directive for the configured level.
fn default_filter(level: &str) -> String {
    format!(
        "warn,ebook_library={l},ebook_library_api={l},domain={l},persistence={l},shared={l}",
        l = level
    )
}

/// Initializes the logging subsystem based on configuration.
///
/// `format = "json"` emits structured logs with span close events for
/// request latency; anything else gets the pretty human-readable layer.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.format == "json" {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true);
        subscriber.with(json_layer).init();
    } else {
        let pretty_layer = fmt::layer().pretty().with_target(true);
        subscriber.with(pretty_layer).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_level_to_our_crates() {
        let filter = default_filter("debug");

        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("ebook_library=debug"));
        assert!(filter.contains("persistence=debug"));
        assert!(!filter.contains("sqlx"));
    }

    #[test]
    fn test_default_filter_parses_as_env_filter() {
        assert!(default_filter("info").parse::<EnvFilter>().is_ok());
    }
}
