use chrono::{SecondsFormat, Utc};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// RFC 3339 UTC timestamps with millisecond precision.
#[derive(Debug, Clone, Copy, Default)]
struct UtcMillis;

impl FormatTime for UtcMillis {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Parses a configured level name.
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        other => Err(format!(
            "Invalid logging.level '{}'. Valid values: trace, debug, info, warn, error, off",
            other
        )),
    }
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), String> {
    let level_filter = parse_level(&logging_config.level)?;

    // RUST_LOG directives still apply on top of the configured level.
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let result = match logging_config.format.trim().to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter_layer)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_timer(UtcMillis)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter_layer)
            .with(
                fmt::layer()
                    .pretty()
                    .with_timer(UtcMillis)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| format!("Failed to install log subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_accepts_known_levels() {
        assert_eq!(parse_level("debug"), Ok(LevelFilter::DEBUG));
        assert_eq!(parse_level(" WARN "), Ok(LevelFilter::WARN));
        assert_eq!(parse_level("off"), Ok(LevelFilter::OFF));
    }

    #[test]
    fn test_parse_level_rejects_unknown_level() {
        let err = parse_level("loud").unwrap_err();
        assert!(err.contains("loud"));
    }

    #[test]
    fn test_timestamp_is_utc_millis() {
        let mut out = String::new();
        UtcMillis.format_time(&mut Writer::new(&mut out)).unwrap();
        // 2026-10-15T08:30:00.123Z
        assert_eq!(out.len(), 24);
        assert!(out.ends_with('Z'));
        assert_eq!(&out[19..20], ".");
    }
}
