//! Logging infrastructure for diagram processing
//!
//! Every pipeline stage reports through `tracing` spans and events. Nothing in
//! the library installs a subscriber on its own: the caller decides where the
//! events go, either with [`init_logging`] or with any other subscriber (tests
//! use `tracing_subscriber::fmt().with_test_writer()`). Diagram output never
//! depends on whether a subscriber is listening.
//!
//! # Usage
//!
//! ```rust
//! use scenetree::core::logging::init_logging;
//!
//! // Level and format from the environment, falling back to info/compact
//! let _ = init_logging(None, None);
//! ```
//!
//! # Environment Variables
//!
//! - `SCENETREE_LOG_LEVEL`: log level or filter directive (trace|debug|info|warn|error|off)
//! - `RUST_LOG`: standard `tracing-subscriber` filter, used when the above is unset
//! - `SCENETREE_LOG_FORMAT`: compact|pretty|json
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the tree reconstructor, at trace level
//! RUST_LOG="scenetree::plugins::structure::tree=trace" scenetree convert -i structure_city.txt
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "SCENETREE_LOG_LEVEL";

/// Environment variable holding the log format
pub const LOG_FORMAT_ENV: &str = "SCENETREE_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolve the filter directive: argument, then `SCENETREE_LOG_LEVEL`, then `RUST_LOG`, then `info`
fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

fn build_filter(level: &str) -> EnvFilter {
    if level == "off" {
        return EnvFilter::new("off");
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber
///
/// * `level` - trace|debug|info|warn|error|off, or any `EnvFilter` directive.
///   Falls back to the environment, then `info`. Unparseable directives fall
///   back to `info`.
/// * `format` - compact|pretty|json. Falls back to `SCENETREE_LOG_FORMAT`,
///   then `compact`.
///
/// Returns an error for an unknown format or when a global subscriber is
/// already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(&resolve_level(level));

    let format_name = format
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
        .unwrap_or_else(|| "compact".to_string());
    let format = LogFormat::from_str(&format_name)
        .map_err(|e| format!("Invalid log format: {}", e))?;

    // Logs go to stderr so rendered diagrams on stdout stay clean
    let base = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_level(true);

    match format {
        LogFormat::Compact => Registry::default()
            .with(filter)
            .with(
                base.with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()?,
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(
                base.with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::ACTIVE)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(
                base.with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .json(),
            )
            .try_init()?,
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
