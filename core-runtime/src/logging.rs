//! # Logging Setup
//!
//! Structured logging for the search core, built on `tracing`:
//! - Pretty, JSON and compact output over stdout
//! - Per-crate level filtering with `RUST_LOG` override
//! - Span contexts around sync and fetch operations
//!
//! ## Overview
//!
//! All crates in the workspace emit through `tracing`; this module is the
//! single place where output format and filtering are decided. Filtering
//! precedence: an explicit [`LoggingConfig::with_filter`] string, then the
//! `RUST_LOG` environment variable, then a built-in default that runs the
//! workspace crates at the configured level and the chatty HTTP/database
//! dependencies at `warn`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_level(LogLevel::Debug);
//!
//! init_logging(config).expect("Failed to initialize logging");
//!
//! tracing::info!("Search core started");
//! ```

use crate::error::{Error, Result};

use std::io;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human-oriented output with colors
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
    /// Terse single-line output
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Minimum severity for emitted log events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive spelling understood by `EnvFilter`
    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_sync=trace,core_store=debug")
    pub filter: Option<String>,
    /// Enable span contexts on emitted events
    pub enable_spans: bool,
    /// Show the target module path on events
    pub display_target: bool,
    /// Display thread info
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    /// Select the output format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Select the minimum level for workspace crates
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Replace the built-in filter with a full directive string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Toggle span context on emitted events
    pub fn with_spans(mut self, on: bool) -> Self {
        self.enable_spans = on;
        self
    }

    /// Toggle the target module path in output
    pub fn with_target(mut self, show: bool) -> Self {
        self.display_target = show;
        self
    }

    /// Toggle thread ids and names in output
    pub fn with_thread_info(mut self, show: bool) -> Self {
        self.display_thread_info = show;
        self
    }
}

/// Initialize the logging system.
///
/// Call once during startup; a second call fails because the global
/// subscriber is already set.
///
/// # Errors
///
/// Returns [`Error::Config`] when the filter string does not parse or a
/// subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = resolve_filter(&config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(&config))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

/// Resolve the event filter: explicit config string, then `RUST_LOG`,
/// then the built-in default.
fn resolve_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Some(custom) = &config.filter {
        return EnvFilter::try_new(custom)
            .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", custom, e)));
    }

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(config.level.as_str())))
        .map_err(|e| Error::Config(format!("Default log filter did not parse: {}", e)))
}

/// Workspace crates at `base_level`, chatty dependencies at warn.
fn default_filter(base_level: &str) -> String {
    format!(
        "core_runtime={},search_traits={},core_store={},core_paging={},\
         core_sync={},provider_github={},h2=warn,hyper=warn,reqwest=warn,sqlx=warn",
        base_level, base_level, base_level, base_level, base_level, base_level
    )
}

/// Stdout layer in the configured format.
fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let base = tracing_subscriber::fmt::layer()
        .with_target(config.display_target)
        .with_thread_ids(config.display_thread_info)
        .with_thread_names(config.display_thread_info)
        .with_writer(io::stdout);

    let span_events = if config.enable_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Pretty => base.pretty().with_span_events(span_events).boxed(),
        LogFormat::Json => base
            .json()
            .flatten_event(true)
            .with_current_span(config.enable_spans)
            .with_span_list(config.enable_spans)
            .boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}
