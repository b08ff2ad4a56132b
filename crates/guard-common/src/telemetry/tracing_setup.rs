//! Tracing and logging setup
//!
//! Configures the `tracing` subscriber with environment-based filtering.
//! The ingest path is span-instrumented throughout, so span events are
//! opt-in to keep development output readable.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for development
    Pretty,
    /// One JSON object per line, for log shipping
    Json,
}

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Fallback level when `RUST_LOG` is not set
    pub level: Level,
    pub format: LogFormat,
    /// Emit span open/close events in addition to log records
    pub span_events: bool,
    /// Include source file and line numbers
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            span_events: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    /// Verbose pretty-printed output for local development
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            ..Self::default()
        }
    }

    /// JSON output for production log shipping
    #[must_use]
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            file_line: false,
            ..Self::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.file_line)
            .with_line_number(self.file_line)
            .with_span_events(span_events);
        match self.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Pretty => layer.boxed(),
        }
    }
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` overrides the configured level when set.
///
/// # Panics
/// Panics if a global subscriber is already set; use [`try_init_tracing`]
/// when initialization may race (tests).
pub fn init_tracing(config: &TracingConfig) {
    tracing_subscriber::registry()
        .with(config.filter())
        .with(config.fmt_layer())
        .init();
}

/// Try to initialize tracing, returning Err if a subscriber is already set
pub fn try_init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.filter())
        .with(config.fmt_layer())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
