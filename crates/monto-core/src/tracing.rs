//! Tracing setup shared by the Monto crates.
//!
//! Clients and services embed this crate as a library, so nothing here is
//! initialized automatically; the embedding application calls [`init_tracing`]
//! once at startup. The `RUST_LOG` environment variable overrides the
//! configured default level.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum TracingError {
    /// The global subscriber was already set.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// A custom env filter directive did not parse.
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for log messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Human-readable single-line format (default).
    #[default]
    Compact,
    /// Multi-line pretty format for interactive debugging.
    Pretty,
    /// JSON, for services running under log collectors.
    Json,
}

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The default log level when `RUST_LOG` is not set.
    pub default_level: Level,
    /// Output format for log messages.
    pub output_format: TracingOutputFormat,
    /// Whether to include the target (module path) in logs.
    pub include_target: bool,
    /// Custom env filter directive; overrides `default_level` when set.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Compact,
            include_target: true,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// A config suitable for a long-running service process.
    #[must_use]
    pub fn service() -> Self {
        Self {
            output_format: TracingOutputFormat::Json,
            ..Default::default()
        }
    }

    /// Builder: set the default log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Builder: set the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Builder: set a custom env filter directive.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

/// Initializes the global tracing subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed or if the
/// env filter directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = if let Some(ref filter) = config.env_filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("monto={}", config.default_level)))
    };

    match config.output_format {
        TracingOutputFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_target(config.include_target));
            tracing::subscriber::set_global_default(subscriber)?;
        }
        TracingOutputFormat::Pretty => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_target(config.include_target));
            tracing::subscriber::set_global_default(subscriber)?;
        }
        TracingOutputFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_target(config.include_target));
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}
