//! Diagnostic output configuration
//!
//! mindtrace reports swallowed write failures and degraded sensors through
//! `tracing`. This module owns the subscriber setup so every consumer of
//! the workspace gets the same filter and format handling.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// One JSON object per event
    #[serde(rename = "json")]
    Json,
    /// Compact single-line text
    #[serde(rename = "text")]
    #[default]
    Text,
    /// Multi-line human-oriented output
    #[serde(rename = "pretty")]
    Pretty,
}

/// Diagnostic logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset (e.g. `info`, `mindtrace_observe=debug`)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Build the filter: `RUST_LOG` wins, otherwise the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber
    ///
    /// Returns `false` if a global subscriber was already installed.
    pub fn init(&self) -> bool {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(true);

        let result = match self.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Text => builder.compact().try_init(),
        };
        result.is_ok()
    }
}
