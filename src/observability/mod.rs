//! Observability subsystem for leadschema
//!
//! - Structured logging via `tracing` (JSON or pretty)
//! - Typed lifecycle events, carried as the `event` field
//! - Atomic counters for the write paths
//!
//! # Usage
//!
//! ```ignore
//! use leadschema::observability::{init_logging, Event, LogFormat, MetricsRegistry};
//!
//! init_logging("info", LogFormat::Json)?;
//! tracing::info!(event = %Event::ServerStart, port = 8080, "starting");
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_leads_created();
//! ```

mod events;
mod metrics;

pub use events::Event;
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log line rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

impl ObservabilityError {
    pub fn code(&self) -> &'static str {
        "OBSERVABILITY_FAILED"
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `level` when set.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), ObservabilityError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| ObservabilityError::InvalidFilter {
            filter: level.to_string(),
            reason: e.to_string(),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| ObservabilityError::Install(e.to_string()))
}
