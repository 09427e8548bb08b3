//! Logging setup for binaries embedding the client
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the application. [`init_tracing`] is the default used by the
//! `scalardl` command.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Emit one JSON object per event instead of compact text
    pub json_format: bool,
    /// Filter directive used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "scalardl-client".to_string(),
            json_format: false,
            log_level: "warn".to_string(),
        }
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            json_format: lookup("LOG_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.json_format),
            log_level: lookup("LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Install a global subscriber writing to stderr.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = tracing_subscriber::registry().with(config.env_filter());

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        subscriber.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact();
        subscriber.with(fmt_layer).try_init()?;
    }

    tracing::debug!(service = %config.service_name, "tracing initialized");
    Ok(())
}
