//! Lightweight telemetry helpers for the relay.
//! Installs the tracing subscriber and records counters through the
//! `metrics` facade with a small, fixed label vocabulary.

use anyhow::Result;

mod config;
mod context;
mod metrics;
mod tracing_init;

pub use config::TelemetryConfig;
pub use context::TelemetryLabels;
pub use metrics::{record_counter, with_common_fields};
pub use tracing_init::init_telemetry;

/// Installs the shared tracing subscriber configured from `RUST_LOG` and
/// `LOG_FORMAT`.
pub fn install(service_name: &str) -> Result<()> {
    init_telemetry(TelemetryConfig::from_env(service_name))
}
