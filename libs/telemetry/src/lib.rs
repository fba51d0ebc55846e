//! Tracing setup shared by the ingest binaries.
//!
//! Logs go to stdout, where the Lambda runtime forwards them to CloudWatch.

use anyhow::Result;
use tracing::Span;

pub mod config;
mod tracing_init;

pub use config::TelemetryConfig;
pub use tracing_init::init_tracing;

const INVOCATION_SPAN_NAME: &str = "ingress.handle";

/// Installs the subscriber configured from `RUST_LOG` and `LOG_FORMAT`.
pub fn install(service_name: &str) -> Result<()> {
    init_tracing(&TelemetryConfig::from_env(service_name))
}

/// Span wrapping one invocation, keyed by the runtime's request id.
pub fn start_invocation_span(request_id: &str) -> Span {
    tracing::info_span!(INVOCATION_SPAN_NAME, request_id = %request_id)
}
