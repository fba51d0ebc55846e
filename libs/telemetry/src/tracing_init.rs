use std::sync::OnceLock;

use anyhow::{Context, Result};
use tracing_subscriber::layer::Layer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryConfig;

static INIT: OnceLock<()> = OnceLock::new();

pub fn init_tracing(cfg: &TelemetryConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    // Lambda prefixes every log line with its own timestamp.
    let fmt_layer = if cfg.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_target(false)
            .without_time()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .without_time()
            .boxed()
    };

    let env_filter = build_filter(cfg)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();

    INIT.set(()).ok();
    tracing::debug!(service = %cfg.service_name, json = cfg.json_logs, "tracing installed");
    Ok(())
}

fn build_filter(cfg: &TelemetryConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&cfg.filter).with_context(|| format!("invalid log filter `{}`", cfg.filter))
}
