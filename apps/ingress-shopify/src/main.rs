//! Lambda entry point.
//!
//! Build with `cargo lambda build --release --bin ingress-shopify`; the
//! deployable artifact is `target/lambda/ingress-shopify/bootstrap`.

use std::sync::Arc;

use anyhow::Context;
use ingest_sink::FirehoseSink;
use ingress_shopify::{ForwarderConfig, InboundEvent, WebhookForwarder, handle_invocation};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    ingest_telemetry::install("ingress-shopify")?;

    let config = ForwarderConfig::from_env().context("load forwarder configuration")?;
    info!(
        stream = %config.delivery_stream,
        log_rejected_payloads = config.log_rejected_payloads,
        "cold start, initializing firehose client"
    );

    let sink = FirehoseSink::new(config.sink_config()).await;
    let forwarder = Arc::new(WebhookForwarder::new(Arc::new(sink), &config));

    run(service_fn(move |event: LambdaEvent<InboundEvent>| {
        let forwarder = forwarder.clone();
        async move { handle_invocation(&forwarder, event).await }
    }))
    .await
}
