//! Shopify webhook ingest: verifies the `X-Shopify-Hmac-Sha256` signature of
//! each delivery and appends authentic bodies to a Kinesis Data Firehose
//! delivery stream, one JSON document per line.
//!
//! ```text
//! API Gateway -> { shopify_hmac, body } -> verify -> Firehose PutRecord(body + "\n")
//! ```

use lambda_runtime::{Error, LambdaEvent};
use tracing::Instrument;

pub mod config;
pub mod event;
pub mod forwarder;

pub use config::{ConfigError, ForwarderConfig};
pub use event::{EventDiagnostics, InboundEvent};
pub use forwarder::{Outcome, Rejection, WebhookForwarder};

/// Lambda handler body. Rejected deliveries complete normally; sink failures
/// are returned so the runtime reports the invocation as failed.
pub async fn handle_invocation(
    forwarder: &WebhookForwarder,
    event: LambdaEvent<InboundEvent>,
) -> Result<(), Error> {
    let LambdaEvent {
        payload, context, ..
    } = event;
    let span = ingest_telemetry::start_invocation_span(&context.request_id);
    forwarder
        .handle(&payload)
        .instrument(span)
        .await
        .map(|_| ())
        .map_err(Error::from)
}
