use ingest_sink::{PutReceipt, SharedSink, SinkError, frame_record};
use security::{SignatureError, WebhookSecret};
use tracing::{info, warn};

use crate::config::ForwarderConfig;
use crate::event::InboundEvent;

/// Why a delivery was dropped without being forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingSignature,
    /// Covers undecodable headers as well as wrong digests.
    SignatureMismatch,
}

impl From<SignatureError> for Rejection {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::Missing => Rejection::MissingSignature,
            SignatureError::InvalidBase64 | SignatureError::Mismatch => {
                Rejection::SignatureMismatch
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Forwarded(PutReceipt),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Outcome::Forwarded(_))
    }
}

/// Verifies webhook signatures and appends authentic bodies to the sink.
#[derive(Clone)]
pub struct WebhookForwarder {
    sink: SharedSink,
    secret: WebhookSecret,
    log_rejected_payloads: bool,
}

impl WebhookForwarder {
    pub fn new(sink: SharedSink, config: &ForwarderConfig) -> Self {
        Self {
            sink,
            secret: config.secret.clone(),
            log_rejected_payloads: config.log_rejected_payloads,
        }
    }

    pub fn target(&self) -> &str {
        self.sink.target()
    }

    /// Signature check alone; no logging and no sink traffic.
    pub fn authenticate(&self, event: &InboundEvent) -> Result<(), Rejection> {
        self.secret
            .verify(event.body.as_bytes(), event.signature())
            .map_err(Rejection::from)
    }

    /// Handles one delivery. Authentication failures resolve to
    /// `Outcome::Rejected`; only a failed write surfaces as an error.
    pub async fn handle(&self, event: &InboundEvent) -> Result<Outcome, SinkError> {
        if let Err(rejection) = self.authenticate(event) {
            let diagnostics = event.diagnostics(self.log_rejected_payloads);
            match rejection {
                Rejection::MissingSignature => warn!(
                    event = %diagnostics,
                    "request did not contain a Shopify HMAC digest header"
                ),
                Rejection::SignatureMismatch => warn!(
                    event = %diagnostics,
                    "computed digest does not match Shopify HMAC digest header"
                ),
            }
            return Ok(Outcome::Rejected(rejection));
        }

        let receipt = self.sink.put_record(frame_record(&event.body)).await?;
        info!(
            stream = %self.sink.target(),
            record_id = %receipt.record_id,
            bytes = event.body.len() + 1,
            "event added to firehose"
        );
        Ok(Outcome::Forwarded(receipt))
    }
}
