//! Destinations for verified webhook bodies.
//!
//! A [`RecordSink`] accepts one opaque record per call and appends it to an
//! external stream. Records are framed with [`frame_record`] first so that
//! concatenated objects land one per line in the delivery bucket.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

mod firehose;
mod memory;

pub use firehose::{FirehoseSink, FirehoseSinkConfig};
pub use memory::InMemorySink;

/// Errors returned by sink implementations.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("record for `{stream}` could not be built: {message}")]
    InvalidRecord { stream: String, message: String },
    #[error("put record to `{stream}` failed: {message}")]
    Unavailable { stream: String, message: String },
}

/// Acknowledgement returned once the sink has accepted a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    pub record_id: String,
}

/// Contract implemented by append-only record destinations.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Name of the stream records are written to.
    fn target(&self) -> &str;

    /// Appends a single record. Implementations perform exactly one write per
    /// call and never retry.
    async fn put_record(&self, payload: Bytes) -> Result<PutReceipt, SinkError>;
}

/// Shared trait object wrapper.
pub type SharedSink = Arc<dyn RecordSink>;

/// Appends the newline delimiter to a body and returns the UTF-8 bytes.
pub fn frame_record(body: &str) -> Bytes {
    let mut framed = String::with_capacity(body.len() + 1);
    framed.push_str(body);
    framed.push('\n');
    Bytes::from(framed)
}
