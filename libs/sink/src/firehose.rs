use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_firehose::{Client, error::DisplayErrorContext, primitives::Blob, types::Record};
use bytes::Bytes;
use tracing::debug;

use crate::{PutReceipt, RecordSink, SinkError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirehoseSinkConfig {
    pub delivery_stream: String,
    /// Overrides the regional endpoint, e.g. for a local emulator.
    pub endpoint_url: Option<String>,
}

/// Kinesis Data Firehose delivery stream writer.
///
/// The client is built once and reused across invocations.
#[derive(Clone, Debug)]
pub struct FirehoseSink {
    client: Client,
    delivery_stream: String,
}

impl FirehoseSink {
    /// Resolves region and credentials from the standard AWS environment.
    pub async fn new(config: FirehoseSinkConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(url) = config.endpoint_url.as_deref() {
            loader = loader.endpoint_url(url);
        }
        let shared = loader.load().await;
        Self::from_client(Client::new(&shared), config.delivery_stream)
    }

    pub fn from_client(client: Client, delivery_stream: impl Into<String>) -> Self {
        Self {
            client,
            delivery_stream: delivery_stream.into(),
        }
    }
}

#[async_trait]
impl RecordSink for FirehoseSink {
    fn target(&self) -> &str {
        &self.delivery_stream
    }

    async fn put_record(&self, payload: Bytes) -> Result<PutReceipt, SinkError> {
        let bytes = payload.len();
        let record = Record::builder()
            .data(Blob::new(payload.to_vec()))
            .build()
            .map_err(|err| SinkError::InvalidRecord {
                stream: self.delivery_stream.clone(),
                message: err.to_string(),
            })?;

        let output = self
            .client
            .put_record()
            .delivery_stream_name(&self.delivery_stream)
            .record(record)
            .send()
            .await
            .map_err(|err| SinkError::Unavailable {
                stream: self.delivery_stream.clone(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        debug!(
            stream = %self.delivery_stream,
            bytes,
            record_id = %output.record_id(),
            "firehose accepted record"
        );
        Ok(PutReceipt {
            record_id: output.record_id().to_string(),
        })
    }
}
