use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{PutReceipt, RecordSink, SinkError};

/// Sink that keeps records in memory, used in tests and local runs.
#[derive(Clone, Debug)]
pub struct InMemorySink {
    target: String,
    records: Arc<RwLock<Vec<Bytes>>>,
    unavailable: bool,
}

impl InMemorySink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            records: Arc::default(),
            unavailable: false,
        }
    }

    /// A sink whose every write fails, standing in for an unreachable service.
    pub fn unavailable(target: impl Into<String>) -> Self {
        Self {
            unavailable: true,
            ..Self::new(target)
        }
    }

    pub async fn records(&self) -> Vec<Bytes> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordSink for InMemorySink {
    fn target(&self) -> &str {
        &self.target
    }

    async fn put_record(&self, payload: Bytes) -> Result<PutReceipt, SinkError> {
        if self.unavailable {
            return Err(SinkError::Unavailable {
                stream: self.target.clone(),
                message: "in-memory sink marked unavailable".into(),
            });
        }
        let mut guard = self.records.write().await;
        guard.push(payload);
        Ok(PutReceipt {
            record_id: format!("mem-{}", guard.len()),
        })
    }
}
