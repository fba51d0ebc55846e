use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload handed to the function by the API Gateway mapping template.
///
/// `body` is the raw request body exactly as Shopify signed it and must be
/// present; a payload without it fails to deserialize and the invocation is
/// reported as failed. Unknown fields are kept so they can be reported when
/// full payload logging is switched on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopify_hmac: Option<String>,
    pub body: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundEvent {
    pub fn new(body: impl Into<String>, shopify_hmac: Option<String>) -> Self {
        Self {
            shopify_hmac,
            body: body.into(),
            extra: Map::new(),
        }
    }

    /// Signature header, with an empty string treated as absent.
    pub fn signature(&self) -> Option<&str> {
        self.shopify_hmac.as_deref().filter(|sig| !sig.is_empty())
    }

    pub fn diagnostics(&self, include_payload: bool) -> EventDiagnostics<'_> {
        EventDiagnostics {
            signature_present: self.signature().is_some(),
            body_len: self.body.len(),
            body_sha256: security::body_digest(self.body.as_bytes()),
            event: include_payload.then_some(self),
        }
    }
}

/// What gets logged about a rejected delivery.
#[derive(Debug, Serialize)]
pub struct EventDiagnostics<'a> {
    pub signature_present: bool,
    pub body_len: usize,
    pub body_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<&'a InboundEvent>,
}

impl fmt::Display for EventDiagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(
                f,
                "signature_present={} body_len={} body_sha256={}",
                self.signature_present, self.body_len, self.body_sha256
            ),
        }
    }
}
