use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a webhook signature is not accepted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header missing or empty")]
    Missing,
    #[error("signature header is not valid base64")]
    InvalidBase64,
    #[error("signature does not match body")]
    Mismatch,
}

/// Shared secret used as the HMAC key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sign(&self, body: &[u8]) -> String {
        sign_body(&self.0, body)
    }

    pub fn verify(&self, body: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
        verify_signature(&self.0, body, header)
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(***)")
    }
}

fn digest(secret: &str, body: &[u8]) -> [u8; 32] {
    let mut mac = <HmacSha256 as KeyInit>::new_from_slice(secret.as_bytes())
        .expect("hmac accepts any key length");
    mac.update(body);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Base64 HMAC-SHA256 of `body`, in the form Shopify sends in
/// `X-Shopify-Hmac-Sha256`.
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    B64.encode(digest(secret, body))
}

/// Checks a base64 signature header against `HMAC-SHA256(secret, body)`.
///
/// The digest comparison is constant time; only the length check can
/// short-circuit.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(SignatureError::Missing),
    };
    let expected = digest(secret, body);
    let received = B64
        .decode(header)
        .map_err(|_| SignatureError::InvalidBase64)?;
    if bool::from(expected.as_slice().ct_eq(received.as_slice())) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}
