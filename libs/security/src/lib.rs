//! Signature helpers for inbound Shopify webhooks.
//!
//! Shopify signs every webhook delivery with `HMAC-SHA256(secret, raw_body)`
//! and sends the base64 digest alongside the body. [`verify_signature`]
//! recomputes the digest and compares it in constant time.
//!
//! ```
//! use security::{sign_body, verify_signature};
//!
//! let sig = sign_body("s3cr3t", b"hello");
//! assert!(verify_signature("s3cr3t", b"hello", Some(&sig)).is_ok());
//! assert!(verify_signature("s3cr3t", b"hello!", Some(&sig)).is_err());
//! ```

pub mod hash;
pub mod signature;

pub use hash::body_digest;
pub use signature::{SignatureError, WebhookSecret, sign_body, verify_signature};
