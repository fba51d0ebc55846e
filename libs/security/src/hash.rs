use sha2::{Digest, Sha256};

/// Hex SHA-256 of a payload, used to correlate rejected deliveries in logs
/// without writing the payload itself.
pub fn body_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}
