//! Content digests
//!
//! Files and statements are identified by the hex SHA-256 of their content.
//! Digests are used for deduplication and verification only.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `content`
pub fn digest_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Check that `content` matches a previously recorded digest
pub fn verify_digest(content: &[u8], digest: &str) -> bool {
    digest_bytes(content).eq_ignore_ascii_case(digest)
}
