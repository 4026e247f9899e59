//! Checksum calculation for dataset identification.

use sha2::{Digest, Sha256};

use crate::models::RawUsageRow;

/// Calculate SHA-256 checksum of content.
///
/// # Arguments
/// * `content` - Text to hash
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Checksum of the rows as ingested, independent of source file format.
///
/// Rows are hashed through their canonical JSON encoding, so the same data
/// uploaded as CSV or JSON yields the same checksum.
pub fn dataset_checksum(rows: &[RawUsageRow]) -> String {
    let mut hasher = Sha256::new();
    for row in rows {
        // serializing plain strings and floats cannot fail
        if let Ok(encoded) = serde_json::to_string(row) {
            hasher.update(encoded.as_bytes());
        }
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
