// src/utils/crypto.rs
//! Cryptographic utilities for credential anchoring.
//!
//! Uses SHA-256 for all content digests; anchored hashes are carried
//! on-ledger as uppercase hex by convention.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of the input data.
///
/// # Arguments
/// * `data` - Binary data to hash (as bytes slice)
///
/// # Returns
/// Fixed-size 32-byte array (`[u8; 32]`) containing the digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the SHA-256 digest of the input and renders it as uppercase
/// hex, the form embedded in anchor memos.
///
/// # Arguments
/// * `data` - Binary data to hash
///
/// # Returns
/// 64-character uppercase hex string.
pub fn sha256_hex_upper(data: &[u8]) -> String {
    hex::encode(sha256(data)).to_uppercase()
}
