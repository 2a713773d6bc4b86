// src/utils/serialization.rs
//! Serialization utilities for on-ledger byte fields.
//!
//! The ledger stores free-form strings (DID document URIs, memo type
//! tags) as hex-encoded bytes. These helpers convert between the two
//! representations; the hex form is uppercase by ledger convention.

use crate::error::{SdkError, SdkResult};

/// Encodes a string into the ledger's uppercase-hex byte representation.
///
/// # Arguments
/// * `value` - The string to encode (e.g. a document URI)
///
/// # Returns
/// Uppercase hex encoding of the string's UTF-8 bytes.
pub fn string_to_hex(value: &str) -> String {
    hex::encode(value.as_bytes()).to_uppercase()
}

/// Decodes a ledger hex field back into a string.
///
/// Accepts either case on input; hex produced by other tooling is often
/// lowercase.
///
/// # Arguments
/// * `value` - Hex-encoded field contents
///
/// # Returns
/// - `Ok(String)` with the decoded UTF-8 string
/// - `Err(SdkError::Validation)` if the field is not valid hex or not
///   valid UTF-8
pub fn hex_to_string(value: &str) -> SdkResult<String> {
    let bytes = hex::decode(value)
        .map_err(|e| SdkError::Validation(format!("invalid hex field: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| SdkError::Validation(format!("hex field is not UTF-8: {}", e)))
}
