// src/utils/validation.rs
//! Input validators for addresses, amounts, currencies, and recovery
//! quorums.
//!
//! All validators run before any network interaction and raise
//! `SdkError::Validation`; they are never wrapped in a network-error
//! kind.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{SdkError, SdkResult};

/// Ledger classic-address shape: base58 (Ripple alphabet, no 0/O/I/l),
/// `r` prefix, 26-35 characters total.
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^r[1-9A-HJ-NP-Za-km-z]{25,34}$").expect("address regex"));

/// Decimal amount as a numeric string, e.g. "100" or "12.5".
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("amount regex"));

/// Checks whether a string satisfies the ledger's address encoding.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// Validates a ledger address.
///
/// # Errors
/// `SdkError::Validation` naming the offending address.
pub fn validate_address(address: &str) -> SdkResult<()> {
    if is_valid_address(address) {
        Ok(())
    } else {
        Err(SdkError::Validation(format!("invalid ledger address: {}", address)))
    }
}

/// Validates a decimal amount string for issued-currency payments.
///
/// # Errors
/// `SdkError::Validation` if the amount is not a plain numeric string.
pub fn validate_amount(amount: &str) -> SdkResult<()> {
    if AMOUNT_RE.is_match(amount) {
        Ok(())
    } else {
        Err(SdkError::Validation(format!("amount must be a numeric string: {}", amount)))
    }
}

/// Normalizes a currency code to the ledger's wire form.
///
/// Standard 3-character codes pass through unchanged; longer codes are
/// hex-encoded and zero-padded to the ledger's 40-character field width.
pub fn format_currency(code: &str) -> String {
    if code.len() <= 3 {
        code.to_string()
    } else {
        let mut encoded = hex::encode(code.as_bytes()).to_uppercase();
        while encoded.len() < 40 {
            encoded.push('0');
        }
        encoded
    }
}

/// Validates a recovery guardian set and quorum before any network call.
///
/// Rules:
/// - at least one guardian
/// - every guardian address well-formed
/// - no duplicate guardians (rejected even though the wire format
///   tolerates them)
/// - `1 <= quorum <= |guardians|`
///
/// # Errors
/// `SdkError::Validation` describing the first rule violated.
pub fn validate_recovery_config(guardians: &[String], quorum: u32) -> SdkResult<()> {
    if guardians.is_empty() {
        return Err(SdkError::Validation("guardian set must not be empty".into()));
    }
    for guardian in guardians {
        validate_address(guardian)?;
    }
    let mut seen = std::collections::HashSet::new();
    for guardian in guardians {
        if !seen.insert(guardian.as_str()) {
            return Err(SdkError::Validation(format!("duplicate guardian address: {}", guardian)));
        }
    }
    if quorum == 0 {
        return Err(SdkError::Validation("quorum must be at least 1".into()));
    }
    if quorum as usize > guardians.len() {
        return Err(SdkError::Validation(format!(
            "quorum {} exceeds guardian count {}",
            quorum,
            guardians.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_shapes() {
        assert!(is_valid_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"));
        assert!(!is_valid_address("xHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"));
        assert!(!is_valid_address("rShort"));
        // 0, O, I and l are outside the base58 alphabet
        assert!(!is_valid_address("r0b9CJAWyB4rj91VRWn96DkukG4bwdtyTh"));
        assert!(!is_valid_address(""));
    }

    #[test]
    fn test_amount_shapes() {
        assert!(validate_amount("100").is_ok());
        assert!(validate_amount("12.5").is_ok());
        assert!(validate_amount("").is_err());
        assert!(validate_amount("12,5").is_err());
        assert!(validate_amount("-3").is_err());
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(format_currency("USD"), "USD");
        // 5-char codes expand to 40-char padded hex
        assert_eq!(format_currency("RLUSD"), "524C555344000000000000000000000000000000");
        assert_eq!(format_currency("RLUSD").len(), 40);
    }

    #[test]
    fn test_recovery_config_rules() {
        let g1 = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string();
        let g2 = "rLHzPsX6oXkzU2qL12kHCH8G8cnZv1rBJh".to_string();

        assert!(validate_recovery_config(&[g1.clone(), g2.clone()], 2).is_ok());
        assert!(validate_recovery_config(&[], 1).is_err());
        assert!(validate_recovery_config(&[g1.clone()], 0).is_err());
        assert!(validate_recovery_config(&[g1.clone()], 2).is_err());
        assert!(validate_recovery_config(&[g1.clone(), g1.clone()], 1).is_err());
        assert!(validate_recovery_config(&[g1, "not-an-address".to_string()], 1).is_err());
    }
}
