// src/error.rs
//! Error types for the DID anchoring SDK.
//!
//! Every failure carries a stable machine-readable code alongside its
//! human-readable message, so callers can dispatch on the error kind
//! without string matching.
//!
//! Policy:
//! - Validation failures (malformed address, quorum out of range, missing
//!   required hash) are raised before any network call and are never
//!   wrapped in a network-error kind.
//! - Gateway/ledger failures are wrapped into the operation's domain kind
//!   with the original message preserved for diagnostics.
//! - Lookups that can legitimately come back empty (DID resolution,
//!   anchored-hash checks, transaction monitoring) return typed negative
//!   results instead of errors; only infrastructure failures escalate.

use thiserror::Error;

/// Domain errors raised by the SDK services.
#[derive(Debug, Error)]
pub enum SdkError {
    /// DID registration or update failed.
    #[error("registration failed: {0}")]
    Registration(String),

    /// Credential anchoring or anchored-hash verification failed.
    #[error("credential anchoring failed: {0}")]
    Anchor(String),

    /// Recovery configuration, signing, or submission failed.
    #[error("recovery failed: {0}")]
    Recovery(String),

    /// Issued-currency payment failed.
    #[error("payment failed: {0}")]
    Payment(String),

    /// Input rejected before any network interaction.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl SdkError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            SdkError::Registration(_) => "REGISTRATION_ERROR",
            SdkError::Anchor(_) => "ANCHOR_ERROR",
            SdkError::Recovery(_) => "RECOVERY_ERROR",
            SdkError::Payment(_) => "PAYMENT_ERROR",
            SdkError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

/// Convenience alias used across the services.
pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(SdkError::Registration("x".into()).code(), "REGISTRATION_ERROR");
        assert_eq!(SdkError::Anchor("x".into()).code(), "ANCHOR_ERROR");
        assert_eq!(SdkError::Recovery("x".into()).code(), "RECOVERY_ERROR");
        assert_eq!(SdkError::Payment("x".into()).code(), "PAYMENT_ERROR");
        assert_eq!(SdkError::Validation("x".into()).code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_message_is_preserved() {
        let err = SdkError::Recovery("engine reported tecNO_PERMISSION".into());
        assert!(err.to_string().contains("tecNO_PERMISSION"));
    }
}
