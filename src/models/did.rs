// src/models/did.rs
//! Decentralized Identifier (DID) data model.
//!
//! DIDs bind an identity to a ledger account:
//!
//! ```text
//! did:xrpl:<network-id>:<address>
//! ```
//!
//! Exactly four colon-delimited segments; the first two are literal
//! tokens and the trailing segment must satisfy the ledger's address
//! encoding. Parsing is strict at every ingress — a DID with extra
//! segments is rejected rather than parsed by its last segment.
//!
//! A DID is minted when the account first writes its DID record and is
//! never destroyed; "deleting" clears the pointed-to document URI, not
//! the identifier.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{SdkError, SdkResult};
use crate::utils::validation;

/// The DID method literal this crate mints and accepts.
pub const DID_METHOD: &str = "xrpl";

/// A parsed DID.
///
/// Construction goes through [`Did::new`] (minting, address already
/// validated by the caller's signer) or [`Did::parse`] (strict ingress
/// validation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Did {
    /// Ledger network identifier segment, e.g. "1".
    pub network_id: String,

    /// The controlling account's address.
    pub address: String,
}

impl Did {
    /// Mints the DID for an account on the given network. Deterministic:
    /// the same account always yields the same DID.
    pub fn new(network_id: &str, address: &str) -> Self {
        Did {
            network_id: network_id.to_string(),
            address: address.to_string(),
        }
    }

    /// Strictly parses a DID string.
    ///
    /// # Errors
    /// `SdkError::Validation` when the input does not have exactly four
    /// segments, the literal tokens are wrong, the network id is empty,
    /// or the address segment fails the ledger's address encoding.
    pub fn parse(input: &str) -> SdkResult<Self> {
        let parts: Vec<&str> = input.split(':').collect();
        if parts.len() != 4 {
            return Err(SdkError::Validation(format!(
                "invalid DID format, expected did:{}:<network-id>:<address>: {}",
                DID_METHOD, input
            )));
        }
        if parts[0] != "did" || parts[1] != DID_METHOD {
            return Err(SdkError::Validation(format!(
                "invalid DID method, expected did:{}: {}",
                DID_METHOD, input
            )));
        }
        if parts[2].is_empty() {
            return Err(SdkError::Validation(format!("empty DID network id: {}", input)));
        }
        validation::validate_address(parts[3])?;
        Ok(Did::new(parts[2], parts[3]))
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}:{}", DID_METHOD, self.network_id, self.address)
    }
}

impl FromStr for Did {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Did::parse(s)
    }
}

/// Outcome of a DID verification check.
///
/// Every failure path collapses into this struct; `verify` never raises.
#[derive(Debug, Clone, Serialize)]
pub struct DidVerification {
    /// Whether a non-empty DID record exists on the ledger.
    pub exists: bool,

    /// The registered document URI, when one exists.
    pub uri: Option<String>,

    /// Address segment of the checked DID; empty when the format check
    /// already failed.
    pub address: String,

    /// Human-readable outcome description.
    pub message: String,
}
