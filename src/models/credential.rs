// src/models/credential.rs
//! Verifiable Credential data model.
//!
//! Follows the [W3C Verifiable Credentials Data Model](https://www.w3.org/TR/vc-data-model/)
//! field set. The credential itself never goes on-ledger; only its
//! content hash does, so the serialized form is the canonical
//! fingerprint of the credential.
//!
//! # Canonical form
//! The canonical serialization is this struct's `serde_json` output:
//! struct fields in declaration order, JSON-map values (subject claims,
//! proof) in sorted key order. Verification recomputes the same
//! serialization independently, so any reordering or whitespace change
//! in how a credential is re-serialized breaks verification. This is a
//! correctness requirement of the anchoring protocol, not an
//! implementation detail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SdkError, SdkResult};
use crate::utils::crypto;

/// W3C context URI present on every credential.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// A Verifiable Credential.
///
/// # Fields
/// - `context`: JSON-LD contexts (`@context` on the wire)
/// - `id`: unique URI for this credential
/// - `credential_type`: type tags, usually starting with
///   "VerifiableCredential"
/// - `issuer`: DID of the issuing identity
/// - `issuance_date`: issuance timestamp
/// - `credential_subject`: free-form claims about the subject
/// - `proof`: free-form proof material; the anchoring transaction hash
///   may be recorded here under `transactionHash`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    pub id: String,

    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    pub issuer: String,

    #[serde(rename = "issuanceDate")]
    pub issuance_date: DateTime<Utc>,

    #[serde(rename = "credentialSubject")]
    pub credential_subject: Value,

    pub proof: Value,
}

impl VerifiableCredential {
    /// Builds a credential with the standard context and type tags, an
    /// empty proof, and the current time as issuance date.
    pub fn new(id: &str, issuer: &str, credential_subject: Value) -> Self {
        VerifiableCredential {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            id: id.to_string(),
            credential_type: vec!["VerifiableCredential".to_string()],
            issuer: issuer.to_string(),
            issuance_date: Utc::now(),
            credential_subject,
            proof: Value::Object(serde_json::Map::new()),
        }
    }

    /// The canonical serialized form (see module docs).
    pub fn canonical_json(&self) -> SdkResult<String> {
        serde_json::to_string(self)
            .map_err(|e| SdkError::Anchor(format!("credential serialization failed: {}", e)))
    }

    /// SHA-256 digest of the canonical form, uppercase hex: the
    /// fingerprint embedded in the anchoring memo.
    pub fn content_hash(&self) -> SdkResult<String> {
        Ok(crypto::sha256_hex_upper(self.canonical_json()?.as_bytes()))
    }

    /// Anchoring transaction hash recorded in the proof, if any.
    /// Accepts the legacy `txHash` key alongside `transactionHash`.
    pub fn proof_transaction_hash(&self) -> Option<String> {
        let proof = self.proof.as_object()?;
        proof
            .get("transactionHash")
            .or_else(|| proof.get("txHash"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
