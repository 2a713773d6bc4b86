// src/services/registrar.rs
//! Identity Registrar Service
//!
//! Manages DID records on the ledger: an account-level object of type
//! "DID" holding a hex-encoded document-locator URI. Registering writes
//! the URI, deleting writes an empty URI, resolving reads it back. The
//! identifier itself is deterministic — the method literal, the
//! configured network id, and the account address — so the same account
//! always yields the same DID.

use std::sync::Arc;

use log::{debug, info};

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::ledger::gateway::{AccountObjectsResponse, GatewayError, LedgerGateway, LedgerRequest};
use crate::ledger::signer::TransactionSigner;
use crate::ledger::tx::{DidSetTx, Transaction, TxCommon, TES_SUCCESS};
use crate::models::did::{Did, DidVerification};
use crate::utils::serialization::{hex_to_string, string_to_hex};

/// Result of a successful DID registration or update.
#[derive(Debug, Clone)]
pub struct RegisteredDid {
    pub did: Did,
    pub tx_hash: String,
}

/// Service for managing DID records through the shared ledger gateway.
pub struct IdentityRegistrar {
    gateway: Arc<dyn LedgerGateway>,
    did_network_id: String,
}

impl IdentityRegistrar {
    /// Creates a new registrar over the shared gateway handle.
    pub fn new(gateway: Arc<dyn LedgerGateway>, config: &SdkConfig) -> Self {
        IdentityRegistrar {
            gateway,
            did_network_id: config.did_network_id.clone(),
        }
    }

    /// Creates or updates the signer's DID record to point at
    /// `document_uri`, waiting for consensus validation.
    ///
    /// # Arguments
    /// * `signer` - Key of the controlling account
    /// * `document_uri` - DID document locator (e.g. `ipfs://...`);
    ///   empty clears the record
    ///
    /// # Returns
    /// The minted DID and the validated transaction hash.
    ///
    /// # Errors
    /// `SdkError::Registration` if submission fails or the validated
    /// result is not a success.
    pub async fn register_or_update(
        &self,
        signer: &dyn TransactionSigner,
        document_uri: &str,
    ) -> SdkResult<RegisteredDid> {
        let tx = Transaction::DidSet(DidSetTx {
            common: TxCommon::for_account(signer.address()),
            uri: string_to_hex(document_uri),
        });

        let outcome = self
            .gateway
            .submit_and_wait(&tx, signer)
            .await
            .map_err(|e| SdkError::Registration(e.to_string()))?;

        if outcome.transaction_result != TES_SUCCESS {
            return Err(SdkError::Registration(format!(
                "ledger reported {}",
                outcome.transaction_result
            )));
        }

        info!("DID record set for {} in tx {}", signer.address(), outcome.hash);
        Ok(RegisteredDid {
            did: Did::new(&self.did_network_id, signer.address()),
            tx_hash: outcome.hash,
        })
    }

    /// Resolves a DID to its registered document URI.
    ///
    /// # Returns
    /// - `Ok(Some(uri))` when a non-empty record exists
    /// - `Ok(None)` when the account has no DID object or the stored
    ///   URI is empty
    ///
    /// # Errors
    /// - `SdkError::Validation` for a malformed DID (checked before any
    ///   network call)
    /// - `SdkError::Registration` for gateway failures or an
    ///   undecodable stored field
    pub async fn resolve(&self, did: &str) -> SdkResult<Option<String>> {
        let did = Did::parse(did)?;

        let response = match self
            .gateway
            .request(LedgerRequest::AccountObjects {
                account: did.address.clone(),
                object_type: "did".to_string(),
            })
            .await
        {
            Ok(value) => value,
            Err(GatewayError::NotFound) => return Ok(None),
            Err(e) => return Err(SdkError::Registration(e.to_string())),
        };

        let objects: AccountObjectsResponse = serde_json::from_value(response)
            .map_err(|e| SdkError::Registration(format!("malformed account_objects response: {}", e)))?;

        let uri_field = objects
            .account_objects
            .first()
            .and_then(|object| object.get("URI"))
            .and_then(|uri| uri.as_str())
            .unwrap_or("");
        if uri_field.is_empty() {
            debug!("no DID record for {}", did.address);
            return Ok(None);
        }

        hex_to_string(uri_field)
            .map(Some)
            .map_err(|e| SdkError::Registration(format!("stored URI is not decodable: {}", e)))
    }

    /// Clears the signer's DID record (the identifier itself survives;
    /// only the document URI is emptied).
    pub async fn delete(&self, signer: &dyn TransactionSigner) -> SdkResult<String> {
        self.register_or_update(signer, "")
            .await
            .map(|registered| registered.tx_hash)
    }

    /// Checks whether a DID exists on the ledger.
    ///
    /// The format check runs before any network call; a malformed DID
    /// is reported without touching the gateway. All failure paths
    /// collapse into the returned struct — this method never errors.
    pub async fn verify(&self, did: &str) -> DidVerification {
        let parsed = match Did::parse(did) {
            Ok(parsed) => parsed,
            Err(_) => {
                return DidVerification {
                    exists: false,
                    uri: None,
                    address: String::new(),
                    message: "Invalid DID format. Expected: did:xrpl:<network-id>:<address>"
                        .to_string(),
                };
            }
        };

        match self.resolve(did).await {
            Ok(Some(uri)) => DidVerification {
                exists: true,
                uri: Some(uri),
                address: parsed.address,
                message: "DID verified on ledger".to_string(),
            },
            Ok(None) => DidVerification {
                exists: false,
                uri: None,
                address: parsed.address,
                message: "DID not found. Account may not have a DID record.".to_string(),
            },
            Err(e) => DidVerification {
                exists: false,
                uri: None,
                address: parsed.address,
                message: format!("Verification failed: {}", e),
            },
        }
    }
}
