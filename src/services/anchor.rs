// src/services/anchor.rs
//! Credential Anchor Service
//!
//! Anchors verifiable credentials on the ledger and verifies anchors
//! later without a trusted third party. The anchor is a 1-drop
//! self-payment whose memo carries the credential's content hash; the
//! (hash, transaction, sender) triple is reconstructed from the ledger
//! on demand rather than stored anywhere.
//!
//! Issuance submits without waiting for full validation so a congested
//! network cannot block the caller; only the immediate relay
//! acknowledgment is checked. Verification is an idempotent read and is
//! safe to call redundantly.

use std::sync::Arc;

use log::{debug, info};

use crate::error::{SdkError, SdkResult};
use crate::ledger::gateway::{GatewayError, LedgerGateway, LedgerRequest, TxResponse};
use crate::ledger::signer::TransactionSigner;
use crate::ledger::tx::{
    classify_engine_result, Amount, EngineResultClass, MemoWrapper, PaymentTx, Transaction,
    TxCommon,
};
use crate::models::credential::VerifiableCredential;
use crate::models::did::Did;
use crate::utils::validation;

/// Memo type tag marking a transaction as a credential anchor.
pub const CREDENTIAL_MEMO_TYPE: &str = "DIDAnchor:Credential";

/// Fee pinned on anchor payments; generous enough to clear a congested
/// open ledger.
const ANCHOR_FEE_DROPS: &str = "5000";

/// Ledgers after the current index before an unvalidated anchor expires.
const ANCHOR_TTL_LEDGERS: u32 = 200;

/// Result of anchoring a credential.
#[derive(Debug, Clone)]
pub struct AnchoredCredential {
    /// Uppercase-hex SHA-256 of the credential's canonical form.
    pub content_hash: String,

    /// Hash of the anchoring transaction.
    pub tx_hash: String,
}

/// Service for anchoring and verifying credentials through the shared
/// ledger gateway.
pub struct CredentialAnchor {
    gateway: Arc<dyn LedgerGateway>,
}

impl CredentialAnchor {
    /// Creates a new anchor service over the shared gateway handle.
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        CredentialAnchor { gateway }
    }

    /// Anchors a credential by embedding its content hash in a 1-drop
    /// self-payment memo signed by the issuer.
    ///
    /// # Arguments
    /// * `signer` - The issuer's key; its address must be the sender of
    ///   the anchoring transaction for verification to succeed later
    /// * `credential` - The credential to fingerprint; hashed exactly as
    ///   serialized (see `VerifiableCredential` canonical form)
    ///
    /// # Returns
    /// The locally computed content hash and the signed transaction's
    /// hash. The transaction may still be awaiting validation.
    ///
    /// # Errors
    /// `SdkError::Anchor` if preparation or signing fails, or if the
    /// relay acknowledgment is outside the accepted result classes
    /// (success, retriable, malformed-but-relayed).
    pub async fn issue(
        &self,
        signer: &dyn TransactionSigner,
        credential: &VerifiableCredential,
    ) -> SdkResult<AnchoredCredential> {
        let content_hash = credential.content_hash()?;

        let tx = Transaction::Payment(PaymentTx {
            common: TxCommon {
                // fee pinned before autofill so the gateway keeps it
                fee: Some(ANCHOR_FEE_DROPS.to_string()),
                memos: Some(vec![MemoWrapper::tagged(CREDENTIAL_MEMO_TYPE, &content_hash)]),
                ..TxCommon::for_account(signer.address())
            },
            destination: signer.address().to_string(),
            amount: Amount::Drops("1".to_string()),
        });

        let ledger_index = self
            .gateway
            .ledger_index()
            .await
            .map_err(|e| SdkError::Anchor(e.to_string()))?;

        let mut prepared = self
            .gateway
            .autofill(&tx, None)
            .await
            .map_err(|e| SdkError::Anchor(e.to_string()))?;
        // set after autofill so the gateway cannot override it
        prepared.common_mut().last_ledger_sequence = Some(ledger_index + ANCHOR_TTL_LEDGERS);

        let signed = signer
            .sign(&prepared, false)
            .map_err(|e| SdkError::Anchor(e.to_string()))?;

        let ack = self
            .gateway
            .submit(&signed.tx)
            .await
            .map_err(|e| SdkError::Anchor(e.to_string()))?;

        match classify_engine_result(&ack.engine_result) {
            EngineResultClass::Success
            | EngineResultClass::Retriable
            | EngineResultClass::MalformedButRelayed => {}
            EngineResultClass::Failed => {
                return Err(SdkError::Anchor(format!(
                    "transaction submission failed: {}",
                    ack.engine_result
                )));
            }
        }

        info!(
            "credential {} anchored by {} in tx {}",
            credential.id,
            signer.address(),
            signed.hash
        );
        Ok(AnchoredCredential {
            content_hash,
            tx_hash: signed.hash,
        })
    }

    /// Verifies a credential against its anchoring transaction.
    ///
    /// The transaction hash comes from the argument or, failing that,
    /// from `credential.proof.transactionHash`. The issuer address is
    /// extracted from the credential's issuer DID (a plain ledger
    /// address is also accepted).
    ///
    /// # Errors
    /// - `SdkError::Anchor` when no transaction hash is available
    /// - `SdkError::Validation` when the issuer is neither a DID nor an
    ///   address
    pub async fn verify(
        &self,
        credential: &VerifiableCredential,
        tx_hash: Option<&str>,
    ) -> SdkResult<bool> {
        let tx_hash = tx_hash
            .map(str::to_string)
            .or_else(|| credential.proof_transaction_hash())
            .ok_or_else(|| {
                SdkError::Anchor(
                    "transaction hash required for verification \
                     (argument or credential.proof.transactionHash)"
                        .to_string(),
                )
            })?;

        let expected_hash = credential.content_hash()?;
        let issuer_address = issuer_address(&credential.issuer)?;

        self.verify_anchored_hash(&tx_hash, &expected_hash, &issuer_address)
            .await
    }

    /// Checks that a transaction was sent by `expected_issuer` and
    /// carries `expected_hash` in one of its memos.
    ///
    /// A transaction that does not exist, was sent by someone else, or
    /// carries no matching memo is a `false` result, not an error; only
    /// infrastructure failures raise `SdkError::Anchor`.
    pub async fn verify_anchored_hash(
        &self,
        tx_hash: &str,
        expected_hash: &str,
        expected_issuer: &str,
    ) -> SdkResult<bool> {
        let response = match self
            .gateway
            .request(LedgerRequest::Tx {
                transaction: tx_hash.to_string(),
            })
            .await
        {
            Ok(value) => value,
            Err(GatewayError::NotFound) => {
                debug!("anchor tx {} not found", tx_hash);
                return Ok(false);
            }
            Err(e) => return Err(SdkError::Anchor(e.to_string())),
        };

        let tx: TxResponse = serde_json::from_value(response)
            .map_err(|e| SdkError::Anchor(format!("malformed tx response: {}", e)))?;

        if tx.account.as_deref() != Some(expected_issuer) {
            return Ok(false);
        }

        let memos = match tx.memos {
            Some(memos) => memos,
            None => return Ok(false),
        };

        Ok(memos.iter().any(|wrapper| {
            wrapper
                .memo
                .memo_data
                .as_deref()
                .map_or(false, |data| data.eq_ignore_ascii_case(expected_hash))
        }))
    }
}

/// Extracts the ledger address identifying an issuer: the address
/// segment of its DID, or the string itself when it is already a plain
/// address.
fn issuer_address(issuer: &str) -> SdkResult<String> {
    if let Ok(did) = Did::parse(issuer) {
        return Ok(did.address);
    }
    if validation::is_valid_address(issuer) {
        return Ok(issuer.to_string());
    }
    Err(SdkError::Validation(format!(
        "issuer is neither a DID nor a ledger address: {}",
        issuer
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_address_extraction() {
        let addr = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
        assert_eq!(issuer_address(&format!("did:xrpl:1:{}", addr)).unwrap(), addr);
        assert_eq!(issuer_address(addr).unwrap(), addr);
        assert!(issuer_address("did:web:1:whatever").is_err());
        assert!(issuer_address("urn:uuid:1234").is_err());
    }
}
