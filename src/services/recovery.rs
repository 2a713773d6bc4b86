// src/services/recovery.rs
//! Recovery Coordinator Service
//!
//! Establishes and exercises weighted multi-signer quorums (guardians)
//! for account recovery. Per account the configuration moves through
//! `NoRecovery -> Configured -> RecoveryInFlight -> Configured`; the
//! in-flight session is nothing but a partially-signed rotation
//! transaction accumulating guardian endorsements in memory — it is
//! never persisted, so a failed recovery leaves no state behind.
//!
//! Combining signatures merges the signature sets of every partial
//! blob into one multi-signed transaction. Resubmitting the last blob
//! alone would silently drop the earlier guardians' endorsements and
//! can never reach quorum; the union is the contract here.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::{SdkError, SdkResult};
use crate::ledger::gateway::{
    AccountInfoResponse, GatewayError, LedgerGateway, LedgerRequest, TransactionEvent, TxResponse,
};
use crate::ledger::signer::{SignedTransaction, TransactionSigner};
use crate::ledger::tx::{
    classify_engine_result, EngineResultClass, SetRegularKeyTx, SignerEntryWrapper,
    SignerListSetTx, Transaction, TxCommon, TES_SUCCESS,
};
use crate::utils::validation;

/// One guardian's endorsement of a pending recovery transaction.
#[derive(Debug, Clone)]
pub struct RecoverySignature {
    /// The transaction carrying this guardian's multi-signature entry.
    pub signed: SignedTransaction,

    /// Identifier of this contribution (the partial blob's hash).
    pub signature_id: String,
}

/// Point-in-time status of a monitored transaction.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionStatus {
    pub validated: bool,
    /// Validated result code, or "pending" while unvalidated or not yet
    /// found.
    pub status: String,
    pub ledger_index: Option<u32>,
}

/// Read-only projection of an account's recovery-relevant state.
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub account: String,
    pub balance: String,
    pub regular_key: Option<String>,
    pub signer_list: Option<SignerListInfo>,
}

/// A configured signer list.
#[derive(Debug, Clone, Serialize)]
pub struct SignerListInfo {
    pub quorum: u32,
    pub entries: Vec<SignerListEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignerListEntry {
    pub address: String,
    pub weight: u16,
}

/// Default quorum when the caller leaves it unspecified: a majority of
/// the guardian set, `ceil(|guardians| / 2)`.
pub fn default_quorum(guardian_count: usize) -> u32 {
    ((guardian_count + 1) / 2) as u32
}

/// Service coordinating guardian quorums and recovery sessions through
/// the shared ledger gateway.
pub struct RecoveryCoordinator {
    gateway: Arc<dyn LedgerGateway>,
}

impl RecoveryCoordinator {
    /// Creates a new coordinator over the shared gateway handle.
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        RecoveryCoordinator { gateway }
    }

    /// Configures an equal-weight guardian quorum on the signer's
    /// account.
    ///
    /// # Arguments
    /// * `signer` - Key of the account enabling recovery
    /// * `guardians` - Unique guardian addresses, each given weight 1
    /// * `quorum` - Required combined weight; defaults to a majority of
    ///   the guardian set
    ///
    /// # Errors
    /// - `SdkError::Validation` before any network call when the
    ///   guardian set is empty or duplicated, an address is malformed,
    ///   or the quorum is out of range
    /// - `SdkError::Recovery` when the ledger rejects the configuration
    pub async fn enable_recovery(
        &self,
        signer: &dyn TransactionSigner,
        guardians: &[String],
        quorum: Option<u32>,
    ) -> SdkResult<String> {
        let quorum = quorum.unwrap_or_else(|| default_quorum(guardians.len()));
        validation::validate_recovery_config(guardians, quorum)?;

        let tx = Transaction::SignerListSet(SignerListSetTx {
            common: TxCommon::for_account(signer.address()),
            signer_quorum: quorum,
            signer_entries: Some(
                guardians
                    .iter()
                    .map(|guardian| SignerEntryWrapper::weighted(guardian, 1))
                    .collect(),
            ),
        });

        let outcome = self
            .gateway
            .submit_and_wait(&tx, signer)
            .await
            .map_err(|e| SdkError::Recovery(e.to_string()))?;

        if outcome.transaction_result != TES_SUCCESS {
            return Err(SdkError::Recovery(format!(
                "signer list configuration failed: {}",
                outcome.transaction_result
            )));
        }

        info!(
            "recovery enabled for {} with {} guardians, quorum {}",
            signer.address(),
            guardians.len(),
            quorum
        );
        Ok(outcome.hash)
    }

    /// Removes the signer list: a quorum of 0 is the ledger's delete
    /// semantics.
    pub async fn disable_recovery(&self, signer: &dyn TransactionSigner) -> SdkResult<String> {
        let tx = Transaction::SignerListSet(SignerListSetTx {
            common: TxCommon::for_account(signer.address()),
            signer_quorum: 0,
            signer_entries: None,
        });

        let outcome = self
            .gateway
            .submit_and_wait(&tx, signer)
            .await
            .map_err(|e| SdkError::Recovery(e.to_string()))?;

        if outcome.transaction_result != TES_SUCCESS {
            return Err(SdkError::Recovery(format!(
                "signer list removal failed: {}",
                outcome.transaction_result
            )));
        }

        info!("recovery disabled for {}", signer.address());
        Ok(outcome.hash)
    }

    /// Builds the unsigned "rotate control key" transaction for a
    /// recovery session, fee/sequence prepared so guardians can sign it
    /// as-is.
    ///
    /// # Arguments
    /// * `recovered_account` - The account being recovered
    /// * `new_regular_key` - The replacement key; omit to produce a
    ///   template the caller completes
    pub async fn initiate_recovery(
        &self,
        recovered_account: &str,
        new_regular_key: Option<&str>,
    ) -> SdkResult<Transaction> {
        validation::validate_address(recovered_account)?;
        if let Some(key) = new_regular_key {
            validation::validate_address(key)?;
        }

        let tx = Transaction::SetRegularKey(SetRegularKeyTx {
            common: TxCommon::for_account(recovered_account),
            regular_key: new_regular_key.map(str::to_string),
        });

        let prepared = self
            .gateway
            .autofill(&tx, None)
            .await
            .map_err(|e| SdkError::Recovery(e.to_string()))?;

        debug!("recovery template prepared for {}", recovered_account);
        Ok(prepared)
    }

    /// Produces one guardian's endorsement of a pending recovery
    /// transaction, in multi-signature mode (a `Signers` entry, not a
    /// final signature).
    pub fn sign_for_recovery(
        &self,
        pending_tx: &Transaction,
        guardian: &dyn TransactionSigner,
    ) -> SdkResult<RecoverySignature> {
        let signed = guardian
            .sign(pending_tx, true)
            .map_err(|e| SdkError::Recovery(e.to_string()))?;

        debug!("guardian {} signed recovery tx", guardian.address());
        Ok(RecoverySignature {
            signature_id: signed.hash.clone(),
            signed,
        })
    }

    /// Merges all partial blobs into one multi-signed transaction and
    /// submits it once.
    ///
    /// The submitted transaction's signature list is the union of every
    /// input blob's entries, deduplicated by signer account and sorted
    /// into canonical order.
    ///
    /// # Errors
    /// - `SdkError::Validation` when no blobs or no signatures are
    ///   supplied
    /// - `SdkError::Recovery` when the engine result is neither success
    ///   nor retriable
    pub async fn combine_signatures(&self, signed: &[SignedTransaction]) -> SdkResult<String> {
        let merged = merge_signed_transactions(signed)?;

        let signer_count = merged
            .common()
            .signers
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0);

        let ack = self
            .gateway
            .submit(&merged)
            .await
            .map_err(|e| SdkError::Recovery(e.to_string()))?;

        match classify_engine_result(&ack.engine_result) {
            EngineResultClass::Success | EngineResultClass::Retriable => {}
            _ => {
                return Err(SdkError::Recovery(format!(
                    "recovery submission failed: {}",
                    ack.engine_result
                )));
            }
        }

        info!(
            "recovery submitted with {} combined signatures: {}",
            signer_count, ack.engine_result
        );
        ack.tx_hash.ok_or_else(|| {
            SdkError::Recovery("gateway acknowledged without a transaction hash".to_string())
        })
    }

    /// Looks up the current status of a transaction. A hash the ledger
    /// does not know yet maps to a pending status, not an error; the
    /// caller drives the polling loop.
    pub async fn monitor_transaction(&self, tx_hash: &str) -> SdkResult<TransactionStatus> {
        let response = match self
            .gateway
            .request(LedgerRequest::Tx {
                transaction: tx_hash.to_string(),
            })
            .await
        {
            Ok(value) => value,
            Err(GatewayError::NotFound) => {
                return Ok(TransactionStatus {
                    validated: false,
                    status: "pending".to_string(),
                    ledger_index: None,
                });
            }
            Err(e) => return Err(SdkError::Recovery(e.to_string())),
        };

        let tx: TxResponse = serde_json::from_value(response)
            .map_err(|e| SdkError::Recovery(format!("malformed tx response: {}", e)))?;

        let status = match tx.meta {
            Some(meta) if tx.validated => meta.transaction_result,
            _ => "pending".to_string(),
        };
        Ok(TransactionStatus {
            validated: tx.validated,
            status,
            ledger_index: tx.ledger_index,
        })
    }

    /// Read-only projection of an account's balance, regular key, and
    /// signer list, used to confirm quorum configuration before a
    /// recovery session.
    pub async fn get_account_info(&self, address: &str) -> SdkResult<AccountInfo> {
        validation::validate_address(address)?;

        let response = self
            .gateway
            .request(LedgerRequest::AccountInfo {
                account: address.to_string(),
                signer_lists: true,
            })
            .await
            .map_err(|e| match e {
                GatewayError::NotFound => {
                    SdkError::Recovery(format!("account not found: {}", address))
                }
                other => SdkError::Recovery(other.to_string()),
            })?;

        let info: AccountInfoResponse = serde_json::from_value(response)
            .map_err(|e| SdkError::Recovery(format!("malformed account_info response: {}", e)))?;

        let signer_list = info.account_data.signer_lists.into_iter().next().map(|list| {
            SignerListInfo {
                quorum: list.quorum,
                entries: list
                    .entries
                    .into_iter()
                    .map(|wrapper| SignerListEntry {
                        address: wrapper.entry.account,
                        weight: wrapper.entry.signer_weight,
                    })
                    .collect(),
            }
        });

        Ok(AccountInfo {
            account: info.account_data.account,
            balance: info.account_data.balance,
            regular_key: info.account_data.regular_key,
            signer_list,
        })
    }

    /// Registers for the account's transaction stream, for callers that
    /// track finality by consuming events instead of polling.
    pub async fn watch_account(
        &self,
        address: &str,
    ) -> SdkResult<mpsc::UnboundedReceiver<TransactionEvent>> {
        validation::validate_address(address)?;
        self.gateway
            .subscribe(address)
            .await
            .map_err(|e| SdkError::Recovery(e.to_string()))
    }
}

/// Builds the combined multi-signed transaction from partial blobs.
///
/// The first blob's transaction is the base; its signature list is
/// replaced by the union of all blobs' entries, deduplicated by signer
/// account (first contribution wins) and sorted by account for a
/// canonical signing order.
fn merge_signed_transactions(signed: &[SignedTransaction]) -> SdkResult<Transaction> {
    let first = signed.first().ok_or_else(|| {
        SdkError::Validation("at least one signed blob is required".to_string())
    })?;

    let mut by_account = BTreeMap::new();
    for blob in signed {
        let entries = blob.tx.common().signers.iter().flatten();
        for wrapper in entries {
            if by_account.contains_key(&wrapper.signer.account) {
                warn!(
                    "duplicate signature from {}, keeping the first",
                    wrapper.signer.account
                );
                continue;
            }
            by_account.insert(wrapper.signer.account.clone(), wrapper.clone());
        }
    }

    if by_account.is_empty() {
        return Err(SdkError::Validation(
            "supplied blobs carry no signatures".to_string(),
        ));
    }

    let mut merged = first.tx.clone();
    {
        let common = merged.common_mut();
        common.signers = Some(by_account.into_values().collect());
        // a multi-signed transaction carries no single signature
        common.txn_signature = None;
    }
    Ok(merged)
}
