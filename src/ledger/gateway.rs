// src/ledger/gateway.rs
//! Ledger gateway contract.
//!
//! The ledger client proper (connection management, transport, fee and
//! sequence autofill) lives outside this crate; the services only depend
//! on this trait. Implementations wrap a concrete client library; the
//! test suite wraps a scripted mock.
//!
//! A single gateway handle is shared by every service. Submissions from
//! the same signing account consume account-level sequence numbers, so
//! concurrent submissions for one account require external serialization
//! by the caller; the gateway does not sequence them internally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::ledger::signer::{SignedTransaction, TransactionSigner};
use crate::ledger::tx::{MemoWrapper, SignerEntryWrapper, Transaction};

/// Failures surfaced by a gateway implementation.
///
/// `NotFound` is distinguished from transport faults so lookup callers
/// can map "not present" to a typed negative result instead of an error.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested entity does not exist on the ledger (yet).
    #[error("not found on ledger")]
    NotFound,

    /// Connection or transport failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Local signing failure.
    #[error("signing failure: {0}")]
    Signing(String),

    /// The ledger answered with something this crate cannot interpret.
    #[error("unexpected ledger response: {0}")]
    Protocol(String),
}

/// Immediate submission acknowledgment, carrying the engine result code
/// (relay outcome, not final validation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    pub engine_result: String,
    pub engine_result_message: String,
    /// Hash of the submitted transaction as reported by the server.
    pub tx_hash: Option<String>,
}

/// Outcome of a submission that waited for consensus validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizedOutcome {
    pub hash: String,
    /// Validated result code, e.g. `tesSUCCESS`.
    pub transaction_result: String,
    pub validated: bool,
    pub ledger_index: Option<u32>,
}

/// One record from an account transaction stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub tx_hash: String,
    pub transaction_result: String,
    pub validated: bool,
    pub ledger_index: Option<u32>,
}

/// Read queries issued through the gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum LedgerRequest {
    /// Fetch a transaction by hash.
    Tx { transaction: String },

    /// List an account's ledger objects of one type (e.g. "did").
    AccountObjects {
        account: String,
        #[serde(rename = "type")]
        object_type: String,
    },

    /// Account state, optionally including its signer lists.
    AccountInfo {
        account: String,
        signer_lists: bool,
    },
}

/// Contract consumed by every service in this crate.
///
/// `request` resolves with the response's result payload; a missing
/// entity is `Err(GatewayError::NotFound)`, never an empty payload.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn connect(&self) -> Result<(), GatewayError>;

    async fn disconnect(&self) -> Result<(), GatewayError>;

    /// Relays an already-signed transaction without waiting for
    /// consensus validation.
    async fn submit(&self, tx: &Transaction) -> Result<SubmitAck, GatewayError>;

    /// Autofills, signs with `signer`, submits, and waits for the
    /// transaction to be validated or dropped.
    async fn submit_and_wait(
        &self,
        tx: &Transaction,
        signer: &dyn TransactionSigner,
    ) -> Result<FinalizedOutcome, GatewayError>;

    /// Fills fee and sequence fields. `signers_count` lets multi-signed
    /// transactions get a correctly scaled fee.
    async fn autofill(
        &self,
        tx: &Transaction,
        signers_count: Option<u32>,
    ) -> Result<Transaction, GatewayError>;

    async fn request(&self, request: LedgerRequest) -> Result<Value, GatewayError>;

    /// Registers for an account's transaction stream. Events arrive on
    /// the returned channel in the order the collaborator delivers them;
    /// the registration survives until the receiver is dropped.
    async fn subscribe(
        &self,
        address: &str,
    ) -> Result<mpsc::UnboundedReceiver<TransactionEvent>, GatewayError>;

    /// Index of the most recently validated ledger.
    async fn ledger_index(&self) -> Result<u32, GatewayError>;
}

/// Transaction fields projected out of a `tx` query result.
#[derive(Debug, Clone, Deserialize)]
pub struct TxResponse {
    #[serde(rename = "Account")]
    pub account: Option<String>,

    #[serde(rename = "Memos")]
    pub memos: Option<Vec<MemoWrapper>>,

    #[serde(default)]
    pub validated: bool,

    pub ledger_index: Option<u32>,

    pub meta: Option<TxMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxMeta {
    #[serde(rename = "TransactionResult")]
    pub transaction_result: String,
}

/// Result payload of an `account_objects` query.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountObjectsResponse {
    pub account_objects: Vec<Value>,
}

/// Result payload of an `account_info` query.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    pub account_data: AccountData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "Balance")]
    pub balance: String,

    #[serde(rename = "RegularKey")]
    pub regular_key: Option<String>,

    #[serde(rename = "signer_lists", default)]
    pub signer_lists: Vec<LedgerSignerList>,
}

/// One configured signer list as returned by `account_info`.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSignerList {
    #[serde(rename = "SignerQuorum")]
    pub quorum: u32,

    #[serde(rename = "SignerEntries")]
    pub entries: Vec<SignerEntryWrapper>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let req = LedgerRequest::AccountObjects {
            account: "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string(),
            object_type: "did".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["command"], "account_objects");
        assert_eq!(value["type"], "did");

        let req = LedgerRequest::Tx { transaction: "ABC".to_string() };
        assert_eq!(serde_json::to_value(&req).unwrap()["command"], "tx");
    }

    #[test]
    fn test_account_info_projection() {
        let payload = serde_json::json!({
            "account_data": {
                "Account": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                "Balance": "99999988",
                "RegularKey": "rLHzPsX6oXkzU2qL12kHCH8G8cnZv1rBJh",
                "signer_lists": [{
                    "SignerQuorum": 2,
                    "SignerEntries": [
                        {"SignerEntry": {"Account": "rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe", "SignerWeight": 1}}
                    ]
                }]
            }
        });
        let parsed: AccountInfoResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed.account_data.balance, "99999988");
        assert_eq!(parsed.account_data.signer_lists[0].quorum, 2);
        assert_eq!(
            parsed.account_data.signer_lists[0].entries[0].entry.signer_weight,
            1
        );
    }

    #[test]
    fn test_tx_projection_tolerates_missing_fields() {
        let parsed: TxResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.account.is_none());
        assert!(parsed.memos.is_none());
        assert!(!parsed.validated);
    }
}
