// src/ledger/tx.rs
//! Ledger transaction wire format.
//!
//! Transactions serialize to the ledger's native JSON shape (PascalCase
//! field names), so a `Transaction` can be handed to any ledger client
//! implementing the gateway contract without translation. Four kinds are
//! modeled: plain/issued-currency payments, DID record updates, signer
//! list configuration, and regular-key rotation.

use serde::{Deserialize, Serialize};

/// Fields shared by every transaction kind.
///
/// Optional fields are omitted from the wire form until the gateway's
/// autofill or a signer populates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TxCommon {
    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "Fee", skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,

    #[serde(rename = "Sequence", skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    #[serde(rename = "LastLedgerSequence", skip_serializing_if = "Option::is_none")]
    pub last_ledger_sequence: Option<u32>,

    #[serde(rename = "SigningPubKey", skip_serializing_if = "Option::is_none")]
    pub signing_pub_key: Option<String>,

    /// Single-signer signature; mutually exclusive with `signers`.
    #[serde(rename = "TxnSignature", skip_serializing_if = "Option::is_none")]
    pub txn_signature: Option<String>,

    /// Multi-signature entries contributed in multisign mode.
    #[serde(rename = "Signers", skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<SignerWrapper>>,

    #[serde(rename = "Memos", skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<MemoWrapper>>,
}

impl TxCommon {
    /// Unprepared common fields for the given account.
    pub fn for_account(account: &str) -> Self {
        TxCommon {
            account: account.to_string(),
            ..TxCommon::default()
        }
    }
}

/// A payment amount: either native drops (decimal string) or an
/// issued-currency amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Drops(String),
    Issued(IssuedAmount),
}

/// Issued-currency amount with its issuing account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub currency: String,
    pub value: String,
    pub issuer: String,
}

/// Memo entry wrapper, matching the ledger's `{"Memo": {...}}` nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoWrapper {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

impl MemoWrapper {
    /// Builds a memo whose type tag is hex-encoded per ledger convention
    /// and whose data field is carried verbatim.
    pub fn tagged(memo_type: &str, memo_data: &str) -> Self {
        MemoWrapper {
            memo: Memo {
                memo_type: Some(crate::utils::serialization::string_to_hex(memo_type)),
                memo_data: Some(memo_data.to_string()),
            },
        }
    }
}

/// Memo contents; both fields are hex on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    #[serde(rename = "MemoType", skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,

    #[serde(rename = "MemoData", skip_serializing_if = "Option::is_none")]
    pub memo_data: Option<String>,
}

/// One contributed multi-signature, in the ledger's
/// `{"Signer": {...}}` nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerWrapper {
    #[serde(rename = "Signer")]
    pub signer: SignerData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerData {
    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "SigningPubKey")]
    pub signing_pub_key: String,

    #[serde(rename = "TxnSignature")]
    pub txn_signature: String,
}

/// One configured signer-list entry, in the ledger's
/// `{"SignerEntry": {...}}` nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerEntryWrapper {
    #[serde(rename = "SignerEntry")]
    pub entry: SignerEntry,
}

impl SignerEntryWrapper {
    pub fn weighted(account: &str, weight: u16) -> Self {
        SignerEntryWrapper {
            entry: SignerEntry {
                account: account.to_string(),
                signer_weight: weight,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerEntry {
    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "SignerWeight")]
    pub signer_weight: u16,
}

/// Payment transaction (native drops or issued currency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTx {
    #[serde(flatten)]
    pub common: TxCommon,

    #[serde(rename = "Destination")]
    pub destination: String,

    #[serde(rename = "Amount")]
    pub amount: Amount,
}

/// DID record update. The `URI` field holds the hex-encoded document
/// locator; an empty string clears the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidSetTx {
    #[serde(flatten)]
    pub common: TxCommon,

    #[serde(rename = "URI")]
    pub uri: String,
}

/// Signer list configuration. `SignerQuorum` of 0 with no entries
/// removes the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerListSetTx {
    #[serde(flatten)]
    pub common: TxCommon,

    #[serde(rename = "SignerQuorum")]
    pub signer_quorum: u32,

    #[serde(rename = "SignerEntries", skip_serializing_if = "Option::is_none")]
    pub signer_entries: Option<Vec<SignerEntryWrapper>>,
}

/// Regular-key rotation. Omitting `RegularKey` leaves the template open
/// for the caller to fill in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRegularKeyTx {
    #[serde(flatten)]
    pub common: TxCommon,

    #[serde(rename = "RegularKey", skip_serializing_if = "Option::is_none")]
    pub regular_key: Option<String>,
}

/// A ledger transaction, tagged on the wire by `TransactionType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "TransactionType")]
pub enum Transaction {
    Payment(PaymentTx),
    #[serde(rename = "DIDSet")]
    DidSet(DidSetTx),
    SignerListSet(SignerListSetTx),
    SetRegularKey(SetRegularKeyTx),
}

impl Transaction {
    /// Shared fields of any transaction kind.
    pub fn common(&self) -> &TxCommon {
        match self {
            Transaction::Payment(tx) => &tx.common,
            Transaction::DidSet(tx) => &tx.common,
            Transaction::SignerListSet(tx) => &tx.common,
            Transaction::SetRegularKey(tx) => &tx.common,
        }
    }

    /// Mutable access to the shared fields.
    pub fn common_mut(&mut self) -> &mut TxCommon {
        match self {
            Transaction::Payment(tx) => &mut tx.common,
            Transaction::DidSet(tx) => &mut tx.common,
            Transaction::SignerListSet(tx) => &mut tx.common,
            Transaction::SetRegularKey(tx) => &mut tx.common,
        }
    }

    /// The sending account.
    pub fn account(&self) -> &str {
        &self.common().account
    }
}

/// Classification of the ledger's immediate transaction-relay outcome,
/// distinct from final consensus validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineResultClass {
    /// `tes*` — applied to the open ledger.
    Success,
    /// `ter*` — not applied yet, retriable as-is.
    Retriable,
    /// `tem*` — malformed but relayed by the submitting server.
    MalformedButRelayed,
    /// Everything else is a hard failure.
    Failed,
}

/// Classifies an engine result code by its prefix.
pub fn classify_engine_result(code: &str) -> EngineResultClass {
    if code.starts_with("tes") {
        EngineResultClass::Success
    } else if code.starts_with("ter") {
        EngineResultClass::Retriable
    } else if code.starts_with("tem") {
        EngineResultClass::MalformedButRelayed
    } else {
        EngineResultClass::Failed
    }
}

/// The validated-transaction result code signalling final success.
pub const TES_SUCCESS: &str = "tesSUCCESS";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_wire_shape() {
        let tx = Transaction::Payment(PaymentTx {
            common: TxCommon {
                memos: Some(vec![MemoWrapper::tagged("anchor", "ABCD")]),
                ..TxCommon::for_account("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")
            },
            destination: "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string(),
            amount: Amount::Drops("1".to_string()),
        });

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["TransactionType"], "Payment");
        assert_eq!(value["Account"], "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
        assert_eq!(value["Amount"], "1");
        assert_eq!(value["Memos"][0]["Memo"]["MemoData"], "ABCD");
        // unprepared fields stay off the wire
        assert!(value.get("Fee").is_none());
        assert!(value.get("Signers").is_none());
    }

    #[test]
    fn test_signer_list_round_trip() {
        let tx = Transaction::SignerListSet(SignerListSetTx {
            common: TxCommon::for_account("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"),
            signer_quorum: 2,
            signer_entries: Some(vec![
                SignerEntryWrapper::weighted("rLHzPsX6oXkzU2qL12kHCH8G8cnZv1rBJh", 1),
                SignerEntryWrapper::weighted("rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe", 1),
            ]),
        });

        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"TransactionType\":\"SignerListSet\""));
        assert!(json.contains("\"SignerQuorum\":2"));

        let parsed: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tx);
    }

    #[test]
    fn test_did_set_tag_rename() {
        let tx = Transaction::DidSet(DidSetTx {
            common: TxCommon::for_account("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"),
            uri: "697066733A2F2F78".to_string(),
        });
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["TransactionType"], "DIDSet");
        assert_eq!(value["URI"], "697066733A2F2F78");
    }

    #[test]
    fn test_issued_amount_is_untagged() {
        let amount = Amount::Issued(IssuedAmount {
            currency: "524C555344000000000000000000000000000000".to_string(),
            value: "100".to_string(),
            issuer: "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string(),
        });
        let value = serde_json::to_value(&amount).unwrap();
        assert_eq!(value["value"], "100");

        let drops = Amount::Drops("12".to_string());
        assert_eq!(serde_json::to_value(&drops).unwrap(), serde_json::json!("12"));
    }

    #[test]
    fn test_engine_result_classes() {
        assert_eq!(classify_engine_result("tesSUCCESS"), EngineResultClass::Success);
        assert_eq!(classify_engine_result("terQUEUED"), EngineResultClass::Retriable);
        assert_eq!(classify_engine_result("temBAD_FEE"), EngineResultClass::MalformedButRelayed);
        assert_eq!(classify_engine_result("tecPATH_DRY"), EngineResultClass::Failed);
        assert_eq!(classify_engine_result("tefPAST_SEQ"), EngineResultClass::Failed);
        assert_eq!(classify_engine_result(""), EngineResultClass::Failed);
    }
}
