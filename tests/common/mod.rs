// tests/common/mod.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use tokio::sync::mpsc;

use did_anchor::ledger::gateway::{
    FinalizedOutcome, GatewayError, LedgerGateway, LedgerRequest, SubmitAck, TransactionEvent,
};
use did_anchor::ledger::signer::{SignedTransaction, TransactionSigner};
use did_anchor::ledger::tx::{SignerData, SignerWrapper, Transaction};
use did_anchor::utils::crypto::sha256_hex_upper;

/// Base58 alphabet used by ledger addresses (no 0, O, I, l).
const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Generates a unique well-formed test address.
pub fn unique_address() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..32)
        .map(|_| BASE58[rng.gen_range(0..BASE58.len())] as char)
        .collect();
    format!("r{}", suffix)
}

/// Deterministic local signer for tests. Signatures are fabricated; the
/// reported hash is the digest of the signed form, which is all the
/// services rely on.
pub struct FakeSigner {
    address: String,
}

impl FakeSigner {
    pub fn new(address: &str) -> Self {
        FakeSigner {
            address: address.to_string(),
        }
    }

    pub fn random() -> Self {
        FakeSigner::new(&unique_address())
    }
}

impl TransactionSigner for FakeSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign(&self, tx: &Transaction, multisign: bool) -> Result<SignedTransaction, GatewayError> {
        let mut signed = tx.clone();
        if multisign {
            let entry = SignerWrapper {
                signer: SignerData {
                    account: self.address.clone(),
                    signing_pub_key: format!("ED{}", self.address),
                    txn_signature: format!("SIG{}", self.address),
                },
            };
            signed
                .common_mut()
                .signers
                .get_or_insert_with(Vec::new)
                .push(entry);
        } else {
            let common = signed.common_mut();
            common.signing_pub_key = Some(format!("ED{}", self.address));
            common.txn_signature = Some(format!("SIG{}", self.address));
        }

        let serialized = serde_json::to_vec(&signed)
            .map_err(|e| GatewayError::Signing(e.to_string()))?;
        Ok(SignedTransaction {
            hash: sha256_hex_upper(&serialized),
            tx: signed,
        })
    }
}

#[derive(Default)]
struct MockState {
    engine_result: String,
    finality_result: String,
    tx_responses: HashMap<String, Value>,
    account_objects: HashMap<String, Value>,
    account_info: HashMap<String, Value>,
    ledger_index: u32,
    events: Vec<TransactionEvent>,

    submitted: Vec<Transaction>,
    waited: Vec<Transaction>,
    requests: Vec<Value>,
    autofill_calls: usize,
    ledger_index_calls: usize,
}

/// Scripted in-process gateway. Responses are staged up front; every
/// call is recorded so tests can assert on exactly what hit the
/// "network".
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(MockGateway {
            state: Mutex::new(MockState {
                engine_result: "tesSUCCESS".to_string(),
                finality_result: "tesSUCCESS".to_string(),
                ledger_index: 7_654_321,
                ..MockState::default()
            }),
        })
    }

    pub fn set_engine_result(&self, code: &str) {
        self.state.lock().unwrap().engine_result = code.to_string();
    }

    pub fn set_finality_result(&self, code: &str) {
        self.state.lock().unwrap().finality_result = code.to_string();
    }

    /// Stages the result payload of a `tx` query for the given hash.
    pub fn put_tx(&self, tx_hash: &str, payload: Value) {
        self.state
            .lock()
            .unwrap()
            .tx_responses
            .insert(tx_hash.to_string(), payload);
    }

    /// Stages the result payload of an `account_objects` query.
    pub fn put_account_objects(&self, account: &str, payload: Value) {
        self.state
            .lock()
            .unwrap()
            .account_objects
            .insert(account.to_string(), payload);
    }

    /// Stages the result payload of an `account_info` query.
    pub fn put_account_info(&self, account: &str, payload: Value) {
        self.state
            .lock()
            .unwrap()
            .account_info
            .insert(account.to_string(), payload);
    }

    /// Stages events delivered on the next subscription.
    pub fn push_event(&self, event: TransactionEvent) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn ledger_index_value(&self) -> u32 {
        self.state.lock().unwrap().ledger_index
    }

    /// Transactions relayed through `submit`.
    pub fn submitted(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Transactions that went through `submit_and_wait`.
    pub fn waited(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().waited.clone()
    }

    /// Read queries issued so far, in wire form.
    pub fn requests(&self) -> Vec<Value> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Every gateway interaction of any kind; for asserting an
    /// operation failed before touching the network.
    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.submitted.len()
            + state.waited.len()
            + state.requests.len()
            + state.autofill_calls
            + state.ledger_index_calls
    }
}

#[async_trait]
impl LedgerGateway for MockGateway {
    async fn connect(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn submit(&self, tx: &Transaction) -> Result<SubmitAck, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.submitted.push(tx.clone());
        let n = state.submitted.len();
        Ok(SubmitAck {
            engine_result: state.engine_result.clone(),
            engine_result_message: String::new(),
            tx_hash: Some(format!("MOCKSUBMIT{:04}", n)),
        })
    }

    async fn submit_and_wait(
        &self,
        tx: &Transaction,
        _signer: &dyn TransactionSigner,
    ) -> Result<FinalizedOutcome, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.waited.push(tx.clone());
        let n = state.waited.len();
        let result = state.finality_result.clone();
        Ok(FinalizedOutcome {
            hash: format!("MOCKFINAL{:04}", n),
            validated: result == "tesSUCCESS",
            transaction_result: result,
            ledger_index: Some(state.ledger_index),
        })
    }

    async fn autofill(
        &self,
        tx: &Transaction,
        _signers_count: Option<u32>,
    ) -> Result<Transaction, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.autofill_calls += 1;
        let mut prepared = tx.clone();
        {
            let common = prepared.common_mut();
            if common.fee.is_none() {
                common.fee = Some("12".to_string());
            }
            if common.sequence.is_none() {
                common.sequence = Some(42);
            }
        }
        Ok(prepared)
    }

    async fn request(&self, request: LedgerRequest) -> Result<Value, GatewayError> {
        let wire = serde_json::to_value(&request).expect("request serializes");
        let mut state = self.state.lock().unwrap();
        state.requests.push(wire);

        match request {
            LedgerRequest::Tx { transaction } => state
                .tx_responses
                .get(&transaction)
                .cloned()
                .ok_or(GatewayError::NotFound),
            LedgerRequest::AccountObjects { account, .. } => state
                .account_objects
                .get(&account)
                .cloned()
                .ok_or(GatewayError::NotFound),
            LedgerRequest::AccountInfo { account, .. } => state
                .account_info
                .get(&account)
                .cloned()
                .ok_or(GatewayError::NotFound),
        }
    }

    async fn subscribe(
        &self,
        _address: &str,
    ) -> Result<mpsc::UnboundedReceiver<TransactionEvent>, GatewayError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        for event in self.state.lock().unwrap().events.drain(..) {
            let _ = sender.send(event);
        }
        Ok(receiver)
    }

    async fn ledger_index(&self) -> Result<u32, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.ledger_index_calls += 1;
        Ok(state.ledger_index)
    }
}
