// src/ledger/signer.rs
//! Transaction signing contract.
//!
//! Key custody and the signing primitives are collaborator concerns;
//! the services only need an address and a way to obtain signatures.
//! Multi-signature contributions are distinct from final single
//! signatures: a multisign contribution appends to the transaction's
//! `Signers` array and leaves `TxnSignature` empty.

use serde::{Deserialize, Serialize};

use crate::ledger::gateway::GatewayError;
use crate::ledger::tx::Transaction;

/// A signed transaction together with its server-computable hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The transaction carrying its signature fields
    /// (`TxnSignature` or `Signers`).
    pub tx: Transaction,

    /// Identifying hash of the signed form.
    pub hash: String,
}

/// Signing capability over a single account key.
pub trait TransactionSigner: Send + Sync {
    /// The ledger address this key controls.
    fn address(&self) -> &str;

    /// Signs a prepared transaction.
    ///
    /// # Arguments
    /// * `tx` - The transaction to sign; fee and sequence should already
    ///   be filled
    /// * `multisign` - `true` to produce a multi-signature contribution
    ///   (one entry in `Signers`), `false` for a final single signature
    fn sign(&self, tx: &Transaction, multisign: bool) -> Result<SignedTransaction, GatewayError>;
}
