// src/lib.rs

//! # DID Anchoring & Recovery SDK
//!
//! Decentralized-identity and verifiable-credential operations on an
//! XRPL-style ledger, built atop an abstract ledger client.
//!
//! ## Architecture Overview
//! 1. **Ledger Layer**: the [`ledger::gateway::LedgerGateway`] and
//!    [`ledger::signer::TransactionSigner`] traits — implemented by the
//!    caller over a concrete ledger client library
//! 2. **Services Layer**: identity registrar, credential anchor,
//!    recovery coordinator, and payment helper
//! 3. **Models Layer**: DIDs and verifiable credentials with their
//!    canonical serialized forms
//!
//! ## Concurrency
//! All services share one gateway handle and hold no mutable state of
//! their own, so operations on distinct accounts may run concurrently.
//! Submissions from the *same* signing account consume account-level
//! sequence numbers; callers must serialize those themselves (a queue
//! or single-writer discipline). Operations are not cancellable
//! mid-flight — an abandoned await leaves the submitted transaction to
//! resolve on the ledger, and every verification read is idempotent.
//!
//! ## Example
//! ```no_run
//! # async fn demo(gateway: std::sync::Arc<dyn did_anchor::LedgerGateway>,
//! #               issuer: &dyn did_anchor::TransactionSigner) {
//! use did_anchor::{DidSdk, SdkConfig, VerifiableCredential};
//!
//! let sdk = DidSdk::new(gateway, SdkConfig::from_env());
//! sdk.connect().await.unwrap();
//!
//! let credential = VerifiableCredential::new(
//!     "urn:uuid:1fd3e3f8-8e9c-4a6f-b2ff-9bb1b2b8f6f1",
//!     "did:xrpl:1:rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
//!     serde_json::json!({"id": "did:xrpl:1:rLHzPsX6oXkzU2qL12kHCH8G8cnZv1rBJh"}),
//! );
//! let anchored = sdk.credentials.issue(issuer, &credential).await.unwrap();
//! assert!(sdk.credentials.verify(&credential, Some(&anchored.tx_hash)).await.unwrap());
//! # }
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use tokio::sync::mpsc;

pub use crate::config::{Network, SdkConfig};
pub use crate::error::{SdkError, SdkResult};
pub use crate::ledger::gateway::{
    GatewayError, LedgerGateway, LedgerRequest, SubmitAck, TransactionEvent,
};
pub use crate::ledger::signer::{SignedTransaction, TransactionSigner};
pub use crate::ledger::tx::{Amount, Transaction};
pub use crate::models::credential::VerifiableCredential;
pub use crate::models::did::{Did, DidVerification};
pub use crate::services::anchor::{AnchoredCredential, CredentialAnchor};
pub use crate::services::payments::{PaymentHelper, PaymentStatus};
pub use crate::services::recovery::{
    AccountInfo, RecoveryCoordinator, RecoverySignature, TransactionStatus,
};
pub use crate::services::registrar::{IdentityRegistrar, RegisteredDid};

/// Facade wiring all services around one shared gateway handle.
///
/// The gateway is injected rather than constructed here; the services
/// never share state beyond this handle.
pub struct DidSdk {
    gateway: Arc<dyn LedgerGateway>,
    pub registrar: IdentityRegistrar,
    pub credentials: CredentialAnchor,
    pub recovery: RecoveryCoordinator,
    pub payments: PaymentHelper,
}

impl DidSdk {
    /// Wires the services around the supplied gateway.
    pub fn new(gateway: Arc<dyn LedgerGateway>, config: SdkConfig) -> Self {
        DidSdk {
            registrar: IdentityRegistrar::new(gateway.clone(), &config),
            credentials: CredentialAnchor::new(gateway.clone()),
            recovery: RecoveryCoordinator::new(gateway.clone()),
            payments: PaymentHelper::new(gateway.clone()),
            gateway,
        }
    }

    /// Opens the underlying ledger connection.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        self.gateway.connect().await
    }

    /// Closes the underlying ledger connection.
    pub async fn disconnect(&self) -> Result<(), GatewayError> {
        self.gateway.disconnect().await
    }

    /// Subscribes to an account's transaction stream. Events are
    /// consumed from the returned channel by the caller's own loop.
    pub async fn transaction_stream(
        &self,
        address: &str,
    ) -> Result<mpsc::UnboundedReceiver<TransactionEvent>, GatewayError> {
        self.gateway.subscribe(address).await
    }
}
