// src/services/payments.rs
//! Payment Helper Service
//!
//! Issued-currency transfers. Peripheral to the identity protocol, but
//! it shares the submission and verification patterns of the credential
//! anchor, so it lives behind the same gateway handle.

use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::error::{SdkError, SdkResult};
use crate::ledger::gateway::{LedgerGateway, LedgerRequest, TxResponse};
use crate::ledger::signer::TransactionSigner;
use crate::ledger::tx::{Amount, IssuedAmount, PaymentTx, Transaction, TxCommon, TES_SUCCESS};
use crate::utils::validation;

/// Currency code used when callers do not specify one.
pub const DEFAULT_CURRENCY: &str = "RLUSD";

/// Status of a looked-up payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatus {
    pub validated: bool,
    pub transaction_result: Option<String>,
}

/// Service for issued-currency transfers through the shared ledger
/// gateway.
pub struct PaymentHelper {
    gateway: Arc<dyn LedgerGateway>,
}

impl PaymentHelper {
    /// Creates a new payment helper over the shared gateway handle.
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        PaymentHelper { gateway }
    }

    /// Sends an issued-currency payment and waits for validation.
    ///
    /// Currency codes longer than 3 characters are hex-encoded and
    /// padded to the ledger's 40-character field width.
    ///
    /// # Arguments
    /// * `signer` - The sender's key
    /// * `amount` - Decimal amount as a string
    /// * `destination` - Receiving address
    /// * `issuer` - Issuing address of the currency
    /// * `currency` - Currency code, e.g. [`DEFAULT_CURRENCY`]
    ///
    /// # Errors
    /// - `SdkError::Validation` for malformed inputs, before any
    ///   network call
    /// - `SdkError::Payment` when submission fails or the validated
    ///   result is not a success
    pub async fn send_issued(
        &self,
        signer: &dyn TransactionSigner,
        amount: &str,
        destination: &str,
        issuer: &str,
        currency: &str,
    ) -> SdkResult<String> {
        let currency_code = validation::format_currency(currency);
        validation::validate_address(destination)?;
        validation::validate_address(issuer)?;
        validation::validate_amount(amount)?;

        let tx = Transaction::Payment(PaymentTx {
            common: TxCommon::for_account(signer.address()),
            destination: destination.to_string(),
            amount: Amount::Issued(IssuedAmount {
                currency: currency_code,
                value: amount.to_string(),
                issuer: issuer.to_string(),
            }),
        });

        let outcome = self
            .gateway
            .submit_and_wait(&tx, signer)
            .await
            .map_err(|e| SdkError::Payment(e.to_string()))?;

        if outcome.transaction_result != TES_SUCCESS {
            return Err(SdkError::Payment(format!(
                "ledger reported {}",
                outcome.transaction_result
            )));
        }

        info!(
            "sent {} {} from {} to {}",
            amount,
            currency,
            signer.address(),
            destination
        );
        Ok(outcome.hash)
    }

    /// Looks up a payment transaction's validation status.
    ///
    /// # Errors
    /// `SdkError::Payment` for any lookup failure, including an unknown
    /// hash.
    pub async fn verify_payment(&self, tx_hash: &str) -> SdkResult<PaymentStatus> {
        let response = self
            .gateway
            .request(LedgerRequest::Tx {
                transaction: tx_hash.to_string(),
            })
            .await
            .map_err(|e| SdkError::Payment(format!("payment verification failed: {}", e)))?;

        let tx: TxResponse = serde_json::from_value(response)
            .map_err(|e| SdkError::Payment(format!("malformed tx response: {}", e)))?;

        Ok(PaymentStatus {
            validated: tx.validated,
            transaction_result: tx.meta.map(|meta| meta.transaction_result),
        })
    }
}
