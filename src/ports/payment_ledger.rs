//! PaymentLedger port - Records credited payments exactly once.
//!
//! The gateway retries notifications until it sees a 2xx, so the same
//! transaction can be verified as received more than once. The ledger is
//! where duplicates stop: the first record for a
//! `(request_key, transaction_id)` pair wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::foundation::{DomainError, RequestKey};
use crate::domain::payment::CallbackOutcome;

/// A payment the gateway confirmed for a purchase request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub request_key: RequestKey,
    /// Gateway batch number.
    pub transaction_id: String,
    pub provider_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub payer_account: String,
    pub received_at: DateTime<Utc>,
}

impl PaymentReceipt {
    /// Builds a receipt from a received outcome.
    ///
    /// Returns `None` unless the outcome is `Received` with a request key.
    pub fn from_outcome(provider_id: &str, outcome: &CallbackOutcome) -> Option<Self> {
        if !outcome.is_received() {
            return None;
        }
        let request_key = outcome.request_key.clone()?;
        let fields = &outcome.parsed;

        Some(Self {
            request_key,
            transaction_id: outcome.transaction_id.clone(),
            provider_id: provider_id.to_string(),
            amount: fields.payment_amount,
            currency: fields.payment_units.clone(),
            payer_account: fields.payer_account.clone(),
            received_at: Utc::now(),
        })
    }
}

/// Result of attempting to record a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordResult {
    /// First record for this transaction.
    Inserted,
    /// The transaction was already credited.
    AlreadyRecorded,
}

/// Port for the credited-payments ledger.
///
/// Implementations should rely on a unique constraint over
/// `(request_key, transaction_id)` so concurrent deliveries cannot both win.
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Attempt to record a payment.
    async fn record_payment(&self, receipt: PaymentReceipt) -> Result<RecordResult, DomainError>;

    /// Find a recorded payment.
    async fn find_payment(
        &self,
        request_key: &RequestKey,
        transaction_id: &str,
    ) -> Result<Option<PaymentReceipt>, DomainError>;
}
