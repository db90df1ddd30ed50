//! HandlePaymentCallbackHandler - Command handler for gateway status notifications.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::payment::{
    CallbackOutcome, CallbackPipeline, InboundNotification, PaymentGateway, PaymentResult,
};
use crate::ports::{
    CallbackLogEntry, CallbackLogRepository, PaymentLedger, PaymentReceipt, RecordResult,
};

/// Command to handle one inbound notification.
#[derive(Debug, Clone)]
pub struct HandlePaymentCallbackCommand {
    /// Form fields exactly as posted.
    pub fields: Vec<(String, String)>,
    /// Caller address as observed by the transport.
    pub source_address: Option<String>,
}

/// What happened to the purchase as a result of the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditStatus {
    /// First confirmation for this transaction; the purchase was credited.
    Credited,
    /// Repeat delivery of an already credited transaction.
    AlreadyCredited,
    /// The notification was rejected or ignored.
    NotCredited,
}

/// Result of callback handling.
#[derive(Debug, Clone)]
pub struct HandlePaymentCallbackResult {
    pub outcome: CallbackOutcome,
    pub credit: CreditStatus,
    /// The ledger record for this transaction. On a repeat delivery this is
    /// the receipt stored by the first one.
    pub receipt: Option<PaymentReceipt>,
}

/// Handler for gateway status notifications.
///
/// Runs the verification pipeline, appends the audit entry, and credits
/// received payments exactly once per `(request_key, transaction_id)`.
pub struct HandlePaymentCallbackHandler<G: PaymentGateway> {
    pipeline: Arc<CallbackPipeline<G>>,
    payment_ledger: Arc<dyn PaymentLedger>,
    callback_log: Arc<dyn CallbackLogRepository>,
}

impl<G: PaymentGateway> HandlePaymentCallbackHandler<G> {
    pub fn new(
        pipeline: Arc<CallbackPipeline<G>>,
        payment_ledger: Arc<dyn PaymentLedger>,
        callback_log: Arc<dyn CallbackLogRepository>,
    ) -> Self {
        Self {
            pipeline,
            payment_ledger,
            callback_log,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentCallbackCommand,
    ) -> Result<HandlePaymentCallbackResult, DomainError> {
        let provider_id = self.pipeline.gateway().provider_id();

        // 1. Verify
        let notification = InboundNotification::new(cmd.fields, cmd.source_address);
        let outcome = self.pipeline.process(notification).await?;
        log_outcome(provider_id, &outcome);

        // 2. Audit
        self.callback_log
            .append(CallbackLogEntry::from_outcome(provider_id, &outcome))
            .await?;

        // 3. Credit
        let (credit, receipt) = match PaymentReceipt::from_outcome(provider_id, &outcome) {
            Some(receipt) => match self.payment_ledger.record_payment(receipt.clone()).await? {
                RecordResult::Inserted => (CreditStatus::Credited, Some(receipt)),
                RecordResult::AlreadyRecorded => {
                    let original = self
                        .payment_ledger
                        .find_payment(&receipt.request_key, &receipt.transaction_id)
                        .await?;
                    tracing::info!(
                        request_key = %receipt.request_key,
                        transaction_id = %receipt.transaction_id,
                        first_received_at = ?original.as_ref().map(|r| r.received_at),
                        "Duplicate payment notification, already credited"
                    );
                    (CreditStatus::AlreadyCredited, original)
                }
            },
            None => (CreditStatus::NotCredited, None),
        };

        Ok(HandlePaymentCallbackResult {
            outcome,
            credit,
            receipt,
        })
    }
}

fn log_outcome(provider_id: &str, outcome: &CallbackOutcome) {
    let request_key = outcome.request_key.as_ref().map(|k| k.as_str()).unwrap_or("");
    let reason = outcome.rejection.as_ref().map(|r| r.code()).unwrap_or("");
    let source = outcome.source_address.as_deref().unwrap_or("");

    match outcome.payment_result {
        PaymentResult::Rejected => tracing::warn!(
            provider = provider_id,
            request_key,
            transaction_id = %outcome.transaction_id,
            result = outcome.payment_result.as_str(),
            reason,
            source,
            "{}",
            outcome.log_message
        ),
        _ => tracing::info!(
            provider = provider_id,
            request_key,
            transaction_id = %outcome.transaction_id,
            result = outcome.payment_result.as_str(),
            source,
            "{}",
            outcome.log_message
        ),
    }
}
