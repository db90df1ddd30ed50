//! Per-request accumulator threaded through the callback pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::RequestKey;

use super::notification::{InboundNotification, ParsedNotification};
use super::purchase_request::PurchaseRequest;
use super::rejection::CallbackRejection;

/// Final classification of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentResult {
    /// Not yet decided; only seen while stages are running.
    Pending,
    /// Payment confirmed. The caller credits the purchase.
    Received,
    /// Failed validation. Never credit.
    Rejected,
    /// Benign non-event, e.g. a notification with no transaction.
    Ignored,
}

impl PaymentResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentResult::Pending => "pending",
            PaymentResult::Received => "received",
            PaymentResult::Rejected => "rejected",
            PaymentResult::Ignored => "ignored",
        }
    }
}

/// Severity of the audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Info,
    Error,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Info => "info",
            LogType::Error => "error",
        }
    }
}

/// Mutable state for one callback invocation.
#[derive(Debug, Clone)]
pub struct CallbackState {
    pub notification: InboundNotification,
    pub filtered: ParsedNotification,
    pub request_key: Option<RequestKey>,
    pub transaction_id: String,
    pub purchase_request: Option<PurchaseRequest>,
    pub payment_result: PaymentResult,
    pub log_type: Option<LogType>,
    pub log_message: Option<String>,
    pub log_details: serde_json::Value,
    pub rejection: Option<CallbackRejection>,
}

impl CallbackState {
    /// Parses the notification into a fresh, pending state.
    pub fn new(notification: InboundNotification) -> Self {
        let filtered = ParsedNotification::parse(&notification);
        let request_key = RequestKey::new(filtered.payment_id.clone()).ok();
        let transaction_id = filtered.payment_batch_num.clone();

        Self {
            notification,
            filtered,
            request_key,
            transaction_id,
            purchase_request: None,
            payment_result: PaymentResult::Pending,
            log_type: None,
            log_message: None,
            log_details: serde_json::Value::Null,
            rejection: None,
        }
    }

    pub fn source_address(&self) -> Option<&str> {
        self.notification.source_address()
    }

    /// Records a failed stage.
    pub fn reject(&mut self, rejection: CallbackRejection) {
        self.payment_result = rejection.payment_result();
        self.log_type = Some(rejection.log_type());
        self.log_message = Some(rejection.to_string());
        self.rejection = Some(rejection);
    }

    /// Records a confirmed payment.
    pub fn mark_received(&mut self) {
        self.payment_result = PaymentResult::Received;
        self.log_type = Some(LogType::Info);
        self.log_message = Some("Payment received.".to_string());
        self.rejection = None;
    }

    /// Freezes the state into the result handed back to the caller.
    pub fn into_outcome(self) -> CallbackOutcome {
        let source_address = self.notification.source_address().map(str::to_string);
        CallbackOutcome {
            payment_result: self.payment_result,
            log_type: self.log_type.unwrap_or(LogType::Info),
            log_message: self.log_message.unwrap_or_default(),
            log_details: self.log_details,
            request_key: self.request_key,
            transaction_id: self.transaction_id,
            parsed: self.filtered,
            purchase_request: self.purchase_request,
            rejection: self.rejection,
            source_address,
        }
    }
}

/// What the pipeline returns: disposition plus the audit payload.
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    pub payment_result: PaymentResult,
    pub log_type: LogType,
    pub log_message: String,
    pub log_details: serde_json::Value,
    pub request_key: Option<RequestKey>,
    pub transaction_id: String,
    /// Typed notification fields, for crediting.
    pub parsed: ParsedNotification,
    pub purchase_request: Option<PurchaseRequest>,
    pub rejection: Option<CallbackRejection>,
    pub source_address: Option<String>,
}

impl CallbackOutcome {
    pub fn is_received(&self) -> bool {
        self.payment_result == PaymentResult::Received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::notification::fields;

    fn state_with(pairs: &[(&str, &str)]) -> CallbackState {
        CallbackState::new(InboundNotification::new(
            pairs.iter().copied(),
            Some("91.205.41.208".to_string()),
        ))
    }

    #[test]
    fn new_state_is_pending_and_keyed() {
        let state = state_with(&[
            (fields::PAYMENT_ID, "req-1"),
            (fields::PAYMENT_BATCH_NUM, "555"),
        ]);

        assert_eq!(state.payment_result, PaymentResult::Pending);
        assert_eq!(state.request_key.as_ref().map(RequestKey::as_str), Some("req-1"));
        assert_eq!(state.transaction_id, "555");
        assert!(state.log_message.is_none());
    }

    #[test]
    fn empty_payment_id_yields_no_request_key() {
        let state = state_with(&[(fields::PAYMENT_ID, "")]);
        assert!(state.request_key.is_none());
    }

    #[test]
    fn reject_sets_result_severity_and_message() {
        let mut state = state_with(&[]);

        state.reject(CallbackRejection::HashMismatch);

        assert_eq!(state.payment_result, PaymentResult::Rejected);
        assert_eq!(state.log_type, Some(LogType::Error));
        assert_eq!(
            state.log_message.as_deref(),
            Some("Could not verify PerfectMoney hash.")
        );
    }

    #[test]
    fn ignored_rejection_uses_info() {
        let mut state = state_with(&[]);

        state.reject(CallbackRejection::NoTransactionId);

        assert_eq!(state.payment_result, PaymentResult::Ignored);
        assert_eq!(state.log_type, Some(LogType::Info));
    }

    #[test]
    fn into_outcome_carries_source_address() {
        let mut state = state_with(&[]);
        state.mark_received();

        let outcome = state.into_outcome();

        assert!(outcome.is_received());
        assert_eq!(outcome.source_address.as_deref(), Some("91.205.41.208"));
        assert_eq!(outcome.log_type, LogType::Info);
    }

    #[test]
    fn payment_result_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentResult::Received).unwrap(),
            "\"received\""
        );
        assert_eq!(PaymentResult::Ignored.as_str(), "ignored");
    }
}
