//! Reasons a callback stops short of `Received`.
//!
//! Every failed stage produces one of these. They are values, never raised
//! to the transport layer: the caller still acknowledges the HTTP request.

use thiserror::Error;

use super::callback_state::{LogType, PaymentResult};

/// Why the pipeline rejected or ignored a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackRejection {
    /// A numeric field did not parse and the numeric policy is `Reject`.
    #[error("Malformed numeric field: {0}")]
    MalformedField(&'static str),

    /// `PAYMENT_ID` is empty or matches no purchase request.
    #[error("Notification does not contain a recognised purchase request.")]
    UnknownPurchaseRequest,

    /// The purchase request's payment profile no longer exists.
    #[error("Notification does not contain a valid payment profile.")]
    MissingPaymentProfile,

    /// `V2_HASH` is empty or does not match the computed hash.
    #[error("Could not verify PerfectMoney hash.")]
    HashMismatch,

    /// The source address is not an allow-listed gateway host.
    #[error("Notification origin {0} is not an allowed PerfectMoney address.")]
    DisallowedOrigin(String),

    /// `PAYMENT_BATCH_NUM` is empty: nothing was paid.
    #[error("No transaction ID. No action to take.")]
    NoTransactionId,

    /// Amount or currency differs from the purchase request.
    #[error("Invalid cost amount")]
    CostMismatch,
}

impl CallbackRejection {
    /// Disposition the pipeline records for this reason.
    pub fn payment_result(&self) -> PaymentResult {
        match self {
            CallbackRejection::NoTransactionId => PaymentResult::Ignored,
            _ => PaymentResult::Rejected,
        }
    }

    /// Severity of the audit entry.
    pub fn log_type(&self) -> LogType {
        match self {
            CallbackRejection::NoTransactionId => LogType::Info,
            _ => LogType::Error,
        }
    }

    /// Stable machine-readable code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            CallbackRejection::MalformedField(_) => "MALFORMED_FIELD",
            CallbackRejection::UnknownPurchaseRequest => "UNKNOWN_PURCHASE_REQUEST",
            CallbackRejection::MissingPaymentProfile => "MISSING_PAYMENT_PROFILE",
            CallbackRejection::HashMismatch => "HASH_MISMATCH",
            CallbackRejection::DisallowedOrigin(_) => "DISALLOWED_ORIGIN",
            CallbackRejection::NoTransactionId => "NO_TRANSACTION_ID",
            CallbackRejection::CostMismatch => "COST_MISMATCH",
        }
    }

    /// True for failures of the origin/hash/purchase-request checks.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            CallbackRejection::UnknownPurchaseRequest
                | CallbackRejection::MissingPaymentProfile
                | CallbackRejection::HashMismatch
                | CallbackRejection::DisallowedOrigin(_)
        )
    }
}
