//! CallbackLogRepository port - Audit trail of gateway notifications.
//!
//! Every notification that reaches a disposition gets exactly one entry,
//! whether it was received, rejected or ignored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::{CallbackLogId, DomainError, RequestKey};
use crate::domain::payment::{CallbackOutcome, LogType, PaymentResult};

/// One audit log row.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackLogEntry {
    pub id: CallbackLogId,
    pub provider_id: String,
    /// Absent when the notification carried no `PAYMENT_ID`.
    pub request_key: Option<RequestKey>,
    pub transaction_id: String,
    pub payment_result: PaymentResult,
    pub log_type: LogType,
    pub log_message: String,
    /// Raw fields and source address as received.
    pub log_details: serde_json::Value,
    pub logged_at: DateTime<Utc>,
}

impl CallbackLogEntry {
    pub fn from_outcome(provider_id: &str, outcome: &CallbackOutcome) -> Self {
        Self {
            id: CallbackLogId::new(),
            provider_id: provider_id.to_string(),
            request_key: outcome.request_key.clone(),
            transaction_id: outcome.transaction_id.clone(),
            payment_result: outcome.payment_result,
            log_type: outcome.log_type,
            log_message: outcome.log_message.clone(),
            log_details: outcome.log_details.clone(),
            logged_at: Utc::now(),
        }
    }
}

/// Port for appending and reading audit entries.
#[async_trait]
pub trait CallbackLogRepository: Send + Sync {
    /// Append an entry. Entries are never updated.
    async fn append(&self, entry: CallbackLogEntry) -> Result<(), DomainError>;

    /// All entries for a purchase request, oldest first.
    async fn find_by_request_key(
        &self,
        request_key: &RequestKey,
    ) -> Result<Vec<CallbackLogEntry>, DomainError>;
}
