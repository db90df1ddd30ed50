//! PurchaseLedgerLookup port - Resolves notification keys to purchase requests.
//!
//! The callback pipeline performs exactly one lookup per notification. An
//! unknown key is a normal `Ok(None)`; `Err` is reserved for infrastructure
//! failures, which the caller surfaces so the gateway retries.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RequestKey};
use crate::domain::payment::PurchaseRequest;

/// Read access to pending purchase requests.
///
/// Implementations return the purchase request with its payment profile
/// resolved. A profile that no longer exists comes back as
/// `payment_profile: None`, not as a missing purchase request.
#[async_trait]
pub trait PurchaseLedgerLookup: Send + Sync {
    /// Find the purchase request whose key equals `request_key`.
    async fn resolve(&self, request_key: &RequestKey)
        -> Result<Option<PurchaseRequest>, DomainError>;
}
