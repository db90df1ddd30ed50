//! In-memory PurchaseLedgerLookup.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, RequestKey};
use crate::domain::payment::PurchaseRequest;
use crate::ports::PurchaseLedgerLookup;

/// Purchase requests keyed by request key.
#[derive(Default)]
pub struct InMemoryPurchaseLedger {
    requests: RwLock<HashMap<RequestKey, PurchaseRequest>>,
}

impl InMemoryPurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a purchase request.
    pub async fn insert(&self, request: PurchaseRequest) {
        self.requests
            .write()
            .await
            .insert(request.request_key.clone(), request);
    }

    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl PurchaseLedgerLookup for InMemoryPurchaseLedger {
    async fn resolve(
        &self,
        request_key: &RequestKey,
    ) -> Result<Option<PurchaseRequest>, DomainError> {
        Ok(self.requests.read().await.get(request_key).cloned())
    }
}
