//! In-memory CallbackLogRepository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, RequestKey};
use crate::ports::{CallbackLogEntry, CallbackLogRepository};

/// Append-only audit log held in a vector.
#[derive(Default)]
pub struct InMemoryCallbackLog {
    entries: RwLock<Vec<CallbackLogEntry>>,
}

impl InMemoryCallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    pub async fn entries(&self) -> Vec<CallbackLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl CallbackLogRepository for InMemoryCallbackLog {
    async fn append(&self, entry: CallbackLogEntry) -> Result<(), DomainError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn find_by_request_key(
        &self,
        request_key: &RequestKey,
    ) -> Result<Vec<CallbackLogEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.request_key.as_ref() == Some(request_key))
            .cloned()
            .collect())
    }
}
