//! In-memory PaymentLedger.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, RequestKey};
use crate::ports::{PaymentLedger, PaymentReceipt, RecordResult};

type ReceiptKey = (RequestKey, String);

/// Credited payments keyed by `(request_key, transaction_id)`.
#[derive(Default)]
pub struct InMemoryPaymentLedger {
    receipts: RwLock<HashMap<ReceiptKey, PaymentReceipt>>,
}

impl InMemoryPaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.receipts.read().await.len()
    }
}

#[async_trait]
impl PaymentLedger for InMemoryPaymentLedger {
    async fn record_payment(&self, receipt: PaymentReceipt) -> Result<RecordResult, DomainError> {
        let key = (receipt.request_key.clone(), receipt.transaction_id.clone());
        let mut receipts = self.receipts.write().await;
        if receipts.contains_key(&key) {
            return Ok(RecordResult::AlreadyRecorded);
        }
        receipts.insert(key, receipt);
        Ok(RecordResult::Inserted)
    }

    async fn find_payment(
        &self,
        request_key: &RequestKey,
        transaction_id: &str,
    ) -> Result<Option<PaymentReceipt>, DomainError> {
        let key = (request_key.clone(), transaction_id.to_string());
        Ok(self.receipts.read().await.get(&key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn receipt(key: &str, batch: &str) -> PaymentReceipt {
        PaymentReceipt {
            request_key: RequestKey::new(key).unwrap(),
            transaction_id: batch.to_string(),
            provider_id: "perfect_money".to_string(),
            amount: Decimal::TEN,
            currency: "USD".to_string(),
            payer_account: "U9".to_string(),
            received_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn second_record_of_same_transaction_is_duplicate() {
        let ledger = InMemoryPaymentLedger::new();

        assert_eq!(
            ledger.record_payment(receipt("a", "1")).await.unwrap(),
            RecordResult::Inserted
        );
        assert_eq!(
            ledger.record_payment(receipt("a", "1")).await.unwrap(),
            RecordResult::AlreadyRecorded
        );
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn different_batch_is_separate_payment() {
        let ledger = InMemoryPaymentLedger::new();

        ledger.record_payment(receipt("a", "1")).await.unwrap();
        let result = ledger.record_payment(receipt("a", "2")).await.unwrap();

        assert_eq!(result, RecordResult::Inserted);
        assert!(ledger
            .find_payment(&RequestKey::new("a").unwrap(), "2")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn concurrent_records_insert_exactly_once() {
        let ledger = Arc::new(InMemoryPaymentLedger::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.record_payment(receipt("a", "1")).await })
            })
            .collect();

        let mut inserted = 0;
        for task in tasks {
            if task.await.unwrap().unwrap() == RecordResult::Inserted {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
    }
}
