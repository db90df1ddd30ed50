//! PostgreSQL implementation of PaymentLedger.
//!
//! The primary key on `(request_key, transaction_id)` decides concurrent
//! deliveries: the first insert wins, the rest affect zero rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, RequestKey};
use crate::ports::{PaymentLedger, PaymentReceipt, RecordResult};

pub struct PostgresPaymentLedger {
    pool: PgPool,
}

impl PostgresPaymentLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    request_key: String,
    transaction_id: String,
    provider_id: String,
    amount: Decimal,
    currency: String,
    payer_account: String,
    received_at: DateTime<Utc>,
}

impl TryFrom<ReceiptRow> for PaymentReceipt {
    type Error = DomainError;

    fn try_from(row: ReceiptRow) -> Result<Self, Self::Error> {
        Ok(PaymentReceipt {
            request_key: RequestKey::new(row.request_key).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid request_key: {}", e))
            })?,
            transaction_id: row.transaction_id,
            provider_id: row.provider_id,
            amount: row.amount,
            currency: row.currency,
            payer_account: row.payer_account,
            received_at: row.received_at,
        })
    }
}

#[async_trait]
impl PaymentLedger for PostgresPaymentLedger {
    async fn record_payment(&self, receipt: PaymentReceipt) -> Result<RecordResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO payment_receipts (
                request_key, transaction_id, provider_id, amount, currency,
                payer_account, received_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (request_key, transaction_id) DO NOTHING
            "#,
        )
        .bind(receipt.request_key.as_str())
        .bind(&receipt.transaction_id)
        .bind(&receipt.provider_id)
        .bind(receipt.amount)
        .bind(&receipt.currency)
        .bind(&receipt.payer_account)
        .bind(receipt.received_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record payment: {}", e)))?;

        if result.rows_affected() == 0 {
            Ok(RecordResult::AlreadyRecorded)
        } else {
            Ok(RecordResult::Inserted)
        }
    }

    async fn find_payment(
        &self,
        request_key: &RequestKey,
        transaction_id: &str,
    ) -> Result<Option<PaymentReceipt>, DomainError> {
        let row: Option<ReceiptRow> = sqlx::query_as(
            r#"
            SELECT request_key, transaction_id, provider_id, amount, currency,
                   payer_account, received_at
            FROM payment_receipts
            WHERE request_key = $1 AND transaction_id = $2
            "#,
        )
        .bind(request_key.as_str())
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find payment: {}", e)))?;

        row.map(PaymentReceipt::try_from).transpose()
    }
}
