//! PostgreSQL implementation of CallbackLogRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CallbackLogId, DomainError, ErrorCode, RequestKey};
use crate::domain::payment::{LogType, PaymentResult};
use crate::ports::{CallbackLogEntry, CallbackLogRepository};

pub struct PostgresCallbackLog {
    pool: PgPool,
}

impl PostgresCallbackLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CallbackLogRow {
    id: Uuid,
    provider_id: String,
    request_key: Option<String>,
    transaction_id: String,
    payment_result: String,
    log_type: String,
    log_message: String,
    log_details: serde_json::Value,
    logged_at: DateTime<Utc>,
}

impl TryFrom<CallbackLogRow> for CallbackLogEntry {
    type Error = DomainError;

    fn try_from(row: CallbackLogRow) -> Result<Self, Self::Error> {
        Ok(CallbackLogEntry {
            id: CallbackLogId::from_uuid(row.id),
            provider_id: row.provider_id,
            request_key: row.request_key.and_then(|k| RequestKey::new(k).ok()),
            transaction_id: row.transaction_id,
            payment_result: parse_payment_result(&row.payment_result)?,
            log_type: parse_log_type(&row.log_type)?,
            log_message: row.log_message,
            log_details: row.log_details,
            logged_at: row.logged_at,
        })
    }
}

fn parse_payment_result(s: &str) -> Result<PaymentResult, DomainError> {
    match s {
        "pending" => Ok(PaymentResult::Pending),
        "received" => Ok(PaymentResult::Received),
        "rejected" => Ok(PaymentResult::Rejected),
        "ignored" => Ok(PaymentResult::Ignored),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment_result value: {}", s),
        )),
    }
}

fn parse_log_type(s: &str) -> Result<LogType, DomainError> {
    match s {
        "info" => Ok(LogType::Info),
        "error" => Ok(LogType::Error),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid log_type value: {}", s),
        )),
    }
}

#[async_trait]
impl CallbackLogRepository for PostgresCallbackLog {
    async fn append(&self, entry: CallbackLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO callback_log (
                id, provider_id, request_key, transaction_id, payment_result,
                log_type, log_message, log_details, logged_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(&entry.provider_id)
        .bind(entry.request_key.as_ref().map(RequestKey::as_str))
        .bind(&entry.transaction_id)
        .bind(entry.payment_result.as_str())
        .bind(entry.log_type.as_str())
        .bind(&entry.log_message)
        .bind(&entry.log_details)
        .bind(entry.logged_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to append callback log: {}", e)))?;

        Ok(())
    }

    async fn find_by_request_key(
        &self,
        request_key: &RequestKey,
    ) -> Result<Vec<CallbackLogEntry>, DomainError> {
        let rows: Vec<CallbackLogRow> = sqlx::query_as(
            r#"
            SELECT id, provider_id, request_key, transaction_id, payment_result,
                   log_type, log_message, log_details, logged_at
            FROM callback_log
            WHERE request_key = $1
            ORDER BY logged_at ASC
            "#,
        )
        .bind(request_key.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to read callback log: {}", e)))?;

        rows.into_iter().map(CallbackLogEntry::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_values_round_trip_through_parsers() {
        for result in [
            PaymentResult::Pending,
            PaymentResult::Received,
            PaymentResult::Rejected,
            PaymentResult::Ignored,
        ] {
            assert_eq!(parse_payment_result(result.as_str()).unwrap(), result);
        }
        for log_type in [LogType::Info, LogType::Error] {
            assert_eq!(parse_log_type(log_type.as_str()).unwrap(), log_type);
        }
    }

    #[test]
    fn unknown_stored_values_are_database_errors() {
        assert_eq!(
            parse_payment_result("credited").unwrap_err().code,
            ErrorCode::DatabaseError
        );
        assert!(parse_log_type("warn").is_err());
    }
}
