//! PostgreSQL implementation of PurchaseLedgerLookup.
//!
//! Purchase requests are joined to their payment profile in one query. A
//! profile row that is missing, or whose stored options no longer validate,
//! resolves as `payment_profile: None`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentProfileId, RequestKey};
use crate::domain::payment::{
    Cost, CurrencyCode, PaymentProfile, ProviderConfig, ProviderOptions, PurchaseRequest,
};
use crate::ports::PurchaseLedgerLookup;

/// PostgreSQL-backed purchase requests and payment profiles.
pub struct PostgresPurchaseLedger {
    pool: PgPool,
}

impl PostgresPurchaseLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or updates a payment profile, keyed by provider and payee
    /// account. Returns the stored profile id.
    pub async fn save_profile(&self, profile: &PaymentProfile) -> Result<PaymentProfileId, DomainError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO payment_profiles (id, provider_id, title, active, options)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (provider_id, (options->>'payee_account')) DO UPDATE SET
                title = EXCLUDED.title,
                active = EXCLUDED.active,
                options = EXCLUDED.options,
                updated_at = now()
            RETURNING id
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(&profile.provider_id)
        .bind(&profile.title)
        .bind(profile.active)
        .bind(Json(profile.config.to_options()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save payment profile: {}", e)))?;

        Ok(PaymentProfileId::from_uuid(id))
    }
}

/// Purchase request joined with its (possibly missing) profile.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRequestRow {
    request_key: String,
    payment_profile_id: Uuid,
    amount: Decimal,
    currency: String,
    purchasable_type: String,
    profile_provider_id: Option<String>,
    profile_title: Option<String>,
    profile_active: Option<bool>,
    profile_options: Option<Json<ProviderOptions>>,
}

impl TryFrom<PurchaseRequestRow> for PurchaseRequest {
    type Error = DomainError;

    fn try_from(row: PurchaseRequestRow) -> Result<Self, Self::Error> {
        let request_key = RequestKey::new(row.request_key).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid request_key: {}", e))
        })?;
        let currency = CurrencyCode::new(row.currency.trim()).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid currency: {}", e))
        })?;
        let cost = Cost::new(row.amount, currency).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid amount: {}", e))
        })?;

        let profile_id = PaymentProfileId::from_uuid(row.payment_profile_id);
        let payment_profile = match (row.profile_provider_id, row.profile_options) {
            (Some(provider_id), Some(Json(options))) => match ProviderConfig::from_options(options) {
                Ok(config) => Some(PaymentProfile {
                    id: profile_id,
                    provider_id,
                    title: row.profile_title.unwrap_or_default(),
                    active: row.profile_active.unwrap_or(false),
                    config,
                }),
                Err(e) => {
                    tracing::warn!(
                        profile_id = %profile_id,
                        field = e.field(),
                        "Stored payment profile fails validation"
                    );
                    None
                }
            },
            _ => None,
        };

        Ok(PurchaseRequest {
            request_key,
            cost,
            payment_profile_id: profile_id,
            payment_profile,
            purchasable_type: row.purchasable_type,
        })
    }
}

#[async_trait]
impl PurchaseLedgerLookup for PostgresPurchaseLedger {
    async fn resolve(
        &self,
        request_key: &RequestKey,
    ) -> Result<Option<PurchaseRequest>, DomainError> {
        let row: Option<PurchaseRequestRow> = sqlx::query_as(
            r#"
            SELECT
                pr.request_key,
                pr.payment_profile_id,
                pr.amount,
                pr.currency,
                pr.purchasable_type,
                pp.provider_id AS profile_provider_id,
                pp.title AS profile_title,
                pp.active AS profile_active,
                pp.options AS profile_options
            FROM purchase_requests pr
            LEFT JOIN payment_profiles pp ON pp.id = pr.payment_profile_id
            WHERE pr.request_key = $1
            "#,
        )
        .bind(request_key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to resolve purchase request: {}", e),
            )
        })?;

        row.map(PurchaseRequest::try_from).transpose()
    }
}
