//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Form, Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::payment::{
    HandlePaymentCallbackCommand, HandlePaymentCallbackHandler, InitiatePaymentCommand,
    InitiatePaymentHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::payment::{CallbackPipeline, PerfectMoney};
use crate::ports::{CallbackLogRepository, PaymentLedger, PurchaseLedgerLookup};

use super::client_ip::source_address;
use super::dto::{CallbackResponse, ErrorResponse, InitiatePaymentRequest, PaymentFormResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct PaymentAppState {
    pub gateway: Arc<PerfectMoney>,
    pub pipeline: Arc<CallbackPipeline<PerfectMoney>>,
    pub purchase_ledger: Arc<dyn PurchaseLedgerLookup>,
    pub payment_ledger: Arc<dyn PaymentLedger>,
    pub callback_log: Arc<dyn CallbackLogRepository>,
    /// Read the caller address from proxy headers.
    pub trust_forwarded_headers: bool,
}

impl PaymentAppState {
    pub fn new(
        gateway: PerfectMoney,
        purchase_ledger: Arc<dyn PurchaseLedgerLookup>,
        payment_ledger: Arc<dyn PaymentLedger>,
        callback_log: Arc<dyn CallbackLogRepository>,
    ) -> Self {
        let pipeline = Arc::new(CallbackPipeline::new(gateway.clone(), purchase_ledger.clone()));
        Self {
            gateway: Arc::new(gateway),
            pipeline,
            purchase_ledger,
            payment_ledger,
            callback_log,
            trust_forwarded_headers: false,
        }
    }

    pub fn with_trusted_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }

    /// Create handlers on demand from the shared state.
    pub fn callback_handler(&self) -> HandlePaymentCallbackHandler<PerfectMoney> {
        HandlePaymentCallbackHandler::new(
            self.pipeline.clone(),
            self.payment_ledger.clone(),
            self.callback_log.clone(),
        )
    }

    pub fn initiate_payment_handler(&self) -> InitiatePaymentHandler<PerfectMoney> {
        InitiatePaymentHandler::new(self.gateway.clone(), self.purchase_ledger.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/callbacks/perfect-money - Gateway status notification
///
/// Every disposition is acknowledged with 200 so the gateway stops
/// retrying. Only infrastructure failures return 5xx.
pub async fn handle_perfect_money_callback(
    State(state): State<PaymentAppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let cmd = HandlePaymentCallbackCommand {
        fields,
        source_address: source_address(
            &headers,
            connect_info.as_ref(),
            state.trust_forwarded_headers,
        ),
    };

    let result = state.callback_handler().handle(cmd).await?;

    Ok(Json(CallbackResponse::from(&result)))
}

/// POST /api/payments/initiate - Build the gateway checkout form
pub async fn initiate_payment(
    State(state): State<PaymentAppState>,
    Json(request): Json<InitiatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let cmd = InitiatePaymentCommand {
        request_key: request.request_key,
        return_url: request.return_url,
        cancel_url: request.cancel_url,
    };

    let form = state.initiate_payment_handler().handle(cmd).await?;

    Ok(Json(PaymentFormResponse::from(form)))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(DomainError);

impl From<DomainError> for PaymentApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::PurchaseRequestNotFound | ErrorCode::PaymentProfileNotFound => {
                StatusCode::NOT_FOUND
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Driver messages stay in the logs.
        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, "Payment request failed");
            "Internal error".to_string()
        } else {
            self.0.message.clone()
        };

        let body = ErrorResponse::new(self.0.code.to_string(), message);
        (status, Json(body)).into_response()
    }
}
