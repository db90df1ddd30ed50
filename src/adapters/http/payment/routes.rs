//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{handle_perfect_money_callback, health, initiate_payment, PaymentAppState};

/// Create the payment API router.
///
/// # Routes
///
/// ## Gateway Endpoints (no auth, hash and origin verified)
/// - `POST /callbacks/perfect-money` - Status notifications
///
/// ## Checkout Endpoints
/// - `POST /payments/initiate` - Build the gateway form for a purchase request
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/callbacks/perfect-money", post(handle_perfect_money_callback))
        .route("/payments/initiate", post(initiate_payment))
}

/// Create the complete payment module router, mounted under `/api`, plus
/// `GET /health`.
pub fn payment_router(state: PaymentAppState) -> Router {
    Router::new()
        .nest("/api", payment_routes())
        .route("/health", get(health))
        .with_state(state)
}
