//! HTTP adapter for PerfectMoney checkout and status notifications.

mod client_ip;
mod dto;
mod handlers;
mod routes;

pub use client_ip::source_address;
pub use dto::{
    CallbackResponse, ErrorResponse, FormFieldResponse, InitiatePaymentRequest,
    PaymentFormResponse,
};
pub use handlers::{PaymentApiError, PaymentAppState};
pub use routes::{payment_router, payment_routes};
