//! Payment handlers.
//!
//! ## Commands
//! - Handling gateway status notifications (verify, audit, credit)
//! - Initiating checkout for a purchase request

mod handle_payment_callback;
mod initiate_payment;

pub use handle_payment_callback::{
    CreditStatus, HandlePaymentCallbackCommand, HandlePaymentCallbackHandler,
    HandlePaymentCallbackResult,
};
pub use initiate_payment::{InitiatePaymentCommand, InitiatePaymentHandler};
