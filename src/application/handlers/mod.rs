//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod payment;

pub use payment::{
    CreditStatus, HandlePaymentCallbackCommand, HandlePaymentCallbackHandler,
    HandlePaymentCallbackResult, InitiatePaymentCommand, InitiatePaymentHandler,
};
