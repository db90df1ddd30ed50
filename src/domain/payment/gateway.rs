//! Capability interface every payment gateway integration implements.
//!
//! [`CallbackPipeline`](super::CallbackPipeline) is written once over this
//! trait. Each stage returns `Err(CallbackRejection)` to stop the pipeline;
//! the pipeline records the rejection on the state.

use crate::domain::foundation::DomainError;

use super::callback_state::CallbackState;
use super::initiation::{PaymentForm, Purchase};
use super::notification::InboundNotification;
use super::provider_config::{ConfigValidation, ProviderOptions};
use super::purchase_request::PurchaseRequest;
use super::rejection::CallbackRejection;

pub trait PaymentGateway: Send + Sync {
    /// Stable provider identifier stored on payment profiles.
    fn provider_id(&self) -> &'static str;

    /// Human-readable provider name.
    fn title(&self) -> &'static str;

    /// Normalizes and validates admin-entered options.
    fn verify_config(&self, options: ProviderOptions) -> ConfigValidation;

    /// Builds the form that sends the payer to the gateway.
    fn initiate_payment(
        &self,
        purchase_request: &PurchaseRequest,
        purchase: &Purchase,
    ) -> Result<PaymentForm, DomainError>;

    /// Parses the raw notification into a fresh state.
    fn setup_callback(&self, notification: InboundNotification) -> CallbackState {
        CallbackState::new(notification)
    }

    /// Rejects structurally unusable input before any lookup happens.
    fn validate_input(&self, _state: &CallbackState) -> Result<(), CallbackRejection> {
        Ok(())
    }

    /// Authenticates the notification against its resolved purchase request.
    fn validate_callback(&self, state: &CallbackState) -> Result<(), CallbackRejection>;

    /// Decides whether the notification carries a payable transaction.
    fn validate_transaction(&self, state: &CallbackState) -> Result<(), CallbackRejection>;

    /// Checks amount and currency against the purchase request.
    fn validate_cost(&self, state: &CallbackState) -> Result<(), CallbackRejection>;

    /// Assigns the final outcome once every check passed.
    fn payment_result(&self, state: &mut CallbackState) {
        state.mark_received();
    }

    /// Fills `log_details` for the audit trail.
    fn prepare_log_data(&self, state: &mut CallbackState);

    fn supports_recurring(&self) -> bool {
        false
    }
}
