//! Callback pipeline - Runs a gateway's validation stages in fixed order.
//!
//! ## Stages
//!
//! 1. `setup_callback` - parse the raw form
//! 2. `validate_input` - structural checks before any lookup
//! 3. resolve the purchase request through [`PurchaseLedgerLookup`]
//! 4. `validate_callback` - purchase request, profile, hash, origin
//! 5. `validate_transaction` - a batch number must be present
//! 6. `validate_cost` - amount and currency must match
//! 7. `payment_result` - mark `Received`
//!
//! The first failing stage decides the outcome and later stages never run.
//! `prepare_log_data` runs for every outcome.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::PurchaseLedgerLookup;

use super::callback_state::{CallbackOutcome, CallbackState};
use super::gateway::PaymentGateway;
use super::notification::InboundNotification;
use super::purchase_request::PurchaseRequest;
use super::rejection::CallbackRejection;

/// Verifies inbound notifications for one gateway.
pub struct CallbackPipeline<G: PaymentGateway> {
    gateway: G,
    ledger: Arc<dyn PurchaseLedgerLookup>,
}

impl<G: PaymentGateway> CallbackPipeline<G> {
    pub fn new(gateway: G, ledger: Arc<dyn PurchaseLedgerLookup>) -> Self {
        Self { gateway, ledger }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Process one notification.
    ///
    /// # Returns
    ///
    /// - `Ok(outcome)` - a disposition was reached (received, rejected or ignored)
    /// - `Err(_)` - the purchase request lookup failed; no disposition exists
    pub async fn process(
        &self,
        notification: InboundNotification,
    ) -> Result<CallbackOutcome, DomainError> {
        let mut state = self.gateway.setup_callback(notification);

        match self.run_stages(&mut state).await? {
            Ok(()) => self.gateway.payment_result(&mut state),
            Err(rejection) => {
                tracing::debug!(
                    code = rejection.code(),
                    request_key = ?state.request_key,
                    "Callback stage failed"
                );
                state.reject(rejection);
            }
        }

        self.gateway.prepare_log_data(&mut state);
        Ok(state.into_outcome())
    }

    // Outer error is infrastructure, inner error is a stage rejection.
    async fn run_stages(
        &self,
        state: &mut CallbackState,
    ) -> Result<Result<(), CallbackRejection>, DomainError> {
        if let Err(rejection) = self.gateway.validate_input(state) {
            return Ok(Err(rejection));
        }

        let purchase_request = self.resolve(state).await?;
        state.purchase_request = purchase_request;

        Ok(self
            .gateway
            .validate_callback(state)
            .and_then(|()| self.gateway.validate_transaction(state))
            .and_then(|()| self.gateway.validate_cost(state)))
    }

    async fn resolve(&self, state: &CallbackState) -> Result<Option<PurchaseRequest>, DomainError> {
        match &state.request_key {
            Some(key) => self.ledger.resolve(key).await,
            None => Ok(None),
        }
    }
}
