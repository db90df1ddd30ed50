//! InitiatePaymentHandler - Builds the gateway checkout form for a purchase request.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, RequestKey};
use crate::domain::payment::{PaymentForm, PaymentGateway, Purchase};
use crate::ports::PurchaseLedgerLookup;

/// Command to start checkout for an existing purchase request.
#[derive(Debug, Clone)]
pub struct InitiatePaymentCommand {
    pub request_key: String,
    pub return_url: String,
    pub cancel_url: String,
}

/// Handler that turns a purchase request into a gateway form.
pub struct InitiatePaymentHandler<G: PaymentGateway> {
    gateway: Arc<G>,
    purchases: Arc<dyn PurchaseLedgerLookup>,
}

impl<G: PaymentGateway> InitiatePaymentHandler<G> {
    pub fn new(gateway: Arc<G>, purchases: Arc<dyn PurchaseLedgerLookup>) -> Self {
        Self { gateway, purchases }
    }

    pub async fn handle(&self, cmd: InitiatePaymentCommand) -> Result<PaymentForm, DomainError> {
        let request_key = RequestKey::new(cmd.request_key)?;

        let purchase_request = self
            .purchases
            .resolve(&request_key)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PurchaseRequestNotFound, "Purchase request not found")
                    .with_detail("request_key", request_key.as_str())
            })?;

        let purchase = Purchase {
            return_url: cmd.return_url,
            cancel_url: cmd.cancel_url,
        };
        let form = self.gateway.initiate_payment(&purchase_request, &purchase)?;

        tracing::info!(
            provider = self.gateway.provider_id(),
            request_key = %request_key,
            "Payment initiated"
        );
        Ok(form)
    }
}
