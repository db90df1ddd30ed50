//! PerfectMoney implementation of [`PaymentGateway`].

use secrecy::ExposeSecret;
use serde_json::json;

use crate::domain::foundation::{DomainError, ErrorCode};

use super::callback_state::CallbackState;
use super::gateway::PaymentGateway;
use super::hash_verifier::{self, HashFields};
use super::initiation::{PaymentForm, Purchase};
use super::notification::NumericPolicy;
use super::origin_guard::OriginGuard;
use super::provider_config::{self, ConfigValidation, ProviderOptions};
use super::purchase_request::PurchaseRequest;
use super::rejection::CallbackRejection;

pub const PROVIDER_ID: &str = "perfect_money";
pub const DEFAULT_API_ENDPOINT: &str = "https://perfectmoney.is/api";

/// Deployment-level gateway settings. Per-merchant settings live on the
/// payment profile.
#[derive(Debug, Clone)]
pub struct PerfectMoneySettings {
    pub api_endpoint: String,
    /// Absolute URL of this service's notification endpoint.
    pub status_url: String,
    pub origin_guard: OriginGuard,
    pub numeric_policy: NumericPolicy,
}

impl Default for PerfectMoneySettings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            status_url: String::new(),
            origin_guard: OriginGuard::default(),
            numeric_policy: NumericPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PerfectMoney {
    settings: PerfectMoneySettings,
}

impl PerfectMoney {
    pub fn new(settings: PerfectMoneySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PerfectMoneySettings {
        &self.settings
    }

    fn step1_url(&self) -> String {
        format!("{}/step1.asp", self.settings.api_endpoint.trim_end_matches('/'))
    }
}

impl PaymentGateway for PerfectMoney {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn title(&self) -> &'static str {
        "Perfect Money"
    }

    fn verify_config(&self, options: ProviderOptions) -> ConfigValidation {
        provider_config::validate(options)
    }

    fn initiate_payment(
        &self,
        purchase_request: &PurchaseRequest,
        purchase: &Purchase,
    ) -> Result<PaymentForm, DomainError> {
        let profile = purchase_request.payment_profile.as_ref().ok_or_else(|| {
            DomainError::new(
                ErrorCode::PaymentProfileNotFound,
                "Purchase request has no payment profile",
            )
            .with_detail("request_key", purchase_request.request_key.as_str())
        })?;
        let config = &profile.config;
        let cost = &purchase_request.cost;

        Ok(PaymentForm::post(self.step1_url())
            .field("PAYEE_ACCOUNT", config.payee_account())
            .field("PAYEE_NAME", config.payee_name())
            .field("PAYMENT_AMOUNT", cost.amount.to_string())
            .field("PAYMENT_UNITS", cost.currency.as_str())
            .field("PAYMENT_ID", purchase_request.request_key.as_str())
            .field("STATUS_URL", self.settings.status_url.as_str())
            .field("PAYMENT_URL", purchase.return_url.as_str())
            .field("PAYMENT_URL_METHOD", "POST")
            .field("NOPAYMENT_URL", purchase.cancel_url.as_str())
            .field("NOPAYMENT_URL_METHOD", "GET"))
    }

    fn validate_input(&self, state: &CallbackState) -> Result<(), CallbackRejection> {
        match (self.settings.numeric_policy, state.filtered.malformed.first()) {
            (NumericPolicy::Reject, Some(&field)) => Err(CallbackRejection::MalformedField(field)),
            _ => Ok(()),
        }
    }

    fn validate_callback(&self, state: &CallbackState) -> Result<(), CallbackRejection> {
        let purchase_request = state
            .purchase_request
            .as_ref()
            .filter(|_| state.request_key.is_some())
            .ok_or(CallbackRejection::UnknownPurchaseRequest)?;

        let profile = purchase_request
            .payment_profile
            .as_ref()
            .ok_or(CallbackRejection::MissingPaymentProfile)?;

        let candidate = state.filtered.v2_hash.as_str();
        if candidate.is_empty() {
            return Err(CallbackRejection::HashMismatch);
        }
        let computed = hash_verifier::compute_digest(
            &HashFields::from_notification(&state.filtered),
            profile.config.shared_secret().expose_secret(),
        );
        if !hash_verifier::verify(candidate, &computed) {
            return Err(CallbackRejection::HashMismatch);
        }

        if !self.settings.origin_guard.is_allowed(state.source_address()) {
            return Err(CallbackRejection::DisallowedOrigin(
                state.source_address().unwrap_or("unknown").to_string(),
            ));
        }

        Ok(())
    }

    fn validate_transaction(&self, state: &CallbackState) -> Result<(), CallbackRejection> {
        if state.transaction_id.is_empty() {
            return Err(CallbackRejection::NoTransactionId);
        }
        Ok(())
    }

    fn validate_cost(&self, state: &CallbackState) -> Result<(), CallbackRejection> {
        let purchase_request = state
            .purchase_request
            .as_ref()
            .ok_or(CallbackRejection::UnknownPurchaseRequest)?;

        if purchase_request
            .cost
            .matches(state.filtered.payment_amount, &state.filtered.payment_units)
        {
            Ok(())
        } else {
            Err(CallbackRejection::CostMismatch)
        }
    }

    fn prepare_log_data(&self, state: &mut CallbackState) {
        state.log_details = json!({
            "fields": state.notification.fields(),
            "source_address": state.source_address(),
            "malformed": state.filtered.malformed,
        });
    }
}
