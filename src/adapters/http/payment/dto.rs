//! Request and response bodies for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{CreditStatus, HandlePaymentCallbackResult};
use crate::domain::payment::{PaymentForm, PaymentResult};

/// Acknowledgement returned to the gateway.
///
/// Rejection reasons stay in the logs; the gateway only needs a 2xx.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackResponse {
    pub result: PaymentResult,
    pub credited: bool,
}

impl From<&HandlePaymentCallbackResult> for CallbackResponse {
    fn from(result: &HandlePaymentCallbackResult) -> Self {
        Self {
            result: result.outcome.payment_result,
            credited: result.credit == CreditStatus::Credited,
        }
    }
}

/// Request to build the checkout form for a purchase request.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePaymentRequest {
    pub request_key: String,
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormFieldResponse {
    pub name: String,
    pub value: String,
}

/// Form the client renders and auto-submits to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentFormResponse {
    pub action: String,
    pub method: String,
    pub fields: Vec<FormFieldResponse>,
}

impl From<PaymentForm> for PaymentFormResponse {
    fn from(form: PaymentForm) -> Self {
        Self {
            action: form.action,
            method: form.method.to_string(),
            fields: form
                .fields
                .into_iter()
                .map(|(name, value)| FormFieldResponse { name, value })
                .collect(),
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_response_serializes_lowercase_result() {
        let body = CallbackResponse {
            result: PaymentResult::Ignored,
            credited: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"result": "ignored", "credited": false})
        );
    }

    #[test]
    fn payment_form_keeps_field_order() {
        let form = PaymentForm::post("https://perfectmoney.is/api/step1.asp")
            .field("PAYEE_ACCOUNT", "U1")
            .field("PAYMENT_ID", "k");

        let response = PaymentFormResponse::from(form);

        assert_eq!(response.method, "POST");
        assert_eq!(response.fields[0].name, "PAYEE_ACCOUNT");
        assert_eq!(response.fields[1].value, "k");
    }
}
