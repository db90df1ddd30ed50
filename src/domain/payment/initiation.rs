//! Outbound payment initiation form.
//!
//! The customer's browser POSTs this form to the gateway's `step1.asp`.
//! Rendering the HTML is left to the caller.

use serde::Serialize;

/// Per-checkout URLs supplied by the purchasable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    /// Where the gateway sends the payer after a successful payment.
    pub return_url: String,
    /// Where the gateway sends the payer after cancelling.
    pub cancel_url: String,
}

/// Form action plus ordered hidden fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentForm {
    pub action: String,
    pub method: &'static str,
    pub fields: Vec<(String, String)>,
}

impl PaymentForm {
    pub fn post(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: "POST",
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    /// Value of a field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
