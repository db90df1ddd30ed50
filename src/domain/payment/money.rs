//! Cost value objects for purchase requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Three-letter currency unit as PerfectMoney reports it in `PAYMENT_UNITS`
/// (`USD`, `EUR`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code. Must be exactly three ASCII letters.
    ///
    /// Case is preserved: the gateway compares units byte-for-byte.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.is_empty() {
            return Err(ValidationError::empty_field("cost_currency"));
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "cost_currency",
                "expected three ASCII letters",
            ));
        }
        Ok(Self(code))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount and currency recorded on a purchase request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Cost {
    /// Creates a cost. Negative amounts are refused.
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::invalid_format(
                "cost_amount",
                "must not be negative",
            ));
        }
        Ok(Self { amount, currency })
    }

    /// True when `amount` and `currency` match exactly.
    ///
    /// Amounts compare numerically (`10.00 == 10.0`), currencies by bytes.
    pub fn matches(&self, amount: Decimal, currency: &str) -> bool {
        self.amount == amount && self.currency.as_str() == currency
    }
}
