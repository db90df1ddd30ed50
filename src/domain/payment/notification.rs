//! Inbound PerfectMoney status notifications.
//!
//! The gateway POSTs a form to the merchant's `STATUS_URL` after every
//! payment attempt. Everything in it is untrusted until the V2 hash and the
//! source address have been checked.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Form field names used by the gateway.
pub mod fields {
    pub const PAYEE_ACCOUNT: &str = "PAYEE_ACCOUNT";
    pub const PAYMENT_ID: &str = "PAYMENT_ID";
    pub const PAYMENT_AMOUNT: &str = "PAYMENT_AMOUNT";
    pub const PAYMENT_UNITS: &str = "PAYMENT_UNITS";
    pub const PAYMENT_BATCH_NUM: &str = "PAYMENT_BATCH_NUM";
    pub const PAYER_ACCOUNT: &str = "PAYER_ACCOUNT";
    pub const TIMESTAMPGMT: &str = "TIMESTAMPGMT";
    pub const V2_HASH: &str = "V2_HASH";
}

/// What to do with a numeric field that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Reject the notification outright.
    #[default]
    Reject,
    /// Replace the value with zero and carry on (legacy behaviour).
    Coerce,
}

/// Raw notification exactly as received, plus the caller-observed source
/// address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundNotification {
    fields: BTreeMap<String, String>,
    source_address: Option<String>,
}

impl InboundNotification {
    pub fn new<I, K, V>(fields: I, source_address: Option<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            source_address,
        }
    }

    /// Value of a form field, or `""` when absent.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn source_address(&self) -> Option<&str> {
        self.source_address.as_deref()
    }
}

/// Typed copy of the recognized fields.
///
/// `payment_amount_raw` and `timestamp_raw` keep the text the gateway sent;
/// the V2 hash is computed over those, not over the parsed numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedNotification {
    pub payee_account: String,
    pub payment_id: String,
    pub payment_amount: Decimal,
    pub payment_amount_raw: String,
    pub payment_units: String,
    pub payment_batch_num: String,
    pub payer_account: String,
    pub timestamp_gmt: u64,
    pub timestamp_raw: String,
    pub v2_hash: String,
    /// Numeric fields that were present but did not parse. Their typed value
    /// is zero.
    pub malformed: Vec<&'static str>,
}

impl ParsedNotification {
    /// Extracts the fixed field set. Never fails; unknown fields are ignored.
    pub fn parse(notification: &InboundNotification) -> Self {
        let text = |name: &str| notification.field(name).to_string();
        let mut malformed = Vec::new();

        let payment_amount_raw = text(fields::PAYMENT_AMOUNT);
        let payment_amount = match parse_unsigned_decimal(&payment_amount_raw) {
            Some(amount) => amount,
            None => {
                malformed.push(fields::PAYMENT_AMOUNT);
                Decimal::ZERO
            }
        };

        let timestamp_raw = text(fields::TIMESTAMPGMT);
        let timestamp_gmt = match parse_unsigned_int(&timestamp_raw) {
            Some(ts) => ts,
            None => {
                malformed.push(fields::TIMESTAMPGMT);
                0
            }
        };

        Self {
            payee_account: text(fields::PAYEE_ACCOUNT),
            payment_id: text(fields::PAYMENT_ID),
            payment_amount,
            payment_amount_raw,
            payment_units: text(fields::PAYMENT_UNITS),
            payment_batch_num: text(fields::PAYMENT_BATCH_NUM),
            payer_account: text(fields::PAYER_ACCOUNT),
            timestamp_gmt,
            timestamp_raw,
            v2_hash: text(fields::V2_HASH),
            malformed,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.malformed.is_empty()
    }
}

// An absent field is zero, not malformed.
fn parse_unsigned_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .ok()
        .filter(|amount| !amount.is_sign_negative() || amount.is_zero())
}

fn parse_unsigned_int(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse().ok()
}
