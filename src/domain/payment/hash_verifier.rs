//! PerfectMoney V2 hash computation and verification.
//!
//! The gateway signs every status notification with:
//!
//! ```text
//! V2_HASH = UPPER(MD5(
//!     PAYMENT_ID ":" PAYEE_ACCOUNT ":" PAYMENT_AMOUNT ":" PAYMENT_UNITS ":"
//!     PAYMENT_BATCH_NUM ":" PAYER_ACCOUNT ":" UPPER(MD5(passphrase)) ":"
//!     TIMESTAMPGMT
//! ))
//! ```
//!
//! MD5 is imposed by the gateway's published protocol. Field order and the
//! `:` separator must not change.

use subtle::ConstantTimeEq;

use super::notification::ParsedNotification;

const SEPARATOR: &str = ":";

/// The notification fields covered by the V2 hash, in signing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFields<'a> {
    pub payment_id: &'a str,
    pub payee_account: &'a str,
    pub payment_amount: &'a str,
    pub payment_units: &'a str,
    pub payment_batch_num: &'a str,
    pub payer_account: &'a str,
    pub timestamp_gmt: &'a str,
}

impl<'a> HashFields<'a> {
    /// Takes the fields as the gateway sent them (raw amount and timestamp
    /// text, not the parsed numbers).
    pub fn from_notification(notification: &'a ParsedNotification) -> Self {
        Self {
            payment_id: &notification.payment_id,
            payee_account: &notification.payee_account,
            payment_amount: &notification.payment_amount_raw,
            payment_units: &notification.payment_units,
            payment_batch_num: &notification.payment_batch_num,
            payer_account: &notification.payer_account,
            timestamp_gmt: &notification.timestamp_raw,
        }
    }
}

/// Computes the expected V2 hash: 32 uppercase hex characters.
pub fn compute_digest(fields: &HashFields<'_>, secret: &str) -> String {
    let secret_hash = md5_upper_hex(secret.as_bytes());
    let joined = [
        fields.payment_id,
        fields.payee_account,
        fields.payment_amount,
        fields.payment_units,
        fields.payment_batch_num,
        fields.payer_account,
        secret_hash.as_str(),
        fields.timestamp_gmt,
    ]
    .join(SEPARATOR);

    md5_upper_hex(joined.as_bytes())
}

/// Case-sensitive comparison of the received hash against the computed one.
///
/// An empty candidate never verifies.
pub fn verify(candidate: &str, computed: &str) -> bool {
    if candidate.is_empty() || candidate.len() != computed.len() {
        return false;
    }
    candidate.as_bytes().ct_eq(computed.as_bytes()).into()
}

fn md5_upper_hex(data: &[u8]) -> String {
    format!("{:X}", md5::compute(data))
}
