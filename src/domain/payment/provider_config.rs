//! Merchant account configuration for the PerfectMoney provider.
//!
//! An administrator enters three options per payment profile: the payee
//! account (`U1234567`), the display name shown on the gateway checkout page,
//! and the "alternate passphrase" that keys the V2 hash. Options are validated
//! once when the profile is saved; the resulting [`ProviderConfig`] is
//! immutable and read-only during callback processing.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Option key for the merchant's PerfectMoney account.
pub const PAYEE_ACCOUNT: &str = "payee_account";
/// Option key for the display name shown to the payer.
pub const PAYEE_NAME: &str = "payee_name";
/// Option key for the shared secret used by the V2 hash.
pub const ALTERNATE_PASSPHRASE: &str = "alternate_passphrase";

/// Recognized option keys, in validation order.
const RECOGNIZED_KEYS: [&str; 3] = [PAYEE_ACCOUNT, PAYEE_NAME, ALTERNATE_PASSPHRASE];

/// Raw key/value options as stored on a payment profile.
///
/// Unknown keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderOptions(BTreeMap<String, String>);

impl ProviderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fills every recognized key that is absent with an empty string.
    fn apply_defaults(mut self) -> Self {
        for key in RECOGNIZED_KEYS {
            self.0.entry(key.to_string()).or_default();
        }
        self
    }
}

/// A required provider option is missing.
///
/// Each variant carries a phrase key for the admin UI's localization table
/// and an English fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProviderConfigError {
    #[error("Please enter a valid PerfectMoney payee account.")]
    InvalidPayeeAccount,

    #[error("Please enter a valid payee name.")]
    InvalidPayeeName,

    #[error("Please enter a valid alternate passphrase.")]
    InvalidAlternatePassphrase,
}

impl ProviderConfigError {
    /// Phrase key used to look up the localized message.
    pub fn phrase_key(&self) -> &'static str {
        match self {
            Self::InvalidPayeeAccount => "perfect_money_error_invalid_payee_account",
            Self::InvalidPayeeName => "perfect_money_error_invalid_payee_name",
            Self::InvalidAlternatePassphrase => {
                "perfect_money_error_invalid_alternate_passphrase"
            }
        }
    }

    /// The option key this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidPayeeAccount => PAYEE_ACCOUNT,
            Self::InvalidPayeeName => PAYEE_NAME,
            Self::InvalidAlternatePassphrase => ALTERNATE_PASSPHRASE,
        }
    }

    fn for_field(key: &str) -> Option<Self> {
        match key {
            PAYEE_ACCOUNT => Some(Self::InvalidPayeeAccount),
            PAYEE_NAME => Some(Self::InvalidPayeeName),
            ALTERNATE_PASSPHRASE => Some(Self::InvalidAlternatePassphrase),
            _ => None,
        }
    }
}

/// Outcome of [`validate`]: the normalized options plus any errors.
///
/// At most one error is reported; validation stops at the first missing
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidation {
    pub options: ProviderOptions,
    pub errors: Vec<ProviderConfigError>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts a successful validation into a [`ProviderConfig`].
    pub fn into_config(self) -> Result<ProviderConfig, ProviderConfigError> {
        if let Some(err) = self.errors.first() {
            return Err(*err);
        }
        let value = |key: &str| self.options.get(key).unwrap_or_default().to_string();
        Ok(ProviderConfig {
            payee_account: value(PAYEE_ACCOUNT),
            payee_name: value(PAYEE_NAME),
            shared_secret: SecretString::new(value(ALTERNATE_PASSPHRASE)),
        })
    }
}

/// Applies defaults for the recognized keys, then requires each to be
/// non-empty in declared order.
pub fn validate(options: ProviderOptions) -> ConfigValidation {
    let options = options.apply_defaults();

    let missing = RECOGNIZED_KEYS
        .iter()
        .find(|key| options.get(key).map_or(true, str::is_empty))
        .and_then(|key| ProviderConfigError::for_field(key));

    ConfigValidation {
        options,
        errors: missing.into_iter().collect(),
    }
}

/// Validated, immutable configuration for one merchant account.
#[derive(Clone)]
pub struct ProviderConfig {
    payee_account: String,
    payee_name: String,
    shared_secret: SecretString,
}

impl ProviderConfig {
    /// Validates raw options and builds the config.
    pub fn from_options(options: ProviderOptions) -> Result<Self, ProviderConfigError> {
        validate(options).into_config()
    }

    pub fn payee_account(&self) -> &str {
        &self.payee_account
    }

    pub fn payee_name(&self) -> &str {
        &self.payee_name
    }

    /// The alternate passphrase. Only the hash verifier should read this.
    pub fn shared_secret(&self) -> &SecretString {
        &self.shared_secret
    }

    /// Options form for persistence, including the secret.
    pub fn to_options(&self) -> ProviderOptions {
        ProviderOptions::new()
            .with(PAYEE_ACCOUNT, self.payee_account.clone())
            .with(PAYEE_NAME, self.payee_name.clone())
            .with(ALTERNATE_PASSPHRASE, self.shared_secret.expose_secret().clone())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("payee_account", &self.payee_account)
            .field("payee_name", &self.payee_name)
            .field("shared_secret", &"[REDACTED]")
            .finish()
    }
}
