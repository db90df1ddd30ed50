//! Default merchant account configuration
//!
//! Seeds the payment profile this deployment bills through. Validated with
//! the same rules as profiles created elsewhere, so a bad value blocks
//! startup.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::payment::{provider_config, ProviderConfig, ProviderOptions};

use super::error::ValidationError;

/// Merchant account section
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    /// PerfectMoney account receiving payments, e.g. `U1234567`
    #[serde(default)]
    pub payee_account: String,

    /// Name shown to the payer on the gateway page
    #[serde(default)]
    pub payee_name: String,

    /// Alternate passphrase used for the V2 hash
    pub alternate_passphrase: Option<SecretString>,
}

impl ProviderSection {
    fn options(&self) -> ProviderOptions {
        let options = ProviderOptions::new()
            .with(provider_config::PAYEE_ACCOUNT, self.payee_account.as_str())
            .with(provider_config::PAYEE_NAME, self.payee_name.as_str());
        match &self.alternate_passphrase {
            Some(secret) => options.with(
                provider_config::ALTERNATE_PASSPHRASE,
                secret.expose_secret().as_str(),
            ),
            None => options,
        }
    }

    /// Validated provider configuration.
    pub fn provider_config(&self) -> Result<ProviderConfig, ValidationError> {
        Ok(ProviderConfig::from_options(self.options())?)
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.provider_config().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::ProviderConfigError;

    fn section(account: &str, name: &str, secret: Option<&str>) -> ProviderSection {
        ProviderSection {
            payee_account: account.to_string(),
            payee_name: name.to_string(),
            alternate_passphrase: secret.map(|s| SecretString::new(s.to_string())),
        }
    }

    #[test]
    fn complete_section_builds_config() {
        let config = section("U1234567", "Shop", Some("pass")).provider_config().unwrap();

        assert_eq!(config.payee_account(), "U1234567");
        assert_eq!(config.shared_secret().expose_secret(), "pass");
    }

    #[test]
    fn missing_account_is_reported_first() {
        let err = section("", "", None).validate().unwrap_err();

        assert!(matches!(
            err,
            ValidationError::InvalidProvider(ProviderConfigError::InvalidPayeeAccount)
        ));
    }

    #[test]
    fn missing_passphrase_blocks_startup() {
        let err = section("U1", "Shop", None).validate().unwrap_err();

        assert!(matches!(
            err,
            ValidationError::InvalidProvider(ProviderConfigError::InvalidAlternatePassphrase)
        ));
    }

    #[test]
    fn section_and_stored_profiles_share_the_emptiness_rule() {
        let stored = provider_config::validate(
            ProviderOptions::new()
                .with(provider_config::PAYEE_ACCOUNT, "  ")
                .with(provider_config::PAYEE_NAME, "Shop")
                .with(provider_config::ALTERNATE_PASSPHRASE, "x"),
        );

        assert!(stored.is_valid());
        assert!(section("  ", "Shop", Some("x")).validate().is_ok());
        assert!(section("", "Shop", Some("x")).validate().is_err());
    }

    #[test]
    fn values_are_passed_through_verbatim() {
        let config = section("U1234567 ", "Shop", Some("pass")).provider_config().unwrap();

        assert_eq!(config.payee_account(), "U1234567 ");
    }

    #[test]
    fn debug_does_not_print_passphrase() {
        let rendered = format!("{:?}", section("U1", "Shop", Some("topsecret")));
        assert!(!rendered.contains("topsecret"));
    }
}
