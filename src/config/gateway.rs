//! Gateway configuration
//!
//! Deployment-wide PerfectMoney settings. Merchant credentials live in the
//! `provider` section and on payment profiles.

use serde::Deserialize;

use crate::domain::payment::{
    NumericPolicy, OriginGuard, PerfectMoneySettings, DEFAULT_API_ENDPOINT,
};

use super::error::ValidationError;

/// PerfectMoney gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway API (`step1.asp` is appended)
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Public URL of this service's callback endpoint, sent as `STATUS_URL`
    #[serde(default)]
    pub status_url: String,

    /// Comma-separated notifier addresses. Replaces the published list.
    pub allowed_addresses: Option<String>,

    /// Handling of unparseable numeric fields (`reject` or `coerce`)
    #[serde(default)]
    pub numeric_policy: NumericPolicy,

    /// Take the caller address from `X-Forwarded-For`/`X-Real-IP`.
    /// Only enable behind a proxy that overwrites these headers.
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

impl GatewayConfig {
    /// Builds the origin guard, falling back to the published addresses.
    pub fn origin_guard(&self) -> Result<OriginGuard, ValidationError> {
        match self.allowed_addresses.as_deref() {
            Some(list) if !list.trim().is_empty() => {
                let entries = list.split(',').map(str::trim).filter(|s| !s.is_empty());
                OriginGuard::new(entries)
                    .map_err(|e| ValidationError::InvalidGatewayAddress(e.to_string()))
            }
            _ => Ok(OriginGuard::default()),
        }
    }

    /// Domain settings for the PerfectMoney gateway.
    pub fn settings(&self) -> Result<PerfectMoneySettings, ValidationError> {
        Ok(PerfectMoneySettings {
            api_endpoint: self.api_endpoint.clone(),
            status_url: self.status_url.clone(),
            origin_guard: self.origin_guard()?,
            numeric_policy: self.numeric_policy,
        })
    }

    /// Validate gateway configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if !is_http_url(&self.api_endpoint) {
            return Err(ValidationError::InvalidApiEndpoint);
        }
        if !self.status_url.is_empty() && !is_http_url(&self.status_url) {
            return Err(ValidationError::InvalidStatusUrl);
        }
        if production {
            if self.status_url.is_empty() {
                return Err(ValidationError::MissingRequired("GATEWAY__STATUS_URL"));
            }
            if !self.status_url.starts_with("https://") {
                return Err(ValidationError::StatusUrlMustBeHttps);
            }
        }
        self.origin_guard()?;
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            status_url: String::new(),
            allowed_addresses: None,
            numeric_policy: NumericPolicy::default(),
            trust_forwarded_headers: false,
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}
