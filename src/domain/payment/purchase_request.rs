//! Purchase requests and the payment profiles they are billed through.
//!
//! Both are created outside the callback pipeline (checkout and admin setup
//! respectively). The pipeline only reads them.

use crate::domain::foundation::{PaymentProfileId, RequestKey};

use super::money::Cost;
use super::provider_config::ProviderConfig;

/// A merchant account configured for one payment provider.
#[derive(Debug, Clone)]
pub struct PaymentProfile {
    pub id: PaymentProfileId,
    /// Provider identifier, e.g. `perfect_money`.
    pub provider_id: String,
    pub title: String,
    pub active: bool,
    pub config: ProviderConfig,
}

impl PaymentProfile {
    pub fn new(provider_id: impl Into<String>, title: impl Into<String>, config: ProviderConfig) -> Self {
        Self {
            id: PaymentProfileId::new(),
            provider_id: provider_id.into(),
            title: title.into(),
            active: true,
            config,
        }
    }
}

/// A checkout attempt awaiting payment.
///
/// `payment_profile` is the resolved profile reference. It is `None` when
/// the profile was deleted after checkout started.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub request_key: RequestKey,
    pub cost: Cost,
    pub payment_profile_id: PaymentProfileId,
    pub payment_profile: Option<PaymentProfile>,
    /// Free-form purchasable type (`user_upgrade`, `invoice`, ...).
    pub purchasable_type: String,
}

impl PurchaseRequest {
    /// Creates a purchase request bound to a resolved profile.
    pub fn new(request_key: RequestKey, cost: Cost, profile: PaymentProfile) -> Self {
        Self {
            request_key,
            cost,
            payment_profile_id: profile.id,
            payment_profile: Some(profile),
            purchasable_type: String::new(),
        }
    }
}
