//! Payment domain - PerfectMoney checkout and status notification handling.
//!
//! # Module Organization
//!
//! - `notification` - Raw and parsed inbound notification fields
//! - `hash_verifier` - V2 hash computation and constant-time comparison
//! - `origin_guard` - Source address allow-list
//! - `provider_config` - Per-merchant account options and their validation
//! - `gateway` - The capability trait each provider implements
//! - `perfect_money` - The PerfectMoney provider
//! - `pipeline` - Ordered, short-circuiting callback verification

mod callback_state;
mod gateway;
pub mod hash_verifier;
mod initiation;
mod money;
pub mod notification;
mod origin_guard;
mod perfect_money;
mod pipeline;
pub mod provider_config;
mod purchase_request;
mod rejection;

pub use callback_state::{CallbackOutcome, CallbackState, LogType, PaymentResult};
pub use gateway::PaymentGateway;
pub use hash_verifier::HashFields;
pub use initiation::{PaymentForm, Purchase};
pub use money::{Cost, CurrencyCode};
pub use notification::{InboundNotification, NumericPolicy, ParsedNotification};
pub use origin_guard::{OriginGuard, DEFAULT_GATEWAY_ADDRESSES};
pub use perfect_money::{PerfectMoney, PerfectMoneySettings, DEFAULT_API_ENDPOINT, PROVIDER_ID};
pub use pipeline::CallbackPipeline;
pub use provider_config::{ConfigValidation, ProviderConfig, ProviderConfigError, ProviderOptions};
pub use purchase_request::{PaymentProfile, PurchaseRequest};
pub use rejection::CallbackRejection;
