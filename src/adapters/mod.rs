//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory stores for development and tests
//! - `postgres` - PostgreSQL stores (sqlx)
//! - `http` - Axum endpoints for the gateway and checkout

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryCallbackLog, InMemoryPaymentLedger, InMemoryPurchaseLedger};
pub use postgres::{PostgresCallbackLog, PostgresPaymentLedger, PostgresPurchaseLedger};
