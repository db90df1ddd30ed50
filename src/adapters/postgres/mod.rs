//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPurchaseLedger` - Purchase requests joined with payment profiles
//! - `PostgresPaymentLedger` - Credited payments, unique per transaction
//! - `PostgresCallbackLog` - Append-only notification audit trail
//!
//! Schema lives in `migrations/`.

mod callback_log;
mod payment_ledger;
mod purchase_ledger;

pub use callback_log::PostgresCallbackLog;
pub use payment_ledger::PostgresPaymentLedger;
pub use purchase_ledger::PostgresPurchaseLedger;
