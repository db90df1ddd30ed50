//! In-memory adapters for development and tests.
//!
//! State lives for the life of the process. Use the PostgreSQL adapters for
//! anything that must survive a restart.

mod callback_log;
mod payment_ledger;
mod purchase_ledger;

pub use callback_log::InMemoryCallbackLog;
pub use payment_ledger::InMemoryPaymentLedger;
pub use purchase_ledger::InMemoryPurchaseLedger;
