//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PurchaseLedgerLookup` - Resolves `PAYMENT_ID` to a purchase request
//! - `PaymentLedger` - Idempotent record of credited payments
//! - `CallbackLogRepository` - Audit trail of every notification

mod callback_log;
mod payment_ledger;
mod purchase_ledger;

pub use callback_log::{CallbackLogEntry, CallbackLogRepository};
pub use payment_ledger::{PaymentLedger, PaymentReceipt, RecordResult};
pub use purchase_ledger::PurchaseLedgerLookup;
