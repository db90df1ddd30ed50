//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors)
//! - `payment` - Gateway notification verification and payment initiation

pub mod foundation;
pub mod payment;
