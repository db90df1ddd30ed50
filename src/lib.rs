//! PerfectMoney Callback - Payment status notification verifier
//!
//! This crate verifies PerfectMoney server-to-server payment notifications
//! (V2 hash, source address, purchase request, amount) and builds the
//! checkout form that starts a payment.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
