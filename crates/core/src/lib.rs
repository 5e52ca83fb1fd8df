//! Pure domain logic for the lip-sync generation platform.
//!
//! No I/O lives here: request validation, the normalized task status
//! vocabulary, the credit pricing policy, and the terminal-guarded
//! status reconciliation rule are all pure functions so they can be
//! exercised without a database or a network.

pub mod error;
pub mod pricing;
pub mod reconcile;
pub mod request;
pub mod status;
pub mod types;
