//! Client flows against Ledger and Auditor
//!
//! [`ClientService`] is the entry point. Configuration lives in [`config`];
//! each flow is implemented in its own module.

pub mod config;

mod certificate;
mod contract;
mod execution;
mod service;
mod validation;

pub use config::{keys, ClientConfig, ClientMode};
pub use execution::{ensure_nonce, NONCE_KEY};
pub use service::ClientService;
pub use validation::{LedgerValidationArgs, LATEST_AGE, MAX_AGE};
