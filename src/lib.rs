//! Scalar DL client library
//!
//! Signs requests with the holder's ECDSA key, sends them to Ledger and,
//! when enabled, to Auditor over gRPC, and cross-checks the proofs the two
//! services return.
//!
//! ## Modules
//!
//! - [`client`] - Configuration and the client flows
//! - [`crypto`] - Request signing and proof verification
//! - [`domain`] - Proofs, status codes and flow results
//! - [`grpc`] - gRPC endpoints, request signing layouts, status trailers
//! - [`infra`] - Error type and endpoint traits
//! - [`telemetry`] - Logging setup
//! - [`proto`] - Protocol buffer definitions

pub mod client;
pub mod crypto;
pub mod domain;
pub mod grpc;
pub mod infra;
pub mod proto;
pub mod telemetry;

// Re-export commonly used types
pub use client::{ClientConfig, ClientMode, ClientService, LedgerValidationArgs};
pub use domain::{
    AssetProofRecord, ContractExecutionResult, ContractsListing, JsonObject,
    LedgerValidationResult, Proof, StatusCode, TransactionState,
};
pub use infra::{ClientError, Result};
