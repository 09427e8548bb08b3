//! gRPC plumbing for the Scalar DL client
//!
//! - Per-request signing layouts (`SignWith`)
//! - tonic-backed Ledger and Auditor endpoints
//! - `rpc.status-bin` trailer decoding
//! - Authorization credential interceptor

mod endpoint;
mod interceptor;
mod signing;
mod status;

pub use endpoint::{GrpcAuditor, GrpcLedger, ServiceTarget};
pub use interceptor::{CredentialInterceptor, AUTHORIZATION_KEY};
pub use signing::SignWith;
pub use status::{decode_status, status_with_trailer, STATUS_TRAILER_KEY};
