//! Infrastructure layer for the Scalar DL client
//!
//! Contains:
//! - The single client error taxonomy
//! - Endpoint traits the flows talk through (Ledger, Auditor)

mod error;
mod traits;

pub use error::*;
pub use traits::*;
