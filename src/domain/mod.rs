//! Domain models for the Scalar DL client
//!
//! Asset proofs, status codes, flow results and the JSON object model used
//! for contract arguments.

mod json;
mod proof;
mod results;
mod status_code;

pub use json::*;
pub use proof::*;
pub use results::*;
pub use status_code::*;
