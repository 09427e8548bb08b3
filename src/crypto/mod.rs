//! Cryptographic utilities for the Scalar DL client
//!
//! Provides:
//! - The `Signer` / `Verifier` capabilities used to sign requests and check proofs
//! - ECDSA P-256 with SHA-256 implementations backed by PEM keys and X.509 certificates
//! - Big-endian encoding helpers shared by every signed byte layout

mod encoding;
mod signing;


pub use encoding::*;
pub use signing::*;
