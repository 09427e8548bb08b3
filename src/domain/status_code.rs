//! Status codes reported by Ledger and Auditor
//!
//! The numeric values are part of the wire contract: they travel in
//! `LedgerValidationResponse.status_code` and in the `rpc.status-bin`
//! trailer of failed calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a request handled by Ledger or Auditor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum StatusCode {
    /// The request succeeded
    Ok = 200,
    /// The stored hash of an asset record differs from the expected value
    InvalidHash = 300,
    /// The stored prev_hash of an asset record differs from the expected value
    InvalidPrevHash = 301,
    /// A previously executed contract produced a record that cannot be validated
    InvalidContract = 302,
    /// The stored output of an asset record differs from the expected value
    InvalidOutput = 303,
    /// The same nonce has been used more than once
    InvalidNonce = 304,
    /// Ledger states between organizations are inconsistent
    InconsistentStates = 305,
    /// A request is inconsistent and may have been tampered with
    InconsistentRequest = 306,
    /// The signature is invalid or could not be created
    InvalidSignature = 400,
    /// A key could not be loaded
    UnloadableKey = 401,
    /// A contract could not be loaded
    UnloadableContract = 402,
    /// The certificate is not registered
    CertificateNotFound = 403,
    /// The contract is not registered
    ContractNotFound = 404,
    /// The certificate is already registered
    CertificateAlreadyRegistered = 405,
    /// The contract is already registered
    ContractAlreadyRegistered = 406,
    /// The request is invalid
    InvalidRequest = 407,
    /// The contract hit an unrecoverable contextual error
    ContractContextualError = 408,
    /// The asset does not exist
    AssetNotFound = 409,
    /// The function is not registered
    FunctionNotFound = 410,
    /// A function could not be loaded
    UnloadableFunction = 411,
    /// The function is invalid
    InvalidFunction = 412,
    /// Storage failure such as an IO error
    DatabaseError = 500,
    /// The outcome of a transaction is unknown
    UnknownTransactionStatus = 501,
    /// Runtime failure
    RuntimeError = 502,
    /// The service is temporarily unavailable
    Unavailable = 503,
    /// Conflicting transactions
    Conflict = 504,
}

impl StatusCode {
    /// Numeric wire value
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Decode a numeric wire value
    pub fn from_i32(code: i32) -> Option<Self> {
        use StatusCode::*;

        let status = match code {
            200 => Ok,
            300 => InvalidHash,
            301 => InvalidPrevHash,
            302 => InvalidContract,
            303 => InvalidOutput,
            304 => InvalidNonce,
            305 => InconsistentStates,
            306 => InconsistentRequest,
            400 => InvalidSignature,
            401 => UnloadableKey,
            402 => UnloadableContract,
            403 => CertificateNotFound,
            404 => ContractNotFound,
            405 => CertificateAlreadyRegistered,
            406 => ContractAlreadyRegistered,
            407 => InvalidRequest,
            408 => ContractContextualError,
            409 => AssetNotFound,
            410 => FunctionNotFound,
            411 => UnloadableFunction,
            412 => InvalidFunction,
            500 => DatabaseError,
            501 => UnknownTransactionStatus,
            502 => RuntimeError,
            503 => Unavailable,
            504 => Conflict,
            _ => return None,
        };

        Some(status)
    }

    /// Decode the unsigned status field of a validation response
    pub fn from_u32(code: u32) -> Option<Self> {
        i32::try_from(code).ok().and_then(Self::from_i32)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}
