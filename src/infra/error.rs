//! Error types for the Scalar DL client

use thiserror::Error;

use crate::crypto::SigningError;
use crate::domain::StatusCode;

/// Errors that can occur in the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing or invalid configuration field
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Private key material could not be parsed
    #[error("key error: {0}")]
    Key(String),

    /// TLS root certificate could not be parsed
    #[error("tls error: {0}")]
    Tls(String),

    /// Flow invoked while the session is not in client mode
    #[error("this operation is only available in client mode")]
    InvalidMode,

    /// Caller-supplied argument missing, empty or out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The RPC failed without a decodable status
    #[error("transport error: {0}")]
    Transport(Box<tonic::Status>),

    /// Structured failure reported by Ledger or Auditor, or detected locally
    /// when their responses disagree
    #[error("{code}: {message}")]
    Status { code: StatusCode, message: String },

    /// Signer failed while signing a request
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Flow invoked after the session was closed
    #[error("client service is closed")]
    Closed,
}

impl ClientError {
    pub fn status(code: StatusCode, message: impl Into<String>) -> Self {
        ClientError::Status {
            code,
            message: message.into(),
        }
    }

    /// Ledger and Auditor disagree
    pub fn inconsistent_states(message: impl Into<String>) -> Self {
        Self::status(StatusCode::InconsistentStates, message)
    }

    /// Status code a caller can branch on
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClientError::Configuration(_)
            | ClientError::InvalidMode
            | ClientError::InvalidArgument(_) => StatusCode::InvalidRequest,
            ClientError::Key(_) | ClientError::Tls(_) => StatusCode::UnloadableKey,
            ClientError::Transport(_) | ClientError::Closed => StatusCode::Unavailable,
            ClientError::Status { code, .. } => *code,
            ClientError::Signing(_) => StatusCode::InvalidSignature,
        }
    }

    pub fn is_inconsistent_states(&self) -> bool {
        matches!(
            self,
            ClientError::Status {
                code: StatusCode::InconsistentStates,
                ..
            }
        )
    }
}

impl From<tonic::Status> for ClientError {
    fn from(status: tonic::Status) -> Self {
        ClientError::Transport(Box::new(status))
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
