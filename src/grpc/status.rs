//! Structured status carried in the `rpc.status-bin` trailer
//!
//! Ledger and Auditor attach an encoded `rpc.Status { code, message }` to
//! every failed call. The gRPC status code itself is not meaningful to the
//! client; the Scalar DL status code in the trailer is.

use prost::Message;
use tonic::metadata::{MetadataMap, MetadataValue};
use tracing::debug;

use crate::domain::StatusCode;
use crate::infra::ClientError;
use crate::proto;

/// Binary trailer key holding the encoded `rpc.Status`
pub const STATUS_TRAILER_KEY: &str = "rpc.status-bin";

/// Turn a failed RPC into the most specific client error available.
///
/// - trailer present and decodable: `Status` with the carried code
/// - trailer present but undecodable, or other metadata without the trailer:
///   `Status` with `UnknownTransactionStatus`
/// - no metadata at all: `Transport`, the call never reached a service
pub fn decode_status(status: tonic::Status) -> ClientError {
    if status.metadata().is_empty() {
        return ClientError::Transport(Box::new(status));
    }

    let Some(value) = status.metadata().get_bin(STATUS_TRAILER_KEY) else {
        debug!(grpc_code = ?status.code(), "failed call without status trailer");
        return ClientError::status(StatusCode::UnknownTransactionStatus, status.message());
    };

    let decoded = value
        .to_bytes()
        .ok()
        .and_then(|bytes| proto::Status::decode(bytes).ok());

    match decoded {
        Some(detail) => match StatusCode::from_i32(detail.code) {
            Some(code) => ClientError::status(code, detail.message),
            None => ClientError::status(
                StatusCode::UnknownTransactionStatus,
                format!("unknown status code {}: {}", detail.code, detail.message),
            ),
        },
        None => ClientError::status(
            StatusCode::UnknownTransactionStatus,
            "undecodable status trailer",
        ),
    }
}

/// Build a failed-call status carrying a Scalar DL status trailer
pub fn status_with_trailer(code: StatusCode, message: impl Into<String>) -> tonic::Status {
    let message = message.into();
    let detail = proto::Status {
        code: code.as_i32(),
        message: message.clone(),
    };

    let mut metadata = MetadataMap::new();
    metadata.insert_bin(
        STATUS_TRAILER_KEY,
        MetadataValue::from_bytes(&detail.encode_to_vec()),
    );

    tonic::Status::with_metadata(grpc_code_for(code), message, metadata)
}

fn grpc_code_for(code: StatusCode) -> tonic::Code {
    match code.as_i32() {
        200..=299 => tonic::Code::Ok,
        300..=399 => tonic::Code::FailedPrecondition,
        400..=499 => tonic::Code::InvalidArgument,
        503 => tonic::Code::Unavailable,
        _ => tonic::Code::Internal,
    }
}
