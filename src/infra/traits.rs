//! Endpoint seams between the client flows and the Scalar DL services
//!
//! Each trait covers one service including its privileged (administrative)
//! channel. Implementations decode structured failures into
//! [`ClientError`](super::ClientError) before returning.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::proto;

use super::Result;

/// Ledger: executes contracts and maintains asset history.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerEndpoint: Send + Sync {
    /// Register a certificate over the privileged channel
    async fn register_cert(&self, request: proto::CertificateRegistrationRequest) -> Result<()>;

    async fn register_contract(&self, request: proto::ContractRegistrationRequest) -> Result<()>;

    async fn list_contracts(
        &self,
        request: proto::ContractsListingRequest,
    ) -> Result<proto::ContractsListingResponse>;

    async fn execute_contract(
        &self,
        request: proto::ContractExecutionRequest,
    ) -> Result<proto::ContractExecutionResponse>;

    async fn validate_ledger(
        &self,
        request: proto::LedgerValidationRequest,
    ) -> Result<proto::LedgerValidationResponse>;

    /// Validate an asset's whole history in one request
    async fn validate_ledgers(
        &self,
        request: proto::LedgersValidationRequest,
    ) -> Result<proto::LedgerValidationResponse>;

    async fn retrieve_asset_proof(
        &self,
        request: proto::AssetProofRetrievalRequest,
    ) -> Result<proto::AssetProofRetrievalResponse>;

    async fn abort_execution(
        &self,
        request: proto::ExecutionAbortRequest,
    ) -> Result<proto::ExecutionAbortResponse>;
}

/// Auditor: orders executions and re-validates Ledger's results.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuditorEndpoint: Send + Sync {
    /// Register a certificate over the privileged channel
    async fn register_cert(&self, request: proto::CertificateRegistrationRequest) -> Result<()>;

    async fn register_contract(&self, request: proto::ContractRegistrationRequest) -> Result<()>;

    /// Obtain Auditor's ordering signature for an execution request
    async fn order_execution(
        &self,
        request: proto::ContractExecutionRequest,
    ) -> Result<proto::ExecutionOrderingResponse>;

    /// Re-execute a request and return Auditor's own proofs
    async fn validate_execution(
        &self,
        request: proto::ExecutionValidationRequest,
    ) -> Result<proto::ContractExecutionResponse>;

    async fn validate_ledger(
        &self,
        request: proto::LedgerValidationRequest,
    ) -> Result<proto::LedgerValidationResponse>;
}
