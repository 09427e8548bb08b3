//! tonic implementations of the Ledger and Auditor endpoints
//!
//! Every service is reached over two channels: the operational port and the
//! privileged port used for certificate registration. Channels are created
//! lazily, so constructing an endpoint performs no I/O but must happen inside
//! a tokio runtime.

use async_trait::async_trait;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::debug;
use x509_cert::Certificate;

use crate::infra::{AuditorEndpoint, ClientError, LedgerEndpoint, Result};
use crate::proto;
use crate::proto::auditor_client::AuditorClient;
use crate::proto::auditor_privileged_client::AuditorPrivilegedClient;
use crate::proto::ledger_client::LedgerClient;
use crate::proto::ledger_privileged_client::LedgerPrivilegedClient;

use super::interceptor::CredentialInterceptor;
use super::status::decode_status;

type AuthChannel = InterceptedService<Channel, CredentialInterceptor>;

/// Where and how to reach one service
#[derive(Debug, Clone, Copy)]
pub struct ServiceTarget<'a> {
    pub host: &'a str,
    pub port: u16,
    pub privileged_port: u16,
    /// PEM root certificate; `Some` switches the channels to TLS
    pub tls_ca_root_cert: Option<&'a str>,
    pub authorization_credential: Option<&'a str>,
}

impl ServiceTarget<'_> {
    fn channels(&self) -> Result<(AuthChannel, AuthChannel)> {
        let tls = self
            .tls_ca_root_cert
            .map(|pem| tls_config(self.host, pem))
            .transpose()?;
        let interceptor = CredentialInterceptor::new(self.authorization_credential)?;

        let normal = lazy_channel(self.host, self.port, tls.as_ref())?;
        let privileged = lazy_channel(self.host, self.privileged_port, tls.as_ref())?;

        Ok((
            InterceptedService::new(normal, interceptor.clone()),
            InterceptedService::new(privileged, interceptor),
        ))
    }
}

/// TLS settings trusting exactly the given root certificate(s)
fn tls_config(host: &str, pem: &str) -> Result<ClientTlsConfig> {
    match Certificate::load_pem_chain(pem.as_bytes()) {
        Ok(chain) if !chain.is_empty() => {}
        Ok(_) => return Err(ClientError::Tls("no certificate in root cert PEM".to_string())),
        Err(e) => return Err(ClientError::Tls(format!("root cert is not valid: {e}"))),
    }

    Ok(ClientTlsConfig::new()
        .ca_certificate(tonic::transport::Certificate::from_pem(pem))
        .domain_name(host))
}

fn lazy_channel(host: &str, port: u16, tls: Option<&ClientTlsConfig>) -> Result<Channel> {
    let scheme = if tls.is_some() { "https" } else { "http" };
    let uri = format!("{scheme}://{host}:{port}");

    let mut endpoint = Endpoint::from_shared(uri.clone())
        .map_err(|e| ClientError::Configuration(format!("invalid address {uri}: {e}")))?;

    if let Some(tls) = tls {
        endpoint = endpoint
            .tls_config(tls.clone())
            .map_err(|e| ClientError::Tls(e.to_string()))?;
    }

    debug!(%uri, "created lazy channel");
    Ok(endpoint.connect_lazy())
}

// ============================================================================
// Ledger
// ============================================================================

/// Ledger reached over gRPC
#[derive(Clone)]
pub struct GrpcLedger {
    client: LedgerClient<AuthChannel>,
    privileged: LedgerPrivilegedClient<AuthChannel>,
}

impl GrpcLedger {
    pub fn connect(target: ServiceTarget<'_>) -> Result<Self> {
        let (normal, privileged) = target.channels()?;
        Ok(Self {
            client: LedgerClient::new(normal),
            privileged: LedgerPrivilegedClient::new(privileged),
        })
    }
}

#[async_trait]
impl LedgerEndpoint for GrpcLedger {
    async fn register_cert(&self, request: proto::CertificateRegistrationRequest) -> Result<()> {
        self.privileged
            .clone()
            .register_cert(request)
            .await
            .map_err(decode_status)?;
        Ok(())
    }

    async fn register_contract(&self, request: proto::ContractRegistrationRequest) -> Result<()> {
        self.client
            .clone()
            .register_contract(request)
            .await
            .map_err(decode_status)?;
        Ok(())
    }

    async fn list_contracts(
        &self,
        request: proto::ContractsListingRequest,
    ) -> Result<proto::ContractsListingResponse> {
        let response = self
            .client
            .clone()
            .list_contracts(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }

    async fn execute_contract(
        &self,
        request: proto::ContractExecutionRequest,
    ) -> Result<proto::ContractExecutionResponse> {
        let response = self
            .client
            .clone()
            .execute_contract(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }

    async fn validate_ledger(
        &self,
        request: proto::LedgerValidationRequest,
    ) -> Result<proto::LedgerValidationResponse> {
        let response = self
            .client
            .clone()
            .validate_ledger(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }

    async fn validate_ledgers(
        &self,
        request: proto::LedgersValidationRequest,
    ) -> Result<proto::LedgerValidationResponse> {
        let response = self
            .client
            .clone()
            .validate_ledgers(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }

    async fn retrieve_asset_proof(
        &self,
        request: proto::AssetProofRetrievalRequest,
    ) -> Result<proto::AssetProofRetrievalResponse> {
        let response = self
            .client
            .clone()
            .retrieve_asset_proof(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }

    async fn abort_execution(
        &self,
        request: proto::ExecutionAbortRequest,
    ) -> Result<proto::ExecutionAbortResponse> {
        let response = self
            .client
            .clone()
            .abort_execution(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }
}

// ============================================================================
// Auditor
// ============================================================================

/// Auditor reached over gRPC
#[derive(Clone)]
pub struct GrpcAuditor {
    client: AuditorClient<AuthChannel>,
    privileged: AuditorPrivilegedClient<AuthChannel>,
}

impl GrpcAuditor {
    pub fn connect(target: ServiceTarget<'_>) -> Result<Self> {
        let (normal, privileged) = target.channels()?;
        Ok(Self {
            client: AuditorClient::new(normal),
            privileged: AuditorPrivilegedClient::new(privileged),
        })
    }
}

#[async_trait]
impl AuditorEndpoint for GrpcAuditor {
    async fn register_cert(&self, request: proto::CertificateRegistrationRequest) -> Result<()> {
        self.privileged
            .clone()
            .register_cert(request)
            .await
            .map_err(decode_status)?;
        Ok(())
    }

    async fn register_contract(&self, request: proto::ContractRegistrationRequest) -> Result<()> {
        self.client
            .clone()
            .register_contract(request)
            .await
            .map_err(decode_status)?;
        Ok(())
    }

    async fn order_execution(
        &self,
        request: proto::ContractExecutionRequest,
    ) -> Result<proto::ExecutionOrderingResponse> {
        let response = self
            .client
            .clone()
            .order_execution(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }

    async fn validate_execution(
        &self,
        request: proto::ExecutionValidationRequest,
    ) -> Result<proto::ContractExecutionResponse> {
        let response = self
            .client
            .clone()
            .validate_execution(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }

    async fn validate_ledger(
        &self,
        request: proto::LedgerValidationRequest,
    ) -> Result<proto::LedgerValidationResponse> {
        let response = self
            .client
            .clone()
            .validate_ledger(request)
            .await
            .map_err(decode_status)?;
        Ok(response.into_inner())
    }
}
