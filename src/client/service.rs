//! Client session
//!
//! A [`ClientService`] owns the configuration, the request signer and the
//! endpoints to Ledger and (optionally) Auditor. The flows live in sibling
//! modules as further `impl ClientService` blocks.

use std::sync::Arc;

use tracing::info;

use crate::crypto::{EcdsaSha256Signer, Signer};
use crate::grpc::{GrpcAuditor, GrpcLedger};
use crate::infra::{AuditorEndpoint, ClientError, LedgerEndpoint, Result};

use super::config::{ClientConfig, ClientMode};

/// Session with a Scalar DL deployment.
///
/// Flows take `&self`, so a session can be shared behind an `Arc` and used
/// from many tasks at once.
pub struct ClientService {
    config: ClientConfig,
    signer: Arc<dyn Signer>,
    ledger: Option<Arc<dyn LedgerEndpoint>>,
    auditor: Option<Arc<dyn AuditorEndpoint>>,
}

impl ClientService {
    /// Validate the configuration and build gRPC endpoints.
    ///
    /// Channels connect lazily on first use, so this performs no network
    /// I/O, but it must be called from within a tokio runtime.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let signer = EcdsaSha256Signer::from_pem(&config.private_key_pem)
            .map_err(|e| ClientError::Key(e.to_string()))?;

        let ledger: Arc<dyn LedgerEndpoint> =
            Arc::new(GrpcLedger::connect(config.ledger_target())?);

        let auditor: Option<Arc<dyn AuditorEndpoint>> = if config.auditor_enabled {
            Some(Arc::new(GrpcAuditor::connect(config.auditor_target())?))
        } else {
            None
        };

        info!(
            ledger_host = %config.ledger_host,
            ledger_port = config.ledger_port,
            auditor_enabled = config.auditor_enabled,
            tls_enabled = config.tls_enabled,
            "client service created"
        );

        Ok(Self {
            config,
            signer: Arc::new(signer),
            ledger: Some(ledger),
            auditor,
        })
    }

    /// Assemble a session from endpoints built elsewhere.
    ///
    /// The configuration is not validated, but an Auditor endpoint must be
    /// given exactly when `config.auditor_enabled` is set.
    pub fn with_endpoints(
        config: ClientConfig,
        signer: Arc<dyn Signer>,
        ledger: Arc<dyn LedgerEndpoint>,
        auditor: Option<Arc<dyn AuditorEndpoint>>,
    ) -> Result<Self> {
        if config.auditor_enabled != auditor.is_some() {
            return Err(ClientError::Configuration(
                "auditor endpoint must be supplied exactly when the auditor is enabled"
                    .to_string(),
            ));
        }

        Ok(Self {
            config,
            signer,
            ledger: Some(ledger),
            auditor,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.ledger.is_none()
    }

    /// Drop every endpoint. Later flows fail with [`ClientError::Closed`].
    pub fn close(&mut self) {
        if self.ledger.take().is_some() {
            info!("client service closed");
        }
        self.auditor = None;
    }

    /// Fail unless the session is open and in client mode
    pub(super) fn ensure_ready(&self) -> Result<()> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        if self.config.mode != ClientMode::Client {
            return Err(ClientError::InvalidMode);
        }
        Ok(())
    }

    pub(super) fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }

    pub(super) fn ledger(&self) -> Result<&dyn LedgerEndpoint> {
        self.ledger.as_deref().ok_or(ClientError::Closed)
    }

    /// Auditor endpoint, `None` when the auditor is disabled
    pub(super) fn auditor(&self) -> Result<Option<&dyn AuditorEndpoint>> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        Ok(self.auditor.as_deref())
    }
}

impl std::fmt::Debug for ClientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientService")
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .field("auditor", &self.auditor.is_some())
            .finish()
    }
}
