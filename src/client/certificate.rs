//! Certificate registration

use tracing::{info, instrument, warn};

use crate::infra::Result;
use crate::proto;

use super::service::ClientService;

impl ClientService {
    /// Register the configured certificate with Auditor (when enabled) and Ledger.
    ///
    /// Both services are always contacted. The outcome is Ledger's: an
    /// Auditor failure followed by Ledger success returns `Ok(())` and is
    /// only logged.
    #[instrument(skip(self), fields(cert_holder_id = %self.config().cert_holder_id))]
    pub async fn register_certificate(&self) -> Result<()> {
        self.ensure_ready()?;

        let config = self.config();
        let request = proto::CertificateRegistrationRequest {
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            cert_pem: config.cert_pem.clone(),
        };

        let auditor_outcome = match self.auditor()? {
            Some(auditor) => auditor.register_cert(request.clone()).await,
            None => Ok(()),
        };

        let outcome = self.ledger()?.register_cert(request).await;

        match (&auditor_outcome, &outcome) {
            (Err(e), Ok(())) => {
                warn!(error = %e, "auditor rejected certificate registration, ledger accepted it")
            }
            (_, Ok(())) => info!(cert_version = config.cert_version, "certificate registered"),
            _ => {}
        }

        outcome
    }
}
