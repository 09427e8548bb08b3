//! Contract registration and listing

use tracing::{debug, info, instrument};

use crate::domain::{parse_object, to_canonical_string, ContractsListing, JsonObject};
use crate::grpc::SignWith;
use crate::infra::{ClientError, Result};
use crate::proto;

use super::service::ClientService;

impl ClientService {
    /// Register a contract with Auditor (when enabled) and then Ledger.
    ///
    /// An Auditor failure stops the flow before Ledger is contacted.
    #[instrument(skip(self, bytecode, properties), fields(bytecode_len = bytecode.len()))]
    pub async fn register_contract(
        &self,
        id: &str,
        name: &str,
        bytecode: &[u8],
        properties: Option<&JsonObject>,
    ) -> Result<()> {
        self.ensure_ready()?;

        if id.is_empty() {
            return Err(ClientError::InvalidArgument("contract id cannot be empty".into()));
        }
        if name.is_empty() {
            return Err(ClientError::InvalidArgument("contract name cannot be empty".into()));
        }

        let config = self.config();
        let mut request = proto::ContractRegistrationRequest {
            contract_id: id.to_string(),
            contract_binary_name: name.to_string(),
            contract_byte_code: bytecode.to_vec(),
            contract_properties: properties.map(to_canonical_string).unwrap_or_default(),
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            signature: Vec::new(),
        };
        request.sign_with(self.signer())?;

        if let Some(auditor) = self.auditor()? {
            auditor.register_contract(request.clone()).await?;
            debug!("auditor accepted contract");
        }

        self.ledger()?.register_contract(request).await?;

        info!("contract registered");
        Ok(())
    }

    /// List contracts registered under the caller's certificate.
    ///
    /// With `contract_id` only that contract is returned.
    #[instrument(skip(self))]
    pub async fn list_contracts(&self, contract_id: Option<&str>) -> Result<ContractsListing> {
        self.ensure_ready()?;

        let config = self.config();
        let mut request = proto::ContractsListingRequest {
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            contract_id: contract_id.unwrap_or_default().to_string(),
            signature: Vec::new(),
        };
        request.sign_with(self.signer())?;

        let response = self.ledger()?.list_contracts(request).await?;

        Ok(ContractsListing {
            contracts: parse_object(&response.json).unwrap_or_default(),
        })
    }
}
