//! Contract execution and the Ledger/Auditor cross-check

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::crypto::short_hex;
use crate::domain::{
    json_text_eq, parse_object, to_canonical_string, ContractExecutionResult, JsonObject, Proof,
    TransactionState,
};
use crate::grpc::SignWith;
use crate::infra::{ClientError, Result};
use crate::proto;

use super::service::ClientService;

/// Argument key holding the execution nonce
pub const NONCE_KEY: &str = "nonce";

/// Give the argument a fresh UUIDv4 nonce when it has none.
///
/// A missing, `null` or empty-string nonce is replaced; any other value is
/// left as the caller set it.
pub fn ensure_nonce(argument: &mut JsonObject) {
    let missing = match argument.get(NONCE_KEY) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };

    if missing {
        argument.insert(
            NONCE_KEY.to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
    }
}

const MISMATCH: &str = "the results from Ledger and Auditor don't match";

/// Compare Ledger's execution response with Auditor's re-execution.
///
/// Ledger proofs are looked up by asset id alone; when Ledger returns
/// several proofs for one asset the last one is used.
fn cross_check(
    ledger: &proto::ContractExecutionResponse,
    auditor: &proto::ContractExecutionResponse,
) -> Result<()> {
    if !json_text_eq(&ledger.result, &auditor.result) {
        warn!("contract results differ between ledger and auditor");
        return Err(ClientError::inconsistent_states(MISMATCH));
    }

    if ledger.proofs.len() != auditor.proofs.len() {
        warn!(
            ledger = ledger.proofs.len(),
            auditor = auditor.proofs.len(),
            "proof counts differ between ledger and auditor"
        );
        return Err(ClientError::inconsistent_states(MISMATCH));
    }

    let by_asset: HashMap<&str, &proto::AssetProof> = ledger
        .proofs
        .iter()
        .map(|p| (p.asset_id.as_str(), p))
        .collect();

    for theirs in &auditor.proofs {
        match by_asset.get(theirs.asset_id.as_str()) {
            Some(ours) if ours.age == theirs.age && ours.hash == theirs.hash => {}
            Some(ours) => {
                warn!(
                    asset_id = %theirs.asset_id,
                    ledger_age = ours.age,
                    auditor_age = theirs.age,
                    ledger_hash = %short_hex(&ours.hash),
                    auditor_hash = %short_hex(&theirs.hash),
                    "asset proofs differ between ledger and auditor"
                );
                return Err(ClientError::inconsistent_states(MISMATCH));
            }
            None => {
                warn!(asset_id = %theirs.asset_id, "auditor proof has no ledger counterpart");
                return Err(ClientError::inconsistent_states(MISMATCH));
            }
        }
    }

    Ok(())
}

impl ClientService {
    /// Execute a registered contract.
    ///
    /// With Auditor enabled the request is first ordered by Auditor, then
    /// executed by Ledger, then re-validated by Auditor; disagreement between
    /// the two yields an `InconsistentStates` error.
    ///
    /// A nonce is written into `argument` before anything is sent, so the
    /// caller can still abort the execution when the call fails.
    #[instrument(
        skip(self, argument, function_argument),
        fields(nonce = tracing::field::Empty)
    )]
    pub async fn execute_contract(
        &self,
        id: &str,
        argument: &mut JsonObject,
        function_argument: Option<&JsonObject>,
    ) -> Result<ContractExecutionResult> {
        self.ensure_ready()?;

        if id.is_empty() {
            return Err(ClientError::InvalidArgument("contract id cannot be empty".into()));
        }

        ensure_nonce(argument);
        if let Some(Value::String(nonce)) = argument.get(NONCE_KEY) {
            tracing::Span::current().record("nonce", nonce.as_str());
        }

        let config = self.config();
        let mut request = proto::ContractExecutionRequest {
            contract_id: id.to_string(),
            contract_argument: to_canonical_string(argument),
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            function_argument: function_argument.map(to_canonical_string).unwrap_or_default(),
            signature: Vec::new(),
            auditor_signature: Vec::new(),
        };
        request.sign_with(self.signer())?;

        let auditor = self.auditor()?;

        if let Some(auditor) = auditor {
            let ordered = auditor.order_execution(request.clone()).await?;
            request.auditor_signature = ordered.signature;
            debug!("execution ordered by auditor");
        }

        let from_ledger = self.ledger()?.execute_contract(request.clone()).await?;

        let mut auditor_proofs = Vec::new();
        if let Some(auditor) = auditor {
            let from_auditor = auditor
                .validate_execution(proto::ExecutionValidationRequest {
                    request: Some(request),
                    proofs: from_ledger.proofs.clone(),
                })
                .await?;

            cross_check(&from_ledger, &from_auditor)?;
            auditor_proofs = from_auditor.proofs.into_iter().map(Proof::from).collect();
        }

        info!(proofs = from_ledger.proofs.len(), "contract executed");

        Ok(ContractExecutionResult {
            result: parse_object(&from_ledger.result),
            proofs: from_ledger.proofs.into_iter().map(Proof::from).collect(),
            auditor_proofs,
        })
    }

    /// Ask Ledger to abort the execution identified by `nonce`
    #[instrument(skip(self))]
    pub async fn abort_execution(&self, nonce: &str) -> Result<TransactionState> {
        self.ensure_ready()?;

        if nonce.is_empty() {
            return Err(ClientError::InvalidArgument("nonce cannot be empty".into()));
        }

        let config = self.config();
        let mut request = proto::ExecutionAbortRequest {
            nonce: nonce.to_string(),
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            signature: Vec::new(),
        };
        request.sign_with(self.signer())?;

        let response = self.ledger()?.abort_execution(request).await?;
        let state = TransactionState::from(response.state());

        info!(?state, "abort requested");
        Ok(state)
    }
}
