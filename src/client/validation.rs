//! Ledger validation and asset proof retrieval

use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::crypto::short_hex;
use crate::domain::{AssetProofRecord, JsonObject, LedgerValidationResult, Proof, StatusCode};
use crate::grpc::SignWith;
use crate::infra::{ClientError, Result};
use crate::proto;

use super::service::ClientService;

/// Highest age a validation range may reach
pub const MAX_AGE: i64 = i32::MAX as i64;

/// Age meaning "the latest version" in proof retrieval
pub const LATEST_AGE: i32 = -1;

/// Which part of an asset's history to validate.
///
/// Ages default to the whole history: `0..=i32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerValidationArgs {
    pub asset_id: String,
    pub start_age: Option<i64>,
    pub end_age: Option<i64>,
}

impl LedgerValidationArgs {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            start_age: None,
            end_age: None,
        }
    }

    pub fn start_age(mut self, age: i64) -> Self {
        self.start_age = Some(age);
        self
    }

    pub fn end_age(mut self, age: i64) -> Self {
        self.end_age = Some(age);
        self
    }

    pub fn ages(self, start: i64, end: i64) -> Self {
        self.start_age(start).end_age(end)
    }

    /// Resolve defaults and check `0 <= start <= end <= i32::MAX`
    pub fn resolve(&self) -> Result<(u32, u32)> {
        if self.asset_id.is_empty() {
            return Err(ClientError::InvalidArgument("asset id cannot be empty".into()));
        }

        let start = self.start_age.unwrap_or(0);
        let end = self.end_age.unwrap_or(MAX_AGE);

        if start < 0 || end < start || end > MAX_AGE {
            return Err(ClientError::InvalidArgument(format!(
                "invalid age range {}..={}",
                start, end
            )));
        }

        Ok((start as u32, end as u32))
    }
}

impl From<&str> for LedgerValidationArgs {
    fn from(asset_id: &str) -> Self {
        Self::new(asset_id)
    }
}

impl From<String> for LedgerValidationArgs {
    fn from(asset_id: String) -> Self {
        Self::new(asset_id)
    }
}

/// Combine Ledger's and (optionally) Auditor's validation responses
fn reconcile(
    from_ledger: proto::LedgerValidationResponse,
    from_auditor: Option<proto::LedgerValidationResponse>,
) -> LedgerValidationResult {
    let ledger_code = StatusCode::from_u32(from_ledger.status_code)
        .unwrap_or(StatusCode::UnknownTransactionStatus);
    let proof = from_ledger.proof.map(Proof::from);

    let Some(from_auditor) = from_auditor else {
        return LedgerValidationResult {
            code: ledger_code,
            proof,
            auditor_proof: None,
        };
    };

    let auditor_code = StatusCode::from_u32(from_auditor.status_code)
        .unwrap_or(StatusCode::UnknownTransactionStatus);
    let auditor_proof = from_auditor.proof.map(Proof::from);

    let consistent = match (&proof, &auditor_proof) {
        (Some(ours), Some(theirs)) => {
            ledger_code.is_ok()
                && auditor_code.is_ok()
                && !ours.is_empty()
                && !theirs.is_empty()
                && ours.hash == theirs.hash
        }
        _ => false,
    };

    if !consistent {
        warn!(
            %ledger_code,
            %auditor_code,
            ledger_hash = %proof.as_ref().map(|p| short_hex(&p.hash)).unwrap_or_default(),
            auditor_hash = %auditor_proof.as_ref().map(|p| short_hex(&p.hash)).unwrap_or_default(),
            "ledger and auditor disagree on asset state"
        );
    }

    LedgerValidationResult {
        code: if consistent {
            StatusCode::Ok
        } else {
            StatusCode::InconsistentStates
        },
        proof,
        auditor_proof,
    }
}

impl ClientService {
    /// Validate the history of an asset.
    ///
    /// With Auditor and linearizable validation enabled this executes the
    /// configured validation contract; otherwise Ledger and Auditor validate
    /// concurrently and their proofs are compared.
    #[instrument(skip(self, args), fields(asset_id))]
    pub async fn validate_ledger(
        &self,
        args: impl Into<LedgerValidationArgs>,
    ) -> Result<LedgerValidationResult> {
        self.ensure_ready()?;

        let args = args.into();
        tracing::Span::current().record("asset_id", args.asset_id.as_str());
        let (start_age, end_age) = args.resolve()?;

        let result = if self.config().uses_linearizable_validation() {
            self.validate_by_contract(&args.asset_id, start_age, end_age)
                .await?
        } else {
            self.validate_directly(&args.asset_id, start_age, end_age)
                .await?
        };

        info!(code = %result.code, "ledger validated");
        Ok(result)
    }

    async fn validate_by_contract(
        &self,
        asset_id: &str,
        start_age: u32,
        end_age: u32,
    ) -> Result<LedgerValidationResult> {
        let contract_id = &self.config().linearizable_validation_contract_id;
        debug!(%contract_id, "validating through contract execution");

        let mut argument: JsonObject = match json!({
            "asset_id": asset_id,
            "start_age": start_age,
            "end_age": end_age,
        }) {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };

        let executed = self.execute_contract(contract_id, &mut argument, None).await?;

        Ok(LedgerValidationResult {
            code: StatusCode::Ok,
            proof: executed.proofs.into_iter().next(),
            auditor_proof: executed.auditor_proofs.into_iter().next(),
        })
    }

    async fn validate_directly(
        &self,
        asset_id: &str,
        start_age: u32,
        end_age: u32,
    ) -> Result<LedgerValidationResult> {
        let config = self.config();
        let mut request = proto::LedgerValidationRequest {
            asset_id: asset_id.to_string(),
            start_age,
            end_age,
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            signature: Vec::new(),
        };
        request.sign_with(self.signer())?;

        let ledger = self.ledger()?;
        let auditor = self.auditor()?;

        // Both calls run in this task and are driven to completion together
        let (from_ledger, from_auditor) = tokio::join!(
            ledger.validate_ledger(request.clone()),
            async {
                match auditor {
                    Some(auditor) => auditor.validate_ledger(request.clone()).await.map(Some),
                    None => Ok(None),
                }
            }
        );

        Ok(reconcile(from_ledger?, from_auditor?))
    }

    /// Validate the whole history of an asset on Ledger in a single request.
    ///
    /// Auditor is not consulted, so `auditor_proof` is always `None`.
    #[instrument(skip(self))]
    pub async fn validate_ledgers(&self, asset_id: &str) -> Result<LedgerValidationResult> {
        self.ensure_ready()?;

        if asset_id.is_empty() {
            return Err(ClientError::InvalidArgument("asset id cannot be empty".into()));
        }

        let config = self.config();
        let mut request = proto::LedgersValidationRequest {
            asset_id: asset_id.to_string(),
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            signature: Vec::new(),
        };
        request.sign_with(self.signer())?;

        let response = self.ledger()?.validate_ledgers(request).await?;
        let result = reconcile(response, None);

        info!(code = %result.code, "ledgers validated");
        Ok(result)
    }

    /// Fetch the proof of an asset from Ledger; `age` defaults to the latest
    #[instrument(skip(self))]
    pub async fn retrieve_asset_proof(
        &self,
        asset_id: &str,
        age: Option<i32>,
    ) -> Result<AssetProofRecord> {
        self.ensure_ready()?;

        if asset_id.is_empty() {
            return Err(ClientError::InvalidArgument("asset id cannot be empty".into()));
        }

        let config = self.config();
        let mut request = proto::AssetProofRetrievalRequest {
            asset_id: asset_id.to_string(),
            age: age.unwrap_or(LATEST_AGE),
            cert_holder_id: config.cert_holder_id.clone(),
            cert_version: config.cert_version,
            signature: Vec::new(),
        };
        request.sign_with(self.signer())?;

        let response = self.ledger()?.retrieve_asset_proof(request).await?;

        Ok(AssetProofRecord {
            proof: response.proof.map(Proof::from),
            ledger_name: response.ledger_name,
        })
    }
}
