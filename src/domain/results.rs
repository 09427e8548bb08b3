//! Results returned by the client flows

use std::collections::HashMap;

use crate::proto;

use super::json::JsonObject;
use super::proof::{Proof, ProofKey};
use super::status_code::StatusCode;

/// Result of a contract execution along with the proofs from Ledger and Auditor
#[derive(Debug, Clone, Default)]
pub struct ContractExecutionResult {
    /// Contract output, if the contract produced one
    pub result: Option<JsonObject>,
    /// Proofs of every asset touched, as reported by Ledger
    pub proofs: Vec<Proof>,
    /// Proofs as reported by Auditor; empty when Auditor is disabled
    pub auditor_proofs: Vec<Proof>,
}

impl ContractExecutionResult {
    /// First Ledger proof, if any
    pub fn first_proof(&self) -> Option<&Proof> {
        self.proofs.first()
    }

    /// First Auditor proof, if any
    pub fn first_auditor_proof(&self) -> Option<&Proof> {
        self.auditor_proofs.first()
    }
}

/// Proof lists match as unordered sets keyed by `(id, age)`
fn proofs_match(ours: &[Proof], theirs: &[Proof]) -> bool {
    if ours.len() != theirs.len() {
        return false;
    }

    let theirs: HashMap<ProofKey, &Proof> = theirs.iter().map(|p| (p.key(), p)).collect();

    ours.iter()
        .all(|p| theirs.get(&p.key()).is_some_and(|other| p == *other))
}

impl PartialEq for ContractExecutionResult {
    fn eq(&self, other: &Self) -> bool {
        self.result == other.result
            && proofs_match(&self.proofs, &other.proofs)
            && proofs_match(&self.auditor_proofs, &other.auditor_proofs)
    }
}

/// Outcome of validating an asset's history
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerValidationResult {
    pub code: StatusCode,
    /// Proof reported by Ledger
    pub proof: Option<Proof>,
    /// Proof reported by Auditor; `None` when Auditor is disabled
    pub auditor_proof: Option<Proof>,
}

/// Contracts registered under the caller's certificate
#[derive(Debug, Clone, PartialEq)]
pub struct ContractsListing {
    pub contracts: JsonObject,
}

/// Latest (or requested) proof of an asset as stored by Ledger
#[derive(Debug, Clone, PartialEq)]
pub struct AssetProofRecord {
    pub proof: Option<Proof>,
    pub ledger_name: String,
}

/// State of a transaction after an abort request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Committed,
    Aborted,
    Unknown,
}

impl From<proto::TransactionState> for TransactionState {
    fn from(state: proto::TransactionState) -> Self {
        match state {
            proto::TransactionState::Committed => TransactionState::Committed,
            proto::TransactionState::Aborted => TransactionState::Aborted,
            proto::TransactionState::Unspecified | proto::TransactionState::Unknown => {
                TransactionState::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn proof(id: &str, age: i32, signature: &[u8]) -> Proof {
        Proof {
            id: id.to_string(),
            age,
            nonce: "i-am-nonce".to_string(),
            input: json!({ "argument": "parameter" }).as_object().cloned().unwrap(),
            hash: vec![0x00, 0x01],
            prev_hash: vec![0x11, 0x22],
            signature: signature.to_vec(),
        }
    }

    fn execution(proofs: Vec<Proof>, auditor_proofs: Vec<Proof>) -> ContractExecutionResult {
        ContractExecutionResult {
            result: json!({ "argument": "parameter" }).as_object().cloned(),
            proofs,
            auditor_proofs,
        }
    }

    #[test]
    fn test_ledger_validation_result_equal() {
        let a = LedgerValidationResult {
            code: StatusCode::Ok,
            proof: Some(proof("foo", 999, &[0x00, 0x11])),
            auditor_proof: Some(proof("foo", 999, &[0xCC, 0xDD])),
        };
        assert_eq!(a, a.clone());

        let b = LedgerValidationResult {
            proof: Some(proof("bar", 1, &[0x00, 0x11])),
            ..a.clone()
        };
        assert_ne!(a, b);

        let c = LedgerValidationResult {
            code: StatusCode::InconsistentStates,
            ..a.clone()
        };
        assert_ne!(a, c);
    }

    #[test]
    fn test_execution_result_equal() {
        let a = execution(
            vec![proof("foo", 999, &[0x00, 0x11])],
            vec![proof("foo", 999, &[0xCC, 0xDD])],
        );
        let b = execution(
            vec![proof("foo", 999, &[0x00, 0x11])],
            vec![proof("foo", 999, &[0xCC, 0xDD])],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_execution_result_ignores_order() {
        let a = execution(
            vec![proof("a", 1, &[1]), proof("b", 2, &[2])],
            vec![],
        );
        let b = execution(
            vec![proof("b", 2, &[2]), proof("a", 1, &[1])],
            vec![],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_execution_result_differences() {
        let base = execution(
            vec![proof("foo", 999, &[0x00, 0x11])],
            vec![proof("foo", 999, &[0xCC, 0xDD])],
        );

        let other_proof = execution(
            vec![proof("bar", 0, &[0x00, 0x11])],
            vec![proof("foo", 999, &[0xCC, 0xDD])],
        );
        assert_ne!(base, other_proof);

        let other_signature = execution(
            vec![proof("foo", 999, &[0x00, 0x12])],
            vec![proof("foo", 999, &[0xCC, 0xDD])],
        );
        assert_ne!(base, other_signature);

        let missing_auditor = execution(vec![proof("foo", 999, &[0x00, 0x11])], vec![]);
        assert_ne!(base, missing_auditor);

        let no_result = ContractExecutionResult {
            result: None,
            ..base.clone()
        };
        assert_ne!(base, no_result);
    }

    #[test]
    fn test_first_proofs() {
        let r = execution(vec![proof("a", 0, &[])], vec![]);
        assert_eq!(r.first_proof().map(|p| p.id.as_str()), Some("a"));
        assert!(r.first_auditor_proof().is_none());
    }

    #[test]
    fn test_transaction_state_from_wire() {
        assert_eq!(
            TransactionState::from(proto::TransactionState::Aborted),
            TransactionState::Aborted
        );
        assert_eq!(
            TransactionState::from(proto::TransactionState::Unspecified),
            TransactionState::Unknown
        );
    }
}
