//! Asset proofs
//!
//! A proof attests one version ("age") of one asset. Ledger and Auditor sign
//! their proofs independently, so two proofs of the same version normally
//! differ only in their signature bytes.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::crypto::{u32_be, Verifier};
use crate::proto;

use super::json::{parse_object, to_canonical_string, JsonObject};

/// Identifies one version of one asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProofKey {
    pub id: String,
    pub age: i32,
}

impl ProofKey {
    pub fn new(id: impl Into<String>, age: i32) -> Self {
        Self { id: id.into(), age }
    }
}

impl fmt::Display for ProofKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id, self.age)
    }
}

/// Signed, hash-chained attestation of one asset version.
///
/// `hash` is a function of `(id, age, nonce, input, prev_hash)` and
/// `prev_hash` of age N equals `hash` of age N-1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proof {
    pub id: String,
    pub age: i32,
    pub nonce: String,
    /// Contract argument that produced this version
    pub input: JsonObject,
    pub hash: Vec<u8>,
    pub prev_hash: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Proof {
    pub fn key(&self) -> ProofKey {
        ProofKey::new(self.id.clone(), self.age)
    }

    /// True when every field holds its zero value
    pub fn is_empty(&self) -> bool {
        *self == Proof::default()
    }

    /// Compare all fields except the signature
    pub fn value_eq(&self, other: &Proof) -> bool {
        self.id == other.id
            && self.age == other.age
            && self.nonce == other.nonce
            && self.input == other.input
            && self.hash == other.hash
            && self.prev_hash == other.prev_hash
    }

    /// Bytes covered by the proof signature.
    ///
    /// ```text
    /// id || U32_BE(age) || nonce || canonical_json(input) || hash || prev_hash
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let input = to_canonical_string(&self.input);

        let mut bytes = Vec::with_capacity(
            self.id.len()
                + 4
                + self.nonce.len()
                + input.len()
                + self.hash.len()
                + self.prev_hash.len(),
        );
        bytes.extend_from_slice(self.id.as_bytes());
        bytes.extend_from_slice(&u32_be(self.age as u32));
        bytes.extend_from_slice(self.nonce.as_bytes());
        bytes.extend_from_slice(input.as_bytes());
        bytes.extend_from_slice(&self.hash);
        bytes.extend_from_slice(&self.prev_hash);
        bytes
    }

    /// Check the proof signature against its canonical serialization
    pub fn verify_with(&self, verifier: &dyn Verifier) -> bool {
        verifier.verify(&self.serialize(), &self.signature)
    }
}

impl From<proto::AssetProof> for Proof {
    fn from(proof: proto::AssetProof) -> Self {
        Self {
            input: parse_object(&proof.input).unwrap_or_default(),
            id: proof.asset_id,
            age: proof.age as i32,
            nonce: proof.nonce,
            hash: proof.hash,
            prev_hash: proof.prev_hash,
            signature: proof.signature,
        }
    }
}

impl From<&Proof> for proto::AssetProof {
    fn from(proof: &Proof) -> Self {
        Self {
            asset_id: proof.id.clone(),
            age: proof.age as u32,
            nonce: proof.nonce.clone(),
            input: to_canonical_string(&proof.input),
            hash: proof.hash.clone(),
            prev_hash: proof.prev_hash.clone(),
            signature: proof.signature.clone(),
        }
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Proof{{id={}, age={}, nonce={}, input={}, hash={}, prev_hash={}, signature={}}}",
            self.id,
            self.age,
            self.nonce,
            to_canonical_string(&self.input),
            STANDARD.encode(&self.hash),
            STANDARD.encode(&self.prev_hash),
            STANDARD.encode(&self.signature),
        )
    }
}
