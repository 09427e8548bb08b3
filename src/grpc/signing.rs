//! Request signing codec
//!
//! Each signed request kind has a fixed byte layout: strings as raw UTF-8,
//! integers as 4-byte big-endian, no separators or length prefixes. The
//! layouts must match what Ledger and Auditor recompute on their side.

use crate::crypto::{i32_be, u32_be, Signer, SigningError};
use crate::proto;

/// A request that carries a signature over its own fields
pub trait SignWith {
    /// Bytes covered by the signature. Pure and deterministic.
    fn signing_bytes(&self) -> Vec<u8>;

    /// Mutable slot the signature is stored in
    fn signature_mut(&mut self) -> &mut Vec<u8>;

    /// Sign the request and store the signature
    fn sign_with(&mut self, signer: &dyn Signer) -> Result<(), SigningError> {
        let signature = signer.sign(&self.signing_bytes())?;
        *self.signature_mut() = signature;
        Ok(())
    }
}

/// Append-only builder for signing layouts
#[derive(Default)]
struct Layout(Vec<u8>);

impl Layout {
    fn str(mut self, s: &str) -> Self {
        self.0.extend_from_slice(s.as_bytes());
        self
    }

    fn bytes(mut self, b: &[u8]) -> Self {
        self.0.extend_from_slice(b);
        self
    }

    fn u32(mut self, n: u32) -> Self {
        self.0.extend_from_slice(&u32_be(n));
        self
    }

    fn i32(mut self, n: i32) -> Self {
        self.0.extend_from_slice(&i32_be(n));
        self
    }

    fn finish(self) -> Vec<u8> {
        self.0
    }
}

impl SignWith for proto::ContractRegistrationRequest {
    fn signing_bytes(&self) -> Vec<u8> {
        Layout::default()
            .str(&self.contract_id)
            .str(&self.contract_binary_name)
            .bytes(&self.contract_byte_code)
            .str(&self.contract_properties)
            .str(&self.cert_holder_id)
            .u32(self.cert_version)
            .finish()
    }

    fn signature_mut(&mut self) -> &mut Vec<u8> {
        &mut self.signature
    }
}

impl SignWith for proto::ContractsListingRequest {
    fn signing_bytes(&self) -> Vec<u8> {
        Layout::default()
            .str(&self.contract_id)
            .str(&self.cert_holder_id)
            .u32(self.cert_version)
            .finish()
    }

    fn signature_mut(&mut self) -> &mut Vec<u8> {
        &mut self.signature
    }
}

impl SignWith for proto::ContractExecutionRequest {
    fn signing_bytes(&self) -> Vec<u8> {
        Layout::default()
            .str(&self.contract_id)
            .str(&self.contract_argument)
            .str(&self.cert_holder_id)
            .u32(self.cert_version)
            .finish()
    }

    fn signature_mut(&mut self) -> &mut Vec<u8> {
        &mut self.signature
    }
}

impl SignWith for proto::LedgerValidationRequest {
    fn signing_bytes(&self) -> Vec<u8> {
        Layout::default()
            .str(&self.asset_id)
            .u32(self.start_age)
            .u32(self.end_age)
            .str(&self.cert_holder_id)
            .u32(self.cert_version)
            .finish()
    }

    fn signature_mut(&mut self) -> &mut Vec<u8> {
        &mut self.signature
    }
}

impl SignWith for proto::LedgersValidationRequest {
    fn signing_bytes(&self) -> Vec<u8> {
        Layout::default()
            .str(&self.asset_id)
            .str(&self.cert_holder_id)
            .u32(self.cert_version)
            .finish()
    }

    fn signature_mut(&mut self) -> &mut Vec<u8> {
        &mut self.signature
    }
}

impl SignWith for proto::AssetProofRetrievalRequest {
    fn signing_bytes(&self) -> Vec<u8> {
        Layout::default()
            .str(&self.asset_id)
            .i32(self.age)
            .str(&self.cert_holder_id)
            .u32(self.cert_version)
            .finish()
    }

    fn signature_mut(&mut self) -> &mut Vec<u8> {
        &mut self.signature
    }
}

impl SignWith for proto::ExecutionAbortRequest {
    fn signing_bytes(&self) -> Vec<u8> {
        Layout::default()
            .str(&self.nonce)
            .str(&self.cert_holder_id)
            .u32(self.cert_version)
            .finish()
    }

    fn signature_mut(&mut self) -> &mut Vec<u8> {
        &mut self.signature
    }
}
