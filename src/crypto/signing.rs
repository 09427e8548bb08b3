//! Request signing and proof verification
//!
//! Scalar DL uses ECDSA over P-256 with SHA-256. Signatures travel as
//! ASN.1 DER. Private keys are SEC1 (`EC PRIVATE KEY`) or PKCS#8 PEM; the
//! verifying side is normally the holder's X.509 certificate.

use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use p256::{PublicKey, SecretKey};
use x509_cert::der::DecodePem;
use x509_cert::Certificate;

/// Error type for signing operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum SigningError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Produces signatures over arbitrary messages
pub trait Signer: Send + Sync {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError>;
}

/// Checks a signature over a message
pub trait Verifier: Send + Sync {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
}

// ============================================================================
// ECDSA P-256 / SHA-256 Signer
// ============================================================================

/// Signer backed by a P-256 private key
#[derive(Clone)]
pub struct EcdsaSha256Signer {
    signing_key: SigningKey,
}

impl EcdsaSha256Signer {
    /// Parse a PEM-encoded private key (`EC PRIVATE KEY` or `PRIVATE KEY`)
    pub fn from_pem(pem: &str) -> Result<Self, SigningError> {
        let pem = pem.trim();

        let secret_key = SecretKey::from_sec1_pem(pem)
            .or_else(|_| SecretKey::from_pkcs8_pem(pem))
            .map_err(|_| {
                SigningError::InvalidPrivateKey("not a PEM encoded EC private key".to_string())
            })?;

        Ok(Self {
            signing_key: SigningKey::from(&secret_key),
        })
    }

    /// Verifier for signatures produced by this signer
    pub fn verifier(&self) -> EcdsaSha256Verifier {
        EcdsaSha256Verifier {
            verifying_key: *self.signing_key.verifying_key(),
        }
    }
}

impl Signer for EcdsaSha256Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        let signature: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| SigningError::SigningFailed(e.to_string()))?;

        Ok(signature.to_der().as_bytes().to_vec())
    }
}

impl std::fmt::Debug for EcdsaSha256Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaSha256Signer")
            .field(
                "public_key",
                &hex::encode(
                    self.signing_key
                        .verifying_key()
                        .to_encoded_point(true)
                        .as_bytes(),
                ),
            )
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ECDSA P-256 / SHA-256 Verifier
// ============================================================================

/// Verifier backed by a P-256 public key
#[derive(Clone, Debug)]
pub struct EcdsaSha256Verifier {
    verifying_key: VerifyingKey,
}

impl EcdsaSha256Verifier {
    /// Extract the public key of a PEM-encoded X.509 certificate
    pub fn from_certificate_pem(pem: &str) -> Result<Self, SigningError> {
        let certificate = Certificate::from_pem(pem.trim().as_bytes())
            .map_err(|e| SigningError::InvalidCertificate(e.to_string()))?;

        let spki = &certificate.tbs_certificate.subject_public_key_info;
        let verifying_key = VerifyingKey::from_sec1_bytes(spki.subject_public_key.raw_bytes())
            .map_err(|_| {
                SigningError::InvalidCertificate("certificate key is not a P-256 key".to_string())
            })?;

        Ok(Self { verifying_key })
    }

    /// Parse a PEM-encoded `PUBLIC KEY`
    pub fn from_public_key_pem(pem: &str) -> Result<Self, SigningError> {
        let public_key = PublicKey::from_public_key_pem(pem.trim())
            .map_err(|e| SigningError::InvalidCertificate(e.to_string()))?;

        Ok(Self {
            verifying_key: VerifyingKey::from(&public_key),
        })
    }
}

impl Verifier for EcdsaSha256Verifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match Signature::from_der(signature) {
            Ok(signature) => self.verifying_key.verify(message, &signature).is_ok(),
            Err(_) => false,
        }
    }
}
