//! gRPC credential interceptor
//!
//! Attaches the configured authorization credential to every outbound call.

use tonic::metadata::MetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::infra::{ClientError, Result};

/// Metadata key carrying the credential
pub const AUTHORIZATION_KEY: &str = "authorization";

/// Outbound interceptor adding an `authorization` metadata entry.
///
/// Without a credential the interceptor passes requests through untouched.
#[derive(Clone, Debug, Default)]
pub struct CredentialInterceptor {
    credential: Option<MetadataValue<tonic::metadata::Ascii>>,
}

impl CredentialInterceptor {
    pub fn new(credential: Option<&str>) -> Result<Self> {
        let credential = credential
            .filter(|c| !c.is_empty())
            .map(|c| {
                let invalid = || {
                    ClientError::Configuration(
                        "authorization credential must be printable ASCII".to_string(),
                    )
                };
                // header parsing alone lets obs-text bytes (0x80-0xFF) through
                if !c.is_ascii() || c.chars().any(|ch| ch.is_ascii_control()) {
                    return Err(invalid());
                }
                c.parse().map_err(|_| invalid())
            })
            .transpose()?;

        Ok(Self { credential })
    }
}

impl Interceptor for CredentialInterceptor {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        if let Some(credential) = &self.credential {
            request
                .metadata_mut()
                .insert(AUTHORIZATION_KEY, credential.clone());
        }
        Ok(request)
    }
}
