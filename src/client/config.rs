//! Client configuration
//!
//! A configuration is read from a Java-properties document or a JSON
//! document using the `scalar.dl.client.*` keys. JSON keys may be written
//! flat (`"scalar.dl.client.server.host": ..`) or nested
//! (`{"scalar": {"dl": {"client": {"server": {"host": ..}}}}}`).
//!
//! Loading only fails on malformed values; required fields are checked by
//! [`ClientConfig::validate`], which [`ClientService::new`] calls.
//!
//! [`ClientService::new`]: super::ClientService::new

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::grpc::ServiceTarget;
use crate::infra::{ClientError, Result};

/// Configuration keys
pub mod keys {
    pub const LEDGER_HOST: &str = "scalar.dl.client.server.host";
    pub const LEDGER_PORT: &str = "scalar.dl.client.server.port";
    pub const LEDGER_PRIVILEGED_PORT: &str = "scalar.dl.client.server.privileged_port";
    pub const CERT_HOLDER_ID: &str = "scalar.dl.client.cert_holder_id";
    pub const CERT_VERSION: &str = "scalar.dl.client.cert_version";
    pub const CERT_PATH: &str = "scalar.dl.client.cert_path";
    pub const CERT_PEM: &str = "scalar.dl.client.cert_pem";
    pub const PRIVATE_KEY_PATH: &str = "scalar.dl.client.private_key_path";
    pub const PRIVATE_KEY_PEM: &str = "scalar.dl.client.private_key_pem";
    pub const TLS_ENABLED: &str = "scalar.dl.client.tls.enabled";
    pub const TLS_CA_ROOT_CERT_PATH: &str = "scalar.dl.client.tls.ca_root_cert_path";
    pub const TLS_CA_ROOT_CERT_PEM: &str = "scalar.dl.client.tls.ca_root_cert_pem";
    pub const AUTHORIZATION_CREDENTIAL: &str = "scalar.dl.client.authorization.credential";
    pub const MODE: &str = "scalar.dl.client.mode";
    pub const AUDITOR_ENABLED: &str = "scalar.dl.client.auditor.enabled";
    pub const AUDITOR_HOST: &str = "scalar.dl.client.auditor.host";
    pub const AUDITOR_PORT: &str = "scalar.dl.client.auditor.port";
    pub const AUDITOR_PRIVILEGED_PORT: &str = "scalar.dl.client.auditor.privileged_port";
    pub const AUDITOR_TLS_ENABLED: &str = "scalar.dl.client.auditor.tls.enabled";
    pub const AUDITOR_TLS_CA_ROOT_CERT_PATH: &str =
        "scalar.dl.client.auditor.tls.ca_root_cert_path";
    pub const AUDITOR_TLS_CA_ROOT_CERT_PEM: &str = "scalar.dl.client.auditor.tls.ca_root_cert_pem";
    pub const LINEARIZABLE_VALIDATION_ENABLED: &str =
        "scalar.dl.client.auditor.linearizable_validation.enabled";
    pub const LINEARIZABLE_VALIDATION_CONTRACT_ID: &str =
        "scalar.dl.client.auditor.linearizable_validation.contract_id";
}

pub const DEFAULT_LEDGER_HOST: &str = "localhost";
pub const DEFAULT_LEDGER_PORT: u16 = 50051;
pub const DEFAULT_LEDGER_PRIVILEGED_PORT: u16 = 50052;
pub const DEFAULT_AUDITOR_HOST: &str = "localhost";
pub const DEFAULT_AUDITOR_PORT: u16 = 40051;
pub const DEFAULT_AUDITOR_PRIVILEGED_PORT: u16 = 40052;
pub const DEFAULT_LINEARIZABLE_VALIDATION_CONTRACT_ID: &str = "validate-ledger";

/// Role the client plays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientMode {
    /// Signs and sends its own requests
    #[default]
    Client,
    /// Relays requests signed elsewhere; the flows in this crate are disabled
    Intermediary,
}

impl FromStr for ClientMode {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "CLIENT" => Ok(Self::Client),
            "INTERMEDIARY" => Ok(Self::Intermediary),
            other => Err(ClientError::Configuration(format!(
                "invalid client mode '{}', expected CLIENT or INTERMEDIARY",
                other
            ))),
        }
    }
}

impl fmt::Display for ClientMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "CLIENT"),
            Self::Intermediary => write!(f, "INTERMEDIARY"),
        }
    }
}

/// Everything needed to build a [`ClientService`](super::ClientService)
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub ledger_host: String,
    pub ledger_port: u16,
    pub ledger_privileged_port: u16,
    pub cert_holder_id: String,
    pub cert_version: u32,
    /// PEM certificate of the holder
    pub cert_pem: String,
    /// PEM private key matching `cert_pem`
    pub private_key_pem: String,
    pub tls_enabled: bool,
    pub tls_ca_root_cert: Option<String>,
    pub authorization_credential: Option<String>,
    pub mode: ClientMode,
    pub auditor_enabled: bool,
    pub auditor_host: String,
    pub auditor_port: u16,
    pub auditor_privileged_port: u16,
    pub auditor_tls_enabled: bool,
    pub auditor_tls_ca_root_cert: Option<String>,
    /// Validate ledgers by executing a contract through Auditor's ordering
    pub linearizable_validation_enabled: bool,
    pub linearizable_validation_contract_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ledger_host: DEFAULT_LEDGER_HOST.to_string(),
            ledger_port: DEFAULT_LEDGER_PORT,
            ledger_privileged_port: DEFAULT_LEDGER_PRIVILEGED_PORT,
            cert_holder_id: String::new(),
            cert_version: 1,
            cert_pem: String::new(),
            private_key_pem: String::new(),
            tls_enabled: false,
            tls_ca_root_cert: None,
            authorization_credential: None,
            mode: ClientMode::Client,
            auditor_enabled: false,
            auditor_host: DEFAULT_AUDITOR_HOST.to_string(),
            auditor_port: DEFAULT_AUDITOR_PORT,
            auditor_privileged_port: DEFAULT_AUDITOR_PRIVILEGED_PORT,
            auditor_tls_enabled: false,
            auditor_tls_ca_root_cert: None,
            linearizable_validation_enabled: false,
            linearizable_validation_contract_id: DEFAULT_LINEARIZABLE_VALIDATION_CONTRACT_ID
                .to_string(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("ledger_host", &self.ledger_host)
            .field("ledger_port", &self.ledger_port)
            .field("ledger_privileged_port", &self.ledger_privileged_port)
            .field("cert_holder_id", &self.cert_holder_id)
            .field("cert_version", &self.cert_version)
            .field("tls_enabled", &self.tls_enabled)
            .field("mode", &self.mode)
            .field("auditor_enabled", &self.auditor_enabled)
            .field("auditor_host", &self.auditor_host)
            .field("auditor_port", &self.auditor_port)
            .field("auditor_privileged_port", &self.auditor_privileged_port)
            .field("auditor_tls_enabled", &self.auditor_tls_enabled)
            .field(
                "linearizable_validation_enabled",
                &self.linearizable_validation_enabled,
            )
            .field(
                "linearizable_validation_contract_id",
                &self.linearizable_validation_contract_id,
            )
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Load from a Java-properties document
    pub fn from_properties(text: &str) -> Result<Self> {
        Self::from_source(&Source::from_properties(text)?)
    }

    /// Load from a JSON document
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ClientError::Configuration(format!("invalid JSON config: {}", e)))?;

        match value {
            Value::Object(_) => Self::from_source(&Source::from_json(&value)),
            _ => Err(ClientError::Configuration(
                "JSON config must be an object".to_string(),
            )),
        }
    }

    fn from_source(source: &Source) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = source.string(keys::LEDGER_HOST) {
            config.ledger_host = host;
        }
        if let Some(port) = source.port(keys::LEDGER_PORT)? {
            config.ledger_port = port;
        }
        if let Some(port) = source.port(keys::LEDGER_PRIVILEGED_PORT)? {
            config.ledger_privileged_port = port;
        }

        if let Some(pem) = source.pem(keys::CERT_PEM, keys::CERT_PATH)? {
            config.cert_pem = pem;
        }
        if let Some(holder) = source.string(keys::CERT_HOLDER_ID) {
            config.cert_holder_id = holder;
        }
        if let Some(version) = source.parse::<u32>(keys::CERT_VERSION)? {
            if version != 0 {
                config.cert_version = version;
            }
        }
        if let Some(pem) = source.pem(keys::PRIVATE_KEY_PEM, keys::PRIVATE_KEY_PATH)? {
            config.private_key_pem = pem;
        }

        config.tls_enabled = source.flag(keys::TLS_ENABLED)?;
        config.tls_ca_root_cert =
            source.pem(keys::TLS_CA_ROOT_CERT_PEM, keys::TLS_CA_ROOT_CERT_PATH)?;
        config.authorization_credential = source.string(keys::AUTHORIZATION_CREDENTIAL);

        if let Some(mode) = source.string(keys::MODE) {
            config.mode = mode.parse()?;
        }

        config.auditor_enabled = source.flag(keys::AUDITOR_ENABLED)?;
        if let Some(host) = source.string(keys::AUDITOR_HOST) {
            config.auditor_host = host;
        }
        if let Some(port) = source.port(keys::AUDITOR_PORT)? {
            config.auditor_port = port;
        }
        if let Some(port) = source.port(keys::AUDITOR_PRIVILEGED_PORT)? {
            config.auditor_privileged_port = port;
        }
        config.auditor_tls_enabled = source.flag(keys::AUDITOR_TLS_ENABLED)?;
        config.auditor_tls_ca_root_cert = source.pem(
            keys::AUDITOR_TLS_CA_ROOT_CERT_PEM,
            keys::AUDITOR_TLS_CA_ROOT_CERT_PATH,
        )?;

        // Linearizable validation goes through Auditor, so it is ignored without one
        if config.auditor_enabled {
            config.linearizable_validation_enabled =
                source.flag(keys::LINEARIZABLE_VALIDATION_ENABLED)?;
            if let Some(id) = source.string(keys::LINEARIZABLE_VALIDATION_CONTRACT_ID) {
                config.linearizable_validation_contract_id = id;
            }
        }

        Ok(config)
    }

    /// Check that every required field is present and consistent
    pub fn validate(&self) -> Result<()> {
        fn require(ok: bool, message: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(ClientError::Configuration(message.to_string()))
            }
        }

        require(!self.ledger_host.is_empty(), "ledger host is required")?;
        require(
            self.ledger_port != 0 && self.ledger_privileged_port != 0,
            "ledger ports must be non-zero",
        )?;
        require(!self.cert_holder_id.is_empty(), "cert holder id is required")?;
        require(!self.cert_pem.is_empty(), "certificate is required")?;
        require(!self.private_key_pem.is_empty(), "private key is required")?;
        require(
            !self.tls_enabled || has_text(&self.tls_ca_root_cert),
            "TLS is enabled but no CA root certificate is configured",
        )?;

        if self.auditor_enabled {
            require(!self.auditor_host.is_empty(), "auditor host is required")?;
            require(
                self.auditor_port != 0 && self.auditor_privileged_port != 0,
                "auditor ports must be non-zero",
            )?;
            require(
                !self.auditor_tls_enabled || has_text(&self.auditor_tls_ca_root_cert),
                "auditor TLS is enabled but no CA root certificate is configured",
            )?;
            require(
                !self.linearizable_validation_enabled
                    || !self.linearizable_validation_contract_id.is_empty(),
                "linearizable validation contract id is required",
            )?;
        }

        Ok(())
    }

    /// True when ledger validation goes through contract execution
    pub fn uses_linearizable_validation(&self) -> bool {
        self.auditor_enabled && self.linearizable_validation_enabled
    }

    pub fn ledger_target(&self) -> ServiceTarget<'_> {
        ServiceTarget {
            host: &self.ledger_host,
            port: self.ledger_port,
            privileged_port: self.ledger_privileged_port,
            tls_ca_root_cert: self
                .tls_ca_root_cert
                .as_deref()
                .filter(|_| self.tls_enabled),
            authorization_credential: self.authorization_credential.as_deref(),
        }
    }

    pub fn auditor_target(&self) -> ServiceTarget<'_> {
        ServiceTarget {
            host: &self.auditor_host,
            port: self.auditor_port,
            privileged_port: self.auditor_privileged_port,
            tls_ca_root_cert: self
                .auditor_tls_ca_root_cert
                .as_deref()
                .filter(|_| self.auditor_tls_enabled),
            authorization_credential: self.authorization_credential.as_deref(),
        }
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// ============================================================================
// Key/value source shared by both document formats
// ============================================================================

#[derive(Debug, Default)]
struct Source(BTreeMap<String, String>);

impl Source {
    fn from_properties(text: &str) -> Result<Self> {
        let entries = java_properties::read(text.as_bytes()).map_err(|e| {
            ClientError::Configuration(format!("invalid properties document: {}", e))
        })?;
        Ok(Self(entries.into_iter().collect()))
    }

    fn from_json(value: &Value) -> Self {
        let mut entries = BTreeMap::new();
        flatten_json("", value, &mut entries);
        Self(entries)
    }

    /// Non-empty string value
    fn string(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.string(key)
            .map(|v| {
                v.trim().parse::<T>().map_err(|_| {
                    ClientError::Configuration(format!("invalid value '{}' for {}", v, key))
                })
            })
            .transpose()
    }

    /// Port value; zero means "keep the default"
    fn port(&self, key: &str) -> Result<Option<u16>> {
        Ok(self.parse::<u16>(key)?.filter(|p| *p != 0))
    }

    fn flag(&self, key: &str) -> Result<bool> {
        match self.string(key) {
            None => Ok(false),
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ClientError::Configuration(format!(
                    "invalid boolean '{}' for {}",
                    v, key
                ))),
            },
        }
    }

    /// Inline PEM, falling back to the file at the sibling path key
    fn pem(&self, pem_key: &str, path_key: &str) -> Result<Option<String>> {
        if let Some(pem) = self.string(pem_key) {
            return Ok(Some(pem));
        }

        match self.string(path_key) {
            None => Ok(None),
            Some(path) => std::fs::read_to_string(&path).map(Some).map_err(|e| {
                ClientError::Configuration(format!("cannot read {} ({}): {}", path_key, path, e))
            }),
        }
    }
}

fn flatten_json(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_json(&path, child, out);
            }
        }
        Value::Null => {}
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
