//! Server configuration.
//!
//! Loaded from a JSON file; the binaries overlay command-line flags and
//! `LAWCORP_*` environment variables on top. A missing `auth` section means
//! demo mode: no identity provider, every caller is the demo partner.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FirmError, Result};

/// Scope requested for the document service when none is configured.
pub const DEFAULT_DOCUMENT_SCOPE: &str = "api://external-api/data.read";

const DEFAULT_SUBJECT_CLAIM: &str = "oid";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_subject_claim() -> String {
    DEFAULT_SUBJECT_CLAIM.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_scopes() -> Vec<String> {
    vec![DEFAULT_DOCUMENT_SCOPE.to_string()]
}

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON store file. `None` keeps the firm data in memory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Inbound token validation.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    /// Shared secret for HS256 tokens.
    #[serde(default)]
    pub hs256_secret: Option<String>,
    /// PEM-encoded RSA public key for RS256 tokens.
    #[serde(default)]
    pub rs256_public_key_pem: Option<String>,
    /// Claim carrying the identity provider's subject id. Falls back to `sub`.
    #[serde(default = "default_subject_claim")]
    pub subject_claim: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("hs256_secret", &self.hs256_secret.as_ref().map(|_| "<redacted>"))
            .field("rs256_public_key_pem", &self.rs256_public_key_pem.is_some())
            .field("subject_claim", &self.subject_claim)
            .finish()
    }
}

/// On-behalf-of broker credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// The external document service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamConfig {
    pub base_url: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".to_string(),
            scopes: default_scopes(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ── ServerConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub exchange: Option<ExchangeConfig>,
    #[serde(default)]
    pub downstream: DownstreamConfig,
}

impl ServerConfig {
    /// Read a JSON config file. Does not validate.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            FirmError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// No identity provider configured.
    pub fn is_demo(&self) -> bool {
        self.auth.is_none()
    }

    /// Check cross-section requirements.
    pub fn validate(&self) -> Result<()> {
        if let Some(auth) = &self.auth {
            if auth.hs256_secret.is_none() && auth.rs256_public_key_pem.is_none() {
                return Err(FirmError::Config(
                    "auth requires hs256_secret or rs256_public_key_pem".into(),
                ));
            }
            if auth.subject_claim.trim().is_empty() {
                return Err(FirmError::Config("auth.subject_claim is empty".into()));
            }
        }
        if self.exchange.is_some() && self.auth.is_none() {
            return Err(FirmError::Config(
                "exchange requires an auth section".into(),
            ));
        }
        if let Some(exchange) = &self.exchange {
            if exchange.token_endpoint.is_empty() || exchange.client_id.is_empty() {
                return Err(FirmError::Config(
                    "exchange requires token_endpoint and client_id".into(),
                ));
            }
        }
        if self.downstream.scopes.is_empty() {
            return Err(FirmError::Config("downstream.scopes is empty".into()));
        }
        Ok(())
    }
}
