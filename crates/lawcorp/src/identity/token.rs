//! Inbound JWT validation.

use std::collections::HashMap;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::config::AuthConfig;
use crate::error::{FirmError, Result};

/// Validates inbound bearer tokens and extracts the subject claim.
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
    subject_claim: String,
}

impl TokenValidator {
    /// HS256 with a shared secret.
    pub fn hs256(secret: &[u8]) -> Self {
        Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256)
    }

    /// RS256 with a PEM-encoded public key.
    pub fn rs256_pem(pem: &[u8]) -> Result<Self> {
        let key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| FirmError::Config(format!("invalid RS256 public key: {e}")))?;
        Ok(Self::with_key(key, Algorithm::RS256))
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        Self {
            key,
            validation,
            subject_claim: "oid".to_string(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let validator = match (&config.rs256_public_key_pem, &config.hs256_secret) {
            (Some(pem), _) => Self::rs256_pem(pem.as_bytes())?,
            (None, Some(secret)) => Self::hs256(secret.as_bytes()),
            (None, None) => {
                return Err(FirmError::Config(
                    "auth requires hs256_secret or rs256_public_key_pem".into(),
                ))
            }
        };
        let mut validator = validator.subject_claim(config.subject_claim.clone());
        if let Some(issuer) = &config.issuer {
            validator = validator.issuer(issuer);
        }
        if let Some(audience) = &config.audience {
            validator = validator.audience(audience);
        }
        Ok(validator)
    }

    pub fn issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    pub fn subject_claim(mut self, claim: impl Into<String>) -> Self {
        self.subject_claim = claim.into();
        self
    }

    /// Validate signature, expiry, issuer and audience, then return the
    /// subject. Uses the configured claim, falling back to `sub`.
    pub fn validate(&self, token: &str) -> Result<String> {
        let data = decode::<HashMap<String, serde_json::Value>>(token, &self.key, &self.validation)
            .map_err(|e| map_jwt_error(e.kind()))?;

        [self.subject_claim.as_str(), "sub"]
            .iter()
            .find_map(|claim| {
                let value = data.claims.get(*claim)?.as_str()?;
                (!value.is_empty()).then(|| value.to_string())
            })
            .ok_or_else(|| FirmError::InvalidToken("Token carries no subject claim".into()))
    }
}

fn map_jwt_error(kind: &ErrorKind) -> FirmError {
    let message = match kind {
        ErrorKind::ExpiredSignature => "Token expired",
        ErrorKind::InvalidSignature => "Invalid signature",
        ErrorKind::InvalidIssuer => "Invalid issuer",
        ErrorKind::InvalidAudience => "Invalid audience",
        ErrorKind::ImmatureSignature => "Token not yet valid",
        ErrorKind::InvalidAlgorithm => "Unexpected signing algorithm",
        ErrorKind::InvalidToken => "Invalid token",
        _ => "Token validation failed",
    };
    FirmError::InvalidToken(message.to_string())
}
