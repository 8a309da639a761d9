//! OAuth 2.0 on-behalf-of exchange.
//!
//! Posts the caller's assertion together with the server's broker client
//! credentials to the identity provider's token endpoint and receives a
//! token scoped to the downstream API.

use std::error::Error as _;
use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;

use super::credential::{DownstreamToken, InboundCredential};
use super::exchange::{normalize_scopes, CredentialExchange, ExchangeError};
use crate::config::ExchangeConfig;
use crate::error::{FirmError, Result};

pub const OBO_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

const DEFAULT_EXPIRES_IN: u64 = 3600;
/// Provider lifetimes above this are capped.
const MAX_EXPIRES_IN: i64 = 24 * 60 * 60;
const CONSENT_ERROR_CODE: u64 = 65001;

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_codes: Vec<u64>,
}

// ── OnBehalfOfExchange ───────────────────────────────────────────────────────

pub struct OnBehalfOfExchange {
    client: Client,
    token_endpoint: String,
    client_id: String,
    client_secret: zeroize::Zeroizing<String>,
}

impl OnBehalfOfExchange {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FirmError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: zeroize::Zeroizing::new(config.client_secret.clone()),
        })
    }

    fn request_body(&self, inbound: &InboundCredential, scope: &str) -> std::result::Result<String, ExchangeError> {
        let form = [
            ("grant_type", OBO_GRANT_TYPE),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("assertion", inbound.expose()),
            ("scope", scope),
            ("requested_token_use", "on_behalf_of"),
        ];
        serde_urlencoded::to_string(form)
            .map_err(|e| ExchangeError::Rejected(format!("failed to encode request: {e}")))
    }
}

impl CredentialExchange for OnBehalfOfExchange {
    fn exchange(
        &self,
        inbound: &InboundCredential,
        scopes: &[String],
    ) -> std::result::Result<DownstreamToken, ExchangeError> {
        let scopes = normalize_scopes(scopes);
        let scope = scopes.join(" ");
        let body = self.request_body(inbound, &scope)?;

        let response = self
            .client
            .post(&self.token_endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .map_err(|e| ExchangeError::Transient(format_reqwest_error(&e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| ExchangeError::Transient(format_reqwest_error(&e)))?;

        if !(200..300).contains(&status) {
            let err = classify_failure(status, &text, &scope);
            log::warn!(
                "on-behalf-of exchange for subject {} failed: {err}",
                inbound.subject()
            );
            return Err(err);
        }

        let parsed: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| ExchangeError::Rejected(format!("malformed token response: {e}")))?;
        let expires_in = parsed
            .expires_in
            .as_ref()
            .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
            .unwrap_or(DEFAULT_EXPIRES_IN);
        let expires_at = Utc::now()
            .checked_add_signed(token_lifetime(expires_in))
            .ok_or_else(|| ExchangeError::Rejected("token lifetime out of range".into()))?;

        log::info!("on-behalf-of exchange succeeded for subject {}", inbound.subject());
        Ok(DownstreamToken::new(parsed.access_token, scopes, expires_at))
    }
}

fn token_lifetime(expires_in: u64) -> chrono::Duration {
    let secs = i64::try_from(expires_in)
        .unwrap_or(MAX_EXPIRES_IN)
        .min(MAX_EXPIRES_IN);
    chrono::Duration::try_seconds(secs)
        .unwrap_or_else(|| chrono::Duration::seconds(DEFAULT_EXPIRES_IN as i64))
}

/// Map a non-2xx token endpoint response to an exchange error.
fn classify_failure(status: u16, body: &str, scope: &str) -> ExchangeError {
    if status >= 500 {
        return ExchangeError::Transient(format!("identity provider returned {status}"));
    }
    let Ok(err) = serde_json::from_str::<TokenErrorResponse>(body) else {
        return ExchangeError::Rejected(format!("identity provider returned {status}"));
    };
    let description = err.error_description.unwrap_or_default();
    let consent = match err.error.as_str() {
        "consent_required" | "interaction_required" => true,
        "invalid_grant" => {
            err.error_codes.contains(&CONSENT_ERROR_CODE) || description.contains("AADSTS65001")
        }
        _ => false,
    };
    if consent {
        ExchangeError::ConsentRequired {
            scopes: scope.to_string(),
            reason: err.error,
        }
    } else if description.is_empty() {
        ExchangeError::Rejected(err.error)
    } else {
        ExchangeError::Rejected(format!("{}: {description}", err.error))
    }
}

/// Render a reqwest error with its source chain.
pub(crate) fn format_reqwest_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}
