//! The exchange seam.

use super::credential::{DownstreamToken, InboundCredential};

/// Why an exchange failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExchangeError {
    /// The user has not consented to the requested scopes. Retrying the
    /// same request will not help.
    #[error("user consent is required for scopes [{scopes}]; the user must re-consent to the application ({reason})")]
    ConsentRequired { scopes: String, reason: String },

    /// Network failure, timeout or identity-provider 5xx.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Any other rejection by the identity provider.
    #[error("rejected by identity provider: {0}")]
    Rejected(String),
}

impl ExchangeError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Trades a caller's credential for one scoped to a downstream service.
pub trait CredentialExchange: Send + Sync {
    fn exchange(
        &self,
        inbound: &InboundCredential,
        scopes: &[String],
    ) -> Result<DownstreamToken, ExchangeError>;
}

/// Trim, drop empties, sort and dedup. Two requests for the same scopes in
/// a different order produce the same list.
pub fn normalize_scopes(scopes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = scopes
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
