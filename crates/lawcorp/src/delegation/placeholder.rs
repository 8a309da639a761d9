//! Demo-mode exchange.

use chrono::{Duration, Utc};

use super::credential::{DownstreamToken, InboundCredential};
use super::exchange::{normalize_scopes, CredentialExchange, ExchangeError};

/// Token handed out when no identity provider is configured. The document
/// service rejects it; that rejection surfaces to the caller unchanged.
pub const PLACEHOLDER_TOKEN: &str = "no-auth-placeholder-token";

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderExchange;

impl PlaceholderExchange {
    /// Issue the placeholder without an inbound credential.
    pub fn issue(&self, scopes: &[String]) -> DownstreamToken {
        DownstreamToken::new(
            PLACEHOLDER_TOKEN,
            normalize_scopes(scopes),
            Utc::now() + Duration::hours(1),
        )
    }
}

impl CredentialExchange for PlaceholderExchange {
    fn exchange(
        &self,
        _inbound: &InboundCredential,
        scopes: &[String],
    ) -> Result<DownstreamToken, ExchangeError> {
        Ok(self.issue(scopes))
    }
}
