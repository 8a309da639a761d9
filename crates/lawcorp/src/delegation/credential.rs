//! Credential material.

use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Extract the token from an `Authorization` header value. The scheme is
/// matched case-insensitively; an empty token is rejected.
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// The caller's own validated bearer token. Only the exchange ever reads
/// the raw value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct InboundCredential {
    raw: String,
    #[zeroize(skip)]
    subject: String,
}

impl InboundCredential {
    pub fn new(raw: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            subject: subject.into(),
        }
    }

    /// Identity-provider subject the token was issued to.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub(crate) fn expose(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Debug for InboundCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundCredential")
            .field("subject", &self.subject)
            .field("raw", &"<redacted>")
            .finish()
    }
}

/// A token accepted by the document service.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DownstreamToken {
    access_token: String,
    #[zeroize(skip)]
    scopes: Vec<String>,
    #[zeroize(skip)]
    expires_at: DateTime<Utc>,
}

impl DownstreamToken {
    pub fn new(access_token: impl Into<String>, scopes: Vec<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            scopes,
            expires_at,
        }
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Still usable at `now` with `skew_secs` to spare.
    pub fn is_fresh(&self, now: DateTime<Utc>, skew_secs: i64) -> bool {
        now + chrono::Duration::seconds(skew_secs) < self.expires_at
    }

    #[cfg(test)]
    pub(crate) fn secret(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for DownstreamToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownstreamToken")
            .field("scopes", &self.scopes)
            .field("expires_at", &self.expires_at)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
