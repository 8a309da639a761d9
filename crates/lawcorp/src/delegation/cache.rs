//! Downstream token cache.

use chrono::Utc;
use dashmap::DashMap;

use super::credential::{DownstreamToken, InboundCredential};
use super::exchange::{normalize_scopes, CredentialExchange, ExchangeError};

/// Tokens are treated as expired this many seconds early.
pub const DEFAULT_SKEW_SECS: i64 = 60;

type CacheKey = (String, Vec<String>);

/// Caches exchanged tokens per (caller subject, normalized scopes).
///
/// A cached token is returned unchanged until it is within the skew of its
/// expiry. Concurrent misses for the same key may each call the inner
/// exchange; the last result wins and both results are valid. Every miss
/// also drops the entries that are no longer fresh.
pub struct TokenCache<E> {
    inner: E,
    entries: DashMap<CacheKey, DownstreamToken>,
    skew_secs: i64,
}

impl<E: CredentialExchange> TokenCache<E> {
    pub fn new(inner: E) -> Self {
        Self::with_skew(inner, DEFAULT_SKEW_SECS)
    }

    pub fn with_skew(inner: E, skew_secs: i64) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            skew_secs,
        }
    }

    /// The wrapped exchange.
    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry that is no longer fresh.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.entries
            .retain(|_, token| token.is_fresh(now, self.skew_secs));
    }

    fn cached(&self, key: &CacheKey) -> Option<DownstreamToken> {
        let entry = self.entries.get(key)?;
        entry
            .is_fresh(Utc::now(), self.skew_secs)
            .then(|| entry.clone())
    }
}

impl<E: CredentialExchange> CredentialExchange for TokenCache<E> {
    fn exchange(
        &self,
        inbound: &InboundCredential,
        scopes: &[String],
    ) -> Result<DownstreamToken, ExchangeError> {
        let key = (inbound.subject().to_string(), normalize_scopes(scopes));
        if let Some(token) = self.cached(&key) {
            log::debug!("token cache hit for subject {}", key.0);
            return Ok(token);
        }

        log::debug!("token cache miss for subject {}", key.0);
        self.purge_expired();
        let token = self.inner.exchange(inbound, &key.1)?;
        self.entries.insert(key, token.clone());
        Ok(token)
    }
}
