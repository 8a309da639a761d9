//! Concurrency test: the downstream token cache under parallel callers.
//!
//! Validates that every caller gets a token minted for its own subject,
//! that a warm cache stops calling the identity provider, and that tokens
//! inside the expiry skew are never served.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{Duration, Utc};
use lawcorp::{CredentialExchange, DownstreamToken, ExchangeError, InboundCredential, TokenCache};

/// Mints `<subject>#<n>` tokens valid for `lifetime_secs`.
struct MintingBroker {
    minted: AtomicUsize,
    lifetime_secs: i64,
}

impl MintingBroker {
    fn new(lifetime_secs: i64) -> Self {
        Self {
            minted: AtomicUsize::new(0),
            lifetime_secs,
        }
    }
}

impl CredentialExchange for MintingBroker {
    fn exchange(
        &self,
        inbound: &InboundCredential,
        scopes: &[String],
    ) -> Result<DownstreamToken, ExchangeError> {
        let n = self.minted.fetch_add(1, Ordering::SeqCst);
        Ok(DownstreamToken::new(
            format!("{}#{n}", inbound.subject()),
            scopes.to_vec(),
            Utc::now() + Duration::seconds(self.lifetime_secs),
        ))
    }
}

fn scopes() -> Vec<String> {
    vec!["api://document-service/Documents.Read".to_string()]
}

#[test]
fn stress_64_callers_same_subject() {
    let cache = Arc::new(TokenCache::new(MintingBroker::new(3600)));
    let barrier = Arc::new(Barrier::new(64));

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let inbound = InboundCredential::new("jwt-for-dana", "oid-1");
                barrier.wait();
                (0..50)
                    .map(|_| cache.exchange(&inbound, &scopes()).unwrap().authorization())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for h in handles {
        for auth in h.join().unwrap() {
            assert!(auth.starts_with("Bearer oid-1#"), "{auth}");
            seen.insert(auth);
        }
    }

    // Racing misses may each mint; after that every call is a hit.
    let minted = cache_minted(&cache);
    assert!((1..=64).contains(&minted), "minted {minted}");
    assert!(seen.len() <= minted);
    assert_eq!(cache.len(), 1);
}

#[test]
fn stress_subjects_never_share_tokens() {
    let cache = Arc::new(TokenCache::new(MintingBroker::new(3600)));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let subject = format!("oid-{}", i % 8);
                let inbound = InboundCredential::new(format!("jwt-{i}"), subject.clone());
                for _ in 0..100 {
                    let token = cache.exchange(&inbound, &scopes()).unwrap();
                    assert!(token.authorization().starts_with(&format!("Bearer {subject}#")));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(cache.len(), 8);
}

#[test]
fn scope_order_shares_one_entry() {
    let cache = TokenCache::new(MintingBroker::new(3600));
    let inbound = InboundCredential::new("jwt", "oid-2");
    let a = vec!["b.read".to_string(), "a.read".to_string()];
    let b = vec!["a.read".to_string(), " b.read ".to_string(), "a.read".to_string()];

    let first = cache.exchange(&inbound, &a).unwrap();
    let second = cache.exchange(&inbound, &b).unwrap();
    assert_eq!(first.authorization(), second.authorization());
    assert_eq!(cache.len(), 1);
}

#[test]
fn tokens_inside_skew_are_exchanged_again() {
    // Lives 30s, skew is 60s: stale on arrival.
    let cache = Arc::new(TokenCache::new(MintingBroker::new(30)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let inbound = InboundCredential::new("jwt", "oid-3");
                for _ in 0..25 {
                    cache.exchange(&inbound, &scopes()).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(cache_minted(&cache), 200);
    cache.purge_expired();
    assert!(cache.is_empty());
}

fn cache_minted(cache: &TokenCache<MintingBroker>) -> usize {
    cache.inner().minted.load(Ordering::SeqCst)
}
