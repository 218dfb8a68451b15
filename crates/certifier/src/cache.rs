//! Optional public-key cache.
//!
//! Sits outside the orchestrators. Entries are keyed by the digest of the key
//! identifier and expire after a fixed TTL; `invalidate` drops one entry
//! immediately. A zero TTL disables caching.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use certifier_core::ContentDigest;
use tokio::sync::RwLock;

use crate::error::Result;

#[derive(Debug, Clone)]
struct CachedKey {
    public_key: String,
    fetched_at: Instant,
}

/// TTL cache for base64 public keys.
#[derive(Debug)]
pub struct PublicKeyCache {
    ttl: Duration,
    entries: RwLock<HashMap<ContentDigest, CachedKey>>,
}

impl PublicKeyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Whether entries are kept at all.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Return the cached key for `key_id`, or run `fetch` and cache its result.
    ///
    /// Errors from `fetch` are returned and not cached.
    pub async fn get_or_fetch<F, Fut>(&self, key_id: &str, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        if !self.is_enabled() {
            return fetch().await;
        }

        let slot = ContentDigest::of(key_id.as_bytes());
        if let Some(entry) = self.entries.read().await.get(&slot) {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.public_key.clone());
            }
        }

        let public_key = fetch().await?;
        self.entries.write().await.insert(
            slot,
            CachedKey {
                public_key: public_key.clone(),
                fetched_at: Instant::now(),
            },
        );
        tracing::debug!(key_digest = %slot, "public key cached");
        Ok(public_key)
    }

    /// Drop the entry for `key_id`.
    pub async fn invalidate(&self, key_id: &str) {
        let slot = ContentDigest::of(key_id.as_bytes());
        self.entries.write().await.remove(&slot);
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use certifier_clients::AuthorityError;

    use crate::error::CertifyError;

    async fn fetch_counted(calls: &AtomicUsize) -> Result<String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok("AQID".to_string())
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let cache = PublicKeyCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let key = cache.get_or_fetch("alias/k", || fetch_counted(&calls)).await;
            assert_eq!(key.unwrap(), "AQID");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = PublicKeyCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        cache.get_or_fetch("alias/k", || fetch_counted(&calls)).await.unwrap();
        cache.invalidate("alias/k").await;
        cache.get_or_fetch("alias/k", || fetch_counted(&calls)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_drops_every_key() {
        let cache = PublicKeyCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        cache.get_or_fetch("alias/a", || fetch_counted(&calls)).await.unwrap();
        cache.get_or_fetch("alias/b", || fetch_counted(&calls)).await.unwrap();
        cache.clear().await;
        cache.get_or_fetch("alias/a", || fetch_counted(&calls)).await.unwrap();
        cache.get_or_fetch("alias/b", || fetch_counted(&calls)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables() {
        let cache = PublicKeyCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        cache.get_or_fetch("alias/k", || fetch_counted(&calls)).await.unwrap();
        cache.get_or_fetch("alias/k", || fetch_counted(&calls)).await.unwrap();

        assert!(!cache.is_enabled());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = PublicKeyCache::new(Duration::from_secs(300));
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_fetch("alias/k", || async {
                Err(CertifyError::from(AuthorityError::Unavailable("down".into())))
            })
            .await;
        assert!(err.is_err());

        cache.get_or_fetch("alias/k", || fetch_counted(&calls)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
