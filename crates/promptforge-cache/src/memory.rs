// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! In-memory cache backends
//!
//! `MemoryCache` is the default backend: LRU-bounded with per-entry TTL.
//! `ConcurrentCache` is an unbounded dashmap-backed variant for tests and
//! embedded use where eviction is not a concern.

use crate::{Cache, Fingerprint};
use async_trait::async_trait;
use dashmap::DashMap;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// A cached value together with its expiry deadline.
#[derive(Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn new(value: Vec<u8>, ttl_secs: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Default entry capacity for [`MemoryCache`].
pub const DEFAULT_CAPACITY: usize = 1000;

/// In-memory LRU cache with per-entry TTL.
///
/// Expired entries report as misses and are evicted on access. Entries are
/// stored and returned whole; a reader never observes a partially written
/// value.
pub struct MemoryCache {
    cache: Arc<Mutex<LruCache<Fingerprint, Entry>>>,
}

impl MemoryCache {
    /// Create a new memory cache with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).expect("Capacity must be > 0"),
            ))),
        }
    }

    /// Number of live entries (expired entries may still be counted until
    /// their next access).
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &Fingerprint) -> Option<Vec<u8>> {
        let mut cache = self.cache.lock().await;
        match cache.get(key) {
            Some(entry) if entry.is_expired() => {
                cache.pop(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn set(&self, key: Fingerprint, value: Vec<u8>, ttl_secs: u64) -> anyhow::Result<()> {
        let mut cache = self.cache.lock().await;
        cache.put(key, Entry::new(value, ttl_secs));
        Ok(())
    }

    async fn contains(&self, key: &Fingerprint) -> bool {
        let mut cache = self.cache.lock().await;
        match cache.peek(key) {
            Some(entry) if entry.is_expired() => {
                cache.pop(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.cache.lock().await.clear();
        Ok(())
    }
}

/// Thread-safe concurrent cache using DashMap (no eviction).
pub struct ConcurrentCache {
    cache: DashMap<Fingerprint, Entry>,
}

impl ConcurrentCache {
    /// Create a new concurrent cache.
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }
}

impl Default for ConcurrentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for ConcurrentCache {
    async fn get(&self, key: &Fingerprint) -> Option<Vec<u8>> {
        if let Some(entry) = self.cache.get(key) {
            if !entry.is_expired() {
                return Some(entry.value.clone());
            }
        }
        // Drop the read guard before removing.
        self.cache.remove_if(key, |_, v| v.is_expired());
        None
    }

    async fn set(&self, key: Fingerprint, value: Vec<u8>, ttl_secs: u64) -> anyhow::Result<()> {
        self.cache.insert(key, Entry::new(value, ttl_secs));
        Ok(())
    }

    async fn contains(&self, key: &Fingerprint) -> bool {
        self.cache
            .get(key)
            .map(|e| !e.is_expired())
            .unwrap_or(false)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.cache.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> Fingerprint {
        Fingerprint::from_request(text, "sql", None, &[], None)
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemoryCache::new(10);
        let k = key("hello");
        assert!(cache.get(&k).await.is_none());

        cache.set(k.clone(), b"value".to_vec(), 60).await.unwrap();
        assert_eq!(cache.get(&k).await, Some(b"value".to_vec()));
        assert!(cache.contains(&k).await);
    }

    #[tokio::test]
    async fn test_memory_cache_lru_eviction() {
        let cache = MemoryCache::new(2);
        cache.set(key("a"), vec![1], 60).await.unwrap();
        cache.set(key("b"), vec![2], 60).await.unwrap();
        cache.set(key("c"), vec![3], 60).await.unwrap();

        // "a" was least recently used and should be gone.
        assert!(cache.get(&key("a")).await.is_none());
        assert!(cache.get(&key("b")).await.is_some());
        assert!(cache.get(&key("c")).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_ttl_expiry() {
        let cache = MemoryCache::new(10);
        let k = key("ttl");
        cache.set(k.clone(), vec![1], 1).await.unwrap();
        assert!(cache.get(&k).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(&k).await.is_none());
        assert!(!cache.contains(&k).await);
    }

    #[tokio::test]
    async fn test_memory_cache_clear() {
        let cache = MemoryCache::new(10);
        cache.set(key("a"), vec![1], 60).await.unwrap();
        cache.clear().await.unwrap();
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_concurrent_cache_round_trip() {
        let cache = ConcurrentCache::new();
        let k = key("hello");
        cache.set(k.clone(), b"v".to_vec(), 60).await.unwrap();
        assert_eq!(cache.get(&k).await, Some(b"v".to_vec()));
        cache.clear().await.unwrap();
        assert!(cache.get(&k).await.is_none());
    }

    #[tokio::test]
    async fn test_ping_default() {
        let cache = MemoryCache::default();
        assert!(cache.ping().await);
    }
}
