// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Caching layer for promptforge
//!
//! Provides the fingerprint key type and pluggable cache backends used by
//! the refinement pipeline to deduplicate identical requests.

#![allow(clippy::inherent_to_string)]

pub mod key;
pub mod memory;

pub use key::Fingerprint;
pub use memory::{ConcurrentCache, MemoryCache};

use async_trait::async_trait;

/// Cache backend trait.
///
/// Backends must honor a "miss returns `None`, never fails" contract for
/// `get`: an unavailable backend reports every key as a miss rather than
/// surfacing an error into the pipeline.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value from cache. `None` on miss, expiry, or backend failure.
    async fn get(&self, key: &Fingerprint) -> Option<Vec<u8>>;

    /// Set a value in cache with a time-to-live in seconds.
    async fn set(&self, key: Fingerprint, value: Vec<u8>, ttl_secs: u64) -> anyhow::Result<()>;

    /// Check if a live (non-expired) entry exists for the key.
    async fn contains(&self, key: &Fingerprint) -> bool;

    /// Clear the cache.
    async fn clear(&self) -> anyhow::Result<()>;

    /// Check backend liveness.
    async fn ping(&self) -> bool {
        true
    }

    /// Release backend connections. In-memory backends hold none, so the
    /// default is a no-op; entries are not dropped.
    async fn disconnect(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
