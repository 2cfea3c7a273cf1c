// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Prompt store
//!
//! Persistence seam for saved prompts plus an in-memory reference
//! implementation with relevance-ranked search. Search scoring is a fixed
//! weighted blend of term overlap, usage, domain proximity, and recency;
//! the weights are tunable policy constants, not derived values.

use crate::domain::Domain;
use crate::error::{Error, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Relevance weight for query-term overlap.
pub const W_TERM: f32 = 0.40;
/// Relevance weight for usage count.
pub const W_USAGE: f32 = 0.25;
/// Relevance weight for domain proximity.
pub const W_DOMAIN: f32 = 0.20;
/// Relevance weight for recency.
pub const W_RECENCY: f32 = 0.15;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Caller-supplied metadata for a saved prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptMetadata {
    /// Domain the prompt belongs to.
    pub domain: Domain,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Optional human description.
    pub description: Option<String>,
}

/// A stored prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPrompt {
    /// Store-assigned identifier.
    pub id: u64,
    /// The prompt text.
    pub text: String,
    /// Domain the prompt belongs to.
    pub domain: Domain,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Optional human description.
    pub description: Option<String>,
    /// Unix seconds at save time.
    pub created_at: u64,
    /// Number of recorded uses.
    pub usage_count: u64,
}

/// Search query.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Words to match against prompt text and tags.
    pub query: Option<String>,
    /// Restrict/boost by domain.
    pub domain: Option<Domain>,
    /// Require all of these tags.
    pub tags: Vec<String>,
    /// Maximum results; 0 means [`DEFAULT_SEARCH_LIMIT`].
    pub limit: usize,
}

impl SearchParams {
    /// Search by free-text query.
    pub fn query(q: impl Into<String>) -> Self {
        Self {
            query: Some(q.into()),
            ..Self::default()
        }
    }

    /// Restrict/boost results toward a domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Require a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Store-wide counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Total saved prompts.
    pub total: usize,
    /// Per-domain counts.
    pub by_domain: Vec<(Domain, usize)>,
}

/// Persistence seam for saved prompts.
#[async_trait]
pub trait Store: Send + Sync {
    /// Save a prompt and return the stored record.
    async fn save(&self, text: &str, metadata: PromptMetadata) -> Result<SavedPrompt>;

    /// Relevance-ranked search.
    async fn search(&self, params: &SearchParams) -> Result<Vec<SavedPrompt>>;

    /// Fetch a prompt by id.
    async fn get(&self, id: u64) -> Result<Option<SavedPrompt>>;

    /// Increment a prompt's usage counter.
    async fn record_use(&self, id: u64) -> Result<()>;

    /// Store-wide counters.
    async fn stats(&self) -> Result<StoreStats>;
}

/// In-memory store. Reference implementation and test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prompts: DashMap<u64, SavedPrompt>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn relevance(&self, prompt: &SavedPrompt, params: &SearchParams, now: u64) -> f32 {
        let term = match params.query.as_deref() {
            Some(q) => term_overlap(q, prompt),
            None => 0.5,
        };

        // Saturating usage signal: 5 uses ≈ 0.5.
        let usage = prompt.usage_count as f32 / (prompt.usage_count as f32 + 5.0);

        let domain = match params.domain {
            Some(d) if d == prompt.domain => 1.0,
            Some(d) if d.related().contains(&prompt.domain) => 0.5,
            Some(_) => 0.0,
            None => 0.5,
        };

        let age_days = now.saturating_sub(prompt.created_at) as f32 / 86_400.0;
        let recency = 1.0 / (1.0 + age_days);

        W_TERM * term + W_USAGE * usage + W_DOMAIN * domain + W_RECENCY * recency
    }
}

/// Fraction of query words found in the prompt text or tags.
fn term_overlap(query: &str, prompt: &SavedPrompt) -> f32 {
    let text = prompt.text.to_lowercase();
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return 0.5;
    }
    let hits = words
        .iter()
        .filter(|w| {
            let w = w.to_lowercase();
            text.contains(&w) || prompt.tags.iter().any(|t| t.to_lowercase() == w)
        })
        .count();
    hits as f32 / words.len() as f32
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[async_trait]
impl Store for MemoryStore {
    async fn save(&self, text: &str, metadata: PromptMetadata) -> Result<SavedPrompt> {
        if text.trim().is_empty() {
            return Err(Error::store("cannot save an empty prompt"));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let prompt = SavedPrompt {
            id,
            text: text.to_string(),
            domain: metadata.domain,
            tags: metadata.tags,
            description: metadata.description,
            created_at: unix_now(),
            usage_count: 0,
        };
        self.prompts.insert(id, prompt.clone());
        Ok(prompt)
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<SavedPrompt>> {
        let now = unix_now();
        let limit = if params.limit == 0 {
            DEFAULT_SEARCH_LIMIT
        } else {
            params.limit
        };

        let mut ranked: Vec<(f32, SavedPrompt)> = self
            .prompts
            .iter()
            .filter(|entry| {
                params.tags.iter().all(|t| {
                    entry
                        .tags
                        .iter()
                        .any(|have| have.eq_ignore_ascii_case(t))
                })
            })
            .map(|entry| (self.relevance(&entry, params, now), entry.clone()))
            .collect();

        ranked.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(core::cmp::Ordering::Equal));
        ranked.truncate(limit);
        Ok(ranked.into_iter().map(|(_, p)| p).collect())
    }

    async fn get(&self, id: u64) -> Result<Option<SavedPrompt>> {
        Ok(self.prompts.get(&id).map(|p| p.clone()))
    }

    async fn record_use(&self, id: u64) -> Result<()> {
        match self.prompts.get_mut(&id) {
            Some(mut prompt) => {
                prompt.usage_count += 1;
                Ok(())
            }
            None => Err(Error::store(format!("prompt {id} not found"))),
        }
    }

    async fn stats(&self) -> Result<StoreStats> {
        let mut by_domain: std::collections::HashMap<Domain, usize> =
            std::collections::HashMap::new();
        for entry in self.prompts.iter() {
            *by_domain.entry(entry.domain).or_default() += 1;
        }
        let mut by_domain: Vec<(Domain, usize)> = by_domain.into_iter().collect();
        by_domain.sort_by_key(|(d, _)| d.as_str());
        Ok(StoreStats {
            total: self.prompts.len(),
            by_domain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(domain: Domain) -> PromptMetadata {
        PromptMetadata {
            domain,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = MemoryStore::new();
        let saved = store
            .save("Optimize the slow orders query.", meta(Domain::Sql))
            .await
            .unwrap();
        assert!(saved.id > 0);
        let fetched = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched.text, "Optimize the slow orders query.");
        assert_eq!(fetched.domain, Domain::Sql);
    }

    #[tokio::test]
    async fn test_save_empty_rejected() {
        let store = MemoryStore::new();
        let err = store.save("   ", meta(Domain::General)).await.unwrap_err();
        assert_eq!(err.category(), "store");
    }

    #[tokio::test]
    async fn test_search_term_overlap_ranks_first() {
        let store = MemoryStore::new();
        store
            .save("Optimize the slow orders query.", meta(Domain::Sql))
            .await
            .unwrap();
        store
            .save("Name a new coffee brand.", meta(Domain::Branding))
            .await
            .unwrap();

        let results = store
            .search(&SearchParams::query("orders query"))
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].text.contains("orders"));
    }

    #[tokio::test]
    async fn test_search_domain_boost() {
        let store = MemoryStore::new();
        store
            .save("Design a dashboard.", meta(Domain::Saas))
            .await
            .unwrap();
        store
            .save("Design a dashboard.", meta(Domain::Cine))
            .await
            .unwrap();

        let results = store
            .search(&SearchParams::query("dashboard").with_domain(Domain::Saas))
            .await
            .unwrap();
        assert_eq!(results[0].domain, Domain::Saas);
    }

    #[tokio::test]
    async fn test_usage_boost() {
        let store = MemoryStore::new();
        let a = store
            .save("Deploy the api service.", meta(Domain::Devops))
            .await
            .unwrap();
        let b = store
            .save("Deploy the api service.", meta(Domain::Devops))
            .await
            .unwrap();
        for _ in 0..10 {
            store.record_use(b.id).await.unwrap();
        }

        let results = store
            .search(&SearchParams::query("deploy api"))
            .await
            .unwrap();
        assert_eq!(results[0].id, b.id);
        assert_eq!(results[1].id, a.id);
    }

    #[tokio::test]
    async fn test_tag_filter() {
        let store = MemoryStore::new();
        let mut tagged = meta(Domain::General);
        tagged.tags.push("reviewed".to_string());
        store.save("Tagged prompt.", tagged).await.unwrap();
        store
            .save("Untagged prompt.", meta(Domain::General))
            .await
            .unwrap();

        let results = store
            .search(&SearchParams::default().with_tag("reviewed"))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "Tagged prompt.");
    }

    #[tokio::test]
    async fn test_stats_counts_by_domain() {
        let store = MemoryStore::new();
        store.save("a", meta(Domain::Sql)).await.unwrap();
        store.save("b", meta(Domain::Sql)).await.unwrap();
        store.save("c", meta(Domain::Cine)).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert!(stats.by_domain.contains(&(Domain::Sql, 2)));
        assert!(stats.by_domain.contains(&(Domain::Cine, 1)));
    }
}
