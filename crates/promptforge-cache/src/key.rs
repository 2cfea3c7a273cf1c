// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Fingerprint generation for cache keys
//!
//! A fingerprint is a deterministic hash of the normalized request
//! parameters. Two requests with the same text (modulo surrounding
//! whitespace and case-insensitive collapse), domain, tone, variables, and
//! target model produce the same fingerprint.

use serde::{Deserialize, Serialize};

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A deterministic cache key for refinement requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Domain the request was made against.
    pub domain: String,

    /// Hash of the normalized request components.
    pub request_hash: u64,
}

impl Fingerprint {
    /// Create a fingerprint from raw request components.
    ///
    /// `variables` are sorted by key before hashing so that map iteration
    /// order never changes the fingerprint.
    pub fn from_request(
        text: &str,
        domain: &str,
        tone: Option<&str>,
        variables: &[(String, String)],
        target_model: Option<&str>,
    ) -> Self {
        let mut hash = FNV_OFFSET;

        let normalized = normalize(text);
        hash = fnv1a(hash, normalized.as_bytes());
        hash = fnv1a(hash, &[0x1f]);
        hash = fnv1a(hash, domain.as_bytes());
        hash = fnv1a(hash, &[0x1f]);
        hash = fnv1a(hash, tone.unwrap_or("").as_bytes());
        hash = fnv1a(hash, &[0x1f]);

        let mut sorted: Vec<&(String, String)> = variables.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        for (k, v) in sorted {
            hash = fnv1a(hash, k.as_bytes());
            hash = fnv1a(hash, &[0x1e]);
            hash = fnv1a(hash, v.as_bytes());
            hash = fnv1a(hash, &[0x1f]);
        }

        hash = fnv1a(hash, target_model.unwrap_or("").as_bytes());

        Self {
            domain: domain.to_string(),
            request_hash: hash,
        }
    }

    /// Convert to string for file-based storage or log correlation.
    pub fn to_string(&self) -> String {
        format!("{}_{:016x}", self.domain, self.request_hash)
    }
}

/// Fold bytes into an FNV-1a running hash.
#[inline]
fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Normalize text for fingerprinting: trim, collapse whitespace runs,
/// lowercase. This matches the analyzer's sanitization closely enough that
/// trivially reformatted requests share a cache entry.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_requests_share_fingerprint() {
        let a = Fingerprint::from_request("make it fast", "sql", None, &[], None);
        let b = Fingerprint::from_request("make it fast", "sql", None, &[], None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_whitespace_and_case_normalized() {
        let a = Fingerprint::from_request("  Make   it FAST ", "sql", None, &[], None);
        let b = Fingerprint::from_request("make it fast", "sql", None, &[], None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_domain_changes_fingerprint() {
        let a = Fingerprint::from_request("make it fast", "sql", None, &[], None);
        let b = Fingerprint::from_request("make it fast", "branding", None, &[], None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tone_and_model_change_fingerprint() {
        let base = Fingerprint::from_request("x", "sql", None, &[], None);
        let toned = Fingerprint::from_request("x", "sql", Some("formal"), &[], None);
        let modeled = Fingerprint::from_request("x", "sql", None, &[], Some("gpt-4"));
        assert_ne!(base, toned);
        assert_ne!(base, modeled);
        assert_ne!(toned, modeled);
    }

    #[test]
    fn test_variable_order_irrelevant() {
        let ab = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ];
        let ba = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ];
        let x = Fingerprint::from_request("x", "sql", None, &ab, None);
        let y = Fingerprint::from_request("x", "sql", None, &ba, None);
        assert_eq!(x, y);
    }

    #[test]
    fn test_to_string_stable() {
        let fp = Fingerprint::from_request("x", "sql", None, &[], None);
        assert!(fp.to_string().starts_with("sql_"));
        assert_eq!(fp.to_string(), fp.clone().to_string());
    }
}
