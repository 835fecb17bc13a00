//! Response cache keyed by `(model_id, prompt)`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// blake3 digest of `model_id` and `prompt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    pub fn new(model_id: &str, prompt: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model_id.as_bytes());
        // Separator keeps ("ab", "c") and ("a", "bc") apart
        hasher.update(&[0]);
        hasher.update(prompt.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Freshness class of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Forecast prompts; short TTL
    #[default]
    AdHoc,
    /// Slow-changing lookups; long TTL
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub ad_hoc: Duration,
    pub lookup: Duration,
}

impl CacheTtls {
    pub fn ttl_for(&self, policy: CachePolicy) -> Duration {
        match policy {
            CachePolicy::AdHoc => self.ad_hoc,
            CachePolicy::Lookup => self.lookup,
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            ad_hoc: Duration::from_secs(60 * 60),
            lookup: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

/// In-memory TTL cache of successful generations.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh text for `key`, counting the hit or miss. Stale entries are
    /// dropped on access.
    pub fn get(&mut self, key: &CacheKey, now: Instant) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                self.hits += 1;
                Some(entry.text.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, text: String, ttl: Duration, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                text,
                stored_at: now,
                ttl,
            },
        );
    }

    /// Drop stale entries, returning how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_fresh(now));
        before - self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic_and_separated() {
        assert_eq!(CacheKey::new("m", "p"), CacheKey::new("m", "p"));
        assert_ne!(CacheKey::new("m", "p"), CacheKey::new("m2", "p"));
        assert_ne!(CacheKey::new("ab", "c"), CacheKey::new("a", "bc"));
        assert_eq!(CacheKey::new("m", "p").to_hex().len(), 64);
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = ResponseCache::new();
        let t0 = Instant::now();
        let key = CacheKey::new("gemma:2b", "prompt");
        cache.insert(key, "answer".to_string(), Duration::from_secs(10), t0);
        assert_eq!(
            cache.get(&key, t0 + Duration::from_secs(9)),
            Some("answer".to_string())
        );
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let mut cache = ResponseCache::new();
        let t0 = Instant::now();
        let key = CacheKey::new("gemma:2b", "prompt");
        cache.insert(key, "answer".to_string(), Duration::from_secs(10), t0);
        assert_eq!(cache.get(&key, t0 + Duration::from_secs(10)), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = ResponseCache::new();
        let t0 = Instant::now();
        cache.insert(CacheKey::new("m", "a"), "a".into(), Duration::from_secs(1), t0);
        cache.insert(CacheKey::new("m", "b"), "b".into(), Duration::from_secs(100), t0);
        assert_eq!(cache.purge_expired(t0 + Duration::from_secs(5)), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_ttl_policy() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.ttl_for(CachePolicy::AdHoc), Duration::from_secs(3600));
        assert_eq!(ttls.ttl_for(CachePolicy::Lookup), Duration::from_secs(604_800));
    }
}
