//! In-memory response cache with per-entry TTL.
//!
//! One cache instance serves every read operation; entries are type-erased
//! `serde_json::Value` payloads so job lists and stats share a single map.
//! Expired entries are purged lazily on lookup. There is no eviction policy
//! beyond TTL, growth is bounded by the small set of distinct query shapes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

struct CacheEntry {
    payload: serde_json::Value,
    stored_at: Instant,
    expires_at: Instant,
}

#[derive(Default)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached payload for `key` if present and unexpired.
    /// An expired entry is removed as a side effect of the lookup.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                debug!(
                    key,
                    age_ms = entry.stored_at.elapsed().as_millis() as u64,
                    "cache hit"
                );
                serde_json::from_value(entry.payload.clone()).ok()
            }
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key` for `ttl`. Replaces any existing entry,
    /// restarting its clock.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T, ttl: Duration) {
        let payload = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("failed to serialize cache payload: {e}");
                return;
            }
        };
        let now = Instant::now();
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Removes every entry whose key starts with `prefix`. Returns the number
    /// of entries removed. Used after mutating operations so the next read is
    /// a forced miss.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
