use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// Canonical cache tag per resource. The same constant is used on the read
/// path (tagging stored pages) and the write path (invalidation), so a write
/// can never miss the pages a read stored.
pub const PRODUCTS_TAG: &str = "productsCache";
pub const USERS_TAG: &str = "usersCache";

/// Builds the key for a cached list page, e.g. `getAllProducts-1-3`.
pub fn list_key(op: &str, page: i64, limit: i64) -> String {
    format!("{op}-{page}-{limit}")
}

struct Entry {
    value: Value,
    tag: &'static str,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    tags: HashMap<&'static str, HashSet<String>>,
}

impl Inner {
    /// Drops every expired entry and its tag index reference. Keys are
    /// unbounded (one per page/limit pair), so without this sweep the map
    /// would grow until the next tag invalidation.
    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            if let Some(entry) = self.entries.remove(&key) {
                if let Some(keys) = self.tags.get_mut(entry.tag) {
                    keys.remove(&key);
                    if keys.is_empty() {
                        self.tags.remove(entry.tag);
                    }
                }
            }
        }
    }
}

/// In-process tagged key-value cache for serialized list pages.
///
/// Entries are stored under a string key and indexed under a resource-level
/// tag; `invalidate_tag` drops every entry with that tag regardless of key.
/// Coarse by design: any write to a resource discards all of its cached
/// pages, so reads never see stale data.
#[derive(Clone)]
pub struct TagCache {
    inner: Arc<RwLock<Inner>>,
    ttl: Option<Duration>,
}

impl TagCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            ttl,
        }
    }

    /// Returns the cached value for `key`, or awaits `compute`, stores the
    /// result under `tag`, and returns it. Compute errors propagate and leave
    /// the cache untouched. Two concurrent misses on the same key may both
    /// compute; the later insert wins.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        tag: &'static str,
        compute: F,
    ) -> anyhow::Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Value>>,
    {
        if let Some(value) = self.get(key).await {
            debug!(key, "cache hit");
            return Ok(value);
        }
        debug!(key, "cache miss");

        let value = compute().await?;
        self.insert(key.to_string(), tag, value.clone()).await;
        Ok(value)
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let inner = self.inner.read().await;
        let entry = inner.entries.get(key)?;
        if entry.is_expired(Instant::now()) {
            return None;
        }
        Some(entry.value.clone())
    }

    async fn insert(&self, key: String, tag: &'static str, value: Value) {
        let now = Instant::now();
        let expires_at = self.ttl.map(|ttl| now + ttl);
        let mut inner = self.inner.write().await;
        inner.purge_expired(now);
        inner.tags.entry(tag).or_default().insert(key.clone());
        inner.entries.insert(
            key,
            Entry {
                value,
                tag,
                expires_at,
            },
        );
    }

    /// Drops every entry stored under `tag`.
    pub async fn invalidate_tag(&self, tag: &str) {
        let mut inner = self.inner.write().await;
        if let Some(keys) = inner.tags.remove(tag) {
            debug!(tag, count = keys.len(), "cache tag invalidated");
            for key in keys {
                inner.entries.remove(&key);
            }
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}
