//! Component cache with recency-ordered, bounded eviction.
//!
//! Pairs a key→entry map with an explicit recency sequence (front = least
//! recently used, back = most recent). The pair is kept bijective: every
//! stored key appears in the sequence exactly once, so the sequence head is
//! always the next eviction victim.

use crate::node::{InstanceRef, RenderNode, component_name};
use log::{debug, trace};
use std::collections::{HashMap, VecDeque};

/// A cached subtree: the node that rendered it plus the resolved name the
/// filters re-check later.
#[derive(Debug)]
struct CacheEntry {
    /// Node holding the shared live-instance handle
    node: RenderNode,
    /// Component name at the time the entry was stored
    name: Option<String>,
}

/// Cache of live component subtrees keyed by their resolved identity.
#[derive(Debug)]
pub struct ComponentCache {
    /// Key to cached entry
    entries: HashMap<String, CacheEntry>,
    /// Recency order (front = oldest, back = most recent)
    recency: VecDeque<String>,
    /// Cache statistics
    hits: u64,
    misses: u64,
}

impl Default for ComponentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a key is cached (without updating recency or stats)
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Peek at a cached node without touching recency or stats
    pub fn peek(&self, key: &str) -> Option<&RenderNode> {
        self.entries.get(key).map(|entry| &entry.node)
    }

    /// Cached keys in recency order, least recently used first
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.recency.iter().map(String::as_str)
    }

    /// Look a candidate node up, reusing the cached instance on a hit and
    /// storing the candidate on a miss.
    ///
    /// On a hit the candidate inherits the stored live instance and the key
    /// moves to the most-recently-used end. On a miss the candidate is
    /// stored and, if `max` is set and now exceeded, the entry at the
    /// least-recently-used end is pruned with `active_tag` as context.
    /// Either way the returned node is marked `cache_backed` so the
    /// renderer skips its normal creation path.
    pub fn lookup_or_insert(
        &mut self,
        key: String,
        mut node: RenderNode,
        max: Option<usize>,
        active_tag: Option<&str>,
    ) -> RenderNode {
        node.cache_backed = true;

        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            trace!("cache hit for {:?}", key);

            // The fresh node inherits the live instance instead of
            // spawning a new one
            node.instance = entry.node.instance.clone();

            // Move to the most-recently-used end
            self.recency.retain(|k| k != &key);
            self.recency.push_back(key);
            return node;
        }

        self.misses += 1;
        trace!("cache miss for {:?}", key);

        let name = node
            .component
            .as_ref()
            .and_then(|link| component_name(link))
            .map(str::to_string);
        self.entries.insert(key.clone(), CacheEntry { node: node.clone(), name });
        self.recency.push_back(key);

        // Prune the oldest entry once the bound is exceeded
        if let Some(max) = max
            && self.entries.len() > max
            && let Some(oldest) = self.recency.front().cloned()
        {
            self.prune(&oldest, active_tag);
        }

        node
    }

    /// Record the live instance the renderer materialized for a stored
    /// node. Keys the cache never stored are ignored.
    pub fn attach_instance(&mut self, key: &str, instance: InstanceRef) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.node.instance = Some(instance);
        }
    }

    /// Drop the entry at `key`, tearing its instance down first.
    ///
    /// Teardown is skipped when the entry's tag matches `active_tag`:
    /// destroying it would kill the instance currently on screen. The
    /// entry itself is removed either way.
    pub fn prune(&mut self, key: &str, active_tag: Option<&str>) {
        let Some(entry) = self.entries.remove(key) else {
            return;
        };

        let displayed = match active_tag {
            Some(active) => entry.node.tag.as_deref() == Some(active),
            None => false,
        };
        if !displayed {
            if let Some(instance) = &entry.node.instance {
                instance.borrow_mut().destroy();
            }
            debug!("evicted cached component entry: {:?}", key);
        } else {
            debug!("dropped cache entry {:?} without teardown, node is on screen", key);
        }

        self.recency.retain(|k| k != key);
    }

    /// Re-check every entry against `keep`, pruning the ones whose name no
    /// longer passes. Entries without a resolvable name are left alone.
    pub fn reconcile<F>(&mut self, keep: F, active_tag: Option<&str>)
    where
        F: Fn(&str) -> bool,
    {
        let doomed: Vec<String> = self
            .recency
            .iter()
            .filter(|key| {
                self.entries
                    .get(key.as_str())
                    .and_then(|entry| entry.name.as_deref())
                    .is_some_and(|name| !keep(name))
            })
            .cloned()
            .collect();

        if !doomed.is_empty() {
            debug!("filter change evicts {} cached entries", doomed.len());
        }
        for key in doomed {
            self.prune(&key, active_tag);
        }
    }

    /// Evict everything unconditionally, tearing every instance down.
    pub fn clear(&mut self) {
        let keys: Vec<String> = self.recency.iter().cloned().collect();
        for key in keys {
            self.prune(&key, None);
        }
    }

    /// Cache hits count
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Cache misses count
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Get the cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }

    /// Log cache statistics for debugging
    pub fn log_stats(&self) {
        debug!(
            "ComponentCache stats: entries={}, hits={}, misses={}, hit_rate={:.1}%",
            self.entries.len(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        );
    }
}
