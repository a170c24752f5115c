use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Thread-safe LRU cache with per-entry expiry
///
/// Uses Arc<Mutex<>> pattern for safe concurrent access across threads.
/// Expiry is checked on read; stale entries are dropped on access, LRU
/// eviction handles the rest.
#[derive(Clone)]
pub struct ResponseCache<V> {
    entries: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a new ResponseCache with the specified capacity and TTL
    ///
    /// # Panics
    /// Panics if capacity is 0
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        let entries =
            LruCache::new(NonZeroUsize::new(capacity).expect("Capacity must be non-zero"));
        Self {
            entries: Arc::new(Mutex::new(entries)),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Retrieve a cached value, dropping it if it has expired
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();

        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
        }
        None
    }

    /// Store a value under the given key with a fresh TTL
    pub fn put(&self, key: String, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Utc::now() + self.ttl,
        };
        let mut entries = self.entries.lock().unwrap();
        entries.put(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Generate a stable cache key for arbitrary request material
    ///
    /// # Returns
    /// Hexadecimal SHA-256 digest of the input
    pub fn generate_key(input: &str) -> String {
        format!("{:x}", Sha256::digest(input.as_bytes()))
    }
}
