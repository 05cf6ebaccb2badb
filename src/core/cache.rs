//! File system locations and a small time-boxed in-memory cache.
//!
//! The in-memory cache is an LRU whose entries also expire after a fixed
//! time-to-live. It is always owned by the caller that needs it; there is
//! no process-wide instance.

use lru::LruCache;
use std::{
    fs,
    hash::Hash,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// Base directory for everything this crate writes: ~/.cache/sport-data-hub
pub fn data_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("sport-data-hub")
}

/// Path: ~/.cache/sport-data-hub/football.db
pub fn default_db_path() -> PathBuf {
    data_dir().join("football.db")
}

/// Path: ~/.cache/sport-data-hub/scraped-matches.json
pub fn default_dump_path() -> PathBuf {
    data_dir().join("scraped-matches.json")
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file, creating parent directories as needed
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

struct Timed<V> {
    value: V,
    stored_at: Instant,
}

/// LRU cache whose entries are discarded once older than `ttl`.
pub struct TtlCache<K: Hash + Eq, V> {
    entries: LruCache<K, Timed<V>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Fresh value for `key`, if any. Expired entries are evicted on access.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.pop(key);
        }
        None
    }

    pub fn put(&mut self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.put(
            key,
            Timed {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
