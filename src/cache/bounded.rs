//! Fixed-capacity cache with least-recently-used eviction
//!
//! Unlike [`FlyweightCache`](super::FlyweightCache), entries here may
//! disappear, so it must not be used for canonicalization. Reads count as
//! use: `get` and `refresh` move an entry to the most-recent end.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use log::{debug, trace};

use crate::config::GeoConfig;
use crate::constants::DEFAULT_CACHE_MAX_SIZE;
use crate::{GeoError, Result};

#[derive(Debug)]
struct Entries<K, V> {
    values: HashMap<K, V>,
    /// Keys ordered from least to most recently used
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> Entries<K, V> {
    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

/// Access-ordered cache holding at most `max_size` entries
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    max_size: usize,
    entries: Mutex<Entries<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + PartialEq,
{
    /// Create a cache that holds at most `max_size` entries
    ///
    /// # Errors
    ///
    /// [`GeoError::InvalidArgument`] when `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(GeoError::InvalidArgument("Invalid maxSize: 0".to_string()));
        }
        Ok(Self {
            max_size,
            entries: Mutex::new(Entries {
                values: HashMap::with_capacity(max_size),
                order: VecDeque::with_capacity(max_size),
            }),
        })
    }

    /// Create a cache sized by `config.bounded_cache_max_size`
    pub fn from_config(config: &GeoConfig) -> Result<Self> {
        Self::new(config.bounded_cache_max_size)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries<K, V>>> {
        self.entries
            .lock()
            .map_err(|_| GeoError::LockPoisoned("Failed to lock bounded cache".to_string()))
    }

    /// Maximum number of entries kept
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Current number of entries
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.values.len())
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Check whether `key` is cached; does not count as a use
    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.lock()?.values.contains_key(key))
    }

    /// Return the value for `key` and mark it most recently used
    pub fn get(&self, key: &K) -> Result<V> {
        let mut entries = self.lock()?;
        let value = entries
            .values
            .get(key)
            .cloned()
            .ok_or_else(|| GeoError::NotFound(format!("Key not found: {:?}", key)))?;
        entries.touch(key);
        Ok(value)
    }

    /// Insert `value` under `key`, evicting the least recently used entry if full
    ///
    /// Re-inserting an equal value refreshes the entry. A different value for
    /// a cached key is a [`GeoError::ConsistencyViolation`].
    pub fn insert(&self, key: K, value: V) -> Result<V> {
        let mut entries = self.lock()?;
        if let Some(existing) = entries.values.get(&key) {
            if *existing != value {
                return Err(GeoError::ConsistencyViolation(format!(
                    "Parameter and stored value are different for key {:?}",
                    key
                )));
            }
            let existing = existing.clone();
            entries.touch(&key);
            trace!("bounded cache refresh {:?}", key);
            return Ok(existing);
        }

        if entries.values.len() >= self.max_size {
            if let Some(eldest) = entries.order.pop_front() {
                debug!("bounded cache evict {:?}", eldest);
                entries.values.remove(&eldest);
            }
        }
        entries.order.push_back(key.clone());
        entries.values.insert(key, value.clone());
        Ok(value)
    }

    /// Mark `key` as most recently used and return its value
    pub fn refresh(&self, key: &K) -> Result<V> {
        self.get(key)
    }
}

impl<K, V> Default for BoundedCache<K, V> {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_CACHE_MAX_SIZE,
            entries: Mutex::new(Entries {
                values: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }
}
