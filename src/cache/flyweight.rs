//! Unbounded canonicalizing cache
//!
//! A [`FlyweightCache`] maps an immutable key to the one shared value that
//! stands for it. Entries are never evicted: the values it holds are handed
//! out as canonical instances, and dropping one would allow a second
//! "canonical" instance to be created for the same key later.
//!
//! Every operation takes the internal lock for its whole check-then-act
//! sequence, so two callers racing on the same absent key still observe a
//! single stored value.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use log::{debug, trace, warn};

use crate::{GeoError, Result};

/// Process-lifetime mapping from key to canonical value
///
/// Values are typically `Arc<T>` so that clones handed out by the cache share
/// one allocation and can be compared with `Arc::ptr_eq`.
#[derive(Debug)]
pub struct FlyweightCache<K, V> {
    values: Mutex<HashMap<K, V>>,
}

impl<K, V> FlyweightCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone + PartialEq,
{
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }

    // Helper method to get a mutex guard to the map
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<K, V>>> {
        self.values
            .lock()
            .map_err(|_| GeoError::LockPoisoned("Failed to lock flyweight cache".to_string()))
    }

    /// Check whether a value is stored under `key`
    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.lock()?.contains_key(key))
    }

    /// Return the value stored under `key`
    ///
    /// # Errors
    ///
    /// [`GeoError::NotFound`] when the key is absent.
    pub fn get(&self, key: &K) -> Result<V> {
        self.lock()?
            .get(key)
            .cloned()
            .ok_or_else(|| GeoError::NotFound(format!("Key not found: {:?}", key)))
    }

    /// Store `value` under a key that must not exist yet
    ///
    /// # Errors
    ///
    /// [`GeoError::ConsistencyViolation`] when the key is already present.
    pub fn insert(&self, key: K, value: V) -> Result<V> {
        let mut values = self.lock()?;
        if values.contains_key(&key) {
            return Err(GeoError::ConsistencyViolation(format!(
                "Key already exists: {:?}",
                key
            )));
        }
        debug!("flyweight insert {:?}", key);
        values.insert(key, value.clone());
        Ok(value)
    }

    /// Return the canonical value for `key`, storing `value` if there is none
    ///
    /// When the key is already present the supplied value is only used to
    /// check consistency: it must compare equal to the stored one.
    ///
    /// # Errors
    ///
    /// [`GeoError::ConsistencyViolation`] when the supplied value differs from
    /// the stored one, which points at a broken key derivation.
    pub fn get_or_insert(&self, key: K, value: V) -> Result<V> {
        let mut values = self.lock()?;
        if let Some(existing) = values.get(&key) {
            if *existing != value {
                warn!("flyweight value mismatch for {:?}", key);
                return Err(GeoError::ConsistencyViolation(format!(
                    "Parameter and stored value differ for key {:?}",
                    key
                )));
            }
            trace!("flyweight hit {:?}", key);
            return Ok(existing.clone());
        }
        debug!("flyweight insert {:?}", key);
        values.insert(key, value.clone());
        Ok(value)
    }

    /// Return the canonical value for `key`, building it with `make` if absent
    ///
    /// `make` runs while the lock is held, so it is invoked at most once per
    /// key for the lifetime of the cache. Errors from `make` are returned and
    /// nothing is stored.
    pub fn get_or_insert_with<F>(&self, key: K, make: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let mut values = self.lock()?;
        if let Some(existing) = values.get(&key) {
            trace!("flyweight hit {:?}", key);
            return Ok(existing.clone());
        }
        let value = make()?;
        debug!("flyweight insert {:?}", key);
        values.insert(key, value.clone());
        Ok(value)
    }

    /// Remove the entry stored under `key`
    ///
    /// # Errors
    ///
    /// [`GeoError::NotFound`] when the key is absent.
    pub fn delete(&self, key: &K) -> Result<()> {
        match self.lock()?.remove(key) {
            Some(_) => Ok(()),
            None => Err(GeoError::NotFound(format!(
                "The key {:?} does not exist",
                key
            ))),
        }
    }

    /// Number of canonical entries
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<K, V> Default for FlyweightCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}
