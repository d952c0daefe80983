// crates/verdict-core/src/runtime/cache.rs
// ============================================================================
// Module: Verdict Fact Cache
// Description: Cache-key derivation and built-in cache backends.
// Purpose: Memoize fact lookups with targeted, subject-scoped invalidation.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Cache keys are derived from the resolver function identity and the
//! canonical subject serialization, so the decision path and the
//! invalidation path construct byte-identical keys for any given subject
//! regardless of field insertion order. Two backends ship with the core: a
//! no-op backend (every query is a live fetch) and an in-memory TTL backend.
//! Invalidation is a targeted delete keyed by subject, never a flush.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use crate::core::ProductVersion;
use crate::core::subject::Subject;
use crate::interfaces::CacheBackend;
use crate::interfaces::CacheError;

// ============================================================================
// SECTION: Key Derivation
// ============================================================================

/// Resolver identity prefix for cached result lookups.
const RESULTS_KEY_PREFIX: &str = "verdict.resolve:retrieve_results";

/// Resolver identity prefix for cached waiver lookups.
const WAIVERS_KEY_PREFIX: &str = "verdict.resolve:retrieve_waivers";

/// Derives the cache key for a subject's result lookup.
#[must_use]
pub fn results_cache_key(subject: &Subject) -> String {
    format!("{RESULTS_KEY_PREFIX}|{}", subject.canonical())
}

/// Derives the cache key for a subject's waiver lookup under a product
/// version.
#[must_use]
pub fn waivers_cache_key(subject: &Subject, product_version: &ProductVersion) -> String {
    format!("{WAIVERS_KEY_PREFIX}|{product_version}|{}", subject.canonical())
}

// ============================================================================
// SECTION: Null Cache
// ============================================================================

/// No-op cache backend; every lookup is a live fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl NullCache {
    /// Creates a new no-op cache backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CacheBackend for NullCache {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: In-Memory Cache
// ============================================================================

/// One stored cache entry with its expiry deadline.
#[derive(Debug, Clone)]
struct MemoryEntry {
    /// Serialized cached value.
    value: Vec<u8>,
    /// Expiry deadline; `None` means the entry never expires.
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    /// Returns true when the entry has passed its expiry deadline.
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// In-memory TTL cache backend.
///
/// # Invariants
/// - Entries expire after their TTL even without explicit invalidation.
/// - Safe under concurrent access; operations are per-key atomic.
#[derive(Debug, Default)]
pub struct MemoryCache {
    /// Entry map protected by a mutex.
    entries: Mutex<BTreeMap<String, MemoryEntry>>,
}

impl MemoryCache {
    /// Creates a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the entry map, mapping poisoning to a backend error.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, MemoryEntry>>, CacheError> {
        self.entries.lock().map_err(|err| CacheError::Unavailable(err.to_string()))
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value: value.to_vec(),
            expires_at: Instant::now().checked_add(ttl),
        };
        let mut entries = self.lock()?;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.lock()?;
        entries.remove(key);
        Ok(())
    }
}
