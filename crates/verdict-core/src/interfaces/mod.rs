// crates/verdict-core/src/interfaces/mod.rs
// ============================================================================
// Module: Verdict Interfaces
// Description: Backend-agnostic interfaces for fact resolution and caching.
// Purpose: Define the contract surfaces used by the decision engine.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Verdict integrates with the external result and
//! waiver stores and with a cache backend, without embedding transport
//! details. Implementations must be deterministic for fixed store state and
//! fail closed on missing or invalid data: a gating decision is never
//! computed from partial facts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use crate::core::ProductVersion;
use crate::core::ResultId;
use crate::core::TestResult;
use crate::core::Waiver;
use crate::core::WaiverId;
use crate::core::subject::Subject;

// ============================================================================
// SECTION: Fact Resolver
// ============================================================================

/// Fact resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A backing store was unreachable or timed out.
    ///
    /// Surfaced to the caller as a query failure; the core does not retry.
    #[error("upstream store unavailable: {0}")]
    UpstreamUnavailable(String),
    /// A backing store returned a response the resolver could not interpret.
    #[error("invalid store response: {0}")]
    InvalidResponse(String),
    /// The resolver was constructed with invalid settings.
    #[error("resolver configuration error: {0}")]
    Configuration(String),
}

/// Backend-agnostic resolver for test results and waivers.
///
/// Exclusion sets remove matching facts from the returned sequence before
/// any further processing; this is the mechanism that lets callers compute
/// what a decision would have been without one specific fact, without a
/// separate historical store.
pub trait FactResolver: Send + Sync {
    /// Fetches the current results for a subject, ordered by store id.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the result store cannot be queried.
    fn fetch_results(
        &self,
        subject: &Subject,
        exclude: &BTreeSet<ResultId>,
    ) -> Result<Vec<TestResult>, ResolveError>;

    /// Fetches the current waivers for a subject and product version.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the waiver store cannot be queried.
    fn fetch_waivers(
        &self,
        subject: &Subject,
        product_version: &ProductVersion,
        exclude: &BTreeSet<WaiverId>,
    ) -> Result<Vec<Waiver>, ResolveError>;
}

// ============================================================================
// SECTION: Cache Backend
// ============================================================================

/// Cache backend errors.
///
/// # Invariants
/// - Never fatal to a decision: callers degrade to a direct fetch.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend could not be reached or its state is unusable.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Pluggable key-value cache with per-entry expiry.
///
/// The cache is a performance optimization, not a correctness dependency: a
/// no-op backend and a populated backend must produce identical decisions
/// for the same underlying store state. Operations are per-key atomic; a
/// concurrent get-miss/set race is benign because fetches are idempotent for
/// fixed store state.
pub trait CacheBackend: Send + Sync {
    /// Returns the cached value for a key, if present and unexpired.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unavailable.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores a value under a key with the given time-to-live.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unavailable.
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Deletes the value for a key, if present.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unavailable.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}
