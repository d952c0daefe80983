// crates/verdict-core/src/runtime/memory.rs
// ============================================================================
// Module: Verdict In-Memory Resolver
// Description: In-process fact resolver backed by mutable vectors.
// Purpose: Provide a store double for tests and local experimentation.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The in-memory resolver holds results and waivers in process and serves
//! them through the [`FactResolver`] contract, including exclusion-set
//! filtering. Fetch counters expose cache-transparency to tests, and an
//! availability flag simulates an unreachable store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::core::ProductVersion;
use crate::core::ResultId;
use crate::core::TestResult;
use crate::core::Waiver;
use crate::core::WaiverId;
use crate::core::subject::Subject;
use crate::interfaces::FactResolver;
use crate::interfaces::ResolveError;

// ============================================================================
// SECTION: In-Memory Resolver
// ============================================================================

/// In-process fact resolver over mutable result and waiver collections.
///
/// # Invariants
/// - Fetches observe every fact pushed before the fetch began.
#[derive(Debug, Default)]
pub struct InMemoryFactResolver {
    /// Stored test results.
    results: Mutex<Vec<TestResult>>,
    /// Stored waivers.
    waivers: Mutex<Vec<Waiver>>,
    /// Number of result fetches served.
    result_fetches: AtomicU64,
    /// Number of waiver fetches served.
    waiver_fetches: AtomicU64,
    /// When set, every fetch fails as an unavailable upstream.
    unavailable: AtomicBool,
}

impl InMemoryFactResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a test result to the store.
    pub fn push_result(&self, result: TestResult) {
        if let Ok(mut results) = self.results.lock() {
            results.push(result);
        }
    }

    /// Appends a waiver to the store.
    pub fn push_waiver(&self, waiver: Waiver) {
        if let Ok(mut waivers) = self.waivers.lock() {
            waivers.push(waiver);
        }
    }

    /// Returns how many result fetches have been served.
    #[must_use]
    pub fn result_fetches(&self) -> u64 {
        self.result_fetches.load(Ordering::SeqCst)
    }

    /// Returns how many waiver fetches have been served.
    #[must_use]
    pub fn waiver_fetches(&self) -> u64 {
        self.waiver_fetches.load(Ordering::SeqCst)
    }

    /// Makes every subsequent fetch fail as an unavailable upstream.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fails the fetch when the resolver is flagged unavailable.
    fn check_available(&self) -> Result<(), ResolveError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ResolveError::UpstreamUnavailable(
                "in-memory store flagged unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl FactResolver for InMemoryFactResolver {
    fn fetch_results(
        &self,
        subject: &Subject,
        exclude: &BTreeSet<ResultId>,
    ) -> Result<Vec<TestResult>, ResolveError> {
        self.check_available()?;
        self.result_fetches.fetch_add(1, Ordering::SeqCst);
        let results = self
            .results
            .lock()
            .map_err(|err| ResolveError::UpstreamUnavailable(err.to_string()))?;
        Ok(results
            .iter()
            .filter(|result| result.subject == *subject && !exclude.contains(&result.id))
            .cloned()
            .collect())
    }

    fn fetch_waivers(
        &self,
        subject: &Subject,
        product_version: &ProductVersion,
        exclude: &BTreeSet<WaiverId>,
    ) -> Result<Vec<Waiver>, ResolveError> {
        self.check_available()?;
        self.waiver_fetches.fetch_add(1, Ordering::SeqCst);
        let waivers = self
            .waivers
            .lock()
            .map_err(|err| ResolveError::UpstreamUnavailable(err.to_string()))?;
        Ok(waivers
            .iter()
            .filter(|waiver| {
                waiver.subject == *subject
                    && waiver.product_version == *product_version
                    && !exclude.contains(&waiver.id)
            })
            .cloned()
            .collect())
    }
}
