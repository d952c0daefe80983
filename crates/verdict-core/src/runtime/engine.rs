// crates/verdict-core/src/runtime/engine.rs
// ============================================================================
// Module: Verdict Decision Engine
// Description: Aggregate gating decisions across applicable policies.
// Purpose: Orchestrate matching, fact resolution, caching, and evaluation.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The decision engine is the single canonical path for computing a
//! [`Decision`]: it selects applicable policies, resolves facts through the
//! cache and fact resolver, evaluates each policy, and unions the
//! unsatisfied requirements in deterministic order. Queries carrying
//! exclusion sets bypass the cache in both directions, because excluded-id
//! semantics are query-specific and must not be stored under the normal
//! subject key. A decision is all-or-nothing: if any fact fetch fails the
//! whole decision fails, never a silently optimistic partial answer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::core::Decision;
use crate::core::DecisionContext;
use crate::core::Policy;
use crate::core::ProductVersion;
use crate::core::Requirement;
use crate::core::ResultId;
use crate::core::TestResult;
use crate::core::Waiver;
use crate::core::WaiverId;
use crate::core::applicable_policies;
use crate::core::compose_summary;
use crate::core::subject::Subject;
use crate::interfaces::CacheBackend;
use crate::interfaces::FactResolver;
use crate::interfaces::ResolveError;
use crate::runtime::cache::results_cache_key;
use crate::runtime::cache::waivers_cache_key;
use crate::runtime::evaluator::evaluate_policy;

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Default time-to-live for cached fact lookups.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Configuration for the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Time-to-live applied to cached fact lookups.
    ///
    /// Expiry bounds staleness from missed invalidations or out-of-band
    /// store mutation.
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

// ============================================================================
// SECTION: Decision Query
// ============================================================================

/// Query for one gating decision.
///
/// The `ignore_results` and `ignore_waivers` sets remove specific facts
/// before evaluation; they are the first-class way to ask what the decision
/// would be without fact X, used both by API clients and by the change
/// detector to reconstruct pre-event state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionQuery {
    /// Subject the decision is about.
    pub subject: Subject,
    /// Decision context to evaluate under.
    pub decision_context: DecisionContext,
    /// Product version to evaluate under.
    pub product_version: ProductVersion,
    /// Result ids excluded from evaluation.
    #[serde(default)]
    pub ignore_results: BTreeSet<ResultId>,
    /// Waiver ids excluded from evaluation.
    #[serde(default)]
    pub ignore_waivers: BTreeSet<WaiverId>,
}

impl DecisionQuery {
    /// Creates a query with no exclusions.
    #[must_use]
    pub fn new(
        subject: Subject,
        decision_context: DecisionContext,
        product_version: ProductVersion,
    ) -> Self {
        Self {
            subject,
            decision_context,
            product_version,
            ignore_results: BTreeSet::new(),
            ignore_waivers: BTreeSet::new(),
        }
    }

    /// Adds a result id to exclude from evaluation.
    #[must_use]
    pub fn ignoring_result(mut self, id: ResultId) -> Self {
        self.ignore_results.insert(id);
        self
    }

    /// Adds a waiver id to exclude from evaluation.
    #[must_use]
    pub fn ignoring_waiver(mut self, id: WaiverId) -> Self {
        self.ignore_waivers.insert(id);
        self
    }
}

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Decision computation errors.
///
/// # Invariants
/// - Variants distinguish "could not evaluate" from the vacuous-success case
///   of no applicable policies, which is not an error.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The subject cannot be classified for policy matching.
    #[error("invalid subject: {0}")]
    InvalidSubject(String),
    /// Fact resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

// ============================================================================
// SECTION: Decision Engine
// ============================================================================

/// Decision engine computing aggregate gating decisions.
///
/// # Invariants
/// - Holds no mutable state of its own; the cache is the only shared
///   mutable resource and is injected explicitly.
pub struct DecisionEngine<R, C> {
    /// Configured policies in configuration order.
    policies: Vec<Policy>,
    /// Fact resolver for the external stores.
    resolver: R,
    /// Cache backend for fact lookups.
    cache: C,
    /// Engine configuration.
    config: EngineConfig,
}

impl<R, C> DecisionEngine<R, C>
where
    R: FactResolver,
    C: CacheBackend,
{
    /// Creates a new decision engine.
    #[must_use]
    pub fn new(policies: Vec<Policy>, resolver: R, cache: C, config: EngineConfig) -> Self {
        Self {
            policies,
            resolver,
            cache,
            config,
        }
    }

    /// Returns the configured policies in configuration order.
    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Returns the fact resolver.
    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Computes the gating decision for a query.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] when the subject cannot be classified or a
    /// fact fetch fails.
    pub fn decide(&self, query: &DecisionQuery) -> Result<Decision, DecisionError> {
        let subject_type = query
            .subject
            .subject_type()
            .ok_or_else(|| {
                DecisionError::InvalidSubject(format!(
                    "subject {} has no gating type",
                    query.subject
                ))
            })?
            .to_string();

        let applicable = applicable_policies(
            &self.policies,
            &subject_type,
            &query.decision_context,
            &query.product_version,
        );
        if applicable.is_empty() {
            return Ok(Decision::vacuous(
                query.subject.clone(),
                query.decision_context.clone(),
                query.product_version.clone(),
            ));
        }

        let results = self.resolve_results(&query.subject, &query.ignore_results)?;
        let waivers =
            self.resolve_waivers(&query.subject, &query.product_version, &query.ignore_waivers)?;

        // Union requirement instances across policies, de-duplicated by
        // (testcase, scenario) in first-seen order. Order is applicable
        // policy order, then rule order, then scenario order.
        let mut seen = BTreeSet::new();
        let mut total = 0_usize;
        let mut unsatisfied = Vec::new();
        for policy in &applicable {
            for instance in
                evaluate_policy(policy, &query.subject, &query.product_version, &results, &waivers)
            {
                if !seen.insert(instance.dedup_key()) {
                    continue;
                }
                total += 1;
                if let Some(kind) = instance.unsatisfied {
                    unsatisfied.push(Requirement {
                        testcase: instance.testcase,
                        item: query.subject.clone(),
                        kind,
                        scenario: instance.scenario,
                    });
                }
            }
        }

        let summary = compose_summary(&unsatisfied, total);
        Ok(Decision {
            policies_satisfied: unsatisfied.is_empty(),
            decision_context: query.decision_context.clone(),
            product_version: query.product_version.clone(),
            subject: query.subject.clone(),
            applicable_policies: applicable.iter().map(|policy| policy.id.clone()).collect(),
            unsatisfied_requirements: unsatisfied,
            summary,
            previous: None,
        })
    }

    /// Enumerates the (context, version) pairs potentially affected by a
    /// fact change for a subject type.
    ///
    /// Pairs come from configured policies whose subject type matches, in
    /// configuration order, de-duplicated.
    #[must_use]
    pub fn affected_contexts(&self, subject_type: &str) -> Vec<(DecisionContext, ProductVersion)> {
        let mut seen = BTreeSet::new();
        let mut pairs = Vec::new();
        for policy in self.policies.iter().filter(|policy| policy.subject_type == subject_type) {
            for product_version in &policy.product_versions {
                let pair = (policy.decision_context.clone(), product_version.clone());
                if seen.insert(pair.clone()) {
                    pairs.push(pair);
                }
            }
        }
        pairs
    }

    /// Deletes the cached fact lookups for a subject.
    ///
    /// Both the results key and the waivers keys are deleted, since either
    /// kind of fact change can flip requirement satisfaction. Backend
    /// failures degrade to a warning; expiry bounds any staleness left
    /// behind.
    pub fn invalidate_subject(&self, subject: &Subject) {
        self.delete_key(&results_cache_key(subject));
        let mut versions = BTreeSet::new();
        for policy in &self.policies {
            for product_version in &policy.product_versions {
                versions.insert(product_version.clone());
            }
        }
        for product_version in versions {
            self.delete_key(&waivers_cache_key(subject, &product_version));
        }
    }

    /// Deletes one cache key, logging backend failures.
    fn delete_key(&self, key: &str) {
        if let Err(err) = self.cache.delete(key) {
            warn!(key, error = %err, "cache invalidation failed; relying on entry expiry");
        }
    }

    /// Resolves results through the cache, bypassing it for exclusions.
    fn resolve_results(
        &self,
        subject: &Subject,
        exclude: &BTreeSet<ResultId>,
    ) -> Result<Vec<TestResult>, DecisionError> {
        if !exclude.is_empty() {
            return Ok(self.resolver.fetch_results(subject, exclude)?);
        }
        let key = results_cache_key(subject);
        self.cached_fetch(&key, || self.resolver.fetch_results(subject, exclude))
    }

    /// Resolves waivers through the cache, bypassing it for exclusions.
    fn resolve_waivers(
        &self,
        subject: &Subject,
        product_version: &ProductVersion,
        exclude: &BTreeSet<WaiverId>,
    ) -> Result<Vec<Waiver>, DecisionError> {
        if !exclude.is_empty() {
            return Ok(self.resolver.fetch_waivers(subject, product_version, exclude)?);
        }
        let key = waivers_cache_key(subject, product_version);
        self.cached_fetch(&key, || self.resolver.fetch_waivers(subject, product_version, exclude))
    }

    /// Reads a value through the cache, falling back to a live fetch.
    ///
    /// Cache failures are logged and degrade to the direct fetch; caching is
    /// a performance optimization, never a correctness dependency.
    fn cached_fetch<T>(
        &self,
        key: &str,
        fetch: impl FnOnce() -> Result<T, ResolveError>,
    ) -> Result<T, DecisionError>
    where
        T: Serialize + DeserializeOwned,
    {
        match self.cache.get(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!(key, error = %err, "discarding undecodable cache entry");
                    self.delete_key(key);
                }
            },
            Ok(None) => {}
            Err(err) => {
                warn!(key, error = %err, "cache read failed; fetching directly");
            }
        }

        let value = fetch()?;
        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(key, &bytes, self.config.cache_ttl) {
                    warn!(key, error = %err, "cache write failed");
                }
            }
            Err(err) => {
                warn!(key, error = %err, "cache encoding failed");
            }
        }
        Ok(value)
    }
}
