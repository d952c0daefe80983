// crates/verdict-core/src/lib.rs
// ============================================================================
// Module: Verdict Core Library
// Description: Public API surface for the Verdict decision core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Verdict core computes gating decisions: given a subject, a decision
//! context, and a product version, it evaluates the configured policies
//! against test results and waivers resolved from external stores and
//! reports whether every requirement is satisfied. Evaluation is
//! deterministic for fixed store state and backend-agnostic, integrating
//! through explicit resolver and cache interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::CacheBackend;
pub use interfaces::CacheError;
pub use interfaces::FactResolver;
pub use interfaces::ResolveError;
pub use runtime::DecisionEngine;
pub use runtime::DecisionError;
pub use runtime::DecisionQuery;
pub use runtime::EngineConfig;
pub use runtime::InMemoryFactResolver;
pub use runtime::MemoryCache;
pub use runtime::NullCache;
pub use runtime::RequirementInstance;
pub use runtime::evaluate_policy;
pub use runtime::results_cache_key;
pub use runtime::waivers_cache_key;
