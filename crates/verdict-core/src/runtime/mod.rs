// crates/verdict-core/src/runtime/mod.rs
// ============================================================================
// Module: Verdict Runtime
// Description: Decision engine, requirement evaluator, and cache backends.
// Purpose: Re-export the runtime surface.
// Dependencies: crate::runtime submodules
// ============================================================================

//! ## Overview
//! The runtime layer turns the passive core model into decisions: the
//! evaluator classifies requirements per policy, the engine aggregates
//! across policies through the cache and resolver, and the cache module
//! supplies key derivation plus the built-in backends.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cache;
pub mod engine;
pub mod evaluator;
pub mod memory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::cache::MemoryCache;
pub use self::cache::NullCache;
pub use self::cache::results_cache_key;
pub use self::cache::waivers_cache_key;
pub use self::engine::DecisionEngine;
pub use self::engine::DecisionError;
pub use self::engine::DecisionQuery;
pub use self::engine::EngineConfig;
pub use self::evaluator::RequirementInstance;
pub use self::evaluator::evaluate_policy;
pub use self::memory::InMemoryFactResolver;
